use client_logging::{client_debug, client_info};
use docdesk_core::{validate, Document, StreamKey};

use crate::gateway::RequestGateway;
use crate::shared::{lock, FlightGuard, SharedSession};
use crate::{Outcome, RequestError, UploadFile};

/// Sends a picked file to the backend and installs the result as the
/// session's current document. The latest upload wins.
#[derive(Clone)]
pub struct UploadCoordinator {
    gateway: RequestGateway,
    session: SharedSession,
}

impl UploadCoordinator {
    pub fn new(gateway: RequestGateway, session: SharedSession) -> Self {
        Self { gateway, session }
    }

    /// Uploads `file`. A rejected selection only fills the upload error slot;
    /// a failed upload keeps the previous document and transcript.
    pub async fn upload(&self, file: Option<UploadFile>) -> Outcome<Document> {
        if let Err(err) = validate::upload(file.as_ref().map(|file| file.mime_type.as_str())) {
            client_info!("upload selection rejected: {}", err);
            lock(&self.session).reject_upload(&err);
            return Err(err.into());
        }

        let generation = lock(&self.session).begin_upload();
        let _flight = FlightGuard::new(self.session.clone(), StreamKey::Upload, generation);
        let outcome = self
            .gateway
            .upload(file.as_ref())
            .await
            .and_then(|response| {
                if response.document_id.trim().is_empty() {
                    Err(RequestError::MalformedResponse(
                        "upload response carries an empty document_id".to_string(),
                    ))
                } else {
                    Ok(response)
                }
            });

        let file_name = file.map(|file| file.name).unwrap_or_default();
        let mut session = lock(&self.session);
        match outcome {
            Ok(response) => {
                let document = Document::ready(response.document_id, file_name, response.content);
                if session.complete_upload(generation, document.clone()) {
                    client_info!("document {} ready ({})", document.id, document.file_name);
                    Ok(document)
                } else {
                    client_debug!("upload {} superseded, result dropped", generation);
                    Err(RequestError::Superseded)
                }
            }
            Err(err) => {
                if session.fail_upload(generation, err.user_message()) {
                    Err(err)
                } else {
                    client_debug!("upload {} superseded, failure dropped", generation);
                    Err(RequestError::Superseded)
                }
            }
        }
    }
}
