use client_logging::{client_debug, client_info};
use docdesk_core::StreamKey;

use crate::gateway::RequestGateway;
use crate::shared::{lock, FlightGuard, SharedSession};
use crate::wire::QuestionRequest;
use crate::{Outcome, RequestError};

/// Asks questions about the current document, one at a time.
#[derive(Clone)]
pub struct QueryCoordinator {
    gateway: RequestGateway,
    session: SharedSession,
}

impl QueryCoordinator {
    pub fn new(gateway: RequestGateway, session: SharedSession) -> Self {
        Self { gateway, session }
    }

    /// Appends the question and a "Thinking..." placeholder, then lands the
    /// answer (or the error text) in that placeholder.
    ///
    /// Returns [`RequestError::Superseded`] when a new document was installed
    /// while the question was in flight; the transcript is left untouched.
    pub async fn ask(&self, question: &str) -> Outcome<()> {
        let ticket = lock(&self.session).begin_query(question).map_err(|err| {
            client_info!("question rejected: {}", err);
            RequestError::from(err)
        })?;
        let _flight = FlightGuard::new(self.session.clone(), StreamKey::Query, ticket.generation);

        let request = QuestionRequest {
            question: ticket.question.clone(),
            document_id: ticket.document_id.clone(),
            document_text: ticket.document_text.clone(),
        };
        let outcome = self.gateway.ask(&request).await;

        let mut session = lock(&self.session);
        let (applied, result) = match outcome {
            Ok(response) => (session.resolve_query(&ticket, response.into_content()), Ok(())),
            Err(err) => (session.fail_query(&ticket, err.user_message()), Err(err)),
        };
        if !applied {
            client_debug!(
                "answer for message {} arrived after its document was replaced",
                ticket.placeholder
            );
            return Err(RequestError::Superseded);
        }
        result
    }
}
