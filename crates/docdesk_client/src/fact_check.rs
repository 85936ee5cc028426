use client_logging::{client_debug, client_info};
use docdesk_core::{FactCheckReport, StreamKey, ValidationError};

use crate::gateway::RequestGateway;
use crate::shared::{lock, FlightGuard, SharedSession};
use crate::wire::ClaimRequest;
use crate::{Outcome, RequestError};

/// Verifies claims against external sources and records the verdicts in the
/// transcript.
#[derive(Clone)]
pub struct FactCheckCoordinator {
    gateway: RequestGateway,
    session: SharedSession,
}

impl FactCheckCoordinator {
    pub fn new(gateway: RequestGateway, session: SharedSession) -> Self {
        Self { gateway, session }
    }

    /// Appends a fact-check message on success and an error message on
    /// failure. Only one verification may be outstanding at a time.
    pub async fn verify(&self, claim: &str, document_id: Option<&str>) -> Outcome<FactCheckReport> {
        let generation = lock(&self.session).begin_fact_check(claim).map_err(|err| {
            client_info!("claim rejected: {}", err);
            RequestError::from(err)
        })?;
        let _flight = FlightGuard::new(self.session.clone(), StreamKey::FactCheck, generation);

        let request = ClaimRequest {
            claim: claim.trim().to_string(),
            document_id: document_id
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(ToOwned::to_owned),
        };
        let outcome = self.gateway.fact_check(&request).await;

        let mut session = lock(&self.session);
        match outcome {
            Ok(response) => {
                let report = FactCheckReport::from(response);
                if session.complete_fact_check(generation, report.clone()) {
                    Ok(report)
                } else {
                    client_debug!("fact-check {} result dropped", generation);
                    Err(RequestError::Superseded)
                }
            }
            Err(err) => {
                if session.fail_fact_check(generation, err.user_message()) {
                    Err(err)
                } else {
                    client_debug!("fact-check {} failure dropped", generation);
                    Err(RequestError::Superseded)
                }
            }
        }
    }

    /// Verifies the most recent answer in the transcript.
    pub async fn verify_last_answer(&self) -> Outcome<FactCheckReport> {
        let last = lock(&self.session).last_answer_claim();
        let (claim, document_id) = last.ok_or(ValidationError::NoAnswerToVerify)?;
        self.verify(&claim, document_id.as_deref()).await
    }
}
