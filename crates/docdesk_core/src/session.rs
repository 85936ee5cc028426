use std::collections::BTreeMap;

use crate::validate::{self, ValidationError};
use crate::view_model::SessionView;
use crate::{
    Document, DocumentStatus, FactCheckReport, FlightLedger, Generation, GenerationGuard,
    MessageContent, Role, SequenceIndex, StreamKey, Transcript, THINKING_PLACEHOLDER,
};

/// Placeholder text used when an ask is abandoned before its answer arrives.
pub const CANCELLED_TEXT: &str = "Request was cancelled.";

/// Everything a question request needs, captured when the question is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub generation: Generation,
    pub placeholder: SequenceIndex,
    pub question: String,
    pub document_id: String,
    pub document_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Flight {
    generation: Generation,
    placeholder: Option<SequenceIndex>,
}

/// Root aggregate for one page visit: the current document, the conversation
/// about it and the bookkeeping for operations still in flight.
///
/// Lifecycle: [`Session::create`] on page load, [`Session::reset_on_upload`]
/// whenever a newly uploaded document is installed, [`Session::teardown`] when
/// the page goes away.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    document: Option<Document>,
    upload_status: Option<DocumentStatus>,
    upload_error: Option<String>,
    transcript: Transcript,
    generations: GenerationGuard,
    flights: BTreeMap<StreamKey, Flight>,
    dirty: bool,
}

impl Session {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn current_document(&self) -> Option<&Document> {
        self.document.as_ref().filter(|document| document.is_ready())
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn upload_status(&self) -> Option<DocumentStatus> {
        self.upload_status
    }

    pub fn upload_error(&self) -> Option<&str> {
        self.upload_error.as_deref()
    }

    pub fn is_in_flight(&self, stream: StreamKey) -> bool {
        self.flights.contains_key(&stream)
    }

    /// Starts an upload attempt. A later attempt supersedes this one.
    pub fn begin_upload(&mut self) -> Generation {
        let generation = self.generations.next_generation(StreamKey::Upload);
        self.flights.insert(
            StreamKey::Upload,
            Flight {
                generation,
                placeholder: None,
            },
        );
        self.upload_status = Some(DocumentStatus::Uploading);
        self.upload_error = None;
        self.dirty = true;
        generation
    }

    /// Records a selection that was refused before any request was made.
    pub fn reject_upload(&mut self, error: &ValidationError) {
        self.upload_error = Some(error.to_string());
        self.dirty = true;
    }

    /// Installs the uploaded document if `generation` is still the latest upload.
    pub fn complete_upload(&mut self, generation: Generation, document: Document) -> bool {
        if !self.generations.is_current(StreamKey::Upload, generation) {
            return false;
        }
        self.flights.remove(&StreamKey::Upload);
        self.reset_on_upload(document);
        self.upload_status = Some(DocumentStatus::Ready);
        true
    }

    /// Records a failed upload. The current document and transcript are kept.
    pub fn fail_upload(&mut self, generation: Generation, message: impl Into<String>) -> bool {
        if !self.generations.is_current(StreamKey::Upload, generation) {
            return false;
        }
        self.flights.remove(&StreamKey::Upload);
        self.upload_status = Some(DocumentStatus::Failed);
        self.upload_error = Some(message.into());
        self.dirty = true;
        true
    }

    /// Makes `document` current and empties the transcript. Questions and
    /// fact-checks still in flight for the previous document become stale.
    pub fn reset_on_upload(&mut self, mut document: Document) {
        document.status = DocumentStatus::Ready;
        self.document = Some(document);
        self.transcript.clear();
        for stream in [StreamKey::Query, StreamKey::FactCheck] {
            self.generations.invalidate(stream);
            self.flights.remove(&stream);
        }
        self.upload_error = None;
        self.dirty = true;
    }

    /// Accepts a question: appends it and an assistant placeholder.
    pub fn begin_query(&mut self, question: &str) -> Result<QueryTicket, ValidationError> {
        validate::question(question)?;
        let document = self
            .current_document()
            .ok_or(ValidationError::NoCurrentDocument)?;
        validate::document_id(&document.id)?;
        if self.is_in_flight(StreamKey::Query) {
            return Err(ValidationError::AlreadyInFlight(StreamKey::Query));
        }
        let document_id = document.id.clone();
        let document_text = document.extracted_text.clone();

        let question = question.trim().to_string();
        self.transcript
            .append(Role::User, MessageContent::text(question.clone()));
        let placeholder = self
            .transcript
            .append(Role::Assistant, MessageContent::text(THINKING_PLACEHOLDER));
        let generation = self.generations.next_generation(StreamKey::Query);
        self.flights.insert(
            StreamKey::Query,
            Flight {
                generation,
                placeholder: Some(placeholder),
            },
        );
        self.dirty = true;

        Ok(QueryTicket {
            generation,
            placeholder,
            question,
            document_id,
            document_text,
        })
    }

    /// Lands the answer in the ticket's placeholder unless the ticket is stale.
    pub fn resolve_query(&mut self, ticket: &QueryTicket, content: MessageContent) -> bool {
        if !self.generations.is_current(StreamKey::Query, ticket.generation) {
            return false;
        }
        let applied = self.transcript.resolve(ticket.placeholder, content);
        self.end_flight(StreamKey::Query, ticket.generation);
        self.dirty |= applied;
        applied
    }

    /// Marks the ticket's placeholder failed unless the ticket is stale.
    pub fn fail_query(&mut self, ticket: &QueryTicket, message: impl Into<String>) -> bool {
        if !self.generations.is_current(StreamKey::Query, ticket.generation) {
            return false;
        }
        let applied = self.transcript.fail(ticket.placeholder, message);
        self.end_flight(StreamKey::Query, ticket.generation);
        self.dirty |= applied;
        applied
    }

    pub fn begin_fact_check(&mut self, claim: &str) -> Result<Generation, ValidationError> {
        validate::claim(claim)?;
        if self.is_in_flight(StreamKey::FactCheck) {
            return Err(ValidationError::AlreadyInFlight(StreamKey::FactCheck));
        }
        let generation = self.generations.next_generation(StreamKey::FactCheck);
        self.flights.insert(
            StreamKey::FactCheck,
            Flight {
                generation,
                placeholder: None,
            },
        );
        self.dirty = true;
        Ok(generation)
    }

    pub fn complete_fact_check(&mut self, generation: Generation, report: FactCheckReport) -> bool {
        let content = MessageContent::FactCheck(report);
        self.append_fact_check_result(generation, Role::FactCheck, content)
    }

    pub fn fail_fact_check(&mut self, generation: Generation, message: impl Into<String>) -> bool {
        let content = MessageContent::Text(message.into());
        self.append_fact_check_result(generation, Role::Error, content)
    }

    /// The latest resolved answer and the id of the document it is about.
    pub fn last_answer_claim(&self) -> Option<(String, Option<String>)> {
        let message = self.transcript.last_answer()?;
        let claim = match &message.content {
            MessageContent::Answer { answer, .. } => answer.clone(),
            other => other.to_string(),
        };
        let document_id = self.current_document().map(|document| document.id.clone());
        Some((claim, document_id))
    }

    /// Ends the visit: forgets the document and transcript and makes every
    /// outstanding response stale.
    pub fn teardown(&mut self) {
        for stream in [StreamKey::Upload, StreamKey::Query, StreamKey::FactCheck] {
            self.generations.invalidate(stream);
        }
        self.flights.clear();
        self.document = None;
        self.upload_status = None;
        self.upload_error = None;
        self.transcript.clear();
        self.dirty = true;
    }

    pub fn view(&self) -> SessionView {
        let document = self.current_document();
        let query_busy = self.is_in_flight(StreamKey::Query);
        let fact_check_busy = self.is_in_flight(StreamKey::FactCheck);
        SessionView {
            document_id: document.map(|d| d.id.clone()),
            document_name: document.map(|d| d.file_name.clone()),
            upload_status: self.upload_status,
            upload_error: self.upload_error.clone(),
            uploading: self.is_in_flight(StreamKey::Upload),
            messages: self.transcript.messages().to_vec(),
            can_ask: document.is_some() && !query_busy,
            can_verify: self.transcript.last_answer().is_some() && !fact_check_busy,
            dirty: self.dirty,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn append_fact_check_result(
        &mut self,
        generation: Generation,
        role: Role,
        content: MessageContent,
    ) -> bool {
        let owns_flight = self
            .flights
            .get(&StreamKey::FactCheck)
            .is_some_and(|flight| flight.generation == generation);
        if !owns_flight || !self.generations.is_current(StreamKey::FactCheck, generation) {
            return false;
        }
        self.transcript.append(role, content);
        self.end_flight(StreamKey::FactCheck, generation);
        self.dirty = true;
        true
    }
}

impl FlightLedger for Session {
    /// Releases the slot held by `generation`. Whatever it left unsettled (a
    /// pending placeholder, an upload still marked as uploading) is failed.
    fn end_flight(&mut self, stream: StreamKey, generation: Generation) {
        let Some(flight) = self.flights.get(&stream).copied() else {
            return;
        };
        if flight.generation != generation {
            return;
        }
        self.flights.remove(&stream);
        if self.generations.is_current(stream, generation) {
            if let Some(placeholder) = flight.placeholder {
                self.transcript.fail(placeholder, CANCELLED_TEXT);
            }
            if stream == StreamKey::Upload
                && self.upload_status == Some(DocumentStatus::Uploading)
            {
                self.upload_status = Some(DocumentStatus::Failed);
                self.upload_error = Some(CANCELLED_TEXT.to_string());
            }
        }
        self.dirty = true;
    }
}
