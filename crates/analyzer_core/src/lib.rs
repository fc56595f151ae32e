//! Client for the remote CSV analysis pipeline.
//!
//! The pipeline is reached through two HTTP calls: a `POST` to the
//! credential endpoint that issues a short-lived presigned storage URL plus
//! the eventual download link (double-encoded, see [`ticket`]), then a `PUT`
//! of the raw file bytes to that presigned URL. No retries and no timeout
//! beyond the transport default.

use std::path::Path;

use reqwest::Client;
use tracing::{info, warn};

pub mod error;
pub mod ticket;

pub use error::{TicketError, UploadError};
pub use reqwest::StatusCode;
pub use ticket::{TicketRequest, UploadTicket};

/// The only MIME type the pipeline accepts.
pub const CSV_MIME: &str = "text/csv";

/// Credential endpoint of the production pipeline.
pub const DEFAULT_TICKET_ENDPOINT: &str =
    "https://6au9w43e09.execute-api.us-west-2.amazonaws.com/prod/get-upload-url";

/// Phases of an upload session.
///
/// `Idle -> Requesting -> Transferring -> Completed | Failed`; terminal
/// phases return to `Idle` when a new file is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadPhase {
    #[default]
    Idle,
    Requesting,
    Transferring,
    Completed,
    Failed,
}

impl UploadPhase {
    pub fn is_in_flight(self) -> bool {
        matches!(self, UploadPhase::Requesting | UploadPhase::Transferring)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, UploadPhase::Completed | UploadPhase::Failed)
    }

    pub fn label(self) -> &'static str {
        match self {
            UploadPhase::Idle => "idle",
            UploadPhase::Requesting => "requesting credential",
            UploadPhase::Transferring => "transferring",
            UploadPhase::Completed => "completed",
            UploadPhase::Failed => "failed",
        }
    }
}

/// A user-chosen file, read eagerly so the upload worker owns the bytes.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    /// Reads the file at `path`; the MIME type is resolved from the file
    /// extension.
    pub async fn from_path(path: &Path) -> Result<Self, UploadError> {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload.csv")
            .to_string();
        let content_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| UploadError::FileRead {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self {
            name,
            content_type,
            bytes,
        })
    }

    pub fn from_bytes(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// The pipeline only processes CSV; anything else is rejected before a
    /// single network call is made.
    pub fn validate_csv(&self) -> Result<(), UploadError> {
        if self.content_type == CSV_MIME {
            Ok(())
        } else {
            Err(UploadError::Validation {
                actual: self.content_type.clone(),
            })
        }
    }

    /// Suggested local name for the processed result, mirroring the naming
    /// used by the analysis pipeline.
    pub fn suggested_download_name(&self) -> String {
        format!("analyzed_{}", self.name)
    }
}

/// Where the processed file will be downloadable once the pipeline is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedFileHandle {
    pub download_url: String,
    pub suggested_name: String,
}

/// HTTP client for the upload protocol. Cheap to clone per reqwest's own
/// connection pooling.
#[derive(Debug, Clone)]
pub struct AnalyzerClient {
    http: Client,
    ticket_endpoint: String,
}

impl AnalyzerClient {
    pub fn new(ticket_endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            ticket_endpoint: ticket_endpoint.into(),
        }
    }

    pub fn ticket_endpoint(&self) -> &str {
        &self.ticket_endpoint
    }

    /// Asks the credential endpoint for an upload ticket for `file`.
    pub async fn request_upload_ticket(
        &self,
        file: &SelectedFile,
    ) -> Result<UploadTicket, UploadError> {
        let raw = self
            .http
            .post(&self.ticket_endpoint)
            .json(&TicketRequest {
                file_name: file.name.clone(),
                file_type: file.content_type.clone(),
            })
            .send()
            .await
            .map_err(UploadError::CredentialRequest)?
            .error_for_status()
            .map_err(UploadError::CredentialRequest)?
            .text()
            .await
            .map_err(UploadError::CredentialRequest)?;

        let ticket = ticket::parse_ticket(&raw)?;
        info!(file = %file.name, "upload ticket issued");
        Ok(ticket)
    }

    /// Writes the file's raw bytes to the ticket's presigned URL with the
    /// file's own content type.
    pub async fn transfer_to_storage(
        &self,
        ticket: &UploadTicket,
        file: &SelectedFile,
    ) -> Result<(), UploadError> {
        let response = self
            .http
            .put(&ticket.presigned_url)
            .header(reqwest::header::CONTENT_TYPE, &file.content_type)
            .body(file.bytes.clone())
            .send()
            .await
            .map_err(UploadError::TransferRequest)?;

        let status = response.status();
        if !status.is_success() {
            warn!(file = %file.name, %status, "storage rejected transfer");
            return Err(UploadError::TransferStatus { status });
        }
        info!(file = %file.name, size_bytes = file.bytes.len(), "transfer complete");
        Ok(())
    }

    /// The full upload sequence: validate, request a ticket, transfer the
    /// bytes, and hand back the download link. Exactly two network calls on
    /// the happy path, zero when validation fails.
    pub async fn upload_for_analysis(
        &self,
        file: &SelectedFile,
    ) -> Result<AnalyzedFileHandle, UploadError> {
        file.validate_csv()?;
        let ticket = self.request_upload_ticket(file).await?;
        self.transfer_to_storage(&ticket, file).await?;
        Ok(AnalyzedFileHandle {
            download_url: ticket.download_url.clone(),
            suggested_name: file.suggested_download_name(),
        })
    }
}

#[cfg(test)]
mod tests;
