use thiserror::Error;

/// Failure in the two-stage decode of the credential endpoint response.
///
/// The endpoint replies with an outer JSON object whose `body` field is
/// itself a JSON-encoded string. Each stage gets its own variant so callers
/// and tests can tell which layer broke.
#[derive(Debug, Error)]
pub enum TicketError {
    #[error("ticket envelope is not valid JSON: {0}")]
    Envelope(#[source] serde_json::Error),
    #[error("ticket payload inside the envelope is not valid JSON: {0}")]
    Payload(#[source] serde_json::Error),
    #[error("ticket carries an invalid {field} value: {source}")]
    InvalidUrl {
        field: &'static str,
        source: url::ParseError,
    },
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("unsupported file type '{actual}': only text/csv is accepted")]
    Validation { actual: String },
    #[error("could not read '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("credential endpoint request failed: {0}")]
    CredentialRequest(#[source] reqwest::Error),
    #[error("credential endpoint returned an unusable response: {0}")]
    Credential(#[from] TicketError),
    #[error("storage transfer failed: {0}")]
    TransferRequest(#[source] reqwest::Error),
    #[error("storage rejected the transfer with status {status}")]
    TransferStatus { status: reqwest::StatusCode },
}

impl UploadError {
    /// The session phase in which this failure occurred. Validation and
    /// local read failures happen before a session starts, so they map to
    /// `Idle`.
    pub fn phase_at_failure(&self) -> crate::UploadPhase {
        match self {
            UploadError::Validation { .. } | UploadError::FileRead { .. } => {
                crate::UploadPhase::Idle
            }
            UploadError::CredentialRequest(_) | UploadError::Credential(_) => {
                crate::UploadPhase::Requesting
            }
            UploadError::TransferRequest(_) | UploadError::TransferStatus { .. } => {
                crate::UploadPhase::Transferring
            }
        }
    }
}
