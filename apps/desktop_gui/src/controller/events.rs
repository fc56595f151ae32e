//! UI/backend events and error modeling for the desktop controller.

use analyzer_core::{AnalyzedFileHandle, UploadError, UploadPhase};

pub enum UiEvent {
    WorkerReady,
    Info(String),
    UploadStarted { file_name: String },
    PhaseChanged(UploadPhase),
    UploadFinished(AnalyzedFileHandle),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    Credential,
    Transfer,
    Startup,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    WorkerStartup,
    SelectFile,
    Upload,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    /// Maps a typed upload failure onto a user-facing category. The worker
    /// has the concrete error in hand, so no substring sniffing is needed.
    pub fn from_upload_error(context: UiErrorContext, err: &UploadError) -> Self {
        let category = match err {
            UploadError::Validation { .. } | UploadError::FileRead { .. } => {
                UiErrorCategory::Validation
            }
            UploadError::CredentialRequest(_) | UploadError::Credential(_) => {
                UiErrorCategory::Credential
            }
            UploadError::TransferRequest(_) | UploadError::TransferStatus { .. } => {
                UiErrorCategory::Transfer
            }
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let category = match context {
            UiErrorContext::WorkerStartup => UiErrorCategory::Startup,
            _ => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context,
            message: message.into(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Credential => "Credential",
        UiErrorCategory::Transfer => "Transfer",
        UiErrorCategory::Startup => "Startup",
        UiErrorCategory::Unknown => "Unexpected",
    }
}
