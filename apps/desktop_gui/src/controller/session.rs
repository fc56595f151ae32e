//! Upload session state tracked by the UI.
//!
//! One session exists per window. A download handle is held only in the
//! `Completed` phase; selecting a new file implicitly discards a terminal
//! session.

use analyzer_core::{AnalyzedFileHandle, UploadPhase};

#[derive(Debug, Clone, Default)]
pub struct UploadSession {
    phase: UploadPhase,
    file_name: Option<String>,
    download: Option<AnalyzedFileHandle>,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn download(&self) -> Option<&AnalyzedFileHandle> {
        self.download.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_in_flight()
    }

    /// Starts a fresh session for `file_name`. Discards any previous
    /// download link. Callers guard against starting while busy; a stray
    /// begin while in flight is refused.
    pub fn begin(&mut self, file_name: String) -> bool {
        if self.is_busy() {
            return false;
        }
        self.phase = UploadPhase::Requesting;
        self.file_name = Some(file_name);
        self.download = None;
        true
    }

    /// Moves an in-flight session forward. Only the `Requesting ->
    /// Transferring` step exists today; anything else is ignored.
    pub fn advance(&mut self, phase: UploadPhase) {
        if self.phase == UploadPhase::Requesting && phase == UploadPhase::Transferring {
            self.phase = UploadPhase::Transferring;
        }
    }

    pub fn complete(&mut self, handle: AnalyzedFileHandle) {
        if self.is_busy() {
            self.phase = UploadPhase::Completed;
            self.download = Some(handle);
        }
    }

    pub fn fail(&mut self) {
        if self.is_busy() {
            self.phase = UploadPhase::Failed;
            self.download = None;
        }
    }
}
