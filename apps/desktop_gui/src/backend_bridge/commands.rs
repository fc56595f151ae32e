//! Backend commands queued from UI to the upload worker.

use std::path::PathBuf;

pub enum BackendCommand {
    /// Read the file at `path`, validate it as CSV, and run the two-step
    /// upload sequence against the analysis pipeline.
    UploadCsv { path: PathBuf },
}
