//! Upload worker: a dedicated thread running a tokio runtime that drains
//! the UI command queue and reports progress back as UI events.

use std::thread;

use analyzer_core::{AnalyzedFileHandle, AnalyzerClient, SelectedFile, UploadPhase};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    ticket_endpoint: String,
) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Upload worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::WorkerStartup,
                    format!("upload worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build upload worker runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = AnalyzerClient::new(ticket_endpoint);
            tracing::info!(endpoint = client.ticket_endpoint(), "upload worker ready");
            let _ = ui_tx.try_send(UiEvent::WorkerReady);

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::UploadCsv { path } => {
                        tracing::info!(path = %path.display(), "backend: upload_csv");
                        let file = match SelectedFile::from_path(&path).await {
                            Ok(file) => file,
                            Err(err) => {
                                tracing::error!("backend: reading selected file failed: {err}");
                                let _ = ui_tx.try_send(UiEvent::Error(
                                    UiError::from_upload_error(UiErrorContext::SelectFile, &err),
                                ));
                                continue;
                            }
                        };
                        if let Err(err) = file.validate_csv() {
                            tracing::warn!(file = %file.name, "backend: rejected non-CSV selection");
                            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_upload_error(
                                UiErrorContext::SelectFile,
                                &err,
                            )));
                            continue;
                        }

                        let _ = ui_tx.try_send(UiEvent::UploadStarted {
                            file_name: file.name.clone(),
                        });
                        let ticket = match client.request_upload_ticket(&file).await {
                            Ok(ticket) => ticket,
                            Err(err) => {
                                tracing::error!(file = %file.name, "backend: ticket request failed: {err}");
                                let _ = ui_tx.try_send(UiEvent::Error(
                                    UiError::from_upload_error(UiErrorContext::Upload, &err),
                                ));
                                continue;
                            }
                        };

                        let _ = ui_tx.try_send(UiEvent::PhaseChanged(UploadPhase::Transferring));
                        match client.transfer_to_storage(&ticket, &file).await {
                            Ok(()) => {
                                let _ = ui_tx.try_send(UiEvent::UploadFinished(
                                    AnalyzedFileHandle {
                                        download_url: ticket.download_url.clone(),
                                        suggested_name: file.suggested_download_name(),
                                    },
                                ));
                            }
                            Err(err) => {
                                tracing::error!(file = %file.name, "backend: storage transfer failed: {err}");
                                let _ = ui_tx.try_send(UiEvent::Error(
                                    UiError::from_upload_error(UiErrorContext::Upload, &err),
                                ));
                            }
                        }
                    }
                }
            }
        });
    });
}
