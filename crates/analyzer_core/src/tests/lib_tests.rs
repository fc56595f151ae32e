use crate::*;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::{post, put},
    Json, Router,
};
use serde_json::json;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
enum RecordedCall {
    Ticket {
        body: serde_json::Value,
    },
    Storage {
        content_type: Option<String>,
        body: Vec<u8>,
    },
}

impl RecordedCall {
    fn is_ticket(&self) -> bool {
        matches!(self, RecordedCall::Ticket { .. })
    }

    fn is_storage(&self) -> bool {
        matches!(self, RecordedCall::Storage { .. })
    }
}

#[derive(Debug, Clone, Copy)]
enum TicketMode {
    Valid,
    MalformedEnvelope,
    MalformedPayload,
    ServerError,
}

#[derive(Clone)]
struct PipelineState {
    base_url: String,
    ticket_mode: TicketMode,
    put_status: StatusCode,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

async fn handle_ticket(
    State(state): State<PipelineState>,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, String) {
    state
        .calls
        .lock()
        .await
        .push(RecordedCall::Ticket { body });
    match state.ticket_mode {
        TicketMode::Valid => {
            let inner = json!({
                "presignedUrl": format!("{}/storage/presigned", state.base_url),
                "downloadUrl": format!("{}/results/analyzed.csv", state.base_url),
            })
            .to_string();
            (StatusCode::OK, json!({ "body": inner }).to_string())
        }
        TicketMode::MalformedEnvelope => (StatusCode::OK, "definitely not json".to_string()),
        TicketMode::MalformedPayload => {
            (StatusCode::OK, json!({ "body": "not json either" }).to_string())
        }
        TicketMode::ServerError => (StatusCode::INTERNAL_SERVER_ERROR, String::new()),
    }
}

async fn handle_storage_put(
    State(state): State<PipelineState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state.calls.lock().await.push(RecordedCall::Storage {
        content_type,
        body: body.to_vec(),
    });
    state.put_status
}

async fn spawn_pipeline_server(
    ticket_mode: TicketMode,
    put_status: StatusCode,
) -> (AnalyzerClient, String, Arc<Mutex<Vec<RecordedCall>>>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let base_url = format!("http://{addr}");
    let calls = Arc::new(Mutex::new(Vec::new()));
    let state = PipelineState {
        base_url: base_url.clone(),
        ticket_mode,
        put_status,
        calls: Arc::clone(&calls),
    };
    let app = Router::new()
        .route("/get-upload-url", post(handle_ticket))
        .route("/storage/presigned", put(handle_storage_put))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let client = AnalyzerClient::new(format!("{base_url}/get-upload-url"));
    (client, base_url, calls)
}

fn csv_file() -> SelectedFile {
    SelectedFile::from_bytes("orders.csv", CSV_MIME, b"id,amount\n1,10\n".to_vec())
}

#[tokio::test]
async fn rejects_non_csv_file_without_network_calls() {
    let (client, _base_url, calls) =
        spawn_pipeline_server(TicketMode::Valid, StatusCode::OK).await;
    let file = SelectedFile::from_bytes("report.txt", "text/plain", b"hello".to_vec());

    let err = client.upload_for_analysis(&file).await.expect_err("reject");
    assert!(
        matches!(&err, UploadError::Validation { actual } if actual.as_str() == "text/plain"),
        "got {err:?}"
    );
    assert_eq!(err.phase_at_failure(), UploadPhase::Idle);
    assert!(calls.lock().await.is_empty(), "no network call expected");
}

#[tokio::test]
async fn uploads_csv_with_ticket_then_storage_transfer() {
    let (client, base_url, calls) =
        spawn_pipeline_server(TicketMode::Valid, StatusCode::OK).await;
    let file = csv_file();

    let handle = client.upload_for_analysis(&file).await.expect("upload");
    assert_eq!(
        handle.download_url,
        format!("{base_url}/results/analyzed.csv")
    );
    assert_eq!(handle.suggested_name, "analyzed_orders.csv");

    let calls = calls.lock().await;
    assert_eq!(calls.len(), 2, "exactly two calls: {calls:?}");
    assert!(calls[0].is_ticket());
    assert!(calls[1].is_storage());

    match &calls[0] {
        RecordedCall::Ticket { body } => {
            assert_eq!(body["fileName"], "orders.csv");
            assert_eq!(body["fileType"], "text/csv");
        }
        other => panic!("unexpected call {other:?}"),
    }
    match &calls[1] {
        RecordedCall::Storage { content_type, body } => {
            assert_eq!(content_type.as_deref(), Some("text/csv"));
            assert_eq!(body, &file.bytes);
        }
        other => panic!("unexpected call {other:?}"),
    }
}

#[tokio::test]
async fn malformed_envelope_fails_in_requesting_phase_without_transfer() {
    let (client, _base_url, calls) =
        spawn_pipeline_server(TicketMode::MalformedEnvelope, StatusCode::OK).await;

    let err = client
        .upload_for_analysis(&csv_file())
        .await
        .expect_err("must fail");
    assert!(
        matches!(&err, UploadError::Credential(TicketError::Envelope(_))),
        "got {err:?}"
    );
    assert_eq!(err.phase_at_failure(), UploadPhase::Requesting);

    let calls = calls.lock().await;
    assert_eq!(calls.len(), 1);
    assert!(calls[0].is_ticket(), "no storage write expected");
}

#[tokio::test]
async fn malformed_payload_is_distinguished_from_envelope_failure() {
    let (client, _base_url, calls) =
        spawn_pipeline_server(TicketMode::MalformedPayload, StatusCode::OK).await;

    let err = client
        .upload_for_analysis(&csv_file())
        .await
        .expect_err("must fail");
    assert!(
        matches!(err, UploadError::Credential(TicketError::Payload(_))),
        "got {err:?}"
    );
    assert_eq!(calls.lock().await.len(), 1);
}

#[tokio::test]
async fn credential_endpoint_error_status_is_a_credential_error() {
    let (client, _base_url, calls) =
        spawn_pipeline_server(TicketMode::ServerError, StatusCode::OK).await;

    let err = client
        .upload_for_analysis(&csv_file())
        .await
        .expect_err("must fail");
    assert!(
        matches!(&err, UploadError::CredentialRequest(_)),
        "got {err:?}"
    );
    assert_eq!(err.phase_at_failure(), UploadPhase::Requesting);
    assert_eq!(calls.lock().await.len(), 1);
}

#[tokio::test]
async fn storage_failure_status_fails_in_transferring_phase() {
    let (client, _base_url, calls) =
        spawn_pipeline_server(TicketMode::Valid, StatusCode::INTERNAL_SERVER_ERROR).await;

    let err = client
        .upload_for_analysis(&csv_file())
        .await
        .expect_err("must fail");
    assert!(
        matches!(&err, UploadError::TransferStatus { status } if *status == StatusCode::INTERNAL_SERVER_ERROR),
        "got {err:?}"
    );
    assert_eq!(err.phase_at_failure(), UploadPhase::Transferring);

    let calls = calls.lock().await;
    assert_eq!(calls.len(), 2, "the PUT itself was attempted");
    assert!(calls[1].is_storage());
}

#[tokio::test]
async fn stepwise_calls_use_the_issued_presigned_url() {
    let (client, base_url, calls) =
        spawn_pipeline_server(TicketMode::Valid, StatusCode::OK).await;
    let file = csv_file();

    let ticket = client.request_upload_ticket(&file).await.expect("ticket");
    assert_eq!(
        ticket.presigned_url,
        format!("{base_url}/storage/presigned")
    );
    client
        .transfer_to_storage(&ticket, &file)
        .await
        .expect("transfer");
    assert_eq!(calls.lock().await.len(), 2);
}

#[test]
fn phase_flags_cover_the_state_machine() {
    assert!(!UploadPhase::Idle.is_in_flight());
    assert!(UploadPhase::Requesting.is_in_flight());
    assert!(UploadPhase::Transferring.is_in_flight());
    assert!(UploadPhase::Completed.is_terminal());
    assert!(UploadPhase::Failed.is_terminal());
    assert!(!UploadPhase::Requesting.is_terminal());
}

#[test]
fn suggested_download_name_prefixes_the_original() {
    assert_eq!(csv_file().suggested_download_name(), "analyzed_orders.csv");
}
