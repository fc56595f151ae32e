//! Upload ticket wire format for the credential endpoint.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::TicketError;

/// Request body for the credential endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRequest {
    pub file_name: String,
    pub file_type: String,
}

/// Outer layer of the double-encoded response. The `body` field holds the
/// actual ticket as a JSON-encoded string; unknown sibling fields (status
/// codes, headers) are ignored.
#[derive(Debug, Deserialize)]
struct TicketEnvelope {
    body: String,
}

/// Inner ticket payload: where to write the file and where the processed
/// result will eventually be downloadable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTicket {
    pub presigned_url: String,
    pub download_url: String,
}

/// Decodes a raw credential endpoint response in two explicit stages and
/// checks that both ticket URLs are syntactically valid.
pub fn parse_ticket(raw: &str) -> Result<UploadTicket, TicketError> {
    let envelope: TicketEnvelope = serde_json::from_str(raw).map_err(TicketError::Envelope)?;
    let ticket: UploadTicket =
        serde_json::from_str(&envelope.body).map_err(TicketError::Payload)?;
    Url::parse(&ticket.presigned_url).map_err(|source| TicketError::InvalidUrl {
        field: "presignedUrl",
        source,
    })?;
    Url::parse(&ticket.download_url).map_err(|source| TicketError::InvalidUrl {
        field: "downloadUrl",
        source,
    })?;
    Ok(ticket)
}
