//! Telephony Client port (C2, `spec.md` §4.2).

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::CallStatus;

#[derive(Debug, Clone)]
pub struct OutboundCallRequest {
    pub to: String,
    pub from: String,
    pub markup_url: String,
    pub status_url: String,
}

#[derive(Debug, Clone)]
pub struct OutboundCallResponse {
    pub call_id: String,
    pub status: CallStatus,
}

#[derive(Debug, Error)]
pub enum TelephonyError {
    #[error("invalid destination number: {0}")]
    Validation(String),

    #[error("transport error reaching telephony provider: {0}")]
    Transport(String),

    #[error("telephony provider rejected the call: {0}")]
    Provider(String),
}

/// Places outbound calls via the telephony provider.
///
/// Validation (`to` must match E.164) happens before any network call, per
/// `spec.md` §4.2 — `TelephonyError::Validation` never counts toward a
/// reconnect budget or the `errors_total` metric (`spec.md` §7).
#[async_trait]
pub trait TelephonyClient: Send + Sync {
    async fn place_call(
        &self,
        request: OutboundCallRequest,
    ) -> Result<OutboundCallResponse, TelephonyError>;
}
