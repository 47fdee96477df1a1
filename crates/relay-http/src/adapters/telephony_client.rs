//! Telephony Client (C2) adapter: places outbound calls via a Twilio-shaped
//! HTTPS API. E.164 validation happens before any network call (`spec.md`
//! §4.2) so a bad `to` never counts against a provider's rate limit or
//! shows up as a `Transport`/`Provider` failure.

use async_trait::async_trait;
use relay_core::domain::{is_e164, CallStatus};
use relay_core::ports::{OutboundCallRequest, OutboundCallResponse, TelephonyClient, TelephonyError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TwilioCallResponse {
    sid: String,
    status: CallStatus,
}

pub struct TwilioTelephonyClient {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
}

impl TwilioTelephonyClient {
    #[must_use]
    pub fn new(client: reqwest::Client, account_sid: String, auth_token: String) -> Self {
        Self {
            client,
            account_sid,
            auth_token,
        }
    }

    fn calls_url(&self) -> String {
        format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Calls.json",
            self.account_sid
        )
    }
}

#[async_trait]
impl TelephonyClient for TwilioTelephonyClient {
    async fn place_call(
        &self,
        request: OutboundCallRequest,
    ) -> Result<OutboundCallResponse, TelephonyError> {
        if !is_e164(&request.to) {
            return Err(TelephonyError::Validation(format!(
                "'{}' is not a valid E.164 number",
                request.to
            )));
        }

        let form = [
            ("To", request.to.as_str()),
            ("From", request.from.as_str()),
            ("Url", request.markup_url.as_str()),
            ("StatusCallback", request.status_url.as_str()),
            ("StatusCallbackEvent", "initiated"),
            ("StatusCallbackEvent", "ringing"),
            ("StatusCallbackEvent", "answered"),
            ("StatusCallbackEvent", "completed"),
        ];

        let response = self
            .client
            .post(self.calls_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| TelephonyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TelephonyError::Provider(format!(
                "telephony provider returned {status}: {body}"
            )));
        }

        let parsed: TwilioCallResponse = response
            .json()
            .await
            .map_err(|e| TelephonyError::Provider(format!("malformed provider response: {e}")))?;

        Ok(OutboundCallResponse {
            call_id: parsed.sid,
            status: parsed.status,
        })
    }
}
