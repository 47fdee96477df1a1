//! Environment-driven settings, loaded and validated once at boot.
//!
//! `spec.md` §6 lists the required environment variables and their
//! defaults. Following `gglib-core::settings`'s "validate at the boundary,
//! fail fast" idiom: a single `Settings::from_env()` call either returns a
//! fully-populated, already-validated struct or a `SettingsError` naming
//! exactly what's wrong, so `relay-cli`'s `main` can exit 1 with one
//! readable message instead of panicking deep in a handler later.

use std::env::VarError;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MEDIA_STREAM_TIMEOUT_MS: u64 = 300_000;
pub const DEFAULT_MAX_AI_RETRIES: u32 = 3;

#[derive(Debug, Clone)]
pub struct Settings {
    /// AI provider agent id (`ELEVENLABS_AGENT_ID` in `spec.md` §6; kept as
    /// a generic field name here since the provider is an external
    /// collaborator, not a hard dependency of this crate).
    pub ai_agent_id: String,
    pub ai_api_key: String,
    pub telephony_account_sid: String,
    pub telephony_auth_token: String,
    pub telephony_phone_number: String,
    pub port: u16,
    pub media_stream_timeout_ms: u64,
    pub max_ai_retries: u32,
    /// Toggles log verbosity; optional, mirrors `NODE_ENV` in `spec.md` §6.
    pub env: Option<String>,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("missing required environment variable: {0}")]
    Missing(String),

    #[error("environment variable {0} is not valid UTF-8")]
    NotUnicode(String),

    #[error("environment variable {name} must be a valid {expected}, got {value:?}")]
    Invalid {
        name: String,
        expected: &'static str,
        value: String,
    },
}

fn require(name: &str) -> Result<String, SettingsError> {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() => Ok(v),
        Ok(_) => Err(SettingsError::Missing(name.to_string())),
        Err(VarError::NotPresent) => Err(SettingsError::Missing(name.to_string())),
        Err(VarError::NotUnicode(_)) => Err(SettingsError::NotUnicode(name.to_string())),
    }
}

fn optional_parsed<T: std::str::FromStr>(
    name: &str,
    default: T,
) -> Result<T, SettingsError> {
    match std::env::var(name) {
        Ok(v) => v.parse().map_err(|_| SettingsError::Invalid {
            name: name.to_string(),
            expected: std::any::type_name::<T>(),
            value: v,
        }),
        Err(_) => Ok(default),
    }
}

impl Settings {
    /// Load and validate all required settings from the process environment.
    ///
    /// Callers are expected to call `dotenvy::dotenv().ok()` before this, to
    /// pick up a local `.env` file in development — matching
    /// `gglib-cli::main`'s boot sequence.
    pub fn from_env() -> Result<Self, SettingsError> {
        Ok(Self {
            ai_agent_id: require("ELEVENLABS_AGENT_ID")?,
            ai_api_key: require("ELEVENLABS_API_KEY")?,
            telephony_account_sid: require("TWILIO_ACCOUNT_SID")?,
            telephony_auth_token: require("TWILIO_AUTH_TOKEN")?,
            telephony_phone_number: require("TWILIO_PHONE_NUMBER")?,
            port: optional_parsed("PORT", DEFAULT_PORT)?,
            media_stream_timeout_ms: optional_parsed(
                "MEDIA_STREAM_TIMEOUT_MS",
                DEFAULT_MEDIA_STREAM_TIMEOUT_MS,
            )?,
            max_ai_retries: optional_parsed("MAX_ELEVENLABS_RETRIES", DEFAULT_MAX_AI_RETRIES)?,
            env: std::env::var("NODE_ENV").ok(),
        })
    }

    #[must_use]
    pub fn is_verbose(&self) -> bool {
        !matches!(self.env.as_deref(), Some("production"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment variables are process-global; serialize the tests that
    // touch them so they don't race under `cargo test`'s default
    // multi-threaded harness.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_all() {
        for var in [
            "ELEVENLABS_AGENT_ID",
            "ELEVENLABS_API_KEY",
            "TWILIO_ACCOUNT_SID",
            "TWILIO_AUTH_TOKEN",
            "TWILIO_PHONE_NUMBER",
            "PORT",
            "MEDIA_STREAM_TIMEOUT_MS",
            "MAX_ELEVENLABS_RETRIES",
            "NODE_ENV",
        ] {
            std::env::remove_var(var);
        }
    }

    fn set_required() {
        std::env::set_var("ELEVENLABS_AGENT_ID", "agent-1");
        std::env::set_var("ELEVENLABS_API_KEY", "key-1");
        std::env::set_var("TWILIO_ACCOUNT_SID", "sid-1");
        std::env::set_var("TWILIO_AUTH_TOKEN", "token-1");
        std::env::set_var("TWILIO_PHONE_NUMBER", "+15551234567");
    }

    #[test]
    fn missing_required_var_is_fatal() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_all();
        let err = Settings::from_env().unwrap_err();
        assert!(matches!(err, SettingsError::Missing(_)));
    }

    #[test]
    fn defaults_apply_when_optional_vars_absent() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_all();
        set_required();
        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(
            settings.media_stream_timeout_ms,
            DEFAULT_MEDIA_STREAM_TIMEOUT_MS
        );
        assert_eq!(settings.max_ai_retries, DEFAULT_MAX_AI_RETRIES);
        clear_all();
    }

    #[test]
    fn invalid_port_is_rejected() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_all();
        set_required();
        std::env::set_var("PORT", "not-a-port");
        let err = Settings::from_env().unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { .. }));
        clear_all();
    }
}
