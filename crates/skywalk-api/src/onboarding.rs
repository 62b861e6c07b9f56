// Onboarding envelopes
//
// Out-of-band connection payloads (typically a scanned code) of the form
// `{"scheme": ..., "url": "...", "username": "...", "password": "..."}`.
// A `scheme` key marks the payload as ours; its value is not inspected.

use secrecy::SecretString;
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum OnboardingError {
    /// Not a JSON object, or no `scheme` key.
    #[error("payload is not a connection envelope")]
    NotAnEnvelope,

    #[error("connection envelope has no server url")]
    MissingUrl,

    #[error("connection envelope url is invalid: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Server location and optional credentials carried by an envelope.
#[derive(Debug, Clone)]
pub struct OnboardingEnvelope {
    pub url: Url,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

impl OnboardingEnvelope {
    /// Cheap validity check: a JSON object with a `scheme` key.
    pub fn is_envelope(payload: &str) -> bool {
        as_envelope(payload).is_some()
    }

    pub fn parse(payload: &str) -> Result<Self, OnboardingError> {
        let object = as_envelope(payload).ok_or(OnboardingError::NotAnEnvelope)?;

        let url = object
            .get("url")
            .and_then(Value::as_str)
            .ok_or(OnboardingError::MissingUrl)?;
        let url = Url::parse(url)?;

        let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_owned);

        Ok(Self {
            url,
            username: text("username"),
            password: text("password").map(SecretString::from),
        })
    }
}

fn as_envelope(payload: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(payload.trim()) {
        Ok(Value::Object(object)) if object.contains_key("scheme") => Some(object),
        _ => None,
    }
}
