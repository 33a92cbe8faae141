//! Minimal JWT payload inspection. The signature is never verified here;
//! the backend does that. We only need the `exp` claim to avoid sending a
//! token we already know is stale.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, TimeZone, Utc};

use crate::error::AuthError;

/// Expiry encoded in the token, or `None` when it carries no `exp` claim.
pub fn token_expiry(token: &str) -> Result<Option<DateTime<Utc>>, AuthError> {
    let payload = token
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| AuthError::MalformedToken("missing payload segment".into()))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|err| AuthError::MalformedToken(format!("payload is not base64url: {err}")))?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|err| AuthError::MalformedToken(format!("payload is not JSON: {err}")))?;

    let Some(exp) = claims.get("exp") else {
        return Ok(None);
    };
    let seconds = exp
        .as_i64()
        .or_else(|| exp.as_f64().map(|value| value as i64))
        .ok_or_else(|| AuthError::MalformedToken("exp is not numeric".into()))?;

    Utc.timestamp_opt(seconds, 0)
        .single()
        .map(Some)
        .ok_or_else(|| AuthError::MalformedToken(format!("exp {seconds} out of range")))
}

/// A token we cannot decode is treated as expired.
pub fn is_token_expired(token: &str, now: DateTime<Utc>) -> bool {
    match token_expiry(token) {
        Ok(Some(expiry)) => expiry < now,
        Ok(None) => false,
        Err(err) => {
            log::debug!("treating token as expired: {err}");
            true
        }
    }
}

#[cfg(test)]
pub(crate) fn encode_test_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}
