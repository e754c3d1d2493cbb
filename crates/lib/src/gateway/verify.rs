//! Webhook verification handshake and payload signature checks.

use crate::gateway::error::GatewayError;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

const SUBSCRIBE_MODE: &str = "subscribe";

/// Query of `GET /webhook`. Missing parameters are treated as a mismatch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerificationChallenge {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Returns the challenge verbatim when mode is "subscribe" and the token matches `expected`.
/// An unset `expected` token never verifies.
pub fn verify_challenge(
    params: &VerificationChallenge,
    expected: Option<&str>,
) -> Result<String, GatewayError> {
    let Some(expected) = expected else {
        return Err(GatewayError::Unauthorized);
    };
    let token_matches = params
        .verify_token
        .as_deref()
        .is_some_and(|t| constant_time_eq(t.as_bytes(), expected.as_bytes()));
    if params.mode.as_deref() != Some(SUBSCRIBE_MODE) || !token_matches {
        return Err(GatewayError::Unauthorized);
    }
    params.challenge.clone().ok_or(GatewayError::Unauthorized)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Check `X-Hub-Signature-256` (`sha256=<hex>`) against HMAC-SHA256 of the raw body.
pub fn verify_signature(app_secret: &str, body: &[u8], signature_header: &str) -> bool {
    let Some(hex_sig) = signature_header.strip_prefix("sha256=") else {
        return false;
    };
    let Ok(expected) = hex::decode(hex_sig) else {
        return false;
    };
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(app_secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Signature header value for `body`, as Meta would send it.
pub fn compute_signature(app_secret: &str, body: &[u8]) -> String {
    let mut mac = match Hmac::<Sha256>::new_from_slice(app_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(e) => {
            log::error!("failed to create HMAC: {}", e);
            return String::new();
        }
    };
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge(mode: &str, token: &str, challenge: &str) -> VerificationChallenge {
        VerificationChallenge {
            mode: Some(mode.to_string()),
            verify_token: Some(token.to_string()),
            challenge: Some(challenge.to_string()),
        }
    }

    #[test]
    fn subscribe_with_matching_token_echoes_challenge() {
        let params = challenge("subscribe", "test_token", "12345");
        assert_eq!(
            verify_challenge(&params, Some("test_token")).unwrap(),
            "12345"
        );
    }

    #[test]
    fn challenge_is_returned_as_text_not_reparsed() {
        let params = challenge("subscribe", "t", "00123abc");
        assert_eq!(verify_challenge(&params, Some("t")).unwrap(), "00123abc");
    }

    #[test]
    fn wrong_token_is_unauthorized() {
        let params = challenge("subscribe", "wrong", "12345");
        assert!(matches!(
            verify_challenge(&params, Some("test_token")),
            Err(GatewayError::Unauthorized)
        ));
    }

    #[test]
    fn wrong_mode_is_unauthorized() {
        let params = challenge("unsubscribe", "test_token", "12345");
        assert!(verify_challenge(&params, Some("test_token")).is_err());
    }

    #[test]
    fn missing_parameters_or_unset_token_are_unauthorized() {
        assert!(verify_challenge(&VerificationChallenge::default(), Some("t")).is_err());
        let params = challenge("subscribe", "", "1");
        assert!(verify_challenge(&params, None).is_err());
        let mut params = challenge("subscribe", "t", "1");
        params.challenge = None;
        assert!(verify_challenge(&params, Some("t")).is_err());
    }

    #[test]
    fn token_prefix_does_not_match() {
        let params = challenge("subscribe", "test", "1");
        assert!(verify_challenge(&params, Some("test_token")).is_err());
    }

    #[test]
    fn signature_round_trip_and_tamper() {
        let body = br#"{"entry":[]}"#;
        let sig = compute_signature("app-secret", body);
        assert!(sig.starts_with("sha256="));
        assert!(verify_signature("app-secret", body, &sig));
        assert!(!verify_signature("other-secret", body, &sig));
        assert!(!verify_signature("app-secret", br#"{"entry":[1]}"#, &sig));
    }

    #[test]
    fn malformed_signature_headers_are_rejected() {
        assert!(!verify_signature("s", b"{}", ""));
        assert!(!verify_signature("s", b"{}", "sha1=abcd"));
        assert!(!verify_signature("s", b"{}", "sha256=not-hex"));
    }
}
