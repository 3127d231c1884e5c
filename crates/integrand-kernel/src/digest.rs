//! Deterministic report identifiers.
//!
//! Two runs over the same catalog must produce the same id, so CI can tell
//! whether a resolution outcome changed without diffing the full report.
//!
//! Algorithm:
//! 1. Build a canonical JSON key (`schema` plus the payload)
//! 2. Serialize compactly; `serde_json::Map` keeps object keys sorted
//! 3. id = prefix || base32hex_lower(SHA256(keyBytes))

use serde_json::{Value, json};
use sha2::{Digest, Sha256};

pub const REPORT_ID_PREFIX: &str = "r1_";

/// Id of a resolution payload.
pub fn compute_report_id(payload: &Value) -> String {
    let key = json!({
        "schema": 1,
        "payload": payload,
    });
    let key_bytes = key.to_string().into_bytes();
    let hash = Sha256::digest(&key_bytes);
    format!("{REPORT_ID_PREFIX}{}", base32hex_lower_no_pad(&hash))
}

/// RFC 4648 base32hex encoding, lowercase, without padding.
fn base32hex_lower_no_pad(data: &[u8]) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuv";

    let mut out = String::with_capacity(data.len() * 8 / 5 + 1);
    let mut bits: u64 = 0;
    let mut pending: u32 = 0;

    for &byte in data {
        bits = (bits << 8) | u64::from(byte);
        pending += 8;
        while pending >= 5 {
            pending -= 5;
            out.push(ALPHABET[((bits >> pending) & 0x1f) as usize] as char);
        }
    }
    if pending > 0 {
        out.push(ALPHABET[((bits << (5 - pending)) & 0x1f) as usize] as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_id_determinism() {
        let payload = json!({"log": ["A@(r)"], "unresolved": []});
        assert_eq!(compute_report_id(&payload), compute_report_id(&payload.clone()));
    }

    #[test]
    fn report_id_sensitivity() {
        let a = compute_report_id(&json!({"unresolved": []}));
        let b = compute_report_id(&json!({"unresolved": ["Y@(q)"]}));
        assert_ne!(a, b);
    }

    #[test]
    fn base32hex_shape() {
        let hash = Sha256::digest(b"");
        let encoded = base32hex_lower_no_pad(&hash);
        // 256 bits in 5-bit groups
        assert_eq!(encoded.len(), 52);
        assert!(encoded.chars().all(|c| c.is_ascii_digit() || ('a'..='v').contains(&c)));
        assert!(compute_report_id(&json!(null)).starts_with("r1_"));
    }
}
