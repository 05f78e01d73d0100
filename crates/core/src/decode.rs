//! Robust response-body decoding.
//!
//! Status responses occasionally arrive mangled by intermediate proxies:
//! UTF-8 with a byte-order mark, GBK from a CJK-configured edge node, or
//! an HTML challenge page instead of JSON.  All call sites share one
//! ordered fallback procedure rather than per-site encoding guesses.

use encoding_rs::{Encoding, GBK, UTF_8, WINDOWS_1252};
use serde::de::DeserializeOwned;

/// Candidate encodings, tried in order.  `UTF_8` handles the BOM case
/// itself; `WINDOWS_1252` decodes any byte sequence, so it terminates
/// the chain as the single-byte fallback.
const ENCODING_CANDIDATES: &[&Encoding] = &[UTF_8, GBK, WINDOWS_1252];

/// Substring identifying a CDN challenge page.
const PROTECTION_MARKER: &str = "cloudflare";

/// Bytes of the body head inspected by the protection heuristic.
const PROTECTION_SCAN_LEN: usize = 1024;

/// Decode a response body with the encoding fallback chain and parse it
/// as JSON.
///
/// Returns the first candidate that both decodes without errors and
/// parses into `T`.  `None` means no candidate produced valid data.
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Option<T> {
    for encoding in ENCODING_CANDIDATES {
        let (text, _, had_errors) = encoding.decode(bytes);
        if had_errors {
            continue;
        }
        if let Ok(value) = serde_json::from_str(&text) {
            return Some(value);
        }
    }
    None
}

/// Decode an error-message body as text, best effort.
///
/// Uses the first encoding that decodes cleanly, falling back to lossy
/// UTF-8 so a diagnostic string always comes back.
pub fn decode_text(bytes: &[u8]) -> String {
    for encoding in ENCODING_CANDIDATES {
        let (text, _, had_errors) = encoding.decode(bytes);
        if !had_errors {
            return text.into_owned();
        }
    }
    String::from_utf8_lossy(bytes).into_owned()
}

/// Heuristic: does this body look like a CDN-protection or HTML error
/// page rather than an API response?
///
/// Only the head of the body is scanned, so large binary payloads that
/// happen to contain the marker bytes deep inside are not misclassified.
pub fn looks_like_protection_page(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(PROTECTION_SCAN_LEN)];
    let text = String::from_utf8_lossy(head).to_lowercase();
    text.contains(PROTECTION_MARKER) || text.contains("<html")
}

/// Truncate a server message for inclusion in an error, keeping at most
/// `max_chars` characters.
pub fn truncate_message(message: &str, max_chars: usize) -> String {
    message.chars().take(max_chars).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn plain_utf8_json_decodes() {
        let body = br#"{"status": "processing", "message": "rendering"}"#;
        let value: Value = decode_json(body).unwrap();
        assert_eq!(value["status"], "processing");
    }

    #[test]
    fn utf8_with_bom_decodes() {
        let mut body = vec![0xEF, 0xBB, 0xBF];
        body.extend_from_slice(br#"{"status": "queued"}"#);
        let value: Value = decode_json(&body).unwrap();
        assert_eq!(value["status"], "queued");
    }

    #[test]
    fn gbk_body_decodes_via_fallback() {
        // {"status": "processing", "message": "处理中"} with the message
        // encoded in GBK -- invalid as UTF-8.
        let mut body = Vec::new();
        body.extend_from_slice(br#"{"status": "processing", "message": ""#);
        body.extend_from_slice(&[0xB4, 0xA6, 0xC0, 0xED, 0xD6, 0xD0]);
        body.extend_from_slice(br#""}"#);

        assert!(std::str::from_utf8(&body).is_err());
        let value: Value = decode_json(&body).unwrap();
        assert_eq!(value["status"], "processing");
        assert_eq!(value["message"], "处理中");
    }

    #[test]
    fn non_json_body_yields_none() {
        assert!(decode_json::<Value>(b"Bad gateway").is_none());
    }

    #[test]
    fn html_page_is_flagged_as_protection() {
        let body = b"<!DOCTYPE html><html><head><title>Attention</title></head></html>";
        assert!(looks_like_protection_page(body));
        assert!(decode_json::<Value>(body).is_none());
    }

    #[test]
    fn cloudflare_marker_is_flagged() {
        let body = b"Checking your browser... powered by Cloudflare";
        assert!(looks_like_protection_page(body));
    }

    #[test]
    fn json_body_is_not_flagged() {
        assert!(!looks_like_protection_page(br#"{"status": "queued"}"#));
    }

    #[test]
    fn marker_deep_inside_binary_is_ignored() {
        let mut body = vec![0u8; 4096];
        body.extend_from_slice(b"cloudflare");
        assert!(!looks_like_protection_page(&body));
    }

    #[test]
    fn decode_text_handles_gbk_error_body() {
        // "服务器错误" in GBK.
        let body = [0xB7, 0xFE, 0xCE, 0xF1, 0xC6, 0xF7, 0xB4, 0xED, 0xCE, 0xF3];
        assert_eq!(decode_text(&body), "服务器错误");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_message("abcdef", 3), "abc");
        assert_eq!(truncate_message("错误错误", 2), "错误");
        assert_eq!(truncate_message("short", 100), "short");
    }
}
