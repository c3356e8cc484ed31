//! Utility functions.
//!
//! Collection of helper functions used across the platform.

/// Escape text for HTML parse mode.
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Check that a string looks like a Bot API token: `<digits>:<secret>`.
///
/// This is only a cheap pre-filter; real validation happens via getMe.
pub fn is_valid_token_format(token: &str) -> bool {
    let mut parts = token.splitn(2, ':');

    let id = match parts.next() {
        Some(p) if !p.is_empty() => p,
        _ => return false,
    };
    if !id.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    match parts.next() {
        Some(secret) if !secret.is_empty() => secret
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
        _ => false,
    }
}

/// Mask a token for logs: keep the bot ID, hide the secret.
pub fn mask_token(token: &str) -> String {
    match token.split_once(':') {
        Some((id, _)) => format!("{}:***", id),
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert_eq!(html_escape("plain"), "plain");
    }

    #[test]
    fn test_token_format() {
        assert!(is_valid_token_format(
            "123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11"
        ));
        assert!(!is_valid_token_format("123456"));
        assert!(!is_valid_token_format(":secret"));
        assert!(!is_valid_token_format("abc:secret"));
        assert!(!is_valid_token_format("123:"));
        assert!(!is_valid_token_format("123:has space"));
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("123456:secret"), "123456:***");
        assert_eq!(mask_token("garbage"), "***");
    }
}
