//! Internationalization (i18n) module.
//!
//! The platform UI is bilingual (English / Arabic). Translations are
//! embedded at compile time via `include_str!` (no file I/O at runtime)
//! and resolved by dot-notation keys, e.g. `"menu.my_bots"`.

use std::collections::HashMap;

use once_cell::sync::OnceCell;
use serde_json::Value;

/// Global translation store: LangCode -> parsed JSON tree
static TRANSLATIONS: OnceCell<HashMap<String, Value>> = OnceCell::new();

/// Languages offered by the language picker.
pub const SUPPORTED: &[&str] = &["en", "ar"];

/// Load the embedded translation tables. Call once at startup.
pub fn init() {
    let mut map = HashMap::new();

    let en_json = include_str!("en.json");
    if let Ok(val) = serde_json::from_str(en_json) {
        map.insert("en".to_string(), val);
    }

    let ar_json = include_str!("ar.json");
    if let Ok(val) = serde_json::from_str(ar_json) {
        map.insert("ar".to_string(), val);
    }

    let _ = TRANSLATIONS.set(map);
}

/// Get text for a key in a specific language.
/// Supports nested keys via dot notation, e.g. `"stats.card"`.
/// Falls back to English, then to the key itself.
pub fn get_text(lang: &str, key: &str) -> String {
    let store = match TRANSLATIONS.get() {
        Some(s) => s,
        None => return key.to_string(), // Fallback if not init
    };

    // Try requested language
    if let Some(val) = store.get(lang) {
        if let Some(text) = resolve_key(val, key) {
            return text;
        }
    }

    // Fallback to "en"
    if lang != "en" {
        if let Some(val) = store.get("en") {
            if let Some(text) = resolve_key(val, key) {
                return text;
            }
        }
    }

    // Key not found
    key.to_string()
}

fn resolve_key(val: &Value, key: &str) -> Option<String> {
    let mut current = val;
    for part in key.split('.') {
        match current.get(part) {
            Some(v) => current = v,
            None => return None,
        }
    }
    current.as_str().map(|s| s.to_string())
}

/// Check whether a language code is offered by the platform.
pub fn is_supported(lang: &str) -> bool {
    SUPPORTED.contains(&lang)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_fallback() {
        init();

        // Direct lookup
        let en = get_text("en", "menu.my_bots");
        assert!(!en.is_empty());
        assert_ne!(en, "menu.my_bots");

        // Arabic table has the same key
        let ar = get_text("ar", "menu.my_bots");
        assert_ne!(ar, "menu.my_bots");
        assert_ne!(ar, en);

        // Unknown language falls back to English
        assert_eq!(get_text("fr", "menu.my_bots"), en);

        // Unknown key falls back to the key itself
        assert_eq!(get_text("en", "no.such.key"), "no.such.key");
    }

    #[test]
    fn test_supported() {
        assert!(is_supported("en"));
        assert!(is_supported("ar"));
        assert!(!is_supported("id"));
    }
}
