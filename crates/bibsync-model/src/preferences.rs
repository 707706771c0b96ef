//! Import preferences that influence how values are normalized

use serde::{Deserialize, Serialize};

/// Preferences applied while parsing a database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportPreferences {
    /// Separator between items of keyword-list fields
    pub keyword_separator: char,

    /// Fields holding separator-delimited lists
    pub keyword_fields: Vec<String>,
}

impl Default for ImportPreferences {
    fn default() -> Self {
        Self {
            keyword_separator: ',',
            keyword_fields: vec!["keywords".to_string(), "groups".to_string()],
        }
    }
}

impl ImportPreferences {
    /// Whether `field` holds a keyword list.
    pub fn is_keyword_field(&self, field: &str) -> bool {
        self.keyword_fields
            .iter()
            .any(|f| f.eq_ignore_ascii_case(field))
    }

    /// Normalize a keyword list to `a, b, c`, dropping empty items.
    pub fn normalize_keywords(&self, value: &str) -> String {
        let joiner = format!("{} ", self.keyword_separator);
        value
            .split(self.keyword_separator)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .collect::<Vec<_>>()
            .join(&joiner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keywords_spacing() {
        let prefs = ImportPreferences::default();
        assert_eq!(prefs.normalize_keywords("a,b ,  c,"), "a, b, c");
    }

    #[test]
    fn test_custom_separator() {
        let prefs = ImportPreferences {
            keyword_separator: ';',
            ..Default::default()
        };
        assert_eq!(prefs.normalize_keywords("x;y"), "x; y");
    }

    #[test]
    fn test_keyword_field_is_case_insensitive() {
        let prefs = ImportPreferences::default();
        assert!(prefs.is_keyword_field("Keywords"));
        assert!(!prefs.is_keyword_field("title"));
    }
}
