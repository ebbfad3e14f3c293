//! Model Categorization
//!
//! Maps a model code onto a coarse price band by prefix matching.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::EncodeError;

const ENTRY_LEVEL: &[&str] = &[
    "114", "116", "118", "120", "123", "125", "135", "216", "218", "220", "225", "X1", "X2", "i3",
    "Z4",
];

const MIDDLE_LEVEL: &[&str] = &[
    "316", "318", "320", "325", "328", "330", "335", "418", "420", "425", "430", "435", "518",
    "520", "523", "525", "528", "530", "535", "X3", "X4", "i4", "i5",
];

const HIGH_END: &[&str] = &[
    "630", "635", "640", "650", "730", "735", "740", "750", "8", "X5", "X6", "X7", "M135",
    "M235", "M3", "M4", "M5", "M550", "i7", "i8",
];

/// Price band of a vehicle model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelCategory {
    #[serde(rename = "entry level")]
    EntryLevel,
    #[serde(rename = "middle level")]
    MiddleLevel,
    #[serde(rename = "high end")]
    HighEnd,
}

impl ModelCategory {
    /// Label as seen by the fitted one-hot encoder
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelCategory::EntryLevel => "entry level",
            ModelCategory::MiddleLevel => "middle level",
            ModelCategory::HighEnd => "high end",
        }
    }
}

impl fmt::Display for ModelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prefix lists for each price band.
///
/// Lists are checked entry, then middle, then high; the first list holding a
/// prefix of the model code wins. Codes matching no list fall back to
/// [`ModelCategory::MiddleLevel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryLists {
    pub entry: Vec<String>,
    pub middle: Vec<String>,
    pub high: Vec<String>,
}

impl Default for CategoryLists {
    fn default() -> Self {
        let owned = |list: &[&str]| -> Vec<String> { list.iter().map(|s| s.to_string()).collect() };
        Self {
            entry: owned(ENTRY_LEVEL),
            middle: owned(MIDDLE_LEVEL),
            high: owned(HIGH_END),
        }
    }
}

impl CategoryLists {
    /// Classify a model code against these lists
    pub fn categorize(&self, model_key: &str) -> ModelCategory {
        classify(
            model_key,
            self.entry.as_slice(),
            self.middle.as_slice(),
            self.high.as_slice(),
        )
    }

    /// Reject empty prefixes, which would swallow every model code
    pub fn check(&self) -> Result<(), EncodeError> {
        for (band, list) in [
            ("entry", &self.entry),
            ("middle", &self.middle),
            ("high", &self.high),
        ] {
            if list.iter().any(|prefix| prefix.is_empty()) {
                return Err(EncodeError::InvalidParameters {
                    transform: "CategoryLists",
                    reason: format!("empty prefix in {} list", band),
                });
            }
        }
        Ok(())
    }
}

/// Classify a model code against the built-in lists
pub fn categorize(model_key: &str) -> ModelCategory {
    classify(model_key, ENTRY_LEVEL, MIDDLE_LEVEL, HIGH_END)
}

fn classify<S: AsRef<str>>(
    model_key: &str,
    entry: &[S],
    middle: &[S],
    high: &[S],
) -> ModelCategory {
    let matches = |list: &[S]| list.iter().any(|p| model_key.starts_with(p.as_ref()));

    if matches(entry) {
        ModelCategory::EntryLevel
    } else if matches(middle) {
        ModelCategory::MiddleLevel
    } else if matches(high) {
        ModelCategory::HighEnd
    } else {
        // Unlisted codes are priced as middle level
        ModelCategory::MiddleLevel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_prefix() {
        for code in ENTRY_LEVEL {
            assert_eq!(categorize(code), ModelCategory::EntryLevel, "{}", code);
        }
        for code in MIDDLE_LEVEL {
            assert_eq!(categorize(code), ModelCategory::MiddleLevel, "{}", code);
        }
        for code in HIGH_END {
            assert_eq!(categorize(code), ModelCategory::HighEnd, "{}", code);
        }
    }

    #[test]
    fn test_known_labels() {
        assert_eq!(categorize("114").as_str(), "entry level");
        assert_eq!(categorize("320").as_str(), "middle level");
        assert_eq!(categorize("M5").as_str(), "high end");
        assert_eq!(categorize("999").as_str(), "middle level");
    }

    #[test]
    fn test_prefix_matching() {
        assert_eq!(categorize("320i"), ModelCategory::MiddleLevel);
        assert_eq!(categorize("118d"), ModelCategory::EntryLevel);
        assert_eq!(categorize("X5 M"), ModelCategory::HighEnd);
        assert_eq!(categorize("840d"), ModelCategory::HighEnd);
        // Case sensitive
        assert_eq!(categorize("x5"), ModelCategory::MiddleLevel);
        assert_eq!(categorize(""), ModelCategory::MiddleLevel);
    }

    #[test]
    fn test_entry_list_checked_first() {
        let lists = CategoryLists {
            entry: vec!["M".to_string()],
            middle: vec![],
            high: vec!["M5".to_string()],
        };
        assert_eq!(lists.categorize("M5"), ModelCategory::EntryLevel);
        assert_eq!(lists.categorize("Z4"), ModelCategory::MiddleLevel);
    }

    #[test]
    fn test_default_lists_agree_with_builtin() {
        let lists = CategoryLists::default();
        for code in ["114", "320d", "M550i", "i3", "999", "X7"] {
            assert_eq!(lists.categorize(code), categorize(code));
        }
        assert!(lists.check().is_ok());
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let mut lists = CategoryLists::default();
        lists.high.push(String::new());
        assert!(lists.check().is_err());
    }

    #[test]
    fn test_serde_labels() {
        let json = serde_json::to_string(&ModelCategory::HighEnd).unwrap();
        assert_eq!(json, "\"high end\"");
        assert_eq!(ModelCategory::EntryLevel.to_string(), "entry level");
    }
}
