//! Parse and build options

use serde::{Deserialize, Serialize};

/// What to do with a fixed-width string payload wider than its slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringOverflow {
    /// Fail with `FormatError::LengthMismatch`
    #[default]
    Reject,
    /// Keep the first `width` bytes
    Truncate,
}

/// How level integrity fields are produced when building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityPolicy {
    /// Recompute the hash; keep the stored companion fields when they still
    /// pass validation against it, otherwise draw new ones
    #[default]
    PreserveValid,
    /// Recompute the hash and always draw new companion fields
    Regenerate,
}

/// Options accepted by the `parse_with`/`build_with` entry points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Accept `POT06` levels when parsing
    pub legacy_levels: bool,
    /// Accept 1.0/1.1 replay headers when parsing
    pub legacy_replays: bool,
    /// Integrity field policy when building levels
    pub integrity: IntegrityPolicy,
    /// Overflow policy for strings set through builders
    pub string_overflow: StringOverflow,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            legacy_levels: true,
            legacy_replays: true,
            integrity: IntegrityPolicy::PreserveValid,
            string_overflow: StringOverflow::Reject,
        }
    }
}

impl FormatOptions {
    /// Options accepting only the current format variants
    pub fn current_only() -> Self {
        Self {
            legacy_levels: false,
            legacy_replays: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = FormatOptions::default();
        assert!(options.legacy_levels);
        assert!(options.legacy_replays);
        assert_eq!(options.integrity, IntegrityPolicy::PreserveValid);
        assert_eq!(options.string_overflow, StringOverflow::Reject);
    }

    #[test]
    fn test_partial_json() {
        let options: FormatOptions =
            serde_json::from_str(r#"{"legacy_levels": false, "string_overflow": "truncate"}"#)
                .unwrap();
        assert!(!options.legacy_levels);
        assert!(options.legacy_replays);
        assert_eq!(options.string_overflow, StringOverflow::Truncate);
    }

    #[test]
    fn test_json_round_trip() {
        let options = FormatOptions {
            integrity: IntegrityPolicy::Regenerate,
            ..FormatOptions::current_only()
        };
        let json = serde_json::to_string(&options).unwrap();
        assert!(json.contains("\"regenerate\""));
        let back: FormatOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);
    }
}
