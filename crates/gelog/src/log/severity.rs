use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LogError;

/// Importance of a log line.
///
/// `Info < Warning < Error < Critical` is a total order. `Profile` sits
/// outside of it: profiling output is switched on and off on its own and
/// never competes with the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
    Profile,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
        Severity::Profile,
    ];

    /// Single character written in the level column.
    pub fn code(&self) -> char {
        match self {
            Severity::Info => 'I',
            Severity::Warning => 'W',
            Severity::Error => 'E',
            Severity::Critical => 'C',
            Severity::Profile => 'P',
        }
    }

    /// Strict inverse of [`Severity::code`]; lowercase codes are not accepted here.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'I' => Some(Severity::Info),
            'W' => Some(Severity::Warning),
            'E' => Some(Severity::Error),
            'C' => Some(Severity::Critical),
            'P' => Some(Severity::Profile),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
            Severity::Profile => "profile",
        }
    }

    /// Position in the ordinal scale. A `Profile` threshold lets everything
    /// through, so it ranks with `Info`.
    pub(crate) fn rank(&self) -> u8 {
        match self {
            Severity::Info | Severity::Profile => 0,
            Severity::Warning => 1,
            Severity::Error => 2,
            Severity::Critical => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_severity(s)
    }
}

/// Parse a severity from a short code (`I`, `w`, ...) or a full word
/// (`info`, `WARNING`, ...). Case does not matter.
pub fn parse_severity(token: &str) -> Result<Severity, LogError> {
    match token.trim().to_ascii_lowercase().as_str() {
        "i" | "info" => Ok(Severity::Info),
        "w" | "warning" => Ok(Severity::Warning),
        "e" | "error" => Ok(Severity::Error),
        "c" | "critical" => Ok(Severity::Critical),
        "p" | "profile" => Ok(Severity::Profile),
        _ => Err(LogError::InvalidSeverity(token.to_string())),
    }
}

/// Decide whether a record of `candidate` severity gets written.
///
/// Profile records depend only on `profiling_enabled`. All others must reach
/// `threshold` in the `Info < Warning < Error < Critical` order.
pub fn should_emit(candidate: Severity, threshold: Severity, profiling_enabled: bool) -> bool {
    if candidate == Severity::Profile {
        return profiling_enabled;
    }
    candidate.rank() >= threshold.rank()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── parse_severity ───────────────────────────────────────────

    #[test]
    fn test_parse_short_codes() {
        assert_eq!(parse_severity("I").unwrap(), Severity::Info);
        assert_eq!(parse_severity("w").unwrap(), Severity::Warning);
        assert_eq!(parse_severity("E").unwrap(), Severity::Error);
        assert_eq!(parse_severity("c").unwrap(), Severity::Critical);
        assert_eq!(parse_severity("P").unwrap(), Severity::Profile);
    }

    #[test]
    fn test_parse_full_words_any_case() {
        let words = [
            ("info", Severity::Info),
            ("warning", Severity::Warning),
            ("ERROR", Severity::Error),
            ("Critical", Severity::Critical),
            ("profile", Severity::Profile),
        ];
        for (word, expected) in words {
            assert_eq!(parse_severity(word).unwrap(), expected, "word {}", word);
        }
    }

    #[test]
    fn test_parse_unknown_token() {
        let err = parse_severity("verbose").unwrap_err();
        assert!(matches!(err, LogError::InvalidSeverity(ref t) if t == "verbose"));
        assert!(parse_severity("").is_err());
    }

    #[test]
    fn test_from_str_delegates() {
        let sev: Severity = "warning".parse().unwrap();
        assert_eq!(sev, Severity::Warning);
    }

    #[test]
    fn test_code_round_trip() {
        for sev in Severity::ALL {
            assert_eq!(Severity::from_code(sev.code()), Some(sev));
        }
        assert_eq!(Severity::from_code('i'), None);
        assert_eq!(Severity::from_code('X'), None);
    }

    // ── should_emit ──────────────────────────────────────────────

    #[test]
    fn test_ordinal_filtering() {
        assert!(should_emit(Severity::Error, Severity::Warning, true));
        assert!(!should_emit(Severity::Info, Severity::Warning, true));
        assert!(should_emit(Severity::Warning, Severity::Warning, false));
        assert!(should_emit(Severity::Critical, Severity::Critical, true));
        assert!(!should_emit(Severity::Error, Severity::Critical, true));
    }

    #[test]
    fn test_profile_only_follows_toggle() {
        assert!(!should_emit(Severity::Profile, Severity::Critical, false));
        assert!(should_emit(Severity::Profile, Severity::Critical, true));
        assert!(!should_emit(Severity::Profile, Severity::Info, false));
    }

    #[test]
    fn test_profile_threshold_lets_everything_through() {
        for sev in [Severity::Info, Severity::Warning, Severity::Error, Severity::Critical] {
            assert!(should_emit(sev, Severity::Profile, false));
        }
    }

    #[test]
    fn test_serde_lowercase_names() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
        let back: Severity = serde_json::from_str("\"profile\"").unwrap();
        assert_eq!(back, Severity::Profile);
    }
}
