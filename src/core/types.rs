use serde::{Deserialize, Serialize};

/// Strategy used to classify a candidate hash against a reference store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// First reference (lowest index) within the threshold, with early exit
    #[default]
    First,
    /// Closest reference overall, reported only if within the threshold
    Best,
    /// Closest reference distance, reported unconditionally
    Score,
}

impl MatchMode {
    /// Interpret a legacy mode selector argument.
    ///
    /// Only the first character matters: `b`/`B` selects best-match and
    /// `t`/`T` selects score-only ("test") mode. Anything else, including an
    /// empty string, keeps the default first-match mode.
    pub fn from_selector(selector: &str) -> Self {
        match selector.chars().next() {
            Some('b' | 'B') => Self::Best,
            Some('t' | 'T') => Self::Score,
            _ => Self::First,
        }
    }

    /// Whether the threshold takes part in the decision
    pub fn uses_threshold(self) -> bool {
        !matches!(self, Self::Score)
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::First => write!(f, "first-match"),
            Self::Best => write!(f, "best-match"),
            Self::Score => write!(f, "score-only"),
        }
    }
}
