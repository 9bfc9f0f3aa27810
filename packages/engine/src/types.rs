//! Core label types for the Levelmark engine

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::EngineError;

/// Ordinal complexity level, 1 to 13.
///
/// Levels 1-12 denote syntactic patterns; 13 is the umbrella level set
/// alongside every other level that fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(u8);

impl Level {
    /// Lowest level
    pub const MIN: u8 = 1;
    /// Highest level, the umbrella
    pub const MAX: u8 = 13;
    /// "Some level matched"
    pub const UMBRELLA: Level = Level(13);

    /// Create a level, `None` outside 1..=13.
    #[must_use]
    pub fn new(code: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&code).then_some(Self(code))
    }

    /// Level for a code known at compile time.
    pub(crate) const fn fixed(code: u8) -> Self {
        assert!(code >= Self::MIN && code <= Self::MAX, "level out of range");
        Self(code)
    }

    /// Numeric code of the level
    #[must_use]
    pub fn code(self) -> u8 {
        self.0
    }

    /// Whether this is the umbrella level 13
    #[must_use]
    pub fn is_umbrella(self) -> bool {
        self == Self::UMBRELLA
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Level {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(Level::new)
            .ok_or_else(|| EngineError::InvalidLevel(s.to_string()))
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

/// Why a sentence was excluded, grouped into two tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExclusionTier {
    /// Unsuitable sentence ("Not")
    Unsuitable,
    /// Suitable but not a trivial clause ("NotTrv")
    NonTrivial,
}

impl ExclusionTier {
    /// Label code written to the root word
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Unsuitable => "Not",
            Self::NonTrivial => "NotTrv",
        }
    }
}

/// Eligibility check that excluded a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    TooShort,
    NoPunctuation,
    ReportedSpeech,
    Elliptical,
    NoVerb,
    BlacklistedWord,
    BadTerminalPunctuation,
    NoLeadingCapital,
    StartsWithConjunction,
    UnsuitableMarks,
    TooManyVerbs,
    TooManyAuxiliaries,
    AmbiguousCoordination,
}

impl ExclusionReason {
    /// Tier the reason belongs to
    #[must_use]
    pub fn tier(self) -> ExclusionTier {
        match self {
            Self::TooManyVerbs | Self::TooManyAuxiliaries | Self::AmbiguousCoordination => {
                ExclusionTier::NonTrivial
            }
            _ => ExclusionTier::Unsuitable,
        }
    }

    /// Short human-readable reason
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TooShort => "too short",
            Self::NoPunctuation => "no punctuation",
            Self::ReportedSpeech => "reported speech",
            Self::Elliptical => "elliptical",
            Self::NoVerb => "no verb",
            Self::BlacklistedWord => "blacklisted word",
            Self::BadTerminalPunctuation => "bad terminal punctuation",
            Self::NoLeadingCapital => "no leading capital",
            Self::StartsWithConjunction => "starts with conjunction",
            Self::UnsuitableMarks => "unsuitable marks",
            Self::TooManyVerbs => "too many verbs",
            Self::TooManyAuxiliaries => "too many auxiliaries",
            Self::AmbiguousCoordination => "ambiguous coordination with verb+aux",
        }
    }
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token of the `Lvl=` annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    /// Sentence excluded by the eligibility gate
    Excluded(ExclusionTier),
    /// Numeric level
    Level(Level),
}

impl Label {
    /// Sentinel label "Not"
    pub const NOT: Label = Label::Excluded(ExclusionTier::Unsuitable);
    /// Sentinel label "NotTrv"
    pub const NOT_TRIVIAL: Label = Label::Excluded(ExclusionTier::NonTrivial);

    /// Whether the label is one of the exclusion sentinels
    #[must_use]
    pub fn is_sentinel(self) -> bool {
        matches!(self, Self::Excluded(_))
    }

    /// Numeric level, if any
    #[must_use]
    pub fn level(self) -> Option<Level> {
        match self {
            Self::Level(level) => Some(level),
            Self::Excluded(_) => None,
        }
    }

    /// Parse one annotation token; unknown tokens yield `None`.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "Not" => Some(Self::NOT),
            "NotTrv" => Some(Self::NOT_TRIVIAL),
            other => other.parse::<Level>().ok().map(Self::Level),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excluded(tier) => f.write_str(tier.code()),
            Self::Level(level) => write!(f, "{level}"),
        }
    }
}

impl From<Level> for Label {
    fn from(level: Level) -> Self {
        Self::Level(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_bounds() {
        assert!(Level::new(0).is_none());
        assert_eq!(Level::new(1).map(Level::code), Some(1));
        assert_eq!(Level::new(13), Some(Level::UMBRELLA));
        assert!(Level::new(14).is_none());
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("4".parse::<Level>().ok(), Level::new(4));
        assert!("04x".parse::<Level>().is_err());
        assert!("14".parse::<Level>().is_err());
        assert!("".parse::<Level>().is_err());
    }

    #[test]
    fn test_label_parse() {
        assert_eq!(Label::parse("Not"), Some(Label::NOT));
        assert_eq!(Label::parse("NotTrv"), Some(Label::NOT_TRIVIAL));
        assert_eq!(Label::parse("12"), Level::new(12).map(Label::Level));
        assert_eq!(Label::parse("SpaceAfter"), None);
    }

    #[test]
    fn test_label_display() {
        assert_eq!(Label::NOT.to_string(), "Not");
        assert_eq!(Label::NOT_TRIVIAL.to_string(), "NotTrv");
        assert_eq!(Label::Level(Level::UMBRELLA).to_string(), "13");
    }

    #[test]
    fn test_reason_tiers() {
        assert_eq!(ExclusionReason::TooShort.tier(), ExclusionTier::Unsuitable);
        assert_eq!(
            ExclusionReason::UnsuitableMarks.tier(),
            ExclusionTier::Unsuitable
        );
        assert_eq!(
            ExclusionReason::TooManyVerbs.tier(),
            ExclusionTier::NonTrivial
        );
        assert_eq!(
            ExclusionReason::AmbiguousCoordination.tier(),
            ExclusionTier::NonTrivial
        );
    }
}
