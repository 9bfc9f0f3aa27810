//! Eligibility gate run on every sentence before level classification.
//!
//! The checks run in a fixed order and the first one that fires decides
//! the outcome. The "Not" tier comes first; only a sentence that passes
//! all of it is checked against the "NotTrv" tier.

use crate::config::{
    CONJUNCTION_XPOS, EXTRA_CAPITALS, MIN_ROOT_DESCENDANTS, TERMINAL_MARKS, UNSUITABLE_MARKS,
    VERB_XPOS,
};
use crate::report::Stats;
use crate::resources::LexicalResources;
use crate::tree::Sentence;
use crate::types::{ExclusionReason, ExclusionTier, Label};

/// Outcome of the gate for one sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Sentence goes on to level classification
    Eligible,
    /// Sentence is excluded; `reason` is `None` when the root already
    /// carried the exclusion label from an earlier pass
    Excluded {
        tier: ExclusionTier,
        reason: Option<ExclusionReason>,
    },
}

impl Gate {
    #[must_use]
    pub fn is_eligible(self) -> bool {
        self == Self::Eligible
    }

    /// Exclusion tier, `None` for eligible sentences.
    #[must_use]
    pub fn tier(self) -> Option<ExclusionTier> {
        match self {
            Self::Eligible => None,
            Self::Excluded { tier, .. } => Some(tier),
        }
    }
}

/// The exclusion-only pre-filter.
pub struct EligibilityFilter<'r> {
    resources: &'r LexicalResources,
}

impl<'r> EligibilityFilter<'r> {
    #[must_use]
    pub fn new(resources: &'r LexicalResources) -> Self {
        Self { resources }
    }

    /// Decide a sentence and annotate its root word.
    ///
    /// A root that already carries "Not" or "NotTrv" is left untouched, so
    /// running the gate twice does not change the annotation.
    pub fn evaluate(&self, sentence: &mut Sentence, stats: &mut Stats) -> Gate {
        if let Some(tier) = existing_exclusion(sentence) {
            return Gate::Excluded { tier, reason: None };
        }

        match self.check(sentence) {
            None => Gate::Eligible,
            Some(reason) => {
                let root = sentence.root();
                tracing::debug!(
                    node = %sentence.address(root),
                    label = reason.tier().code(),
                    reason = %reason,
                    "Sentence excluded"
                );
                sentence.push_label(root, Label::Excluded(reason.tier()));
                stats.record_exclusion(reason);
                Gate::Excluded {
                    tier: reason.tier(),
                    reason: Some(reason),
                }
            }
        }
    }

    /// First check that excludes the sentence, if any. Does not mutate.
    #[must_use]
    pub fn check(&self, sentence: &Sentence) -> Option<ExclusionReason> {
        self.check_unsuitable(sentence)
            .or_else(|| check_non_trivial(sentence))
    }

    fn check_unsuitable(&self, sentence: &Sentence) -> Option<ExclusionReason> {
        let root = sentence.root();
        let below = sentence.descendants(root);
        let words_below = || below.iter().map(|idx| sentence.word(*idx));

        if below.len() < MIN_ROOT_DESCENDANTS {
            return Some(ExclusionReason::TooShort);
        }
        if sentence.count_relation(&below, "punct") == 0 {
            return Some(ExclusionReason::NoPunctuation);
        }
        if sentence.count_relation(&below, "parataxis") > 0 {
            return Some(ExclusionReason::ReportedSpeech);
        }
        if sentence.count_relation(&below, "orphan") > 0 {
            return Some(ExclusionReason::Elliptical);
        }
        let root_word = sentence.root_word();
        if root_word.upos != "VERB"
            && !sentence
                .children(root)
                .iter()
                .any(|c| sentence.word(*c).upos == "AUX")
        {
            return Some(ExclusionReason::NoVerb);
        }
        if sentence.lemmas().any(|l| self.resources.is_blacklisted(l)) {
            return Some(ExclusionReason::BlacklistedWord);
        }
        let [question, full_stop, exclamation] = TERMINAL_MARKS;
        if !words_below().any(|w| w.form == question)
            && !sentence.forms().any(|f| f == full_stop || f == exclamation)
        {
            return Some(ExclusionReason::BadTerminalPunctuation);
        }
        let first = sentence.first_word();
        if !first.form.chars().next().is_some_and(is_capital) {
            return Some(ExclusionReason::NoLeadingCapital);
        }
        if first.xpos == CONJUNCTION_XPOS {
            return Some(ExclusionReason::StartsWithConjunction);
        }
        if words_below().any(|w| UNSUITABLE_MARKS.contains(&w.form.as_str())) {
            return Some(ExclusionReason::UnsuitableMarks);
        }
        None
    }
}

/// Capital letter of the target alphabet.
fn is_capital(c: char) -> bool {
    c.is_ascii_uppercase() || EXTRA_CAPITALS.contains(&c)
}

fn check_non_trivial(sentence: &Sentence) -> Option<ExclusionReason> {
    let below = sentence.descendants(sentence.root());
    let upos_below = |tag: &str| {
        below
            .iter()
            .filter(|idx| sentence.word(**idx).upos == tag)
            .count()
    };

    if upos_below("VERB") > 1 {
        return Some(ExclusionReason::TooManyVerbs);
    }
    if upos_below("AUX") > 1 {
        return Some(ExclusionReason::TooManyAuxiliaries);
    }
    let words = sentence.words();
    let verb_tags = words.iter().filter(|w| w.xpos == VERB_XPOS).count();
    if verb_tags > 1 && words.iter().any(|w| w.is_pos(&["CCONJ", "SCONJ"])) {
        return Some(ExclusionReason::AmbiguousCoordination);
    }
    None
}

/// Exclusion label already on the root word.
#[must_use]
pub fn existing_exclusion(sentence: &Sentence) -> Option<ExclusionTier> {
    sentence
        .labels(sentence.root())
        .into_iter()
        .find_map(|label| match label {
            Label::Excluded(tier) => Some(tier),
            Label::Level(_) => None,
        })
}
