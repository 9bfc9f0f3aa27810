//! Sentence context for level classification
//!
//! Everything the level rules read about the sentence as a whole is
//! computed once here, before any word is examined: relation and part of
//! speech counts, per-word child relations, and the accumulator flags.
//! Rules then run per word against this context without walking the tree
//! again.
//!
//! # Accumulators
//!
//! Each accumulator is a sentence-wide boolean set by one pass over all
//! words. "Banned" flags block a rule when some other word in the sentence
//! has a shape the level cannot ask about; "qualifying" flags record that
//! an adverbial of an accepted shape is present.

use std::collections::HashMap;

use crate::config::FOREIGN_XPOS;
use crate::resources::LexicalResources;
use crate::tree::{Sentence, Word};

/// Relations of the synthetic root's children, i.e. the root word's siblings.
const ROOT_SIBLINGS: &[&str] = &["root"];

/// Parts of speech accepted as nominal heads of obliques and modifiers.
pub const NOMINAL: &[&str] = &["NOUN", "PROPN"];

// =============================================================================
// Counts
// =============================================================================

/// Multiset of string labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counts<'a>(HashMap<&'a str, usize>);

impl<'a> Counts<'a> {
    fn tally(items: impl IntoIterator<Item = &'a str>) -> Self {
        let mut map = HashMap::new();
        for item in items {
            *map.entry(item).or_insert(0) += 1;
        }
        Self(map)
    }

    /// Occurrences of `key`.
    #[must_use]
    pub fn count(&self, key: &str) -> usize {
        self.0.get(key).copied().unwrap_or(0)
    }

    /// Whether `key` occurs at all.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.count(key) > 0
    }

    /// Whether any of `keys` occurs.
    #[must_use]
    pub fn contains_any(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.contains(k))
    }
}

// =============================================================================
// Accumulators
// =============================================================================

/// Sentence-wide flags gating the level rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accumulators {
    /// An oblique has a case, appos, det or conj dependent
    pub obl_banned: bool,
    /// An oblique is nominative, genitive or partitive
    pub obl_wrong_case: bool,
    /// An oblique is not a noun, or a numeral modifier is present
    pub obl_wrong_pos: bool,
    /// A nominal or adjectival modifier has a shape levels 1-6 cannot ask
    pub modifier_banned: bool,
    /// Some word is tagged as foreign (`Y`)
    pub xpos_y_banned: bool,
    /// An adverb modifier is excluded, misattached or the root is an adverb
    pub advmod_banned: bool,
    /// An adverb modifier of a verb is not on the exclusion list
    pub advmod_qualifying: bool,
    /// A bare supine complement is present
    pub supine_qualifying: bool,
    /// A bare adjectival or nominal complement is present
    pub xcomp_qualifying: bool,
    pub amod_banned_l8: bool,
    pub nmod_banned_l8: bool,
    pub acl_banned_l8: bool,
    /// A complement is not a bare adjective or noun
    pub xcomp_banned: bool,
    /// An object has dependents, or the sentence has an abbreviation
    pub obj_banned: bool,
    /// A complement is not a supine
    pub supine_banned: bool,
}

impl Accumulators {
    fn compute(
        sentence: &Sentence,
        child_relations: &[Vec<&str>],
        resources: &LexicalResources,
    ) -> Self {
        let mut acc = Self::default();

        for (idx, word) in sentence.words().iter().enumerate() {
            let children = &child_relations[idx];
            let has_children = !children.is_empty();
            let has_child = |rel: &str| children.iter().any(|c| *c == rel);
            let parent_is_verb = sentence
                .parent(idx)
                .is_some_and(|p| sentence.word(p).upos == "VERB");
            let case = word.feat("Case");
            let is_nominal = word.is_pos(NOMINAL);
            let foreign = word.xpos == FOREIGN_XPOS;

            match word.deprel.as_str() {
                "obl" => {
                    if ["case", "appos", "det", "conj"].iter().any(|r| has_child(r)) {
                        acc.obl_banned = true;
                    }
                    if matches!(case, Some("Nom" | "Gen" | "Par")) {
                        acc.obl_wrong_case = true;
                    }
                    if !is_nominal {
                        acc.obl_wrong_pos = true;
                    }
                }
                "nmod" => {
                    if case != Some("Gen") || !is_nominal || has_children {
                        acc.modifier_banned = true;
                    }
                    if case != Some("Gen") || has_children || !is_nominal || foreign {
                        acc.nmod_banned_l8 = true;
                    }
                }
                "amod" => {
                    if has_children {
                        acc.modifier_banned = true;
                    }
                    if case != Some("Gen") || has_children || foreign {
                        acc.amod_banned_l8 = true;
                    }
                }
                "acl" => {
                    if !word.is_pos(&["ADJ"]) || has_children {
                        acc.acl_banned_l8 = true;
                    }
                }
                "xcomp" => {
                    let supine = word.feat("VerbForm") == Some("Sup");
                    let adj_or_noun = word.is_pos(&["ADJ", "NOUN"]);
                    if !adj_or_noun || has_children {
                        acc.xcomp_banned = true;
                    }
                    if !supine {
                        acc.supine_banned = true;
                    }
                    if supine && !has_children {
                        acc.supine_qualifying = true;
                    }
                    if adj_or_noun && !has_children {
                        acc.xcomp_qualifying = true;
                    }
                }
                "obj" => {
                    if has_children {
                        acc.obj_banned = true;
                    }
                }
                "advmod" => {
                    let excluded = resources.is_excluded_adverb(&word.form);
                    if !parent_is_verb || excluded || has_child("case") {
                        acc.advmod_banned = true;
                    } else {
                        acc.advmod_qualifying = true;
                    }
                }
                "root" => {
                    if word.upos == "ADV" {
                        acc.advmod_banned = true;
                    }
                }
                _ => {}
            }

            if foreign {
                acc.xpos_y_banned = true;
            }
            if word.feats.is("Abbr", "Yes") {
                acc.obj_banned = true;
            }
            if word.deprel.contains("nummod") {
                acc.obl_wrong_pos = true;
            }
        }

        acc
    }

    /// An adverbial of some accepted shape is present.
    #[must_use]
    pub fn any_qualifying_adverbial(&self) -> bool {
        self.xcomp_qualifying || self.supine_qualifying || self.advmod_qualifying
    }
}

// =============================================================================
// SentenceContext
// =============================================================================

/// Aggregates of one sentence, computed once before the rules run.
pub struct SentenceContext<'a> {
    sentence: &'a Sentence,
    /// Relations of every word
    pub relations: Counts<'a>,
    /// Universal parts of speech of every word
    pub pos: Counts<'a>,
    /// `Case` values of every word that has one
    pub cases: Counts<'a>,
    /// Number of words in the sentence
    pub word_count: usize,
    pub flags: Accumulators,
    child_relations: Vec<Vec<&'a str>>,
}

impl<'a> SentenceContext<'a> {
    /// Compute all aggregates for a sentence.
    #[must_use]
    pub fn new(sentence: &'a Sentence, resources: &LexicalResources) -> Self {
        let words = sentence.words();
        let child_relations: Vec<Vec<&'a str>> = (0..words.len())
            .map(|idx| {
                sentence
                    .children(idx)
                    .iter()
                    .map(|c| sentence.word(*c).deprel.as_str())
                    .collect()
            })
            .collect();
        let flags = Accumulators::compute(sentence, &child_relations, resources);

        Self {
            sentence,
            relations: Counts::tally(words.iter().map(|w| w.deprel.as_str())),
            pos: Counts::tally(words.iter().map(|w| w.upos.as_str())),
            cases: Counts::tally(words.iter().filter_map(|w| w.feat("Case"))),
            word_count: words.len(),
            flags,
            child_relations,
        }
    }

    #[must_use]
    pub fn sentence(&self) -> &'a Sentence {
        self.sentence
    }

    #[must_use]
    pub fn word(&self, idx: usize) -> &'a Word {
        self.sentence.word(idx)
    }

    /// Relations of a word's direct dependents, in reading order.
    #[must_use]
    pub fn child_relations(&self, idx: usize) -> &[&'a str] {
        &self.child_relations[idx]
    }

    /// Relations of every dependent of the word's governor, the word
    /// itself included. The root word sees only its own `root`.
    #[must_use]
    pub fn sibling_relations(&self, idx: usize) -> &[&'a str] {
        match self.sentence.parent(idx) {
            Some(parent) => &self.child_relations[parent],
            None => ROOT_SIBLINGS,
        }
    }

    /// Whether a nominal modifier hangs off the word's governor to the
    /// right of the governor.
    ///
    /// Scans the governor's dependents left to right and stops at the
    /// first `nmod` after the governor's position.
    #[must_use]
    pub fn governor_has_following_nmod(&self, idx: usize) -> bool {
        let Some(parent) = self.sentence.parent(idx) else {
            return false;
        };
        self.sentence
            .children(parent)
            .iter()
            .filter(|c| **c > parent)
            .any(|c| self.sentence.word(*c).deprel == "nmod")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(id: usize, form: &str, upos: &str, head: usize, deprel: &str) -> Word {
        Word::new(id, form, head, deprel).with_upos(upos)
    }

    fn resources() -> LexicalResources {
        LexicalResources::from_lists(Vec::<&str>::new(), ["ka"])
    }

    #[test]
    fn test_counts() {
        let s = Sentence::new(
            Vec::new(),
            vec![
                w(1, "Koer", "NOUN", 2, "nsubj").with_feats("Case=Nom"),
                w(2, "jooksis", "VERB", 0, "root"),
                w(3, "pargis", "NOUN", 2, "obl").with_feats("Case=Ine"),
                w(4, ".", "PUNCT", 2, "punct"),
            ],
        )
        .unwrap();
        let res = resources();
        let ctx = SentenceContext::new(&s, &res);

        assert_eq!(ctx.word_count, 4);
        assert_eq!(ctx.relations.count("punct"), 1);
        assert!(ctx.relations.contains("root"));
        assert_eq!(ctx.pos.count("NOUN"), 2);
        assert_eq!(ctx.cases.count("Nom"), 1);
        assert_eq!(ctx.child_relations(1), &["nsubj", "obl", "punct"]);
        assert_eq!(ctx.sibling_relations(0), &["nsubj", "obl", "punct"]);
        assert_eq!(ctx.sibling_relations(1), &["root"]);
        assert_eq!(ctx.flags, Accumulators::default());
    }

    #[test]
    fn test_obl_flags() {
        let s = Sentence::new(
            Vec::new(),
            vec![
                w(1, "Ta", "PRON", 2, "nsubj"),
                w(2, "läks", "VERB", 0, "root"),
                w(3, "koju", "ADV", 2, "obl").with_feats("Case=Nom"),
                w(4, "maja", "NOUN", 5, "nmod").with_feats("Case=Gen"),
                w(5, "taha", "ADP", 2, "obl"),
                w(6, ".", "PUNCT", 2, "punct"),
            ],
        )
        .unwrap();
        let res = resources();
        let flags = SentenceContext::new(&s, &res).flags;
        assert!(flags.obl_wrong_case);
        assert!(flags.obl_wrong_pos);
        assert!(!flags.obl_banned);
        assert!(!flags.modifier_banned);
    }

    #[test]
    fn test_advmod_flags() {
        let s = Sentence::new(
            Vec::new(),
            vec![
                w(1, "Ta", "PRON", 2, "nsubj"),
                w(2, "jookseb", "VERB", 0, "root"),
                w(3, "kiiresti", "ADV", 2, "advmod"),
                w(4, ".", "PUNCT", 2, "punct"),
            ],
        )
        .unwrap();
        let res = resources();
        let flags = SentenceContext::new(&s, &res).flags;
        assert!(flags.advmod_qualifying);
        assert!(!flags.advmod_banned);

        let s = Sentence::new(
            Vec::new(),
            vec![
                w(1, "Ta", "PRON", 2, "nsubj"),
                w(2, "jookseb", "VERB", 0, "root"),
                w(3, "ka", "ADV", 2, "advmod"),
                w(4, ".", "PUNCT", 2, "punct"),
            ],
        )
        .unwrap();
        let flags = SentenceContext::new(&s, &res).flags;
        assert!(flags.advmod_banned);
        assert!(!flags.advmod_qualifying);
    }

    #[test]
    fn test_xcomp_flags() {
        let s = Sentence::new(
            Vec::new(),
            vec![
                w(1, "Ta", "PRON", 2, "nsubj"),
                w(2, "läks", "VERB", 0, "root"),
                w(3, "ujuma", "VERB", 2, "xcomp").with_feats("VerbForm=Sup"),
                w(4, ".", "PUNCT", 2, "punct"),
            ],
        )
        .unwrap();
        let res = resources();
        let flags = SentenceContext::new(&s, &res).flags;
        assert!(flags.supine_qualifying);
        assert!(flags.xcomp_banned);
        assert!(!flags.supine_banned);
        assert!(!flags.xcomp_qualifying);
        assert!(flags.any_qualifying_adverbial());
    }

    #[test]
    fn test_abbreviation_bans_objects() {
        let s = Sentence::new(
            Vec::new(),
            vec![
                w(1, "EV", "PROPN", 2, "nsubj").with_feats("Abbr=Yes"),
                w(2, "kasvab", "VERB", 0, "root"),
                w(3, ".", "PUNCT", 2, "punct"),
            ],
        )
        .unwrap();
        let res = resources();
        assert!(SentenceContext::new(&s, &res).flags.obj_banned);
    }

    #[test]
    fn test_governor_has_following_nmod() {
        let s = Sentence::new(
            Vec::new(),
            vec![
                w(1, "Raamat", "NOUN", 4, "nsubj"),
                w(2, "laual", "NOUN", 1, "nmod").with_feats("Case=Ade"),
                w(3, "on", "AUX", 4, "cop"),
                w(4, "uus", "ADJ", 0, "root"),
                w(5, ".", "PUNCT", 4, "punct"),
            ],
        )
        .unwrap();
        let res = resources();
        let ctx = SentenceContext::new(&s, &res);
        assert!(ctx.governor_has_following_nmod(1));
        assert!(!ctx.governor_has_following_nmod(0));
        assert!(!ctx.governor_has_following_nmod(3));
    }
}
