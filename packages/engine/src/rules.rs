//! Level rules and the engine that applies them
//!
//! Every rule belongs to one of three length bands. The band decides
//! whether a word is considered at all; the rule itself is a predicate over
//! the word, its governor and dependents, and the [`SentenceContext`]
//! computed once for the sentence.
//!
//! A word can match any number of rules. Each match writes the rule's level
//! and the umbrella level 13 into the word's `Lvl=` annotation and counts
//! both in the run statistics.

use crate::config::{
    FOREIGN_XPOS, LONG_BAND_MAX_WORDS, MEDIUM_BAND_WORDS, SHORT_BAND_MAX_WORDS,
};
use crate::context::{SentenceContext, NOMINAL};
use crate::eligibility::existing_exclusion;
use crate::error::SynthesisError;
use crate::report::Stats;
use crate::resources::LexicalResources;
use crate::synth::{FormSpec, Synthesizer};
use crate::tree::{Sentence, Word};
use crate::types::{ExclusionTier, Label, Level};

const SUBJECT_POS: &[&str] = &["NOUN", "PRON", "PROPN", "ADJ", "NUM"];
const PREDICATIVE_POS: &[&str] = &["NOUN", "ADJ"];
const CORE_CASES: &[&str] = &["Nom", "Gen", "Par"];
const SUBJECT_CASES: &[&str] = &["Nom", "Par"];
const SUBJECT_RELATIONS: &[&str] = &["csubj", "nsubj", "nsubj:cop", "csubj:cop"];
const COPULAR_SUBJECTS: &[&str] = &["nsubj:cop", "csubj:cop"];
const MODIFIER_RELATIONS: &[&str] = &["nmod", "amod", "acl"];
/// Dependents that keep a word out of every band
const BLOCKING_CHILDREN: &[&str] = &["conj", "flat", "case"];

// =============================================================================
// Bands
// =============================================================================

/// Length band a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    /// Levels 1-6: short simple clauses
    Short,
    /// Levels 7-10: longer simple clauses
    Medium,
    /// Levels 11-12: longest clauses, not gated on punctuation
    Long,
}

impl Band {
    /// Whether the word is considered for rules of this band.
    ///
    /// `nontrivial` is set for sentences whose root carries "NotTrv"; those
    /// never enter the short and medium bands.
    fn admits(self, view: &WordView<'_, '_>, nontrivial: bool) -> bool {
        if view
            .children()
            .iter()
            .any(|rel| BLOCKING_CHILDREN.contains(rel))
        {
            return false;
        }
        let words = view.ctx.word_count;
        let single_punct = view.count("punct") == 1;
        match self {
            Self::Short => !nontrivial && single_punct && words <= SHORT_BAND_MAX_WORDS,
            Self::Medium => !nontrivial && single_punct && MEDIUM_BAND_WORDS.contains(&words),
            Self::Long => words <= LONG_BAND_MAX_WORDS,
        }
    }
}

// =============================================================================
// WordView
// =============================================================================

/// One word seen through its sentence context.
pub struct WordView<'v, 'a> {
    ctx: &'v SentenceContext<'a>,
    synthesizer: &'v dyn Synthesizer,
    copular_case_membership: bool,
    idx: usize,
    word: &'a Word,
}

impl<'v, 'a> WordView<'v, 'a> {
    fn rel(&self, deprel: &str) -> bool {
        self.word.deprel == deprel
    }

    fn pos(&self, tags: &[&str]) -> bool {
        self.word.is_pos(tags)
    }

    fn case(&self, value: &str) -> bool {
        self.word.feats.is("Case", value)
    }

    fn case_in(&self, values: &[&str]) -> bool {
        self.word.feats.is_any("Case", values)
    }

    /// Case test of the copular subject in levels 9 and 10. Without case
    /// membership enabled it never holds, so those two rules stay silent.
    fn copular_subject_case(&self) -> bool {
        self.copular_case_membership && self.case_in(SUBJECT_CASES)
    }

    fn verb_form(&self, value: &str) -> bool {
        self.word.feats.is("VerbForm", value)
    }

    fn foreign(&self) -> bool {
        self.word.xpos == FOREIGN_XPOS
    }

    fn children(&self) -> &[&'a str] {
        self.ctx.child_relations(self.idx)
    }

    fn has_child(&self, deprel: &str) -> bool {
        self.children().contains(&deprel)
    }

    fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    /// The governor has a `deprel` dependent, the word itself included.
    fn sibling(&self, deprel: &str) -> bool {
        self.ctx.sibling_relations(self.idx).contains(&deprel)
    }

    fn parent(&self) -> Option<&'a Word> {
        self.ctx
            .sentence()
            .parent(self.idx)
            .map(|p| self.ctx.word(p))
    }

    fn parent_is_verb(&self) -> bool {
        self.parent().is_some_and(|p| p.upos == "VERB")
    }

    fn parent_is_root(&self) -> bool {
        self.parent().is_some_and(|p| p.deprel == "root")
    }

    fn parent_not_nominative(&self) -> bool {
        !self.parent().is_some_and(|p| p.feats.is("Case", "Nom"))
    }

    fn parent_verb_form(&self, value: &str) -> bool {
        self.parent().is_some_and(|p| p.feats.is("VerbForm", value))
    }

    /// Relation occurs somewhere in the sentence.
    fn has(&self, deprel: &str) -> bool {
        self.ctx.relations.contains(deprel)
    }

    fn count(&self, deprel: &str) -> usize {
        self.ctx.relations.count(deprel)
    }

    fn any_subject(&self) -> bool {
        self.ctx.relations.contains_any(SUBJECT_RELATIONS)
    }

    fn any_adverbial(&self) -> bool {
        self.has("obl") || self.ctx.flags.any_qualifying_adverbial()
    }

    /// Occurrences of a relation below this word.
    fn count_below(&self, deprel: &str) -> usize {
        let sentence = self.ctx.sentence();
        sentence.count_relation(&sentence.descendants(self.idx), deprel)
    }

    /// The surface form differs from the nominative or the genitive
    /// singular of its lemma. Fails closed when synthesis fails.
    fn differs_from_base_forms(&self) -> bool {
        let forms = |spec: FormSpec| match self.synthesizer.synthesize(&self.word.lemma, spec) {
            Ok(forms) => Some(forms),
            Err(SynthesisError::Unavailable) => None,
            Err(err) => {
                tracing::warn!(
                    node = %self.ctx.sentence().address(self.idx),
                    error = %err,
                    "Synthesis failed, rule skipped"
                );
                None
            }
        };
        let (Some(nominative), Some(genitive)) = (
            forms(FormSpec::NominativeSingular),
            forms(FormSpec::GenitiveSingular),
        ) else {
            return false;
        };
        let form = &self.word.form;
        !nominative.contains(form) || !genitive.contains(form)
    }
}

// =============================================================================
// Rule table
// =============================================================================

/// One sub-rule of a level.
pub struct Rule {
    pub level: Level,
    pub band: Band,
    /// Shown in debug logs when the rule fires
    pub description: &'static str,
    matches: fn(&WordView<'_, '_>) -> bool,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("level", &self.level)
            .field("band", &self.band)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

macro_rules! rule {
    ($level:literal, $band:ident, $description:literal, $matches:expr) => {
        Rule {
            level: Level::fixed($level),
            band: Band::$band,
            description: $description,
            matches: $matches,
        }
    };
}

static RULES: &[Rule] = &[
    // Level 1: subject and predicate
    rule!(1, Short, "subject in a short simple clause", |w| {
        w.rel("nsubj") && w.pos(SUBJECT_POS) && w.case("Nom")
    }),
    rule!(1, Short, "copular subject in a short simple clause", |w| {
        w.rel("nsubj:cop") && w.pos(SUBJECT_POS) && w.case("Nom")
    }),
    rule!(1, Short, "verbal predicate in a short simple clause", |w| {
        w.rel("root")
            && w.pos(&["VERB"])
            && !w.has_child("aux")
            && !w.has_child("compound:prt")
            && (w.has_child("nsubj") || w.has_child("nsubj:cop"))
    }),
    // Level 2: partitive object
    rule!(2, Short, "partitive object in a short simple clause", |w| {
        w.rel("obj")
            && w.case("Par")
            && w.sibling("obj")
            && w.ctx.cases.count("Par") == 1
            && w.differs_from_base_forms()
    }),
    // Level 3: nominative or genitive object
    rule!(3, Short, "nominative object in a short simple clause", |w| {
        w.rel("obj") && w.sibling("obj") && w.case("Nom") && w.ctx.cases.count("Nom") == 1
    }),
    rule!(3, Short, "genitive object in a short simple clause", |w| {
        w.rel("obj") && w.sibling("obj") && w.case("Gen") && w.ctx.cases.count("Gen") == 1
    }),
    // Level 4: adverbial
    rule!(4, Short, "adverbial in a short simple clause", |w| {
        let f = &w.ctx.flags;
        w.rel("obl")
            && !w.case_in(CORE_CASES)
            && w.pos(NOMINAL)
            && !f.obl_banned
            && !f.obl_wrong_case
            && !f.obl_wrong_pos
            && !w.has("advmod")
            && !w.has("xcomp")
            && !w.has("nummod")
            && !f.advmod_banned
    }),
    // Level 5: modifiers
    rule!(5, Short, "genitive nominal modifier in a short simple clause", |w| {
        w.rel("nmod")
            && w.pos(NOMINAL)
            && w.case("Gen")
            && w.is_leaf()
            && bare_modifier_clause(w)
    }),
    rule!(5, Short, "adjectival modifier in a short simple clause", |w| {
        w.rel("amod") && w.pos(&["ADJ"]) && w.is_leaf() && bare_modifier_clause(w)
    }),
    // Level 6: predicatives
    rule!(6, Short, "nominal predicative of a copular subject", |w| {
        w.rel("root")
            && w.pos(PREDICATIVE_POS)
            && w.case_in(SUBJECT_CASES)
            && single_copular_subject(w, "nsubj:cop", "csubj:cop")
    }),
    rule!(6, Short, "nominal predicative of a clausal copular subject", |w| {
        w.rel("root")
            && w.pos(PREDICATIVE_POS)
            && w.case_in(SUBJECT_CASES)
            && single_copular_subject(w, "csubj:cop", "nsubj:cop")
    }),
    rule!(6, Short, "infinitive predicative", |w| {
        w.rel("root")
            && w.pos(&["VERB"])
            && w.verb_form("Inf")
            && single_copular_subject(w, "nsubj:cop", "csubj:cop")
    }),
    rule!(6, Short, "participle predicative", |w| {
        w.rel("root")
            && w.pos(&["VERB"])
            && w.verb_form("Part")
            && single_copular_subject(w, "nsubj:cop", "csubj:cop")
    }),
    // Level 7: adverbial with subject and object or predicative
    rule!(7, Medium, "oblique with subject and object", |w| {
        w.rel("obl")
            && w.pos(NOMINAL)
            && w.has("nsubj")
            && w.has("obj")
            && !w.ctx.flags.xcomp_banned
            && clean_adverbial_clause(w)
    }),
    rule!(7, Medium, "oblique with subject and predicative", |w| {
        w.rel("obl")
            && w.pos(NOMINAL)
            && w.has("nsubj:cop")
            && !w.ctx.flags.xcomp_banned
            && clean_adverbial_clause(w)
    }),
    rule!(7, Medium, "adverb with subject and object", |w| {
        w.rel("advmod")
            && w.parent_is_verb()
            && w.has("nsubj")
            && w.has("obj")
            && !w.ctx.flags.xcomp_banned
            && clean_adverbial_clause(w)
    }),
    rule!(7, Medium, "adverb with subject and predicative", |w| {
        w.rel("advmod")
            && w.parent_is_root()
            && w.has("nsubj:cop")
            && !w.ctx.flags.xcomp_banned
            && clean_adverbial_clause(w)
    }),
    rule!(7, Medium, "complement with subject and object", |w| {
        w.rel("xcomp")
            && w.pos(PREDICATIVE_POS)
            && w.has("nsubj")
            && w.has("obj")
            && !w.ctx.flags.xcomp_banned
            && clean_adverbial_clause(w)
    }),
    rule!(7, Medium, "supine with subject and object", |w| {
        w.rel("xcomp")
            && w.verb_form("Sup")
            && w.has("nsubj")
            && w.has("obj")
            && !w.ctx.flags.supine_banned
            && clean_adverbial_clause(w)
    }),
    rule!(7, Medium, "supine with subject and predicative", |w| {
        w.rel("xcomp")
            && w.verb_form("Sup")
            && w.has("nsubj:cop")
            && !w.ctx.flags.supine_banned
            && clean_adverbial_clause(w)
    }),
    // Level 8: modifier and adverbial
    rule!(8, Medium, "genitive nominal modifier with adverbial", |w| {
        w.rel("nmod")
            && w.case("Gen")
            && w.pos(NOMINAL)
            && !w.foreign()
            && level8_modifiers_allowed(w)
    }),
    rule!(8, Medium, "genitive adjectival modifier with adverbial", |w| {
        w.rel("amod") && w.case("Gen") && !w.foreign() && level8_modifiers_allowed(w)
    }),
    rule!(8, Medium, "adjectival clause modifier with adverbial", |w| {
        w.rel("acl") && w.pos(&["ADJ"]) && w.is_leaf() && level8_modifiers_allowed(w)
    }),
    rule!(8, Medium, "core-case oblique with modifier", |w| {
        w.rel("obl") && w.case_in(CORE_CASES) && w.pos(NOMINAL) && level8_adverbial_allowed(w)
    }),
    rule!(8, Medium, "complement with modifier", |w| {
        w.rel("xcomp") && w.pos(PREDICATIVE_POS) && level8_adverbial_allowed(w)
    }),
    // Level 9: subject and object
    rule!(9, Medium, "subject with object", |w| {
        w.rel("nsubj")
            && w.pos(SUBJECT_POS)
            && w.case_in(SUBJECT_CASES)
            && !w.ctx.flags.obj_banned
            && w.count("nsubj") == 1
            && w.count("obj") == 1
            && !w.has_child("conj")
    }),
    rule!(9, Medium, "clausal subject with object", |w| {
        w.rel("csubj")
            && w.verb_form("Inf")
            && !w.ctx.flags.obj_banned
            && w.count("csubj") == 1
            && w.count("obj") == 1
            && !w.has_child("conj")
    }),
    rule!(9, Medium, "copular subject with object", |w| {
        w.rel("nsubj:cop")
            && w.pos(SUBJECT_POS)
            && w.copular_subject_case()
            && w.parent_not_nominative()
            && !w.ctx.flags.obj_banned
            && w.count("nsubj:cop") == 1
            && w.count("obj") == 1
            && !w.has_child("conj")
    }),
    rule!(9, Medium, "clausal copular subject with object", |w| {
        w.rel("csubj:cop")
            && w.verb_form("Inf")
            && w.parent_not_nominative()
            && !w.ctx.flags.obj_banned
            && w.count("csubj:cop") == 1
            && w.count("obj") == 1
            && !w.has_child("conj")
    }),
    rule!(9, Medium, "object with subject", |w| {
        w.rel("obj")
            && w.case_in(CORE_CASES)
            && w.sibling("obj")
            && w.any_subject()
            && !w.ctx.flags.obj_banned
            && w.count("obj") == 1
    }),
    // Level 10: subject, object and adverbial
    rule!(10, Medium, "subject with object and adverbial", |w| {
        w.rel("nsubj")
            && w.pos(SUBJECT_POS)
            && w.case_in(SUBJECT_CASES)
            && !w.has_child("conj")
            && w.has("obj")
            && w.any_adverbial()
    }),
    rule!(10, Medium, "clausal subject with object and adverbial", |w| {
        w.rel("csubj") && w.verb_form("Inf") && w.has("obj") && w.any_adverbial()
    }),
    rule!(10, Medium, "copular subject with object and adverbial", |w| {
        w.rel("nsubj:cop")
            && w.pos(SUBJECT_POS)
            && w.copular_subject_case()
            && w.parent_not_nominative()
            && w.has("obj")
            && w.any_adverbial()
    }),
    rule!(10, Medium, "clausal copular subject with object and adverbial", |w| {
        w.rel("csubj:cop")
            && w.verb_form("Inf")
            && w.count("csubj:cop") == 1
            && w.has("obj")
            && w.any_adverbial()
    }),
    rule!(10, Medium, "object with subject and adverbial", |w| {
        w.rel("obj")
            && w.count_below("obj") < 2
            && w.case_in(CORE_CASES)
            && w.sibling("obj")
            && w.any_subject()
            && w.any_adverbial()
    }),
    rule!(10, Medium, "object of a converb with subject and adverbial", |w| {
        w.rel("obj")
            && w.case_in(CORE_CASES)
            && w.parent_verb_form("Conv")
            && w.any_subject()
            && w.count_below("obj") < 2
            && w.count_below("ccomp") == 0
            && w.any_adverbial()
    }),
    rule!(10, Medium, "oblique with subject and object", |w| {
        let f = &w.ctx.flags;
        w.rel("obl")
            && w.pos(NOMINAL)
            && w.has("obj")
            && w.any_subject()
            && !f.xcomp_banned
            && !f.advmod_banned
            && !f.obl_wrong_pos
            && !f.obl_banned
    }),
    rule!(10, Medium, "adverb with subject and object", |w| {
        let f = &w.ctx.flags;
        w.rel("advmod")
            && w.parent_is_verb()
            && !f.advmod_banned
            && !f.xcomp_banned
            && w.any_subject()
            && w.has("obj")
            && !f.obl_wrong_pos
            && !f.obl_banned
    }),
    rule!(10, Medium, "complement with subject and object", |w| {
        let f = &w.ctx.flags;
        w.rel("xcomp")
            && w.pos(PREDICATIVE_POS)
            && !f.xcomp_banned
            && !f.advmod_banned
            && w.has("obj")
            && w.any_subject()
            && !f.obl_wrong_pos
            && !f.obl_banned
    }),
    rule!(10, Medium, "supine with subject and object", |w| {
        let f = &w.ctx.flags;
        w.rel("xcomp")
            && w.verb_form("Sup")
            && !f.supine_banned
            && !f.advmod_banned
            && w.has("obj")
            && w.any_subject()
            && !f.obl_wrong_pos
            && !f.obl_banned
    }),
    // Level 11: subject, predicative and adverbial
    rule!(11, Long, "copular subject with predicative and adverbial", |w| {
        w.rel("nsubj:cop")
            && w.pos(SUBJECT_POS)
            && !w.has("nsubj")
            && !w.has("csubj")
            && !w.has("csubj:cop")
            && w.count("nsubj:cop") < 2
            && w.any_adverbial()
    }),
    rule!(11, Long, "clausal copular subject with predicative and adverbial", |w| {
        w.rel("csubj:cop")
            && w.verb_form("Inf")
            && w.count("csubj:cop") < 2
            && !w.has("nsubj")
            && !w.has("csubj")
            && !w.has("nsubj:cop")
            && w.any_adverbial()
    }),
    rule!(11, Long, "nominal predicative with adverbial", |w| {
        w.rel("root")
            && w.pos(PREDICATIVE_POS)
            && w.case_in(SUBJECT_CASES)
            && w.has_child("nsubj:cop")
            && w.any_adverbial()
    }),
    rule!(11, Long, "nominal predicative of a clausal subject with adverbial", |w| {
        w.rel("root")
            && w.pos(PREDICATIVE_POS)
            && w.case_in(SUBJECT_CASES)
            && w.has_child("csubj:cop")
            && w.any_adverbial()
    }),
    rule!(11, Long, "infinitive predicative with adverbial", |w| {
        w.rel("root")
            && w.pos(&["VERB"])
            && w.verb_form("Inf")
            && w.has_child("nsubj:cop")
            && w.any_adverbial()
    }),
    rule!(11, Long, "participle predicative with adverbial", |w| {
        w.rel("root")
            && w.pos(&["VERB"])
            && w.verb_form("Part")
            && w.has_child("nsubj:cop")
            && w.any_adverbial()
    }),
    rule!(11, Long, "oblique with subject and predicative", |w| {
        let f = &w.ctx.flags;
        w.rel("obl")
            && !f.obl_banned
            && w.pos(NOMINAL)
            && w.ctx.relations.contains_any(COPULAR_SUBJECTS)
            && !f.xcomp_banned
            && !f.advmod_banned
            && !f.obl_wrong_pos
    }),
    rule!(11, Long, "adverb with subject and predicative", |w| {
        let f = &w.ctx.flags;
        w.rel("advmod")
            && w.parent_is_verb()
            && !f.advmod_banned
            && !f.xcomp_banned
            && w.ctx.relations.contains_any(COPULAR_SUBJECTS)
            && !f.obl_banned
            && !f.obl_wrong_pos
    }),
    rule!(11, Long, "complement with subject and predicative", |w| {
        let f = &w.ctx.flags;
        w.rel("xcomp")
            && w.pos(PREDICATIVE_POS)
            && !f.xcomp_banned
            && !f.advmod_banned
            && !f.obl_banned
            && w.ctx.relations.contains_any(COPULAR_SUBJECTS)
            && !f.obl_wrong_pos
    }),
    rule!(11, Long, "supine with subject and predicative", |w| {
        let f = &w.ctx.flags;
        w.rel("xcomp")
            && w.verb_form("Sup")
            && !f.supine_banned
            && !f.advmod_banned
            && !f.obl_banned
            && w.is_leaf()
            && w.ctx.relations.contains_any(COPULAR_SUBJECTS)
            && !f.obl_wrong_pos
    }),
    // Level 12: apposition, vocative, subject next to apposition, adverbial attribute
    rule!(12, Long, "apposition", |w| {
        w.rel("appos")
            && w.pos(NOMINAL)
            && (w.has("nsubj") || w.has("nsubj:cop"))
            && w.is_leaf()
            && w.count("punct") == 1
            && w.count("appos") == 1
    }),
    rule!(12, Long, "vocative", |w| {
        w.rel("vocative") && w.count("punct") < 3
    }),
    rule!(12, Long, "subject with apposition", |w| {
        w.rel("nsubj") && w.pos(SUBJECT_POS) && w.case_in(SUBJECT_CASES) && beside_apposition(w)
    }),
    rule!(12, Long, "copular subject with apposition", |w| {
        w.rel("nsubj:cop")
            && w.pos(SUBJECT_POS)
            && w.case_in(SUBJECT_CASES)
            && beside_apposition(w)
    }),
    rule!(12, Long, "clausal subject with apposition", |w| {
        w.rel("csubj") && w.verb_form("Inf") && beside_apposition(w)
    }),
    rule!(12, Long, "adverbial nominal modifier", |w| {
        w.rel("nmod")
            && w.pos(NOMINAL)
            && !w.case("Gen")
            && w.is_leaf()
            && !w.foreign()
            && !w.has("amod")
            && !w.has("nummod")
            && !w.has("acl")
            && w.count("nmod") == 1
            && w.ctx.governor_has_following_nmod(w.idx)
    }),
];

fn bare_modifier_clause(w: &WordView<'_, '_>) -> bool {
    let f = &w.ctx.flags;
    !w.has("nummod") && !w.has("acl") && !f.xpos_y_banned && !f.modifier_banned
}

fn single_copular_subject(w: &WordView<'_, '_>, subject: &str, other: &str) -> bool {
    w.has_child(subject) && w.count(subject) == 1 && w.count(other) == 0
}

fn clean_adverbial_clause(w: &WordView<'_, '_>) -> bool {
    let f = &w.ctx.flags;
    !w.has("nummod") && !f.obl_wrong_pos && !f.advmod_banned && !f.obl_banned
}

fn level8_modifiers_allowed(w: &WordView<'_, '_>) -> bool {
    let f = &w.ctx.flags;
    !f.amod_banned_l8
        && !f.nmod_banned_l8
        && !f.acl_banned_l8
        && w.has("obl")
        && !w.has("nummod")
}

fn level8_adverbial_allowed(w: &WordView<'_, '_>) -> bool {
    let f = &w.ctx.flags;
    w.ctx.relations.contains_any(MODIFIER_RELATIONS)
        && !w.has("nummod")
        && !w.has("advmod")
        && !f.xcomp_banned
        && !f.obl_banned
        && !f.obl_wrong_case
        && !f.obl_wrong_pos
}

fn beside_apposition(w: &WordView<'_, '_>) -> bool {
    w.count("punct") == 1 && w.has("appos") && !w.has_child("flat")
}

// =============================================================================
// RuleEngine
// =============================================================================

/// A rule that fired on a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    /// Word index within the sentence
    pub word: usize,
    pub level: Level,
    pub description: &'static str,
}

/// Applies the level rules to single sentences.
pub struct RuleEngine<'r> {
    resources: &'r LexicalResources,
    synthesizer: &'r dyn Synthesizer,
    copular_case_membership: bool,
}

impl<'r> RuleEngine<'r> {
    #[must_use]
    pub fn new(resources: &'r LexicalResources, synthesizer: &'r dyn Synthesizer) -> Self {
        Self {
            resources,
            synthesizer,
            copular_case_membership: false,
        }
    }

    /// Let the copular-subject rules of levels 9 and 10 accept a
    /// nominative or partitive subject.
    #[must_use]
    pub fn with_copular_case_membership(mut self, enabled: bool) -> Self {
        self.copular_case_membership = enabled;
        self
    }

    /// The full rule table, in evaluation order.
    #[must_use]
    pub fn rules() -> &'static [Rule] {
        RULES
    }

    /// All rules matching the sentence, without annotating it.
    ///
    /// A sentence whose root is marked "Not" yields nothing. One marked
    /// "NotTrv" is only tried against the long band.
    #[must_use]
    pub fn matches(&self, sentence: &Sentence) -> Vec<RuleMatch> {
        let nontrivial = match existing_exclusion(sentence) {
            Some(ExclusionTier::Unsuitable) => return Vec::new(),
            Some(ExclusionTier::NonTrivial) => true,
            None => false,
        };

        let ctx = SentenceContext::new(sentence, self.resources);
        let mut found = Vec::new();
        for (idx, word) in sentence.words().iter().enumerate() {
            let view = WordView {
                ctx: &ctx,
                synthesizer: self.synthesizer,
                copular_case_membership: self.copular_case_membership,
                idx,
                word,
            };
            for rule in RULES {
                if rule.band.admits(&view, nontrivial) && (rule.matches)(&view) {
                    found.push(RuleMatch {
                        word: idx,
                        level: rule.level,
                        description: rule.description,
                    });
                }
            }
        }
        found
    }

    /// Classify one sentence: annotate every matching word with the rule's
    /// level and the umbrella level, and count both.
    pub fn classify_sentence(&self, sentence: &mut Sentence, stats: &mut Stats) -> Vec<RuleMatch> {
        let found = self.matches(sentence);
        for m in &found {
            tracing::debug!(
                node = %sentence.address(m.word),
                level = %m.level,
                rule = m.description,
                "Level matched"
            );
            for level in [m.level, Level::UMBRELLA] {
                sentence.push_label(m.word, Label::Level(level));
                stats.record_label(Label::Level(level));
            }
        }
        found
    }
}
