//! Corpus-level classification
//!
//! [`Classifier`] ties the eligibility gate and the rule engine together.
//! Over a corpus it runs in two phases: every sentence is gated first, and
//! only then are the admitted sentences classified, so no rule ever reads a
//! sentence whose gate decision is still pending.

use crate::config::REPORT_TITLE;
use crate::eligibility::{EligibilityFilter, Gate};
use crate::error::Result;
use crate::report::{Report, Stats};
use crate::resources::LexicalResources;
use crate::rules::{RuleEngine, RuleMatch};
use crate::synth::Synthesizer;
use crate::tree::Sentence;
use crate::types::ExclusionTier;

/// Behaviour switches for a classification run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierOptions {
    /// Still try levels 11-12 on sentences excluded as "NotTrv"
    pub late_bands_for_nontrivial: bool,
    /// Let levels 9-10 accept a nominative or partitive copular subject
    pub copular_case_membership: bool,
    /// Heading of the summary report
    pub report_title: String,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            late_bands_for_nontrivial: false,
            copular_case_membership: false,
            report_title: REPORT_TITLE.to_string(),
        }
    }
}

/// What happened to one sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceOutcome {
    pub gate: Gate,
    pub matches: Vec<RuleMatch>,
}

/// Gate-then-classify pipeline with run statistics.
pub struct Classifier<'r> {
    filter: EligibilityFilter<'r>,
    engine: RuleEngine<'r>,
    options: ClassifierOptions,
    stats: Stats,
}

impl<'r> Classifier<'r> {
    #[must_use]
    pub fn new(resources: &'r LexicalResources, synthesizer: &'r dyn Synthesizer) -> Self {
        Self::with_options(resources, synthesizer, ClassifierOptions::default())
    }

    #[must_use]
    pub fn with_options(
        resources: &'r LexicalResources,
        synthesizer: &'r dyn Synthesizer,
        options: ClassifierOptions,
    ) -> Self {
        Self {
            filter: EligibilityFilter::new(resources),
            engine: RuleEngine::new(resources, synthesizer)
                .with_copular_case_membership(options.copular_case_membership),
            options,
            stats: Stats::new(),
        }
    }

    #[must_use]
    pub fn options(&self) -> &ClassifierOptions {
        &self.options
    }

    /// Counters accumulated since the last [`Classifier::finish`].
    #[must_use]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Gate and classify a single sentence in place.
    pub fn classify_sentence(&mut self, sentence: &mut Sentence) -> SentenceOutcome {
        self.stats.record_sentence();
        let gate = self.filter.evaluate(sentence, &mut self.stats);
        let matches = self.classify_gated(sentence, gate);
        SentenceOutcome { gate, matches }
    }

    /// Classify a whole corpus and return it annotated, with the report.
    ///
    /// Malformed trees are logged, counted and dropped from the output.
    /// Counters are reset afterwards, as by [`Classifier::finish`].
    pub fn classify(
        &mut self,
        corpus: impl IntoIterator<Item = Result<Sentence>>,
    ) -> (Vec<Sentence>, Report) {
        let mut sentences = Vec::new();
        for item in corpus {
            match item {
                Ok(sentence) => sentences.push(sentence),
                Err(err) => {
                    tracing::warn!(error = %err, "Skipping malformed sentence");
                    self.stats.record_malformed();
                }
            }
        }

        let gates: Vec<Gate> = sentences
            .iter_mut()
            .map(|sentence| {
                self.stats.record_sentence();
                self.filter.evaluate(sentence, &mut self.stats)
            })
            .collect();

        for (sentence, gate) in sentences.iter_mut().zip(gates) {
            self.classify_gated(sentence, gate);
        }

        let report = self.finish();
        (sentences, report)
    }

    /// Build the summary report, log it and reset the counters.
    pub fn finish(&mut self) -> Report {
        let report = self.stats.take_report(&self.options.report_title);
        tracing::warn!("{report}");
        report
    }

    fn classify_gated(&mut self, sentence: &mut Sentence, gate: Gate) -> Vec<RuleMatch> {
        let admitted = match gate {
            Gate::Eligible => true,
            Gate::Excluded { tier, .. } => {
                tier == ExclusionTier::NonTrivial && self.options.late_bands_for_nontrivial
            }
        };
        if admitted {
            self.engine.classify_sentence(sentence, &mut self.stats)
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EngineError, TreeError};
    use crate::synth::NoSynthesizer;
    use crate::tree::Word;
    use crate::types::{Label, Level};
    use pretty_assertions::assert_eq;

    fn w(id: usize, form: &str, upos: &str, head: usize, deprel: &str, feats: &str) -> Word {
        Word::new(id, form, head, deprel)
            .with_upos(upos)
            .with_lemma(&form.to_lowercase())
            .with_feats(feats)
    }

    fn dog_runs(id: &str) -> Sentence {
        Sentence::new(
            vec![format!("# sent_id = {id}"), "# text = Koer jooksis pargis.".into()],
            vec![
                w(1, "Koer", "NOUN", 2, "nsubj", "Case=Nom"),
                w(2, "jooksis", "VERB", 0, "root", "VerbForm=Fin").with_xpos("V"),
                w(3, "pargis", "NOUN", 2, "obl", "Case=Ine"),
                w(4, ".", "PUNCT", 2, "punct", "_"),
            ],
        )
        .unwrap()
    }

    /// Two verbs: "NotTrv", but the vocative still fits level 12.
    fn two_verbs_with_vocative() -> Sentence {
        Sentence::new(
            vec!["# sent_id = v1".into()],
            vec![
                w(1, "Mari", "PROPN", 3, "vocative", "Case=Nom"),
                w(2, ",", "PUNCT", 3, "punct", "_"),
                w(3, "tule", "VERB", 0, "root", "Mood=Imp").with_xpos("V"),
                w(4, "sööma", "VERB", 3, "xcomp", "VerbForm=Sup").with_xpos("V"),
                w(5, "ja", "CCONJ", 6, "cc", "_").with_xpos("J"),
                w(6, "jooma", "VERB", 4, "conj", "VerbForm=Sup").with_xpos("V"),
                w(7, "!", "PUNCT", 3, "punct", "_"),
            ],
        )
        .unwrap()
    }

    fn resources() -> LexicalResources {
        LexicalResources::from_lists(Vec::<&str>::new(), Vec::<&str>::new())
    }

    #[test]
    fn test_classify_sentence() {
        let res = resources();
        let mut classifier = Classifier::new(&res, &NoSynthesizer);
        let mut s = dog_runs("a1");
        let outcome = classifier.classify_sentence(&mut s);

        assert_eq!(outcome.gate, Gate::Eligible);
        assert_eq!(outcome.matches.len(), 3);
        assert_eq!(s.word(1).misc.to_string(), "Lvl=1,13");
        assert_eq!(classifier.stats().label_count(Label::NOT), 0);
    }

    #[test]
    fn test_classify_corpus_counts_malformed() {
        let res = resources();
        let mut classifier = Classifier::new(&res, &NoSynthesizer);
        let corpus = vec![
            Ok(dog_runs("a1")),
            Err(EngineError::malformed(Some("bad"), TreeError::NoRoot)),
            Ok(dog_runs("a2")),
        ];
        let (sentences, report) = classifier.classify(corpus);

        assert_eq!(sentences.len(), 2);
        assert_eq!(report.sentences, 2);
        assert_eq!(report.malformed, 1);
        assert_eq!(report.count("1"), 4);
        assert_eq!(report.count("4"), 2);
        assert_eq!(report.count("13"), 6);
        assert_eq!(report.title, REPORT_TITLE);
        assert_eq!(classifier.stats(), &Stats::new());
    }

    #[test]
    fn test_nontrivial_gets_no_levels_by_default() {
        let res = resources();
        let mut classifier = Classifier::new(&res, &NoSynthesizer);
        let mut s = two_verbs_with_vocative();
        let outcome = classifier.classify_sentence(&mut s);

        assert_eq!(outcome.gate.tier(), Some(ExclusionTier::NonTrivial));
        assert!(outcome.matches.is_empty());
        assert_eq!(s.labels(2), vec![Label::NOT_TRIVIAL]);
        assert!(s.labels(0).is_empty());
    }

    #[test]
    fn test_late_bands_for_nontrivial() {
        let res = resources();
        let options = ClassifierOptions {
            late_bands_for_nontrivial: true,
            ..ClassifierOptions::default()
        };
        let mut classifier = Classifier::with_options(&res, &NoSynthesizer, options);
        let mut s = two_verbs_with_vocative();
        let outcome = classifier.classify_sentence(&mut s);

        assert_eq!(outcome.gate.tier(), Some(ExclusionTier::NonTrivial));
        assert!(outcome.matches.iter().all(|m| m.level.code() >= 11));
        assert_eq!(
            s.labels(0),
            vec![Label::Level(Level::fixed(12)), Label::Level(Level::UMBRELLA)]
        );
    }

    #[test]
    fn test_unsuitable_never_classified() {
        let res = resources();
        let options = ClassifierOptions {
            late_bands_for_nontrivial: true,
            ..ClassifierOptions::default()
        };
        let mut classifier = Classifier::with_options(&res, &NoSynthesizer, options);
        let mut s = dog_runs("a1");
        s.push_label(1, Label::NOT);
        let outcome = classifier.classify_sentence(&mut s);

        assert_eq!(
            outcome.gate,
            Gate::Excluded {
                tier: ExclusionTier::Unsuitable,
                reason: None
            }
        );
        assert!(outcome.matches.is_empty());
        assert!(s.labels(0).is_empty());
    }

    fn copular_with_object() -> Sentence {
        Sentence::new(
            vec!["# sent_id = c1".into()],
            vec![
                w(1, "Poiss", "NOUN", 3, "nsubj:cop", "Case=Nom"),
                w(2, "on", "AUX", 3, "cop", "VerbForm=Fin"),
                w(3, "rõõmus", "ADJ", 0, "root", "Case=Par"),
                w(4, "koolis", "NOUN", 3, "obl", "Case=Ine"),
                w(5, "raamatut", "NOUN", 3, "obj", "Case=Par"),
                w(6, "ju", "PART", 3, "discourse", "_"),
                w(7, ".", "PUNCT", 3, "punct", "_"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_copular_case_membership_option() {
        let res = resources();
        let level = |code| Label::Level(Level::fixed(code));

        let mut classifier = Classifier::new(&res, &NoSynthesizer);
        let mut s = copular_with_object();
        assert_eq!(classifier.classify_sentence(&mut s).gate, Gate::Eligible);
        assert_eq!(s.labels(0), vec![level(11), Label::Level(Level::UMBRELLA)]);

        let options = ClassifierOptions {
            copular_case_membership: true,
            ..ClassifierOptions::default()
        };
        let mut classifier = Classifier::with_options(&res, &NoSynthesizer, options);
        let mut s = copular_with_object();
        classifier.classify_sentence(&mut s);
        assert_eq!(
            s.labels(0),
            vec![level(9), Label::Level(Level::UMBRELLA), level(10), level(11)]
        );
    }
}
