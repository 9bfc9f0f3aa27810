//! Levelmark Engine
//!
//! Syntactic complexity levels for dependency-parsed sentences.
//! This library provides functionality for:
//! - Reading and writing CoNLL-U tree banks
//! - Excluding sentences unsuited for exercises ("Not" / "NotTrv")
//! - Assigning levels 1-12, plus the umbrella level 13, to matching words
//! - Summarising a run as label counts
//!
//! # Example
//!
//! ```no_run
//! use levelmark_engine::{conllu, Classifier, LexicalResources, NoSynthesizer};
//! use std::path::Path;
//!
//! let resources = LexicalResources::load(
//!     Path::new("inappropriate_words.txt"),
//!     Path::new("unsuitable_adverbials.txt"),
//! )?;
//! let text = std::fs::read_to_string("corpus.conllu")?;
//!
//! let mut classifier = Classifier::new(&resources, &NoSynthesizer);
//! let (sentences, report) = classifier.classify(conllu::parse_document(&text));
//! conllu::write_document(&mut std::io::stdout().lock(), &sentences)?;
//! eprintln!("{report}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod classifier;
pub mod config;
pub mod conllu;
pub mod context;
pub mod eligibility;
pub mod error;
pub mod report;
pub mod resources;
pub mod rules;
pub mod synth;
pub mod tree;
pub mod types;

// Re-export commonly used items
pub use classifier::{Classifier, ClassifierOptions, SentenceOutcome};
pub use context::{Accumulators, SentenceContext};
pub use eligibility::{EligibilityFilter, Gate};
pub use error::{EngineError, Result, SynthesisError, TreeError};
pub use report::{Report, ReportEntry, Stats};
pub use resources::LexicalResources;
pub use rules::{Band, Rule, RuleEngine, RuleMatch};
pub use synth::{FormSpec, FormTable, NoSynthesizer, Synthesizer};
pub use tree::{Features, Misc, Sentence, Word};
pub use types::{ExclusionReason, ExclusionTier, Label, Level};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
