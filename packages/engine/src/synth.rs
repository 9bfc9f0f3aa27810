//! Morphological synthesis seam.
//!
//! One level-2 rule compares a word's surface form with generated
//! nominative and genitive singular forms of its lemma. Generation is an
//! external capability behind [`Synthesizer`]; a failing backend makes
//! the rule not match.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, Result, SynthesisError};

/// Form to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormSpec {
    NominativeSingular,
    GenitiveSingular,
}

impl FormSpec {
    /// Form code understood by the synthesis backend.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NominativeSingular => "sg n",
            Self::GenitiveSingular => "sg g",
        }
    }

    /// Parse a form code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "sg n" => Some(Self::NominativeSingular),
            "sg g" => Some(Self::GenitiveSingular),
            _ => None,
        }
    }
}

impl fmt::Display for FormSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generates surface forms of a lemma.
pub trait Synthesizer {
    /// All surface forms of `lemma` for `spec`.
    fn synthesize(
        &self,
        lemma: &str,
        spec: FormSpec,
    ) -> std::result::Result<Vec<String>, SynthesisError>;
}

/// Backend used when no synthesis is configured; always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSynthesizer;

impl Synthesizer for NoSynthesizer {
    fn synthesize(
        &self,
        _lemma: &str,
        _spec: FormSpec,
    ) -> std::result::Result<Vec<String>, SynthesisError> {
        Err(SynthesisError::Unavailable)
    }
}

/// Lookup table of pre-generated forms.
///
/// Loaded from a tab-separated file with the columns lemma, form code
/// (`sg n` or `sg g`) and surface form; a lemma may have several forms
/// per code.
#[derive(Debug, Clone, Default)]
pub struct FormTable {
    forms: HashMap<(String, FormSpec), Vec<String>>,
}

impl FormTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one generated form.
    pub fn insert(&mut self, lemma: &str, spec: FormSpec, form: &str) {
        self.forms
            .entry((lemma.to_string(), spec))
            .or_default()
            .push(form.to_string());
    }

    /// Load a table from a tab-separated file.
    ///
    /// # Errors
    /// Returns `ResourceLoad` if the file cannot be read. Lines with an
    /// unknown form code are skipped.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| EngineError::ResourceLoad {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Parse table text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut table = Self::new();
        for (n, line) in text.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut columns = line.split('\t');
            match (
                columns.next(),
                columns.next().and_then(FormSpec::from_code),
                columns.next(),
            ) {
                (Some(lemma), Some(spec), Some(form)) => table.insert(lemma, spec, form),
                _ => tracing::warn!(line = n + 1, "Skipping malformed form table line"),
            }
        }
        table
    }

    /// Number of (lemma, form code) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.forms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

impl Synthesizer for FormTable {
    fn synthesize(
        &self,
        lemma: &str,
        spec: FormSpec,
    ) -> std::result::Result<Vec<String>, SynthesisError> {
        self.forms
            .get(&(lemma.to_string(), spec))
            .cloned()
            .ok_or_else(|| SynthesisError::UnknownLemma {
                lemma: lemma.to_string(),
                spec: spec.to_string(),
            })
    }
}
