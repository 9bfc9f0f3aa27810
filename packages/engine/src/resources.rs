//! Lexical resources: the lemma blacklist and the excluded adverb list.
//!
//! Both lists are loaded once, before any sentence is processed, and are
//! read-only afterwards. Lemmas and entries are compared in NFC so that
//! precomposed and combining spellings of õ, ä, ö, ü and š match.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use unicode_normalization::UnicodeNormalization;

use crate::config::LEMMA_MARKERS;
use crate::error::{EngineError, Result};

/// Immutable bundle of the two word lists.
#[derive(Debug, Clone, Default)]
pub struct LexicalResources {
    blacklist: HashSet<String>,
    adverbs: HashSet<String>,
}

impl LexicalResources {
    /// Load both lists from newline-delimited files.
    ///
    /// # Errors
    /// Returns `ResourceLoad` if either file cannot be read.
    pub fn load(blacklist: &Path, adverbs: &Path) -> Result<Self> {
        let blacklist_text = read(blacklist)?;
        let adverb_text = read(adverbs)?;
        let resources = Self::from_lists(
            blacklist_text.split_whitespace(),
            adverb_text.lines(),
        );
        tracing::info!(
            blacklist = resources.blacklist.len(),
            adverbs = resources.adverbs.len(),
            "Loaded lexical resources"
        );
        Ok(resources)
    }

    /// Build the bundle from in-memory lists.
    ///
    /// Blank and purely numeric blacklist tokens are dropped.
    pub fn from_lists<'a>(
        blacklist: impl IntoIterator<Item = &'a str>,
        adverbs: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let blacklist = blacklist
            .into_iter()
            .map(str::trim)
            .filter(|w| !w.is_empty() && !w.chars().all(|c| c.is_ascii_digit()))
            .map(normalize)
            .collect();
        let adverbs = adverbs
            .into_iter()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(normalize)
            .collect();
        Self { blacklist, adverbs }
    }

    /// Whether a lemma is blacklisted, ignoring case and `=`/`_` markers.
    #[must_use]
    pub fn is_blacklisted(&self, lemma: &str) -> bool {
        let cleaned: String = lemma.chars().filter(|c| !LEMMA_MARKERS.contains(c)).collect();
        self.blacklist.contains(&normalize(&cleaned))
    }

    /// Whether a surface form is an excluded adverb, ignoring case.
    #[must_use]
    pub fn is_excluded_adverb(&self, form: &str) -> bool {
        self.adverbs.contains(&normalize(form))
    }

    /// Number of blacklist entries.
    #[must_use]
    pub fn blacklist_len(&self) -> usize {
        self.blacklist.len()
    }

    /// Number of excluded adverbs.
    #[must_use]
    pub fn adverb_len(&self) -> usize {
        self.adverbs.len()
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| EngineError::ResourceLoad {
        path: path.to_path_buf(),
        source,
    })
}

fn normalize(word: &str) -> String {
    word.nfc().collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_numeric_and_blank_tokens_dropped() {
        let res = LexicalResources::from_lists(["kurat", "123", "", "  "], ["ka"]);
        assert_eq!(res.blacklist_len(), 1);
        assert!(res.is_blacklisted("kurat"));
        assert!(!res.is_blacklisted("123"));
    }

    #[test]
    fn test_blacklist_strips_markers_and_case() {
        let res = LexicalResources::from_lists(["pasakott"], Vec::<&str>::new());
        assert!(res.is_blacklisted("pasa=kott"));
        assert!(res.is_blacklisted("pasa_kott"));
        assert!(res.is_blacklisted("Pasakott"));
        assert!(!res.is_blacklisted("kott"));
    }

    #[test]
    fn test_blacklist_matches_decomposed_letters() {
        let res = LexicalResources::from_lists(["tõbras"], Vec::<&str>::new());
        assert!(res.is_blacklisted("to\u{303}bras"));
    }

    #[test]
    fn test_excluded_adverbs() {
        let res = LexicalResources::from_lists(Vec::<&str>::new(), ["ka", "aga"]);
        assert!(res.is_excluded_adverb("Ka"));
        assert!(res.is_excluded_adverb("aga"));
        assert!(!res.is_excluded_adverb("kiiresti"));
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let blacklist = dir.path().join("inappropriate_words.txt");
        let adverbs = dir.path().join("unsuitable_adverbials.txt");
        let mut f = fs::File::create(&blacklist).unwrap();
        writeln!(f, "kurat  tont\n42\nvanakurat").unwrap();
        fs::write(&adverbs, "ka\naga\n").unwrap();

        let res = LexicalResources::load(&blacklist, &adverbs).unwrap();
        assert_eq!(res.blacklist_len(), 3);
        assert_eq!(res.adverb_len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        let err = LexicalResources::load(&missing, &missing).unwrap_err();
        assert!(matches!(err, EngineError::ResourceLoad { .. }));
    }
}
