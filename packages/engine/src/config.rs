//! Configuration constants for the Levelmark engine
//!
//! Length bands, punctuation sets and the names of the lexical resource
//! files. The rule table in [`crate::rules`] reads these values; the
//! command-line surface only overrides resource paths.

use std::ops::RangeInclusive;

/// Key of the misc column entry that carries level labels.
pub const LEVEL_KEY: &str = "Lvl";

/// Placeholder for an unset column.
pub const UNSET: &str = "_";

/// Heading of the end-of-corpus overview.
pub const REPORT_TITLE: &str = "MarkLevels";

/// Default file name of the lemma blacklist.
pub const DEFAULT_BLACKLIST_FILE: &str = "inappropriate_words.txt";

/// Default file name of the excluded adverb list.
pub const DEFAULT_ADVERB_FILE: &str = "unsuitable_adverbials.txt";

/// Minimum number of words below the root word for a usable sentence.
pub const MIN_ROOT_DESCENDANTS: usize = 2;

/// Levels 1-6 are attempted for sentences of at most this many words.
pub const SHORT_BAND_MAX_WORDS: usize = 6;

/// Levels 7-10 are attempted for sentences in this word range.
pub const MEDIUM_BAND_WORDS: RangeInclusive<usize> = 7..=11;

/// Levels 11-12 are attempted for sentences of at most this many words.
pub const LONG_BAND_MAX_WORDS: usize = 13;

/// Sentence-final marks. `?` only counts below the root word.
pub const TERMINAL_MARKS: [&str; 3] = ["?", ".", "!"];

/// Marks that make a sentence unsuitable wherever they occur.
pub const UNSUITABLE_MARKS: [&str; 11] =
    ["(", ")", "[", "]", "{", "}", ":", ";", "-", "/", "\\"];

/// Capitals outside A-Z that may open a sentence.
pub const EXTRA_CAPITALS: [char; 6] = ['Š', 'Ž', 'Õ', 'Ä', 'Ö', 'Ü'];

/// Language-specific tag of conjunctions.
pub const CONJUNCTION_XPOS: &str = "J";

/// Language-specific tag of verbs (main and auxiliary).
pub const VERB_XPOS: &str = "V";

/// Language-specific tag of foreign or unanalysed tokens.
pub const FOREIGN_XPOS: &str = "Y";

/// Marker characters stripped from lemmas before the blacklist lookup.
pub const LEMMA_MARKERS: [char; 2] = ['=', '_'];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands_are_ordered() {
        assert!(SHORT_BAND_MAX_WORDS < *MEDIUM_BAND_WORDS.start());
        assert!(*MEDIUM_BAND_WORDS.end() < LONG_BAND_MAX_WORDS);
    }

    #[test]
    fn test_unsuitable_marks_exclude_terminals() {
        for mark in TERMINAL_MARKS {
            assert!(!UNSUITABLE_MARKS.contains(&mark));
        }
    }
}
