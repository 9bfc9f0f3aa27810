//! Per-level corpus partitioning.
//!
//! A marked sentence joins the bucket of every level found in its words'
//! `Lvl=` entries. Sentences carrying "Not" or "NotTrv" anywhere are left
//! out. Within a bucket, a sentence whose identifier line was already
//! taken is dropped, so the first occurrence wins.
//!
//! Written sentences keep only their identifier and text comment lines,
//! and each word's misc column is reduced to `Lvl=<level>` when that word
//! itself matched the bucket's level, `_` otherwise.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use levelmark_engine::config::{LEVEL_KEY, UNSET};
use levelmark_engine::{conllu, Level, Sentence, Word};

use crate::config::level_file_name;
use crate::error::{PartitionError, Result};

/// Levels a marked sentence contributes to.
///
/// Empty when any word carries an exclusion label. Tokens that are not a
/// level number are ignored.
#[must_use]
pub fn extract_levels(sentence: &Sentence) -> BTreeSet<Level> {
    let words = sentence.words();
    if words
        .iter()
        .any(|w| w.misc.labels().iter().any(|l| l.is_sentinel()))
    {
        return BTreeSet::new();
    }
    words.iter().flat_map(word_levels).collect()
}

fn word_levels(word: &Word) -> impl Iterator<Item = Level> + '_ {
    word.misc
        .level_tokens()
        .filter(|t| t.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|t| t.parse().ok())
}

/// Misc column of a word as written to the corpus of `level`.
#[must_use]
pub fn partition_misc(word: &Word, level: Level) -> String {
    if word_levels(word).any(|l| l == level) {
        format!("{LEVEL_KEY}={level}")
    } else {
        UNSET.to_string()
    }
}

/// Write one sentence block as it appears in the corpus of `level`.
pub fn write_partition_sentence<W: Write>(
    out: &mut W,
    sentence: &Sentence,
    level: Level,
) -> std::io::Result<()> {
    for line in [sentence.id_line(), sentence.text_line()].into_iter().flatten() {
        writeln!(out, "{line}")?;
    }
    for word in sentence.words() {
        writeln!(out, "{}", conllu::format_word(word, &partition_misc(word, level)))?;
    }
    writeln!(out)
}

/// One per-level corpus written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenLevel {
    pub level: Level,
    pub path: PathBuf,
    pub sentences: usize,
}

/// Marked sentences grouped by level.
#[derive(Debug, Default)]
pub struct LevelPartition {
    sentences: Vec<Sentence>,
    buckets: BTreeMap<Level, Vec<usize>>,
    seen: BTreeMap<Level, HashSet<String>>,
    excluded: usize,
    unlevelled: usize,
    duplicates: usize,
    malformed: usize,
}

impl LevelPartition {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a marked sentence to the bucket of each of its levels.
    ///
    /// Returns the levels it was added to; a sentence added to none is
    /// dropped. Sentences without an identifier line are never treated as
    /// duplicates.
    pub fn add(&mut self, sentence: Sentence) -> Vec<Level> {
        let levels = extract_levels(&sentence);
        if levels.is_empty() {
            if sentence.words().iter().any(|w| !w.misc.labels().is_empty()) {
                self.excluded += 1;
            } else {
                self.unlevelled += 1;
            }
            return Vec::new();
        }

        let index = self.sentences.len();
        let mut added = Vec::new();
        for level in levels {
            if let Some(id) = sentence.id_line() {
                if !self.seen.entry(level).or_default().insert(id.to_string()) {
                    tracing::debug!(id = %id, level = %level, "Duplicate sentence skipped");
                    self.duplicates += 1;
                    continue;
                }
            }
            self.buckets.entry(level).or_default().push(index);
            added.push(level);
        }
        if !added.is_empty() {
            self.sentences.push(sentence);
        }
        added
    }

    /// Parse a marked document and add each of its sentences.
    ///
    /// Malformed trees are logged and counted, not fatal.
    pub fn add_document(&mut self, text: &str) {
        for item in conllu::parse_document(text) {
            match item {
                Ok(sentence) => {
                    self.add(sentence);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Skipping malformed sentence");
                    self.malformed += 1;
                }
            }
        }
    }

    /// Read and add a marked tree-bank file.
    ///
    /// # Errors
    ///
    /// Returns `Read` if the file cannot be read.
    pub fn add_file(&mut self, path: &Path) -> Result<()> {
        let text = std::fs::read_to_string(path).map_err(|source| PartitionError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.add_document(&text);
        Ok(())
    }

    /// Levels with at least one sentence, ascending.
    pub fn levels(&self) -> impl Iterator<Item = Level> + '_ {
        self.buckets.keys().copied()
    }

    /// Sentences of one level, in insertion order.
    pub fn bucket(&self, level: Level) -> impl Iterator<Item = &Sentence> + '_ {
        self.buckets
            .get(&level)
            .into_iter()
            .flatten()
            .map(|idx| &self.sentences[*idx])
    }

    /// Number of sentences in one level's bucket.
    #[must_use]
    pub fn bucket_len(&self, level: Level) -> usize {
        self.buckets.get(&level).map_or(0, Vec::len)
    }

    /// Distinct sentences kept in at least one bucket.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Sentences left out because they carry an exclusion label.
    #[must_use]
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    /// Sentences left out because no word carries a level.
    #[must_use]
    pub fn unlevelled(&self) -> usize {
        self.unlevelled
    }

    /// Bucket entries dropped as repeated identifiers.
    #[must_use]
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Malformed trees skipped while reading documents.
    #[must_use]
    pub fn malformed(&self) -> usize {
        self.malformed
    }

    /// Write one level's corpus; returns the number of sentences written.
    pub fn write_level<W: Write>(&self, out: &mut W, level: Level) -> std::io::Result<usize> {
        let mut written = 0;
        for sentence in self.bucket(level) {
            write_partition_sentence(out, sentence, level)?;
            written += 1;
        }
        Ok(written)
    }

    /// Write every level to `level_<N>.conllu` in `dir`.
    ///
    /// # Errors
    ///
    /// Returns `Write` if a file cannot be created or written.
    pub fn write_all(&self, dir: &Path) -> Result<Vec<WrittenLevel>> {
        let mut written = Vec::new();
        for level in self.levels() {
            let path = dir.join(level_file_name(level));
            let write = |path: &Path| -> std::io::Result<usize> {
                let mut out = BufWriter::new(File::create(path)?);
                let count = self.write_level(&mut out, level)?;
                out.flush()?;
                Ok(count)
            };
            let sentences = write(&path).map_err(|source| PartitionError::Write {
                path: path.clone(),
                source,
            })?;
            tracing::info!(level = %level, path = %path.display(), sentences, "Wrote level corpus");
            written.push(WrittenLevel {
                level,
                path,
                sentences,
            });
        }
        Ok(written)
    }
}
