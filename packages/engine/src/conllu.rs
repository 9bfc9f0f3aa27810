//! Tree-bank codec for the tab-separated ten-column format.
//!
//! Sentences are blank-line separated blocks. Lines starting with `#`
//! are comments; every other line holds the columns id, form, lemma,
//! upos, xpos, feats, head, deprel, deps and misc. Multiword-token
//! ranges (`1-2`) and empty nodes (`1.1`) are not part of the tree; they
//! are carried along verbatim and written back in place.

use std::io::Write;

use crate::config::UNSET;
use crate::error::{EngineError, Result, TreeError};
use crate::tree::{Features, Misc, Sentence, Word};

/// Number of columns in a word line.
pub const COLUMN_COUNT: usize = 10;

/// Column names in file order.
pub const COLUMNS: [&str; COLUMN_COUNT] = [
    "id", "form", "lemma", "upos", "xpos", "feats", "head", "deprel", "deps", "misc",
];

/// Split a document into sentence blocks.
pub fn split_blocks(text: &str) -> impl Iterator<Item = Vec<&str>> {
    text.split("\n\n")
        .map(|block| {
            block
                .lines()
                .map(|line| line.trim_end_matches('\r'))
                .filter(|line| !line.trim().is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|lines| !lines.is_empty())
}

/// Parse every sentence of a document.
///
/// Each block is parsed independently so one malformed tree does not
/// affect its neighbours.
pub fn parse_document(text: &str) -> Vec<Result<Sentence>> {
    let normalized = text.replace("\r\n", "\n");
    split_blocks(&normalized).map(|lines| parse_block(&lines)).collect()
}

/// Parse one sentence block.
pub fn parse_block(lines: &[&str]) -> Result<Sentence> {
    let mut comments = Vec::new();
    let mut words = Vec::new();
    let mut token_rows = Vec::new();

    for line in lines {
        if line.starts_with('#') {
            comments.push((*line).to_string());
            continue;
        }
        let id_column = line.split('\t').next().unwrap_or_default();
        if id_column.contains('-') || id_column.contains('.') {
            tracing::debug!(id = %id_column, "Keeping multiword token or empty node outside the tree");
            token_rows.push((words.len(), (*line).to_string()));
            continue;
        }
        match parse_word(line) {
            Ok(word) => words.push(word),
            Err(source) => {
                return Err(EngineError::malformed(sent_id_of(&comments), source));
            }
        }
    }

    Sentence::new(comments.clone(), words)
        .map(|sentence| sentence.with_token_rows(token_rows))
        .map_err(|source| EngineError::malformed(sent_id_of(&comments), source))
}

fn sent_id_of(comments: &[String]) -> Option<&str> {
    comments
        .iter()
        .find_map(|c| c.split_once("sent_id").map(|(_, rest)| rest))
        .map(|rest| rest.trim_start().trim_start_matches('=').trim())
}

/// Parse one word line.
///
/// Missing trailing columns are filled with `_` and logged; the id and
/// head columns must be numbers.
pub fn parse_word(line: &str) -> std::result::Result<Word, TreeError> {
    let mut columns: Vec<&str> = line.split('\t').collect();
    if columns.len() < COLUMN_COUNT {
        tracing::warn!(
            line = %line,
            missing = ?&COLUMNS[columns.len()..],
            "Word line is missing columns, treating them as unset"
        );
        columns.resize(COLUMN_COUNT, UNSET);
    }

    let id = parse_number("id", columns[0])?;
    let head = if columns[6] == UNSET {
        tracing::warn!(line = %line, "Word line has no head, attaching to root");
        0
    } else {
        parse_number("head", columns[6])?
    };

    Ok(Word {
        id,
        form: columns[1].to_string(),
        lemma: columns[2].to_string(),
        upos: columns[3].to_string(),
        xpos: columns[4].to_string(),
        feats: Features::parse(columns[5]),
        head,
        deprel: columns[7].to_string(),
        deps: columns[8].to_string(),
        misc: Misc::parse(columns[9]),
    })
}

fn parse_number(column: &'static str, value: &str) -> std::result::Result<usize, TreeError> {
    value
        .trim()
        .parse()
        .map_err(|_| TreeError::InvalidNumber {
            column,
            value: value.to_string(),
        })
}

/// Format the ten columns of a word with a replacement misc column.
#[must_use]
pub fn format_word(word: &Word, misc: &str) -> String {
    [
        word.id.to_string(),
        word.form.clone(),
        word.lemma.clone(),
        word.upos.clone(),
        word.xpos.clone(),
        word.feats.to_string(),
        word.head.to_string(),
        word.deprel.clone(),
        word.deps.clone(),
        misc.to_string(),
    ]
    .into_iter()
    .map(|column| if column.is_empty() { UNSET.to_string() } else { column })
    .collect::<Vec<_>>()
    .join("\t")
}

/// Write a sentence block with all comments, followed by a blank line.
///
/// Multiword-token and empty-node lines go back where they were read.
pub fn write_sentence<W: Write>(out: &mut W, sentence: &Sentence) -> std::io::Result<()> {
    for comment in sentence.comments() {
        writeln!(out, "{comment}")?;
    }
    let mut rows = sentence.token_rows().iter().peekable();
    for (idx, word) in sentence.words().iter().enumerate() {
        while let Some((_, line)) = rows.next_if(|(position, _)| *position == idx) {
            writeln!(out, "{line}")?;
        }
        writeln!(out, "{}", format_word(word, &word.misc.to_string()))?;
    }
    for (_, line) in rows {
        writeln!(out, "{line}")?;
    }
    writeln!(out)
}

/// Write every sentence of a corpus.
pub fn write_document<W: Write>(out: &mut W, sentences: &[Sentence]) -> std::io::Result<()> {
    for sentence in sentences {
        write_sentence(out, sentence)?;
    }
    Ok(())
}
