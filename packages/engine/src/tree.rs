//! Dependency tree model.
//!
//! A [`Sentence`] owns its words in reading order together with the head
//! links between them. The shape of the tree is fixed at construction;
//! afterwards only the level annotation in each word's misc column can
//! change.

use std::collections::BTreeSet;
use std::fmt;

use crate::config::{LEVEL_KEY, UNSET};
use crate::error::TreeError;
use crate::types::Label;

/// Morphological features of a word, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Features(Vec<(String, String)>);

impl Features {
    /// Parse a feats column (`Case=Nom|Number=Sing`, or `_` for none).
    #[must_use]
    pub fn parse(column: &str) -> Self {
        if column == UNSET || column.is_empty() {
            return Self::default();
        }
        Self(
            column
                .split('|')
                .filter_map(|pair| pair.split_once('='))
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// Value of a feature; keys are case-sensitive.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether `key` is set to `value`.
    #[must_use]
    pub fn is(&self, key: &str, value: &str) -> bool {
        self.get(key) == Some(value)
    }

    /// Whether `key` is set to any of `values`.
    #[must_use]
    pub fn is_any(&self, key: &str, values: &[&str]) -> bool {
        self.get(key).is_some_and(|v| values.contains(&v))
    }

    /// Whether no feature is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Features {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str(UNSET);
        }
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{k}={v}")?;
        }
        Ok(())
    }
}

/// Misc column: `|`-separated entries, one of which may be `Lvl=...`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Misc(Vec<String>);

impl Misc {
    /// Parse a misc column (`SpaceAfter=No|Lvl=1,13`, or `_`).
    #[must_use]
    pub fn parse(column: &str) -> Self {
        if column == UNSET || column.is_empty() {
            return Self::default();
        }
        Self(column.split('|').map(String::from).collect())
    }

    /// Value of a `Key=Value` entry.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find_map(|entry| {
            entry
                .strip_prefix(key)
                .and_then(|rest| rest.strip_prefix('='))
        })
    }

    /// Set a `Key=Value` entry, replacing an existing one in place.
    pub fn set(&mut self, key: &str, value: &str) {
        let entry = format!("{key}={value}");
        match self.0.iter_mut().find(|e| {
            e.strip_prefix(key)
                .is_some_and(|rest| rest.starts_with('='))
        }) {
            Some(existing) => *existing = entry,
            None => self.0.push(entry),
        }
    }

    /// Raw comma-separated tokens of the level entry.
    pub fn level_tokens(&self) -> impl Iterator<Item = &str> {
        self.get(LEVEL_KEY)
            .into_iter()
            .flat_map(|value| value.split(','))
            .filter(|token| !token.is_empty())
    }

    /// Labels of the level entry; unknown tokens are ignored.
    #[must_use]
    pub fn labels(&self) -> Vec<Label> {
        self.level_tokens().filter_map(Label::parse).collect()
    }

    /// Append a label to the level entry unless the same token is present.
    ///
    /// Returns `true` if the label was added.
    pub fn push_label(&mut self, label: Label) -> bool {
        let token = label.to_string();
        if self.level_tokens().any(|t| t == token) {
            return false;
        }
        let value = match self.get(LEVEL_KEY) {
            Some(existing) if !existing.is_empty() => format!("{existing},{token}"),
            _ => token,
        };
        self.set(LEVEL_KEY, &value);
        true
    }

    /// Whether the column holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Misc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str(UNSET)
        } else {
            f.write_str(&self.0.join("|"))
        }
    }
}

/// One word of a sentence, with the ten tree-bank columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    /// 1-based position in the sentence
    pub id: usize,
    pub form: String,
    pub lemma: String,
    /// Universal part of speech
    pub upos: String,
    /// Language-specific part of speech
    pub xpos: String,
    pub feats: Features,
    /// Governing word id, 0 for the sentence root
    pub head: usize,
    pub deprel: String,
    pub deps: String,
    pub misc: Misc,
}

impl Word {
    /// Create a word with every other column unset.
    #[must_use]
    pub fn new(id: usize, form: &str, head: usize, deprel: &str) -> Self {
        Self {
            id,
            form: form.to_string(),
            lemma: UNSET.to_string(),
            upos: UNSET.to_string(),
            xpos: UNSET.to_string(),
            feats: Features::default(),
            head,
            deprel: deprel.to_string(),
            deps: UNSET.to_string(),
            misc: Misc::default(),
        }
    }

    #[must_use]
    pub fn with_lemma(mut self, lemma: &str) -> Self {
        self.lemma = lemma.to_string();
        self
    }

    #[must_use]
    pub fn with_upos(mut self, upos: &str) -> Self {
        self.upos = upos.to_string();
        self
    }

    #[must_use]
    pub fn with_xpos(mut self, xpos: &str) -> Self {
        self.xpos = xpos.to_string();
        self
    }

    #[must_use]
    pub fn with_feats(mut self, feats: &str) -> Self {
        self.feats = Features::parse(feats);
        self
    }

    #[must_use]
    pub fn with_misc(mut self, misc: &str) -> Self {
        self.misc = Misc::parse(misc);
        self
    }

    /// Whether the universal part of speech is one of `tags`.
    #[must_use]
    pub fn is_pos(&self, tags: &[&str]) -> bool {
        tags.contains(&self.upos.as_str())
    }

    /// Value of a morphological feature.
    #[must_use]
    pub fn feat(&self, key: &str) -> Option<&str> {
        self.feats.get(key)
    }
}

/// A sentence: words in reading order linked into one dependency tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    comments: Vec<String>,
    words: Vec<Word>,
    /// Multiword-token and empty-node lines, keyed by the number of words
    /// that precede them
    token_rows: Vec<(usize, String)>,
    children: Vec<Vec<usize>>,
    root: usize,
}

impl Sentence {
    /// Link words into a tree.
    ///
    /// Word ids must run 1, 2, 3, ... in order. Exactly one word may hang
    /// off the synthetic root (head 0) and it must be labelled `root`;
    /// every other word must be reachable from it.
    pub fn new(comments: Vec<String>, words: Vec<Word>) -> Result<Self, TreeError> {
        if words.is_empty() {
            return Err(TreeError::Empty);
        }
        for (idx, word) in words.iter().enumerate() {
            if word.id != idx + 1 {
                return Err(TreeError::NonContiguousIds {
                    expected: idx + 1,
                    found: word.id,
                });
            }
            if word.head > words.len() {
                return Err(TreeError::HeadOutOfRange {
                    word: word.id,
                    head: word.head,
                });
            }
        }

        let roots: Vec<usize> = words
            .iter()
            .enumerate()
            .filter(|(_, w)| w.head == 0)
            .map(|(idx, _)| idx)
            .collect();
        let root = match roots.as_slice() {
            [] => return Err(TreeError::NoRoot),
            [root] => *root,
            many => return Err(TreeError::MultipleRoots(many.len())),
        };
        if words[root].deprel != "root" {
            return Err(TreeError::RootRelation(
                words[root].id,
                words[root].deprel.clone(),
            ));
        }

        let mut children = vec![Vec::new(); words.len()];
        for (idx, word) in words.iter().enumerate() {
            if word.head > 0 {
                children[word.head - 1].push(idx);
            }
        }

        // Every word reachable from the root means no cycle.
        let mut seen = vec![false; words.len()];
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            seen[idx] = true;
            stack.extend(children[idx].iter().copied().filter(|c| !seen[*c]));
        }
        if let Some(unreached) = seen.iter().position(|s| !s) {
            return Err(TreeError::Cycle(words[unreached].id));
        }

        Ok(Self {
            comments,
            words,
            token_rows: Vec::new(),
            children,
            root,
        })
    }

    /// Attach lines that are kept verbatim but are not part of the tree.
    ///
    /// Each line is paired with the number of words before it; positions
    /// past the last word are clamped to the end.
    #[must_use]
    pub fn with_token_rows(mut self, rows: Vec<(usize, String)>) -> Self {
        let len = self.words.len();
        self.token_rows = rows
            .into_iter()
            .map(|(position, line)| (position.min(len), line))
            .collect();
        self
    }

    /// Multiword-token and empty-node lines with their positions.
    #[must_use]
    pub fn token_rows(&self) -> &[(usize, String)] {
        &self.token_rows
    }

    /// Comment lines, `#` included.
    #[must_use]
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Words in reading order.
    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Word at a 0-based index.
    #[must_use]
    pub fn word(&self, idx: usize) -> &Word {
        &self.words[idx]
    }

    /// Number of words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Index of the root word.
    #[must_use]
    pub fn root(&self) -> usize {
        self.root
    }

    #[must_use]
    pub fn root_word(&self) -> &Word {
        &self.words[self.root]
    }

    /// First word in reading order.
    #[must_use]
    pub fn first_word(&self) -> &Word {
        &self.words[0]
    }

    /// Governor of a word, `None` for the root word.
    #[must_use]
    pub fn parent(&self, idx: usize) -> Option<usize> {
        match self.words[idx].head {
            0 => None,
            head => Some(head - 1),
        }
    }

    /// Direct dependents in reading order.
    #[must_use]
    pub fn children(&self, idx: usize) -> &[usize] {
        &self.children[idx]
    }

    /// Transitive dependents in reading order.
    #[must_use]
    pub fn descendants(&self, idx: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.children[idx].clone();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend_from_slice(&self.children[next]);
        }
        out.sort_unstable();
        out
    }

    /// Other dependents of the same governor, in reading order.
    #[must_use]
    pub fn siblings(&self, idx: usize) -> Vec<usize> {
        self.parent(idx)
            .map(|p| {
                self.children[p]
                    .iter()
                    .copied()
                    .filter(|c| *c != idx)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// How many of `nodes` carry relation `deprel`.
    #[must_use]
    pub fn count_relation(&self, nodes: &[usize], deprel: &str) -> usize {
        nodes
            .iter()
            .filter(|idx| self.words[**idx].deprel == deprel)
            .count()
    }

    /// Distinct values of a feature across `nodes`.
    #[must_use]
    pub fn feature_values(&self, nodes: &[usize], key: &str) -> BTreeSet<&str> {
        nodes
            .iter()
            .filter_map(|idx| self.words[*idx].feats.get(key))
            .collect()
    }

    /// Lemmas of all words in reading order.
    pub fn lemmas(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|w| w.lemma.as_str())
    }

    /// Surface forms of all words in reading order.
    pub fn forms(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|w| w.form.as_str())
    }

    /// Comment line used as the sentence identifier.
    ///
    /// The first comment, or the second when the first opens a new
    /// document.
    #[must_use]
    pub fn id_line(&self) -> Option<&str> {
        self.comments.get(self.meta_offset()).map(String::as_str)
    }

    /// Comment line holding the source text.
    #[must_use]
    pub fn text_line(&self) -> Option<&str> {
        self.comments
            .get(self.meta_offset() + 1)
            .map(String::as_str)
    }

    /// Bare identifier from a `# sent_id = ...` line.
    #[must_use]
    pub fn sent_id(&self) -> Option<&str> {
        self.id_line().map(|line| {
            line.trim_start_matches('#')
                .trim()
                .strip_prefix("sent_id")
                .map(|rest| rest.trim_start().trim_start_matches('=').trim())
                .unwrap_or(line)
        })
    }

    fn meta_offset(&self) -> usize {
        usize::from(
            self.comments
                .first()
                .is_some_and(|c| c.contains("newdoc")),
        )
    }

    /// Log address of a word, `sent_id#word_id`.
    #[must_use]
    pub fn address(&self, idx: usize) -> String {
        format!("{}#{}", self.sent_id().unwrap_or("?"), self.words[idx].id)
    }

    /// Labels on a word.
    #[must_use]
    pub fn labels(&self, idx: usize) -> Vec<Label> {
        self.words[idx].misc.labels()
    }

    /// Add a label to a word; `false` if it was already there.
    pub fn push_label(&mut self, idx: usize, label: Label) -> bool {
        self.words[idx].misc.push_label(label)
    }
}
