//! Run counters and the end-of-corpus summary report.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::types::{ExclusionReason, Label};

/// Frequency counters for one run.
///
/// Mutated only by the thread driving classification; [`Stats::take_report`]
/// resets them between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    labels: HashMap<Label, usize>,
    reasons: HashMap<ExclusionReason, usize>,
    sentences: usize,
    malformed: usize,
}

impl Stats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one label assignment.
    pub fn record_label(&mut self, label: Label) {
        *self.labels.entry(label).or_insert(0) += 1;
    }

    /// Count one exclusion, under its reason and its tier label.
    pub fn record_exclusion(&mut self, reason: ExclusionReason) {
        *self.reasons.entry(reason).or_insert(0) += 1;
        self.record_label(Label::Excluded(reason.tier()));
    }

    /// Count one sentence seen by the classifier.
    pub fn record_sentence(&mut self) {
        self.sentences += 1;
    }

    /// Count one sentence skipped as a malformed tree.
    pub fn record_malformed(&mut self) {
        self.malformed += 1;
    }

    /// Count for a label.
    #[must_use]
    pub fn label_count(&self, label: Label) -> usize {
        self.labels.get(&label).copied().unwrap_or(0)
    }

    /// Count for an exclusion reason.
    #[must_use]
    pub fn reason_count(&self, reason: ExclusionReason) -> usize {
        self.reasons.get(&reason).copied().unwrap_or(0)
    }

    /// Build the report and reset the counters.
    pub fn take_report(&mut self, title: &str) -> Report {
        let report = Report::from_stats(title, self);
        *self = Self::default();
        report
    }
}

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub label: String,
    pub count: usize,
}

/// Summary of one run: label counts sorted by (count, label).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub title: String,
    pub labels: Vec<ReportEntry>,
    pub total: usize,
    pub exclusions: Vec<ReportEntry>,
    pub sentences: usize,
    pub malformed: usize,
}

impl Report {
    fn from_stats(title: &str, stats: &Stats) -> Self {
        let labels = sorted_entries(stats.labels.iter().map(|(l, c)| (l.to_string(), *c)));
        let exclusions =
            sorted_entries(stats.reasons.iter().map(|(r, c)| (r.as_str().to_string(), *c)));
        Self {
            title: title.to_string(),
            total: labels.iter().map(|e| e.count).sum(),
            labels,
            exclusions,
            sentences: stats.sentences,
            malformed: stats.malformed,
        }
    }

    /// Count for a label code, 0 if absent.
    #[must_use]
    pub fn count(&self, label: &str) -> usize {
        self.labels
            .iter()
            .find(|e| e.label == label)
            .map_or(0, |e| e.count)
    }

    /// Pretty-printed JSON form of the report.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn sorted_entries(items: impl Iterator<Item = (String, usize)>) -> Vec<ReportEntry> {
    let mut entries: Vec<ReportEntry> = items
        .map(|(label, count)| ReportEntry { label, count })
        .collect();
    entries.sort_by(|a, b| a.count.cmp(&b.count).then_with(|| a.label.cmp(&b.label)));
    entries
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Overview:", self.title)?;
        for entry in &self.labels {
            write!(f, "\n{:>20} {:>10}", entry.label, entry.count)?;
        }
        writeln!(f, "\n{:>20} {:>10}", "TOTAL", self.total)?;
        if !self.exclusions.is_empty() {
            write!(f, "Exclusion reasons:")?;
            for entry in &self.exclusions {
                write!(f, "\n{:>40} {:>10}", entry.label, entry.count)?;
            }
            writeln!(f)?;
        }
        if self.malformed > 0 {
            writeln!(f, "Malformed sentences skipped: {}", self.malformed)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Level;
    use pretty_assertions::assert_eq;

    fn level(code: u8) -> Label {
        Label::Level(Level::new(code).unwrap())
    }

    #[test]
    fn test_entries_sorted_by_count_then_label() {
        let mut stats = Stats::new();
        stats.record_label(level(4));
        stats.record_label(level(13));
        stats.record_label(level(1));
        stats.record_label(level(13));
        stats.record_exclusion(ExclusionReason::TooShort);

        let report = stats.take_report("Levelmark");
        let order: Vec<&str> = report.labels.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(order, vec!["1", "4", "Not", "13"]);
        assert_eq!(report.total, 5);
        assert_eq!(report.count("13"), 2);
    }

    #[test]
    fn test_take_report_resets() {
        let mut stats = Stats::new();
        stats.record_exclusion(ExclusionReason::TooManyVerbs);
        let first = stats.take_report("run");
        assert_eq!(first.count("NotTrv"), 1);
        assert_eq!(stats, Stats::new());
    }

    #[test]
    fn test_to_json() {
        let mut stats = Stats::new();
        stats.record_sentence();
        stats.record_label(level(13));
        let json: serde_json::Value =
            serde_json::from_str(&stats.take_report("MarkLevels").to_json().unwrap()).unwrap();

        assert_eq!(json["title"], "MarkLevels");
        assert_eq!(json["sentences"], 1);
        assert_eq!(json["labels"][0]["label"], "13");
        assert_eq!(json["total"], 1);
    }

    #[test]
    fn test_display_format() {
        let mut stats = Stats::new();
        stats.record_label(level(1));
        stats.record_label(level(13));
        let report = stats.take_report("Levelmark");
        assert_eq!(
            report.to_string(),
            format!(
                "Levelmark Overview:\n{:>20} {:>10}\n{:>20} {:>10}\n{:>20} {:>10}\n",
                "1", 1, "13", 1, "TOTAL", 2
            )
        );
    }
}
