//! End-to-end tests: mark a tree bank, then divide it by level.
//!
//! Library tests run the engine and the partition in process; the
//! command tests drive the `levelmark` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use levelmark_engine::{conllu, Classifier, Level, LexicalResources, NoSynthesizer};
use levelmark_partitioner::{level_file_name, LevelPartition};
use pretty_assertions::assert_eq;
use predicates::prelude::*;

const DOG_RUNS: &str = "\
# sent_id = s1
# text = Koer jooksis pargis.
1\tKoer\tkoer\tNOUN\tS\tCase=Nom|Number=Sing\t2\tnsubj\t_\t_
2\tjooksis\tjooksma\tVERB\tV\tMood=Ind|Tense=Past|VerbForm=Fin\t0\troot\t_\t_
3\tpargis\tpark\tNOUN\tS\tCase=Ine|Number=Sing\t2\tobl\t_\tSpaceAfter=No
4\t.\t.\tPUNCT\tZ\t_\t2\tpunct\t_\t_
";

const TWO_VERBS: &str = "\
# sent_id = s2
# text = Ta tahab minna ujuma.
1\tTa\ttema\tPRON\tP\tCase=Nom\t2\tnsubj\t_\t_
2\ttahab\ttahtma\tVERB\tV\tVerbForm=Fin\t0\troot\t_\t_
3\tminna\tminema\tVERB\tV\tVerbForm=Inf\t2\txcomp\t_\t_
4\tujuma\tujuma\tVERB\tV\tVerbForm=Sup\t3\txcomp\t_\tSpaceAfter=No
5\t.\t.\tPUNCT\tZ\t_\t2\tpunct\t_\t_
";

fn level(code: u8) -> Level {
    Level::new(code).unwrap()
}

/// Classify `text` and return the marked document.
fn mark(text: &str) -> String {
    let resources = LexicalResources::from_lists(["kurat"], ["ka"]);
    let mut classifier = Classifier::new(&resources, &NoSynthesizer);
    let (sentences, _report) = classifier.classify(conllu::parse_document(text));

    let mut out = Vec::new();
    conllu::write_document(&mut out, &sentences).unwrap();
    String::from_utf8(out).unwrap()
}

fn write_resources(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let blacklist = dir.join("inappropriate_words.txt");
    let adverbs = dir.join("unsuitable_adverbials.txt");
    fs::write(&blacklist, "kurat\tpask\n").unwrap();
    fs::write(&adverbs, "ka\naga\n").unwrap();
    (blacklist, adverbs)
}

// =============================================================================
// Library round trip
// =============================================================================

#[test]
fn test_mark_then_divide_round_trip() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let marked = mark(&[DOG_RUNS, TWO_VERBS].join("\n"));
    fs::write(input.path().join("marked.conllu"), marked).unwrap();

    let mut partition = LevelPartition::new();
    for path in levelmark_partitioner::collect_files(input.path()).unwrap() {
        partition.add_file(&path).unwrap();
    }
    let written = partition.write_all(output.path()).unwrap();

    let levels: Vec<u8> = written.iter().map(|w| w.level.code()).collect();
    assert_eq!(levels, vec![1, 4, 13]);
    assert_eq!(partition.excluded(), 1);

    let text = fs::read_to_string(output.path().join(level_file_name(level(4)))).unwrap();
    let parsed: Vec<_> = conllu::parse_document(&text)
        .into_iter()
        .map(Result::unwrap)
        .collect();
    assert_eq!(parsed.len(), 1);

    let s = &parsed[0];
    assert_eq!(s.id_line(), Some("# sent_id = s1"));
    assert_eq!(s.text_line(), Some("# text = Koer jooksis pargis."));
    assert_eq!(s.len(), 4);
    let deprels: Vec<&str> = s.words().iter().map(|w| w.deprel.as_str()).collect();
    assert_eq!(deprels, vec!["nsubj", "root", "obl", "punct"]);
    let miscs: Vec<String> = s.words().iter().map(|w| w.misc.to_string()).collect();
    assert_eq!(miscs, vec!["_", "_", "Lvl=4", "_"]);
}

#[test]
fn test_umbrella_corpus_marks_every_levelled_word() {
    let mut partition = LevelPartition::new();
    partition.add_document(&mark(DOG_RUNS));

    let mut out = Vec::new();
    partition.write_level(&mut out, Level::UMBRELLA).unwrap();
    let text = String::from_utf8(out).unwrap();

    let miscs: Vec<&str> = text
        .lines()
        .filter(|l| !l.starts_with('#') && !l.is_empty())
        .filter_map(|l| l.split('\t').nth(9))
        .collect();
    assert_eq!(miscs, vec!["Lvl=13", "Lvl=13", "Lvl=13", "_"]);
}

#[test]
fn test_repeated_sentence_written_once() {
    let input = tempfile::tempdir().unwrap();
    let marked = mark(DOG_RUNS);
    fs::write(input.path().join("a.conllu"), &marked).unwrap();
    fs::create_dir(input.path().join("nested")).unwrap();
    fs::write(input.path().join("nested").join("b.conllu"), &marked).unwrap();

    let mut partition = LevelPartition::new();
    for path in levelmark_partitioner::collect_files(input.path()).unwrap() {
        partition.add_file(&path).unwrap();
    }

    assert_eq!(partition.bucket_len(level(4)), 1);
    assert_eq!(partition.bucket_len(Level::UMBRELLA), 1);
    assert_eq!(partition.duplicates(), 3);
}

// =============================================================================
// Binary
// =============================================================================

#[test]
fn test_divide_missing_folder_fails() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("levelmark")
        .unwrap()
        .arg("divide")
        .arg(dir.path().join("missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input directory not found"));
}

#[test]
fn test_divide_writes_level_files() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::write(input.path().join("marked.conllu"), mark(DOG_RUNS)).unwrap();

    Command::cargo_bin("levelmark")
        .unwrap()
        .arg("divide")
        .arg(input.path())
        .arg("--output")
        .arg(output.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("level_4.conllu"));

    for code in [1, 4, 13] {
        assert!(output.path().join(level_file_name(level(code))).is_file());
    }
    assert!(!output.path().join("level_2.conllu").exists());
}

#[test]
fn test_mark_writes_output_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let (blacklist, adverbs) = write_resources(dir.path());
    let input = dir.path().join("corpus.conllu");
    let output = dir.path().join("marked.conllu");
    let report = dir.path().join("report.json");
    fs::write(&input, DOG_RUNS).unwrap();

    Command::cargo_bin("levelmark")
        .unwrap()
        .arg("mark")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--blacklist")
        .arg(&blacklist)
        .arg("--adverbs")
        .arg(&adverbs)
        .arg("--report")
        .arg(&report)
        .assert()
        .success();

    let marked = fs::read_to_string(&output).unwrap();
    assert!(marked.contains("SpaceAfter=No|Lvl=4,13"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["title"], "MarkLevels");
    assert_eq!(json["sentences"], 1);
}

#[test]
fn test_mark_missing_resource_fails() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("levelmark")
        .unwrap()
        .arg("mark")
        .arg("--blacklist")
        .arg(dir.path().join("missing.txt"))
        .write_stdin(DOG_RUNS)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load resource"));
}
