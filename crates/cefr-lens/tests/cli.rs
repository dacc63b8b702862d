//! End-to-end CLI integration tests
//!
//! These tests invoke the compiled binary as a subprocess to verify
//! that the CLI behaves correctly from a user's perspective.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Returns a Command configured to run our binary.
///
/// Note: `cargo_bin` is marked deprecated for edge cases involving custom
/// cargo build directories, but works correctly for standard project layouts.
#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

const LEXICON: &str = "\
headword,pos,CEFR
the,determiner,A1
cat,noun,A1
sit,verb,A1
on,preposition,A1
go,verb,A1
to,preposition,A1
a.m./A.M./am/AM,adverb,A2
am,verb,B1
mat,noun,B1
quiet,adjective,B1
elaborate,adjective,C1
meticulous,adjective,C2
";

/// A temp dir holding a lexicon and a text file.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new(text: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("lexicon.csv"), LEXICON).unwrap();
        fs::write(dir.path().join("story.txt"), text).unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn lexicon(&self) -> String {
        self.file("lexicon.csv").to_str().unwrap().to_string()
    }

    fn story(&self) -> String {
        self.file("story.txt").to_str().unwrap().to_string()
    }

    fn analyze_json(&self, extra: &[&str]) -> Value {
        let output = cmd()
            .args(["analyze", &self.story(), "--lexicon", &self.lexicon(), "--json"])
            .args(extra)
            .output()
            .expect("failed to run command");
        assert!(
            output.status.success(),
            "command failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("invalid JSON output")
    }
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_shows_usage() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("lookup"));
}

#[test]
fn version_flag_shows_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_only_prints_bare_version() {
    cmd()
        .arg("--version-only")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "{}\n",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn no_arguments_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn long_help_lists_environment_variables() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("CEFR_LENS_LOG_PATH"));
}

// =============================================================================
// Analyze Command
// =============================================================================

#[test]
fn analyze_json_report_shape() {
    let fx = Fixture::new("The cat sat on the mat.");
    let json = fx.analyze_json(&[]);

    assert_eq!(json["totalWords"], 6);
    assert_eq!(json["uniqueWords"], 5);
    assert_eq!(json["knownWordsCount"], 6);
    assert_eq!(json["unknownWordsCount"], 0);
    assert_eq!(json["distribution"]["A1"]["count"], 5);
    assert_eq!(json["distribution"]["B1"]["count"], 1);
    assert_eq!(json["distribution"]["Unknown"]["count"], 0);
    assert_eq!(json["primaryLevel"], "A1");
    assert_eq!(json["cefrDictionarySize"], 12);
    assert!(json["sampleUnknownWords"].as_array().unwrap().is_empty());
}

#[test]
fn analyze_excludes_proper_names() {
    let fx = Fixture::new("The cat saw John Smith. We go to New York.");
    let json = fx.analyze_json(&[]);

    let unknown: Vec<&str> = json["sampleUnknownWords"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(!unknown.contains(&"john"));
    assert!(!unknown.contains(&"york"));
}

#[test]
fn analyze_empty_file_is_zero_report() {
    let fx = Fixture::new("");
    let json = fx.analyze_json(&[]);

    assert_eq!(json["totalWords"], 0);
    assert_eq!(json["difficultyScore"], 0.0);
    assert_eq!(json["primaryLevel"], "A1");
    assert_eq!(json["distribution"]["A1"]["percentage"], 0.0);
}

#[test]
fn analyze_sample_size_flag() {
    let fx = Fixture::new("zebra yak xenon walrus vortex");
    let json = fx.analyze_json(&["--sample-size", "2"]);

    assert_eq!(json["unknownWordsCount"], 5);
    assert_eq!(
        json["sampleUnknownWords"],
        serde_json::json!(["vortex", "walrus"])
    );
}

#[test]
fn analyze_text_output_shows_summary() {
    let fx = Fixture::new("The meticulous cat sat on the mat.");
    cmd()
        .args(["analyze", &fx.story(), "--lexicon", &fx.lexicon()])
        .args(["--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Primary level:"))
        .stdout(predicate::str::contains("Distribution:"))
        .stdout(predicate::str::contains("Unknown"));
}

#[test]
fn analyze_max_level_gate_fails() {
    let fx = Fixture::new("meticulous elaborate");
    cmd()
        .args(["analyze", &fx.story(), "--lexicon", &fx.lexicon()])
        .args(["--max-level", "B1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max: B1"));
}

#[test]
fn analyze_max_level_gate_passes() {
    let fx = Fixture::new("The cat sat on the mat.");
    cmd()
        .args(["analyze", &fx.story(), "--lexicon", &fx.lexicon()])
        .args(["--max-level", "B1", "--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS:"));
}

#[test]
fn analyze_gate_in_json_mode_prints_only_the_report() {
    let fx = Fixture::new("meticulous");
    let output = cmd()
        .args(["analyze", &fx.story(), "--lexicon", &fx.lexicon(), "--json"])
        .args(["--max-level", "a2"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("single JSON document");
    assert_eq!(json["primaryLevel"], "C2");
    assert_eq!(json["withinMaxLevel"], false);
    assert!(json.get("error").is_none());
}

#[test]
fn analyze_pre_annotated_document() {
    let fx = Fixture::new("");
    let doc = r#"{
        "tokens": [
            {"text": "Alice", "lemma": "Alice"},
            {"text": "sat", "lemma": "sit"},
            {"text": "on", "lemma": "on"},
            {"text": "3", "lemma": "3", "is_digit": true, "like_num": true},
            {"text": "mats", "lemma": "mat"},
            {"text": ".", "is_punct": true}
        ],
        "entities": [{"label": "PERSON", "start": 0, "end": 1}]
    }"#;
    fs::write(fx.file("doc.json"), doc).unwrap();

    let output = cmd()
        .args(["analyze", fx.file("doc.json").to_str().unwrap()])
        .args(["--lexicon", &fx.lexicon(), "--annotations", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["totalWords"], 3);
    assert_eq!(json["distribution"]["B1"]["count"], 1);
}

#[test]
fn analyze_rejects_out_of_range_entity() {
    let fx = Fixture::new("");
    fs::write(
        fx.file("doc.json"),
        r#"{"tokens": [{"text": "a"}], "entities": [{"label": "GPE", "start": 0, "end": 5}]}"#,
    )
    .unwrap();

    cmd()
        .args(["analyze", fx.file("doc.json").to_str().unwrap()])
        .args(["--lexicon", &fx.lexicon(), "--annotations"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to annotate"));
}

#[test]
fn analyze_missing_lexicon_json_error() {
    let fx = Fixture::new("The cat.");
    let missing = fx.file("nope.csv");
    let output = cmd()
        .args(["analyze", &fx.story(), "--json"])
        .args(["--lexicon", missing.to_str().unwrap()])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("error JSON");
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .contains("CEFR vocabulary file not found")
    );
}

#[test]
fn analyze_missing_input_file_fails() {
    let fx = Fixture::new("");
    cmd()
        .args(["analyze", fx.file("absent.txt").to_str().unwrap()])
        .args(["--lexicon", &fx.lexicon()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn analyze_lexicon_missing_column_fails() {
    let fx = Fixture::new("The cat.");
    fs::write(fx.file("bad.csv"), "word,level\ncat,A1\n").unwrap();
    cmd()
        .args(["analyze", &fx.story(), "--lexicon", fx.file("bad.csv").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("headword"));
}

#[test]
fn analyze_finds_lexicon_in_resources_folder() {
    let fx = Fixture::new("The cat sat.");
    fs::create_dir(fx.file("resources")).unwrap();
    fs::write(
        fx.file("resources").join("cefrj-vocabulary-profile-1.5.csv"),
        LEXICON,
    )
    .unwrap();

    let output = cmd()
        .args(["-C", fx.path().to_str().unwrap(), "analyze", "story.txt", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["totalWords"], 3);
}

#[test]
fn analyze_respects_input_limit() {
    let fx = Fixture::new(&"cat ".repeat(100));
    fs::write(fx.file(".cefr-lens.toml"), "max_input_bytes = 16\n").unwrap();

    cmd()
        .args(["-C", fx.path().to_str().unwrap(), "analyze", "story.txt"])
        .args(["--lexicon", "lexicon.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("input too large"));
}

#[test]
fn analyze_is_deterministic() {
    let fx = Fixture::new("The quiet cat sat on an elaborate mat at 9 a.m. yesterday.");
    assert_eq!(fx.analyze_json(&[]), fx.analyze_json(&[]));
}

// =============================================================================
// Lookup Command
// =============================================================================

#[test]
fn lookup_json_reports_levels() {
    let fx = Fixture::new("");
    let output = cmd()
        .args(["lookup", "Cat", "AM", "running", "zyzzyva", "--json"])
        .args(["--lexicon", &fx.lexicon()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["level"], "A1");
    // First-seen wins: "am" keeps A2 from the a.m. row.
    assert_eq!(json[1]["level"], "A2");
    assert!(json[3]["level"].is_null());
}

#[test]
fn lookup_text_output() {
    let fx = Fixture::new("");
    cmd()
        .args(["lookup", "meticulous", "--color", "never"])
        .args(["--lexicon", &fx.lexicon()])
        .assert()
        .success()
        .stdout(predicate::str::contains("meticulous"))
        .stdout(predicate::str::contains("C2"));
}

#[test]
fn lookup_requires_words() {
    cmd().arg("lookup").assert().failure();
}

// =============================================================================
// Info Command
// =============================================================================

#[test]
fn info_shows_package_name_and_version() {
    let fx = Fixture::new("");
    cmd()
        .args(["-C", fx.path().to_str().unwrap(), "info", "--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_NAME")))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn info_json_reports_lexicon_breakdown() {
    let fx = Fixture::new("");
    fs::write(fx.file("cefr-lens.toml"), "lexicon = \"lexicon.csv\"\n").unwrap();

    let output = cmd()
        .args(["-C", fx.path().to_str().unwrap(), "info", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
    assert_eq!(json["lexicon"]["size"], 12);
    assert_eq!(json["lexicon"]["levels"][0]["level"], "A1");
    assert_eq!(json["lexicon"]["levels"][0]["words"], 6);
}
