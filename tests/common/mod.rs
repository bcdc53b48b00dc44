/*!
 * Common test utilities for the ebt-translator test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use ebt_translator::providers::mock::MockEngine;
use ebt_translator::quotes::resolve;
use ebt_translator::translation::{Segment, SegmentTranslator};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Sample segment document with quotations spanning segments
pub fn sample_segments_json() -> &'static str {
    r#"{
  "mn1:1.1": "So I have heard. ",
  "mn1:1.2": "The Buddha said, “Mendicants, ",
  "mn1:1.3": "I will teach you ‘the root of all things’.” ",
  "mn1:1.4": ""
}"#
}

pub fn segments(items: &[(&str, &str)]) -> Vec<Segment> {
    items.iter().map(|(scid, text)| Segment::new(*scid, *text)).collect()
}

pub fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Translator between two built-in conventions over `engine`
pub fn translator(engine: MockEngine, src: &str, dst: &str) -> SegmentTranslator<MockEngine> {
    SegmentTranslator::new(
        engine,
        src,
        dst,
        resolve(src).expect("source convention"),
        resolve(dst).expect("target convention"),
    )
    .expect("translator")
}
