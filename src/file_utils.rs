use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::translation::Segment;

// @module: Segment document files

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Read a segment document: a JSON object of scid -> text, in file order
    pub fn read_segments<P: AsRef<Path>>(path: P) -> Result<Vec<Segment>> {
        let path = path.as_ref();
        let content = Self::read_to_string(path)?;
        let doc: Map<String, Value> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse segment file: {:?}", path))?;

        doc.into_iter()
            .map(|(scid, value)| match value {
                Value::String(text) => Ok(Segment { scid, text }),
                other => Err(anyhow!("Segment {} is not text: {}", scid, other)),
            })
            .collect()
    }

    /// Serialize segments as a pretty JSON object in segment order
    pub fn segments_to_json(segments: &[Segment]) -> Result<String> {
        let doc: Map<String, Value> = segments
            .iter()
            .map(|s| (s.scid.clone(), Value::String(s.text.clone())))
            .collect();
        serde_json::to_string_pretty(&doc).context("Failed to serialize segments")
    }

    /// Write a segment document.
    ///
    /// Returns false and leaves the file alone when it exists and `replace`
    /// is not set.
    pub fn write_segments<P: AsRef<Path>>(path: P, segments: &[Segment], replace: bool) -> Result<bool> {
        let path = path.as_ref();
        if path.exists() && !replace {
            warn!("Output file already exists: {:?}. Use --dst-replace to overwrite.", path);
            return Ok(false);
        }

        let json = Self::segments_to_json(segments)?;
        Self::write_to_file(path, &(json + "\n"))?;
        debug!("Wrote {} segments to {:?}", segments.len(), path);
        Ok(true)
    }

    // @generates: Translation path next to the source in a bilara-style tree
    // @params: source path, source language/author, target language/author
    pub fn translation_path<P: AsRef<Path>>(
        src_path: P,
        src_lang: &str,
        src_author: &str,
        dst_lang: &str,
        dst_author: &str,
    ) -> PathBuf {
        let src = src_path.as_ref().to_string_lossy().to_string();
        let dst_dir = format!("translation/{}/{}/", dst_lang, dst_author);
        let dst_suffix = format!("_translation-{}-{}", dst_lang, dst_author);

        let dst = src
            .replace(&format!("root/{}/{}/", src_lang, src_author), &dst_dir)
            .replace(&format!("_root-{}-{}", src_lang, src_author), &dst_suffix)
            .replace(&format!("/{}/{}/", src_lang, src_author), &format!("/{}/{}/", dst_lang, dst_author))
            .replace(&format!("_translation-{}-{}", src_lang, src_author), &dst_suffix);

        if dst != src {
            return PathBuf::from(dst);
        }

        let src_path = src_path.as_ref();
        let stem = src_path.file_stem().unwrap_or_default().to_string_lossy();
        let parent = src_path.parent().unwrap_or(Path::new(""));
        parent.join(format!("{}{}.json", stem, dst_suffix))
    }
}
