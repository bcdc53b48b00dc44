/*!
 * Engine glossaries.
 *
 * Glossaries are kept locally as `.kvg` files, one `key|value` pair per
 * line, named after the language pair and the translation author. Uploading
 * replaces every remote glossary with the same name.
 */

use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::errors::{GlossaryError, TranslationError};
use crate::language_utils::base_language;
use crate::providers::{GlossaryInfo, GlossaryProvider, TranslationEngine};

/// Glossary name for a language pair and author
pub fn glossary_name(source_lang: &str, target_lang: &str, author: &str) -> String {
    format!(
        "ebt_{}_{}_{}",
        base_language(source_lang),
        base_language(target_lang),
        author
    )
    .to_lowercase()
}

/// Parse `.kvg` content into glossary entries
pub fn parse_kvg(content: &str) -> Result<BTreeMap<String, String>, GlossaryError> {
    let mut entries = BTreeMap::new();

    for line in content.lines() {
        let mut parts = line.split('|');
        let key = parts.next().unwrap_or_default().trim();
        let value = parts.next().unwrap_or_default().trim();

        match (key.is_empty(), value.is_empty()) {
            (true, true) => continue,
            (false, true) => {
                return Err(GlossaryError::MissingValue { key: key.to_string() });
            }
            (true, false) => {
                return Err(GlossaryError::MissingKey { value: value.to_string() });
            }
            (false, false) => {
                entries.insert(key.to_string(), value.to_string());
            }
        }
    }

    Ok(entries)
}

/// Read a `.kvg` file; `None` when the file does not exist
pub fn read_kvg(path: &Path) -> Result<Option<BTreeMap<String, String>>, GlossaryError> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_kvg(&content).map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Finds and uploads glossaries for one language pair
#[derive(Debug, Clone)]
pub struct GlossaryManager {
    directory: PathBuf,
    source_lang: String,
    target_lang: String,
    name: String,
}

impl GlossaryManager {
    pub fn new(
        directory: impl Into<PathBuf>,
        source_lang: &str,
        target_lang: &str,
        author: &str,
    ) -> Self {
        Self {
            directory: directory.into(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            name: glossary_name(source_lang, target_lang, author),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local glossary file
    pub fn path(&self) -> PathBuf {
        self.directory.join(format!("{}.kvg", self.name))
    }

    /// Remote glossary with this manager's name, the last one listed if several
    pub async fn find<P>(&self, provider: &P) -> Result<Option<GlossaryInfo>, TranslationError>
    where
        P: GlossaryProvider + ?Sized,
    {
        let glossaries = provider.list_glossaries().await?;
        let found = glossaries.into_iter().rev().find(|g| g.name == self.name);
        match &found {
            Some(g) => debug!("Using glossary {} ({})", g.name, g.glossary_id),
            None => debug!("No glossary named {}", self.name),
        }
        Ok(found)
    }

    /// Replace the remote glossary with the local `.kvg` file.
    ///
    /// Returns `None` when the local file is missing or has no entries; the
    /// old remote glossaries are deleted either way.
    pub async fn upload<P>(&self, provider: &P) -> Result<Option<GlossaryInfo>, TranslationError>
    where
        P: GlossaryProvider + ?Sized,
    {
        for g in provider.list_glossaries().await? {
            if g.name == self.name {
                debug!("Deleting glossary {}", g.glossary_id);
                provider.delete_glossary(&g.glossary_id).await?;
            }
        }

        let path = self.path();
        let Some(entries) = read_kvg(&path)? else {
            warn!("No glossary found: {:?}", path);
            return Ok(None);
        };
        if entries.is_empty() {
            warn!("Glossary is empty: {:?}", path);
            return Ok(None);
        }

        info!("Uploading glossary {} ({} entries)", self.name, entries.len());
        let created = provider
            .create_glossary(&self.name, &self.source_lang, &self.target_lang, &entries)
            .await?;
        Ok(Some(created))
    }

    /// Point `engine` at this manager's glossary, uploading it first when
    /// `update` is set
    pub async fn attach<E>(
        &self,
        engine: &mut E,
        update: bool,
    ) -> Result<Option<GlossaryInfo>, TranslationError>
    where
        E: TranslationEngine + GlossaryProvider,
    {
        let glossary = if update {
            self.upload(&*engine).await?
        } else {
            self.find(&*engine).await?
        };
        engine.set_glossary(glossary.as_ref().map(|g| g.glossary_id.clone()));
        Ok(glossary)
    }
}
