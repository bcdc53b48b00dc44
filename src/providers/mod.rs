/*!
 * Translation engine clients.
 *
 * This module contains the engine abstraction used by the segment pipeline:
 * - DeepL: the DeepL REST API
 * - Mock: an offline engine for tests and dry runs
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all translation engines
///
/// Engines translate a batch of texts in one request and must return exactly
/// one text per input, in input order.
#[async_trait]
pub trait TranslationEngine: Send + Sync + Debug {
    /// Translate `texts` from `source_lang` to `target_lang`
    ///
    /// Language arguments are segment language tags (e.g. "en", "pt-br");
    /// each engine maps them to its own codes.
    async fn translate_batch(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, ProviderError>;

    /// Use the glossary with `glossary_id` for later requests
    fn set_glossary(&mut self, glossary_id: Option<String>);
}

/// A glossary stored by an engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryInfo {
    pub glossary_id: String,
    pub name: String,
    #[serde(default)]
    pub source_lang: String,
    #[serde(default)]
    pub target_lang: String,
    #[serde(default)]
    pub entry_count: usize,
}

/// Engine-side glossary storage
#[async_trait]
pub trait GlossaryProvider: Send + Sync + Debug {
    async fn list_glossaries(&self) -> Result<Vec<GlossaryInfo>, ProviderError>;

    async fn delete_glossary(&self, glossary_id: &str) -> Result<(), ProviderError>;

    async fn create_glossary(
        &self,
        name: &str,
        source_lang: &str,
        target_lang: &str,
        entries: &BTreeMap<String, String>,
    ) -> Result<GlossaryInfo, ProviderError>;
}

pub mod deepl;
pub mod mock;
