/*!
 * Mock engine for tests and offline runs.
 *
 * This module provides an engine that simulates different behaviors:
 * - `MockEngine::echo()` - returns every text unchanged
 * - `MockEngine::dictionary(..)` - replaces known phrases, echoes the rest
 * - `MockEngine::lossy()` - drops a marker close tag at the very end of a
 *   text, as engines sometimes do
 * - `MockEngine::failing()` - always fails with an error
 *
 * It also keeps an in-memory glossary store.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::language_utils::base_language;
use crate::quotes::convention::MARKER_CLOSE;

use super::{GlossaryInfo, GlossaryProvider, TranslationEngine};

/// Behavior mode for the mock engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Returns texts unchanged apart from dictionary phrases
    Echo,
    /// Like `Echo`, then strips a trailing marker close tag
    Lossy,
    /// Returns one text fewer than it was given
    Short,
    /// Always fails with an error
    Failing,
}

/// A request the mock engine received
#[derive(Debug, Clone, PartialEq)]
pub struct MockRequest {
    pub texts: Vec<String>,
    pub source_lang: String,
    pub target_lang: String,
    pub glossary_id: Option<String>,
}

/// Mock engine for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockEngine {
    behavior: MockBehavior,
    /// Phrase replacements, applied in insertion order
    phrases: Vec<(String, String)>,
    glossary_id: Option<String>,
    requests: Arc<Mutex<Vec<MockRequest>>>,
    glossaries: Arc<Mutex<Vec<(GlossaryInfo, BTreeMap<String, String>)>>>,
    next_id: Arc<AtomicUsize>,
}

impl MockEngine {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            phrases: Vec::new(),
            glossary_id: None,
            requests: Arc::new(Mutex::new(Vec::new())),
            glossaries: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicUsize::new(1)),
        }
    }

    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    /// Echo engine that replaces each known phrase with its translation
    pub fn dictionary<I, K, V>(phrases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::echo().with_phrases(phrases)
    }

    pub fn lossy() -> Self {
        Self::new(MockBehavior::Lossy)
    }

    pub fn short() -> Self {
        Self::new(MockBehavior::Short)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn with_phrases<I, K, V>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.phrases
            .extend(phrases.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Requests received so far, shared between clones
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().clone()
    }

    pub fn glossary_id(&self) -> Option<&str> {
        self.glossary_id.as_deref()
    }

    /// Entries of a stored glossary
    pub fn glossary_entries(&self, glossary_id: &str) -> Option<BTreeMap<String, String>> {
        self.glossaries
            .lock()
            .iter()
            .find(|(info, _)| info.glossary_id == glossary_id)
            .map(|(_, entries)| entries.clone())
    }

    fn translate_text(&self, text: &str) -> String {
        let mut text = self
            .phrases
            .iter()
            .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to));

        if self.behavior == MockBehavior::Lossy {
            // only a tag at the very end is lost; a trailing space protects it
            if let Some(tag) = MARKER_CLOSE.iter().find(|tag| text.ends_with(*tag)) {
                let keep = text.len() - tag.len();
                text.truncate(keep);
            }
        }
        text
    }
}

#[async_trait]
impl TranslationEngine for MockEngine {
    async fn translate_batch(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, ProviderError> {
        self.requests.lock().push(MockRequest {
            texts: texts.to_vec(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            glossary_id: self.glossary_id.clone(),
        });

        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated engine failure".to_string(),
                status_code: 500,
            }),
            MockBehavior::Short => Ok(texts
                .iter()
                .skip(1)
                .map(|t| self.translate_text(t))
                .collect()),
            MockBehavior::Echo | MockBehavior::Lossy => {
                Ok(texts.iter().map(|t| self.translate_text(t)).collect())
            }
        }
    }

    fn set_glossary(&mut self, glossary_id: Option<String>) {
        self.glossary_id = glossary_id;
    }
}

#[async_trait]
impl GlossaryProvider for MockEngine {
    async fn list_glossaries(&self) -> Result<Vec<GlossaryInfo>, ProviderError> {
        Ok(self.glossaries.lock().iter().map(|(info, _)| info.clone()).collect())
    }

    async fn delete_glossary(&self, glossary_id: &str) -> Result<(), ProviderError> {
        let mut glossaries = self.glossaries.lock();
        let before = glossaries.len();
        glossaries.retain(|(info, _)| info.glossary_id != glossary_id);
        if glossaries.len() == before {
            return Err(ProviderError::ApiError {
                status_code: 404,
                message: format!("Glossary not found: {}", glossary_id),
            });
        }
        Ok(())
    }

    async fn create_glossary(
        &self,
        name: &str,
        source_lang: &str,
        target_lang: &str,
        entries: &BTreeMap<String, String>,
    ) -> Result<GlossaryInfo, ProviderError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let info = GlossaryInfo {
            glossary_id: format!("mock-glossary-{}", id),
            name: name.to_string(),
            source_lang: base_language(source_lang),
            target_lang: base_language(target_lang),
            entry_count: entries.len(),
        };
        self.glossaries.lock().push((info.clone(), entries.clone()));
        Ok(info)
    }
}
