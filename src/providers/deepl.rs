use async_trait::async_trait;
use log::{debug, error};
use reqwest::{header, Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::app_config::EngineConfig;
use crate::errors::ProviderError;
use crate::language_utils::{base_language, deepl_source_language, deepl_target_language};

use super::{GlossaryInfo, GlossaryProvider, TranslationEngine};

/// DeepL client for the v2 REST API
pub struct DeepL {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL
    endpoint: String,
    /// Formality preference; omitted from requests when empty
    formality: String,
    /// Tag handling mode
    tag_handling: String,
    /// Glossary used for translation requests
    glossary_id: Option<String>,
}

impl fmt::Debug for DeepL {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepL")
            .field("endpoint", &self.endpoint)
            .field("formality", &self.formality)
            .field("tag_handling", &self.tag_handling)
            .field("glossary_id", &self.glossary_id)
            .finish()
    }
}

/// Translate request body
#[derive(Debug, Serialize)]
pub struct TranslateRequest<'a> {
    text: &'a [String],
    source_lang: String,
    target_lang: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag_handling: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    formality: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    glossary_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct TranslateResponse {
    pub translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
pub struct Translation {
    #[serde(default)]
    pub detected_source_language: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
struct CreateGlossaryRequest<'a> {
    name: &'a str,
    source_lang: String,
    target_lang: String,
    entries: String,
    entries_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct GlossaryList {
    glossaries: Vec<GlossaryInfo>,
}

impl DeepL {
    /// Create a new DeepL client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::with_timeout(api_key, endpoint, Duration::from_secs(30))
    }

    pub fn with_timeout(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::builder().timeout(timeout).build().unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            formality: "more".to_string(),
            tag_handling: "xml".to_string(),
            glossary_id: None,
        }
    }

    /// Create a client from engine settings
    pub fn from_config(config: &EngineConfig) -> anyhow::Result<Self> {
        let api_key = config.get_api_key()?;
        let mut deepl = Self::with_timeout(
            api_key,
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_secs),
        );
        deepl.formality = config.formality.clone();
        deepl.tag_handling = config.tag_handling.clone();
        Ok(deepl)
    }

    fn url(&self, path: &str) -> String {
        let base = if self.endpoint.is_empty() {
            "https://api-free.deepl.com"
        } else {
            self.endpoint.trim_end_matches('/')
        };
        format!("{}{}", base, path)
    }

    fn auth(&self) -> String {
        format!("DeepL-Auth-Key {}", self.api_key)
    }

    async fn check_status(response: Response) -> Result<Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to get error response text".to_string());
        error!("DeepL API error ({}): {}", status, error_text);

        Err(match status {
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => {
                ProviderError::AuthenticationError(error_text)
            }
            StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(error_text),
            // quota exceeded
            s if s.as_u16() == 456 => ProviderError::RateLimitExceeded(error_text),
            s => ProviderError::ApiError {
                status_code: s.as_u16(),
                message: error_text,
            },
        })
    }

    /// Translate a batch of texts
    pub async fn translate(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<TranslateResponse, ProviderError> {
        let request = TranslateRequest {
            text: texts,
            source_lang: deepl_source_language(source_lang),
            target_lang: deepl_target_language(target_lang),
            tag_handling: Some(self.tag_handling.as_str()).filter(|s| !s.is_empty()),
            formality: Some(self.formality.as_str()).filter(|s| !s.is_empty()),
            glossary_id: self.glossary_id.as_deref(),
        };
        debug!(
            "DeepL translate {} texts {} -> {}",
            texts.len(),
            request.source_lang,
            request.target_lang
        );

        let response = self
            .client
            .post(self.url("/v2/translate"))
            .header(header::AUTHORIZATION, self.auth())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        let response = Self::check_status(response).await?;

        response
            .json::<TranslateResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl TranslationEngine for DeepL {
    async fn translate_batch(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<String>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let response = self.translate(texts, source_lang, target_lang).await?;
        Ok(response.translations.into_iter().map(|t| t.text).collect())
    }

    fn set_glossary(&mut self, glossary_id: Option<String>) {
        self.glossary_id = glossary_id;
    }
}

#[async_trait]
impl GlossaryProvider for DeepL {
    async fn list_glossaries(&self) -> Result<Vec<GlossaryInfo>, ProviderError> {
        let response = self
            .client
            .get(self.url("/v2/glossaries"))
            .header(header::AUTHORIZATION, self.auth())
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        let response = Self::check_status(response).await?;

        let list = response
            .json::<GlossaryList>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;
        Ok(list.glossaries)
    }

    async fn delete_glossary(&self, glossary_id: &str) -> Result<(), ProviderError> {
        let response = self
            .client
            .delete(self.url(&format!("/v2/glossaries/{}", glossary_id)))
            .header(header::AUTHORIZATION, self.auth())
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn create_glossary(
        &self,
        name: &str,
        source_lang: &str,
        target_lang: &str,
        entries: &BTreeMap<String, String>,
    ) -> Result<GlossaryInfo, ProviderError> {
        let request = CreateGlossaryRequest {
            name,
            source_lang: base_language(source_lang),
            target_lang: base_language(target_lang),
            entries: entries_tsv(entries),
            entries_format: "tsv",
        };

        let response = self
            .client
            .post(self.url("/v2/glossaries"))
            .header(header::AUTHORIZATION, self.auth())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        let response = Self::check_status(response).await?;

        response
            .json::<GlossaryInfo>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }
}

/// Glossary entries in DeepL's tab-separated upload format
fn entries_tsv(entries: &BTreeMap<String, String>) -> String {
    entries
        .iter()
        .map(|(k, v)| format!("{}\t{}", k, v))
        .collect::<Vec<_>>()
        .join("\n")
}
