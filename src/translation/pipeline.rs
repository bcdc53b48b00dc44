/*!
 * Segment translation pipeline.
 *
 * Quotation glyphs do not survive machine translation reliably, so each
 * segment goes through three phases:
 *
 * 1. the source glyphs are rewritten into XML-like markers (`<w>`, `</x>`,
 *    ...) that the engine passes through with tag handling enabled, and
 *    `…` travels as `<ell/>`;
 * 2. the engine translates the marked-up texts in one batch;
 * 3. the markers are rewritten into the target language's glyphs.
 *
 * Each phase carries its own nesting level across segments. The
 * synchronizer recovers the level of a segment when the engine has lost
 * or moved a marker.
 */

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::app_config::Config;
use crate::errors::TranslationError;
use crate::language_utils::base_language;
use crate::providers::TranslationEngine;
use crate::quotes::convention::{
    resolve, ConventionTag, QuotationConvention, ELLIPSIS, ELLIPSIS_MARKER,
};
use crate::quotes::curly::{curly_quote_text, CurlyState};
use crate::quotes::session::QuoteSession;

use super::transform::{apply_all, TextTransform};

/// Sent in place of an empty text; engines reject or mangle empty strings
pub const EMPTY_TEXT: &str = "911911911";

/// One segment of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment id, e.g. `mn1:2.3`
    pub scid: String,
    pub text: String,
}

impl Segment {
    pub fn new(scid: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            scid: scid.into(),
            text: text.into(),
        }
    }
}

/// Translates segment texts through a marker-preserving engine
#[derive(Debug)]
pub struct SegmentTranslator<E: TranslationEngine> {
    engine: E,
    source_lang: String,
    target_lang: String,
    /// Source convention and level before phase 1
    source: QuoteSession,
    /// Marker convention and level after phase 2
    marker: QuoteSession,
    marker_convention: Arc<QuotationConvention>,
    target_convention: Arc<QuotationConvention>,
    source_transforms: Vec<TextTransform>,
    target_transforms: Vec<TextTransform>,
    curly: Option<CurlyState>,
}

impl<E: TranslationEngine> SegmentTranslator<E> {
    pub fn new(
        engine: E,
        source_lang: &str,
        target_lang: &str,
        source_convention: Arc<QuotationConvention>,
        target_convention: Arc<QuotationConvention>,
    ) -> Result<Self, TranslationError> {
        let marker_convention = resolve(ConventionTag::Marker.as_str())?;
        Ok(Self {
            engine,
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            source: QuoteSession::new(source_convention),
            marker: QuoteSession::new(marker_convention.clone()),
            marker_convention,
            target_convention,
            source_transforms: Vec::new(),
            target_transforms: Vec::new(),
            curly: None,
        })
    }

    /// Build a translator from the application configuration
    pub fn from_config(engine: E, config: &Config) -> Result<Self, TranslationError> {
        let mut source = resolve(config.source_convention_tag())?;
        if let Some(dir) = &config.apostrophe_directory {
            let path = dir.join(format!("{}.txt", base_language(&config.source_language)));
            let convention = (*source).clone().with_exception_file(&path)?;
            source = Arc::new(convention);
        }
        let target = resolve(config.target_convention_tag())?;

        let translator = Self::new(
            engine,
            &config.source_language,
            &config.target_language,
            source,
            target,
        )?
        .with_source_transforms(TextTransform::compile_all(&config.source_transforms)?)
        .with_target_transforms(TextTransform::compile_all(&config.target_transforms)?)
        .with_curly_source(config.curly_source);
        Ok(translator)
    }

    pub fn with_source_transforms(mut self, transforms: Vec<TextTransform>) -> Self {
        self.source_transforms = transforms;
        self
    }

    pub fn with_target_transforms(mut self, transforms: Vec<TextTransform>) -> Self {
        self.target_transforms = transforms;
        self
    }

    /// Replace straight quotes in source texts before phase 1
    pub fn with_curly_source(mut self, enabled: bool) -> Self {
        self.curly = enabled.then(CurlyState::default);
        self
    }

    /// Start both phases at `level` instead of 0
    pub fn with_start_level(mut self, level: usize) -> Self {
        self.source.set_level(level);
        self.marker.set_level(level);
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Nesting level of the source text after the last segment
    pub fn source_level(&self) -> usize {
        self.source.level()
    }

    /// Nesting level of the engine output after the last segment
    pub fn target_level(&self) -> usize {
        self.marker.level()
    }

    /// Phase 1: rewrite source glyphs into markers
    pub fn pre_translate(&mut self, texts: &[String]) -> Result<Vec<String>, TranslationError> {
        let mut marked = Vec::with_capacity(texts.len());
        for text in texts {
            let text = match self.curly {
                Some(state) => {
                    let (curly, next) = curly_quote_text(text, state);
                    self.curly = Some(next);
                    curly
                }
                None => text.clone(),
            };
            let text = apply_all(&self.source_transforms, &text);
            let text = convert_segment(&mut self.source, &text, &self.marker_convention)?;
            marked.push(text.replace(ELLIPSIS, ELLIPSIS_MARKER));
        }
        Ok(marked)
    }

    /// Phase 3: rewrite markers into target glyphs
    pub fn post_translate(&mut self, texts: &[String]) -> Result<Vec<String>, TranslationError> {
        let mut converted = Vec::with_capacity(texts.len());
        for text in texts {
            let text = text.replace(ELLIPSIS_MARKER, ELLIPSIS);
            let text = convert_segment(&mut self.marker, &text, &self.target_convention)?;
            converted.push(apply_all(&self.target_transforms, &text));
        }
        Ok(converted)
    }

    /// Phase 2: send marked-up texts to the engine
    async fn engine_translate(&self, texts: &[String]) -> Result<Vec<String>, TranslationError> {
        let alphabet = self.marker_convention.alphabet();
        let request: Vec<String> = texts
            .iter()
            .map(|t| {
                if t.is_empty() {
                    EMPTY_TEXT.to_string()
                } else if alphabet.ends_with_glyph(t) || t.ends_with(ELLIPSIS_MARKER) {
                    // keeps the engine from dropping a final tag
                    format!("{} ", t)
                } else {
                    t.clone()
                }
            })
            .collect();

        let response = self
            .engine
            .translate_batch(&request, &self.source_lang, &self.target_lang)
            .await?;
        if response.len() != request.len() {
            return Err(TranslationError::SegmentCountMismatch {
                expected: request.len(),
                actual: response.len(),
            });
        }

        Ok(response
            .into_iter()
            .map(|t| if t.trim() == EMPTY_TEXT { String::new() } else { t })
            .collect())
    }

    /// Translate texts through all three phases, preserving order and count
    pub async fn translate_texts(&mut self, texts: &[String]) -> Result<Vec<String>, TranslationError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!("Translating {} texts {} -> {}", texts.len(), self.source_lang, self.target_lang);

        let marked = self.pre_translate(texts)?;
        let translated = self.engine_translate(&marked).await?;
        let converted = self.post_translate(&translated)?;

        Ok(texts
            .iter()
            .zip(converted)
            .map(|(src, dst)| restore_trailing_whitespace(src, &dst))
            .collect())
    }

    /// Translate segments, keeping each text with its scid
    pub async fn translate_segments(
        &mut self,
        segments: &[Segment],
    ) -> Result<Vec<Segment>, TranslationError> {
        let texts: Vec<String> = segments.iter().map(|s| s.text.clone()).collect();
        let translated = self.translate_texts(&texts).await?;
        info!("Translated {} segments", segments.len());

        Ok(segments
            .iter()
            .zip(translated)
            .map(|(seg, text)| Segment::new(seg.scid.clone(), text))
            .collect())
    }
}

/// Synchronize `session` against `text`, then convert into `target`.
///
/// When no starting level reconciles the text it is converted from the
/// session level as-is; conversion passes unexpected glyphs through.
fn convert_segment(
    session: &mut QuoteSession,
    text: &str,
    target: &QuotationConvention,
) -> Result<String, TranslationError> {
    match session.convert_synced(text, target) {
        Ok(converted) => Ok(converted),
        Err(e) if e.is_structural() => {
            warn!("{} (converting from level {})", e, session.level());
            Ok(session.convert_quotes(text, target, None)?)
        }
        Err(e) => Err(e.into()),
    }
}

/// `dst` with the trailing whitespace of `src`
fn restore_trailing_whitespace(src: &str, dst: &str) -> String {
    let trailing = &src[src.trim_end().len()..];
    format!("{}{}", dst.trim_end(), trailing)
}
