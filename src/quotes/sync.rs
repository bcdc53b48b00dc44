/*!
 * Level synchronization.
 *
 * Every segment goes through the translation engine on its own, so the
 * nesting level a segment starts at has to be supplied from outside. That
 * hint is occasionally wrong (inconsistent source authoring, a glyph lost
 * upstream). The synchronizer confirms the hint or searches the other
 * starting levels for one from which the text parses without
 * contradiction.
 *
 * The whole ring of levels is searched rather than only neighbours of the
 * hint: the corpus is hand-authored and any supported depth is plausible.
 */

use std::sync::Arc;

use log::{debug, warn};

use crate::errors::QuoteError;

use super::convention::QuotationConvention;

/// Outcome of checking a text against one starting level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncResult {
    /// Structural error, if the text does not parse from `start_level`
    pub error: Option<QuoteError>,
    /// Level the text was checked from
    pub start_level: usize,
    /// Level after the text, or where checking stopped
    pub end_level: usize,
}

impl SyncResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Recovers the starting level of a fragment
#[derive(Debug, Clone)]
pub struct LevelSynchronizer {
    convention: Arc<QuotationConvention>,
}

impl LevelSynchronizer {
    pub fn new(convention: Arc<QuotationConvention>) -> Self {
        Self { convention }
    }

    pub fn convention(&self) -> &QuotationConvention {
        &self.convention
    }

    /// Check `text` from `start_level` using the conversion rules.
    ///
    /// Apostrophes are accepted anywhere; every other glyph must be the
    /// expected open or close for the current level.
    pub fn check_level(&self, text: &str, start_level: usize) -> SyncResult {
        let qc = &self.convention;
        let parts = qc.alphabet().split(text);
        let mut level = start_level;

        let fail = |error: QuoteError, level: usize| SyncResult {
            error: Some(error),
            start_level,
            end_level: level,
        };

        for i in (1..parts.len()).step_by(2) {
            let part = parts[i];
            let before = parts[i - 1];
            let after = parts.get(i + 1).copied().unwrap_or("");
            let apostrophe = qc.is_apostrophe(before, part, after);

            if qc.expected_close(level) == Some(part) {
                if !apostrophe {
                    level -= 1;
                }
            } else if qc.open_glyph(level) == Some(part) {
                level += 1;
                if level > qc.max_depth() {
                    let error = QuoteError::NestingExceeded { text: text.to_string() };
                    return fail(error, level - 1);
                }
            } else if apostrophe {
                continue;
            } else if level == 0 && qc.close_glyphs().iter().any(|g| g == part) {
                let error = QuoteError::UnmatchedCloseQuote { text: text.to_string() };
                return fail(error, level);
            } else {
                let error = QuoteError::InvalidGlyphForLevel {
                    glyph: part.to_string(),
                    level,
                    text: text.to_string(),
                };
                return fail(error, level);
            }
        }

        SyncResult {
            error: None,
            start_level,
            end_level: level,
        }
    }

    /// Confirm `start_level` for `text`, or find another starting level
    /// that parses cleanly.
    ///
    /// Candidates are tried in ring order `start_level + 1, + 2, ...` modulo
    /// the maximum depth. When none parses, the error from `start_level`
    /// itself is returned.
    pub fn sync_quote_level(&self, text: &str, start_level: usize) -> Result<SyncResult, QuoteError> {
        let first = self.check_level(text, start_level);
        let first_error = match first.error {
            None => return Ok(SyncResult { error: None, ..first }),
            Some(error) => error,
        };

        let ring = self.convention.max_depth();
        for i in 1..=ring {
            let candidate = (start_level + i) % ring;
            if candidate == start_level {
                continue;
            }
            let result = self.check_level(text, candidate);
            if result.is_ok() {
                warn!(
                    "Quote level {} corrected to {} for: {}",
                    start_level, candidate, text
                );
                return Ok(result);
            }
            debug!("Quote level {} rejected for: {}", candidate, text);
        }

        Err(first_error)
    }
}
