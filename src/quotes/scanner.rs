/*!
 * Strict nesting scanner.
 *
 * Walks the quote glyphs of a text and verifies that each one is the
 * expected transition for the current level. Nesting is a single integer:
 * a convention maps every depth to exactly one open and one close glyph, so
 * knowing the depth is enough to know which glyphs may come next.
 */

use std::sync::Arc;

use log::{trace, warn};

use crate::errors::QuoteError;

use super::convention::QuotationConvention;

/// Outcome of one scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanState {
    /// Nesting level after the last glyph
    pub level: usize,
    /// Number of quote glyphs matched
    pub quotes: usize,
}

/// Strict single-pass validator bound to one convention
#[derive(Debug, Clone)]
pub struct NestingScanner {
    convention: Arc<QuotationConvention>,
}

impl NestingScanner {
    pub fn new(convention: Arc<QuotationConvention>) -> Self {
        Self { convention }
    }

    pub fn convention(&self) -> &QuotationConvention {
        &self.convention
    }

    /// Scan `text` starting at `level`.
    ///
    /// Fails on the first glyph that is not the expected open or close for
    /// the current level.
    pub fn scan(&self, text: &str, level: usize) -> Result<ScanState, QuoteError> {
        let qc = &self.convention;
        let mut level = level;
        let mut quotes = 0;

        for glyph in qc.alphabet().find_iter(text) {
            trace!("scan glyph {:?} at level {}", glyph, level);
            quotes += 1;
            if qc.expected_close(level) == Some(glyph) {
                level -= 1;
            } else if qc.open_glyph(level) == Some(glyph) {
                level += 1;
                if level > qc.max_depth() {
                    warn!("Quote nesting exceeded: {}", text);
                    return Err(QuoteError::NestingExceeded { text: text.to_string() });
                }
            } else if level == 0 && qc.close_glyphs().iter().any(|g| g == glyph) {
                warn!("Unmatched close quote: {}", text);
                return Err(QuoteError::UnmatchedCloseQuote { text: text.to_string() });
            } else {
                warn!("Invalid quote [{}] for level {}: {}", glyph, level, text);
                return Err(QuoteError::InvalidGlyphForLevel {
                    glyph: glyph.to_string(),
                    level,
                    text: text.to_string(),
                });
            }
        }

        Ok(ScanState { level, quotes })
    }
}
