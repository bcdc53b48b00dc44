/*!
 * Convention-to-convention quote conversion.
 *
 * The converter rewrites every quote glyph that is the expected transition
 * at the current level into the target convention's glyph for the same
 * depth, and carries the level through the text. Glyphs that belong to the
 * alphabet but are not the expected transition are passed through as they
 * are: engine output is often slightly malformed and a best-effort
 * rendering is preferred over failing the whole fragment. Structural
 * validation is the scanner's and the synchronizer's job.
 */

use std::sync::Arc;

use log::{debug, trace};

use crate::errors::QuoteError;

use super::convention::QuotationConvention;

/// Result of converting one text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    /// Text with glyphs rewritten into the target convention
    pub text: String,
    /// Nesting level after the text
    pub level: usize,
}

/// Rewrites quote glyphs from its own convention into another one
#[derive(Debug, Clone)]
pub struct QuoteConverter {
    convention: Arc<QuotationConvention>,
}

impl QuoteConverter {
    pub fn new(convention: Arc<QuotationConvention>) -> Self {
        Self { convention }
    }

    pub fn convention(&self) -> &QuotationConvention {
        &self.convention
    }

    /// Convert the quote glyphs of `text` into `target`, starting at `level`
    pub fn convert(
        &self,
        text: &str,
        target: &QuotationConvention,
        level: usize,
    ) -> Result<Converted, QuoteError> {
        let qc = &self.convention;
        let parts = qc.alphabet().split(text);
        let mut level = level;
        let mut out = String::with_capacity(text.len());

        for (i, part) in parts.iter().copied().enumerate() {
            if i % 2 == 0 {
                out.push_str(&self.swap_apostrophes(part, target));
                continue;
            }

            let before = parts[i - 1];
            let after = parts.get(i + 1).copied().unwrap_or("");

            if qc.expected_close(level) == Some(part) {
                if qc.is_apostrophe(before, part, after) {
                    trace!("apostrophe {:?} at part {}", part, i);
                    out.push_str(&self.swap_apostrophes(part, target));
                } else {
                    level = level
                        .checked_sub(1)
                        .ok_or_else(|| QuoteError::UnmatchedCloseQuote { text: text.to_string() })?;
                    out.push_str(target.close_glyph(level).unwrap_or(part));
                }
            } else if qc.open_glyph(level) == Some(part) {
                out.push_str(target.open_glyph(level).unwrap_or(part));
                level += 1;
                if level > qc.max_depth() {
                    return Err(QuoteError::NestingExceeded { text: text.to_string() });
                }
            } else {
                debug!("skip {:?} at level {}", part, level);
                out.push_str(&self.swap_apostrophes(part, target));
            }
        }

        Ok(Converted { text: out, level })
    }

    /// Level at which a fragment starts, judged from its first recognisable
    /// glyph with no prior context.
    ///
    /// An open glyph for depth `d` implies the fragment starts at `d`; a
    /// close glyph for depth `d` implies it starts at `d + 1`. Returns 0 when
    /// the fragment has no quote glyphs. Never fails.
    pub fn quotation_level(&self, text: &str) -> usize {
        let qc = &self.convention;
        let parts = qc.alphabet().split(text);

        for i in (1..parts.len()).step_by(2) {
            let part = parts[i];
            let before = parts[i - 1];
            let after = parts.get(i + 1).copied().unwrap_or("");

            for depth in 0..qc.max_depth() {
                if qc.open_glyph(depth) == Some(part) {
                    return depth;
                }
                if qc.close_glyph(depth) == Some(part) && !qc.is_apostrophe(before, part, after) {
                    return depth + 1;
                }
            }
        }

        0
    }

    fn swap_apostrophes(&self, span: &str, target: &QuotationConvention) -> String {
        let from = self.convention.apostrophe();
        let to = target.apostrophe();
        if from.is_empty() || from == to {
            span.to_string()
        } else {
            span.replace(from, to)
        }
    }
}
