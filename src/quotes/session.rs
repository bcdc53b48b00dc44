/*!
 * Quote session state.
 *
 * The nesting level open at the boundary between consecutive fragments is
 * the only state that outlives a single call. A session owns that level for
 * one stream of fragments in one convention; independent streams use
 * independent sessions.
 */

use std::sync::Arc;

use log::debug;

use crate::errors::QuoteError;

use super::convention::QuotationConvention;
use super::converter::QuoteConverter;
use super::scanner::{NestingScanner, ScanState};
use super::sync::{LevelSynchronizer, SyncResult};

/// A convention plus the level carried between fragments
#[derive(Debug, Clone)]
pub struct QuoteSession {
    scanner: NestingScanner,
    converter: QuoteConverter,
    synchronizer: LevelSynchronizer,
    level: usize,
    quotes: usize,
}

impl QuoteSession {
    /// Start a session at level 0
    pub fn new(convention: Arc<QuotationConvention>) -> Self {
        Self {
            scanner: NestingScanner::new(convention.clone()),
            converter: QuoteConverter::new(convention.clone()),
            synchronizer: LevelSynchronizer::new(convention),
            level: 0,
            quotes: 0,
        }
    }

    /// Start a session at `level`
    pub fn with_level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    pub fn convention(&self) -> &QuotationConvention {
        self.scanner.convention()
    }

    /// Level open after the last processed fragment
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn set_level(&mut self, level: usize) {
        self.level = level;
    }

    /// Quote glyphs counted by [`QuoteSession::parse`] so far
    pub fn quotes(&self) -> usize {
        self.quotes
    }

    /// Strict scan from `level` (or the session level); does not mutate
    pub fn scan(&self, text: &str, level: Option<usize>) -> Result<ScanState, QuoteError> {
        self.scanner.scan(text, level.unwrap_or(self.level))
    }

    /// Strict scan that stores the resulting level and counts glyphs
    pub fn parse(&mut self, text: &str, level: Option<usize>) -> Result<ScanState, QuoteError> {
        let state = self.scan(text, level)?;
        debug!("parse {:?}", state);
        self.level = state.level;
        self.quotes += state.quotes;
        Ok(state)
    }

    /// Convert glyphs into `target`, from `level` (or the session level),
    /// storing the exit level
    pub fn convert_quotes(
        &mut self,
        text: &str,
        target: &QuotationConvention,
        level: Option<usize>,
    ) -> Result<String, QuoteError> {
        let converted = self
            .converter
            .convert(text, target, level.unwrap_or(self.level))?;
        self.level = converted.level;
        Ok(converted.text)
    }

    /// Synchronize the session level against `text`, then convert it
    pub fn convert_synced(
        &mut self,
        text: &str,
        target: &QuotationConvention,
    ) -> Result<String, QuoteError> {
        let synced = self.sync_quote_level(text, self.level)?;
        self.convert_quotes(text, target, Some(synced.start_level))
    }

    /// Starting level implied by a fragment with no prior context
    pub fn quotation_level(&self, text: &str) -> usize {
        self.converter.quotation_level(text)
    }

    pub fn check_level(&self, text: &str, start_level: usize) -> SyncResult {
        self.synchronizer.check_level(text, start_level)
    }

    pub fn sync_quote_level(&self, text: &str, start_level: usize) -> Result<SyncResult, QuoteError> {
        self.synchronizer.sync_quote_level(text, start_level)
    }
}
