/*!
 * Quotation nesting core.
 *
 * Quotation marks nest, and every language renders the nesting with its own
 * glyphs. This module provides:
 *
 * - `convention`: glyph tables per language and the convention registry
 * - `scanner`: strict validation of a fragment's nesting
 * - `converter`: glyph rewriting between conventions, with apostrophe
 *   disambiguation
 * - `sync`: recovery of a fragment's starting level
 * - `session`: the level carried between consecutive fragments
 * - `curly`: straight-to-curly quote replacement
 */

pub mod convention;
pub mod converter;
pub mod curly;
pub mod scanner;
pub mod session;
pub mod sync;

pub use convention::{resolve, ConventionTag, GlyphAlphabet, QuotationConvention};
pub use converter::{Converted, QuoteConverter};
pub use curly::{curly_quote_segments, curly_quote_text, CurlyState};
pub use scanner::{NestingScanner, ScanState};
pub use session::QuoteSession;
pub use sync::{LevelSynchronizer, SyncResult};
