/*!
 * Segment translation.
 *
 * - `pipeline`: the three-phase segment translator
 * - `comparison`: side-by-side view of sources and translations
 * - `transform`: configurable regex rewrites applied around the engine
 */

// Re-export main types for easier usage
pub use self::comparison::{align_columns, render_rows, ComparisonRow, SegmentColumn};
pub use self::pipeline::{Segment, SegmentTranslator, EMPTY_TEXT};
pub use self::transform::TextTransform;

// Submodules
pub mod comparison;
pub mod pipeline;
pub mod transform;
