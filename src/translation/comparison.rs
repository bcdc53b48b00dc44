/*!
 * Side-by-side view of several segment documents.
 *
 * Rows follow the scid order of the first column; scids that only appear
 * in later columns are appended in the order they are first seen.
 */

use std::collections::{HashMap, HashSet};

use super::pipeline::Segment;

/// A labelled document, e.g. `en` source or `en-pt` translation
#[derive(Debug, Clone, Copy)]
pub struct SegmentColumn<'a> {
    pub label: &'a str,
    pub segments: &'a [Segment],
}

impl<'a> SegmentColumn<'a> {
    pub fn new(label: &'a str, segments: &'a [Segment]) -> Self {
        Self { label, segments }
    }
}

/// Texts of one scid across all columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRow {
    pub scid: String,
    /// `(label, text)`; `None` when the column has no such segment
    pub cells: Vec<(String, Option<String>)>,
}

/// Align `columns` by scid
pub fn align_columns(columns: &[SegmentColumn<'_>]) -> Vec<ComparisonRow> {
    let mut seen = HashSet::new();
    let scids: Vec<&str> = columns
        .iter()
        .flat_map(|column| column.segments.iter())
        .map(|seg| seg.scid.as_str())
        .filter(|scid| seen.insert(*scid))
        .collect();

    let lookups: Vec<HashMap<&str, &str>> = columns
        .iter()
        .map(|column| {
            column
                .segments
                .iter()
                .map(|seg| (seg.scid.as_str(), seg.text.as_str()))
                .collect()
        })
        .collect();

    scids
        .into_iter()
        .map(|scid| ComparisonRow {
            scid: scid.to_string(),
            cells: columns
                .iter()
                .zip(&lookups)
                .map(|(column, texts)| {
                    (column.label.to_string(), texts.get(scid).map(|t| t.to_string()))
                })
                .collect(),
        })
        .collect()
}

/// Plain-text rendering: a `----- scid -----` line, then `label:\ttext`
/// per column
pub fn render_rows(rows: &[ComparisonRow]) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(&format!("----- {} -----\n", row.scid));
        for (label, text) in &row.cells {
            out.push_str(&format!("{}:\t{}\n", label, text.as_deref().unwrap_or("")));
        }
    }
    out
}
