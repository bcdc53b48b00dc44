/*!
 * Quotation conventions.
 *
 * A convention maps nesting depth to an open/close glyph pair for one
 * language (or for the marker scheme used to carry quotes through the
 * translation engine), together with its apostrophe glyph and an optional
 * list of words after which a right single quote is an apostrophe.
 *
 * Built-in conventions live in a closed registry keyed by [`ConventionTag`]
 * and are built once, on first use.
 */

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::QuoteError;

/// Left double quote
pub const LDQUOT: &str = "“";
/// Right double quote
pub const RDQUOT: &str = "”";
/// Left single quote
pub const LSQUOT: &str = "‘";
/// Right single quote, also the curly apostrophe
pub const RSQUOT: &str = "’";
/// Straight apostrophe
pub const APOS: &str = "'";
/// Left double guillemet
pub const LDGUIL: &str = "«";
/// Right double guillemet
pub const RDGUIL: &str = "»";
/// Left single guillemet
pub const LSGUIL: &str = "‹";
/// Right single guillemet
pub const RSGUIL: &str = "›";
/// Double low-9 quote
pub const LDLOW: &str = "„";
/// Single low-9 quote
pub const LSLOW: &str = "‚";
/// Thin space used inside French guillemets
pub const THNSP: &str = "\u{2009}";

/// Marker glyphs, outermost first. The engine treats them as XML tags and
/// leaves them in place; it does however drop some of them when they are
/// the very last thing in a text, so the pipeline never sends a text that
/// ends in a marker.
pub const MARKER_OPEN: [&str; 4] = ["<w>", "<x>", "<y>", "<z>"];
/// Closing counterparts of [`MARKER_OPEN`]
pub const MARKER_CLOSE: [&str; 4] = ["</w>", "</x>", "</y>", "</z>"];

/// Ellipsis glyph
pub const ELLIPSIS: &str = "…";
/// Engine-transit stand-in for [`ELLIPSIS`], outside the nesting alphabet
pub const ELLIPSIS_MARKER: &str = "<ell/>";

/// Default maximum nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 4;

static EN_EXCEPTIONS: &str = include_str!("../../resources/apostrophe/en.txt");

/// Union of every glyph of a convention, compiled once.
///
/// Glyphs are tried longest first so that a glyph sharing a prefix with a
/// longer one never shadows it; equal lengths keep declaration order.
#[derive(Debug, Clone)]
pub struct GlyphAlphabet {
    glyphs: Vec<String>,
    regex: Option<Regex>,
}

impl GlyphAlphabet {
    /// Build an alphabet from glyphs in declaration order
    pub fn new<'a>(glyphs: impl IntoIterator<Item = &'a str>) -> Self {
        let mut unique: Vec<String> = Vec::new();
        for glyph in glyphs {
            if !glyph.is_empty() && !unique.iter().any(|g| g == glyph) {
                unique.push(glyph.to_string());
            }
        }
        // stable: ties stay in declaration order
        unique.sort_by_key(|g| std::cmp::Reverse(g.chars().count()));

        let regex = if unique.is_empty() {
            None
        } else {
            let pattern = unique
                .iter()
                .map(|g| regex::escape(g))
                .collect::<Vec<_>>()
                .join("|");
            // escaped literals always form a valid pattern
            Regex::new(&pattern).ok()
        };

        Self { glyphs: unique, regex }
    }

    /// Glyphs in match-priority order
    pub fn glyphs(&self) -> &[String] {
        &self.glyphs
    }

    /// Split text into alternating literal and glyph spans.
    ///
    /// Even indices are literal spans (possibly empty), odd indices are
    /// glyphs, and the result always has odd length. Joining the spans
    /// reproduces the input exactly.
    pub fn split<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let mut parts = Vec::new();
        let mut last = 0;
        if let Some(regex) = &self.regex {
            for m in regex.find_iter(text) {
                parts.push(&text[last..m.start()]);
                parts.push(m.as_str());
                last = m.end();
            }
        }
        parts.push(&text[last..]);
        parts
    }

    /// Iterate over the glyphs found in text, left to right
    pub fn find_iter<'r, 't>(&'r self, text: &'t str) -> impl Iterator<Item = &'t str> + 'r
    where
        't: 'r,
    {
        self.regex
            .iter()
            .flat_map(move |regex| regex.find_iter(text).map(|m| m.as_str()))
    }

    /// Whether text ends with one of the glyphs
    pub fn ends_with_glyph(&self, text: &str) -> bool {
        self.glyphs.iter().any(|g| text.ends_with(g.as_str()))
    }
}

/// Glyph table for one language or transit scheme
#[derive(Debug, Clone)]
pub struct QuotationConvention {
    id: String,
    open: Vec<String>,
    close: Vec<String>,
    apostrophe: String,
    max_depth: usize,
    exception_words: HashSet<String>,
    alphabet: GlyphAlphabet,
}

impl QuotationConvention {
    /// Create a convention from open and close glyphs indexed by depth.
    ///
    /// Missing deeper levels repeat the deepest configured glyph, up to
    /// [`DEFAULT_MAX_DEPTH`].
    pub fn new(id: &str, open: &[&str], close: &[&str], apostrophe: &str) -> Self {
        Self::build(
            id.to_string(),
            open.iter().map(|g| g.to_string()).collect(),
            close.iter().map(|g| g.to_string()).collect(),
            apostrophe.to_string(),
            DEFAULT_MAX_DEPTH,
            HashSet::new(),
        )
    }

    fn build(
        id: String,
        mut open: Vec<String>,
        mut close: Vec<String>,
        apostrophe: String,
        max_depth: usize,
        exception_words: HashSet<String>,
    ) -> Self {
        pad_glyphs(&mut open, max_depth);
        pad_glyphs(&mut close, max_depth);
        let alphabet = GlyphAlphabet::new(open.iter().chain(close.iter()).map(|g| g.as_str()));

        Self {
            id,
            open,
            close,
            apostrophe,
            max_depth,
            exception_words,
            alphabet,
        }
    }

    /// Change the maximum nesting depth, re-padding the glyph tables
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self::build(
            self.id,
            self.open,
            self.close,
            self.apostrophe,
            max_depth,
            self.exception_words,
        )
    }

    /// Add apostrophe-exception words (lower-cased)
    pub fn with_exception_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exception_words.extend(parse_exception_words(words));
        self
    }

    /// Add apostrophe-exception words from a plain-text list.
    ///
    /// A missing file contributes no words.
    pub fn with_exception_file(self, path: &Path) -> std::io::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(self.with_exception_words(content.lines())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No apostrophe exceptions at {:?}", path);
                Ok(self)
            }
            Err(e) => Err(e),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Open glyphs indexed by depth
    pub fn open_glyphs(&self) -> &[String] {
        &self.open
    }

    /// Close glyphs indexed by depth
    pub fn close_glyphs(&self) -> &[String] {
        &self.close
    }

    pub fn apostrophe(&self) -> &str {
        &self.apostrophe
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn exception_words(&self) -> &HashSet<String> {
        &self.exception_words
    }

    pub fn alphabet(&self) -> &GlyphAlphabet {
        &self.alphabet
    }

    /// Glyph that opens a quotation at `depth`.
    ///
    /// Depths beyond the table repeat the deepest glyph, so an open at
    /// `max_depth` is still recognised (and then rejected as too deep).
    pub fn open_glyph(&self, depth: usize) -> Option<&str> {
        let last = self.open.len().checked_sub(1)?;
        self.open.get(depth.min(last)).map(|g| g.as_str())
    }

    /// Glyph that closes the quotation opened at `depth`
    pub fn close_glyph(&self, depth: usize) -> Option<&str> {
        let last = self.close.len().checked_sub(1)?;
        self.close.get(depth.min(last)).map(|g| g.as_str())
    }

    /// Close glyph expected when the current level is `level`
    pub fn expected_close(&self, level: usize) -> Option<&str> {
        level.checked_sub(1).and_then(|depth| self.close_glyph(depth))
    }

    /// Whether a right-single-quote glyph is a possessive or contraction
    /// apostrophe rather than a closing quote.
    ///
    /// `before` and `after` are the literal spans around the glyph.
    pub fn is_apostrophe(&self, before: &str, glyph: &str, after: &str) -> bool {
        if glyph != RSQUOT {
            return false;
        }
        if after.chars().next().is_some_and(is_word_char) {
            return true;
        }
        self.follows_exception_word(before)
    }

    fn follows_exception_word(&self, before: &str) -> bool {
        if self.exception_words.is_empty() {
            return false;
        }
        let word_start = before
            .char_indices()
            .rev()
            .take_while(|(_, c)| is_word_char(*c))
            .last()
            .map(|(i, _)| i);
        let Some(start) = word_start else {
            return false;
        };
        // whole-word match: `godsend` is not `gods`
        self.exception_words.contains(&before[start..].to_lowercase())
    }
}

/// Word characters for apostrophe disambiguation
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn pad_glyphs(glyphs: &mut Vec<String>, max_depth: usize) {
    glyphs.truncate(max_depth);
    if let Some(last) = glyphs.last().cloned() {
        while glyphs.len() < max_depth {
            glyphs.push(last.clone());
        }
    }
}

fn parse_exception_words<I, S>(words: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words.into_iter().filter_map(|w| {
        let w = w.as_ref().trim();
        if w.is_empty() || w.starts_with('#') {
            None
        } else {
            Some(w.to_lowercase())
        }
    })
}

/// Built-in conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConventionTag {
    /// American nesting: double outside, single inside
    EnUs,
    /// British nesting: single outside, double inside
    EnUk,
    /// Brazilian Portuguese, American nesting
    PtBr,
    /// European Portuguese, guillemets outside
    PtPt,
    /// French guillemets with thin spaces
    Fr,
    /// Spanish, guillemets outside
    Es,
    /// Dutch low-high quotes
    Nl,
    /// German low-high quotes
    De,
    /// Engine-transit markers
    Marker,
}

impl ConventionTag {
    /// Every built-in convention
    pub const ALL: [ConventionTag; 9] = [
        Self::EnUs,
        Self::EnUk,
        Self::PtBr,
        Self::PtPt,
        Self::Fr,
        Self::Es,
        Self::Nl,
        Self::De,
        Self::Marker,
    ];

    /// Canonical tag string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnUs => "en-us",
            Self::EnUk => "en-uk",
            Self::PtBr => "pt-br",
            Self::PtPt => "pt-pt",
            Self::Fr => "fr",
            Self::Es => "es",
            Self::Nl => "nl",
            Self::De => "de",
            Self::Marker => "deepl",
        }
    }

    /// Convention used for text written in `lang`
    pub fn for_language(lang: &str) -> Result<Self, QuoteError> {
        lang.parse()
    }

    fn build(self) -> QuotationConvention {
        let id = self.as_str();
        let convention = match self {
            Self::EnUs | Self::PtBr => QuotationConvention::new(
                id,
                &[LDQUOT, LSQUOT, LDQUOT, LSQUOT],
                &[RDQUOT, RSQUOT, RDQUOT, RSQUOT],
                RSQUOT,
            ),
            Self::EnUk => QuotationConvention::new(
                id,
                &[LSQUOT, LDQUOT, LSQUOT, LDQUOT],
                &[RSQUOT, RDQUOT, RSQUOT, RDQUOT],
                RSQUOT,
            ),
            Self::PtPt | Self::Es => QuotationConvention::new(
                id,
                &[LDGUIL, LDQUOT, LSQUOT, LDQUOT],
                &[RDGUIL, RDQUOT, RSQUOT, RDQUOT],
                RSQUOT,
            ),
            Self::Fr => {
                let open = [
                    format!("{LDGUIL}{THNSP}"),
                    format!("{LSGUIL}{THNSP}"),
                    LDQUOT.to_string(),
                    LSQUOT.to_string(),
                ];
                let close = [
                    format!("{THNSP}{RDGUIL}"),
                    format!("{THNSP}{RSGUIL}"),
                    RDQUOT.to_string(),
                    RSQUOT.to_string(),
                ];
                let open: Vec<&str> = open.iter().map(|g| g.as_str()).collect();
                let close: Vec<&str> = close.iter().map(|g| g.as_str()).collect();
                QuotationConvention::new(id, &open, &close, RSQUOT)
            }
            Self::Nl => QuotationConvention::new(id, &[LDLOW, LSLOW], &[RDQUOT, RSQUOT], RSQUOT),
            Self::De => QuotationConvention::new(id, &[LDLOW, LSLOW], &[LDQUOT, LSQUOT], RSQUOT),
            Self::Marker => QuotationConvention::new(id, &MARKER_OPEN, &MARKER_CLOSE, APOS),
        };
        convention.with_exception_words(self.exception_list().lines())
    }

    fn exception_list(&self) -> &'static str {
        match self {
            Self::EnUs | Self::EnUk => EN_EXCEPTIONS,
            _ => "",
        }
    }
}

impl fmt::Display for ConventionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConventionTag {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        if let Some(lang) = tag.strip_suffix("-deepl") {
            // markers stand in for a known language only
            return match lang.parse::<Self>() {
                Ok(Self::Marker) | Err(_) => Err(QuoteError::Configuration { tag: s.to_string() }),
                Ok(_) => Ok(Self::Marker),
            };
        }
        match tag.as_str() {
            "en" | "en-us" => Ok(Self::EnUs),
            "en-uk" | "en-gb" => Ok(Self::EnUk),
            "pt-br" => Ok(Self::PtBr),
            "pt" | "pt-pt" => Ok(Self::PtPt),
            "fr" => Ok(Self::Fr),
            "es" => Ok(Self::Es),
            "nl" => Ok(Self::Nl),
            "de" => Ok(Self::De),
            "deepl" => Ok(Self::Marker),
            _ => Err(QuoteError::Configuration { tag: s.to_string() }),
        }
    }
}

static REGISTRY: Lazy<HashMap<ConventionTag, Arc<QuotationConvention>>> = Lazy::new(|| {
    ConventionTag::ALL
        .iter()
        .map(|tag| (*tag, Arc::new(tag.build())))
        .collect()
});

/// Look up a built-in convention by tag
pub fn resolve(tag: &str) -> Result<Arc<QuotationConvention>, QuoteError> {
    let tag: ConventionTag = tag.parse()?;
    REGISTRY
        .get(&tag)
        .cloned()
        .ok_or_else(|| QuoteError::Configuration { tag: tag.to_string() })
}
