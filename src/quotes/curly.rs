/*!
 * Straight-to-curly quote conversion.
 *
 * Some source corpora and some engine output use ASCII `"` and `'`. This
 * turns them into curly quotes, carrying which quotes are open from one
 * segment to the next.
 */

use serde::{Deserialize, Serialize};

use super::convention::{is_word_char, LDQUOT, LSQUOT, RDQUOT, RSQUOT};

/// Open straight quotes carried between segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CurlyState {
    pub single: usize,
    pub double: usize,
}

/// Replace straight quotes in `text`, starting from `state`
pub fn curly_quote_text(text: &str, state: CurlyState) -> (String, CurlyState) {
    let mut state = state;
    let mut out = String::with_capacity(text.len() + 8);
    let mut prev: Option<char> = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if state.double > 0 {
                    state.double -= 1;
                    out.push_str(RDQUOT);
                } else {
                    state.double += 1;
                    out.push_str(LDQUOT);
                }
            }
            '\'' => {
                let after_word = prev.is_some_and(is_word_char);
                let before_word = chars.peek().copied().is_some_and(is_word_char);
                // `don't` always, `monks'` only while no single quote is open
                if after_word && (before_word || state.single == 0) {
                    out.push_str(RSQUOT);
                } else if state.single > 0 {
                    state.single -= 1;
                    out.push_str(RSQUOT);
                } else {
                    state.single += 1;
                    out.push_str(LSQUOT);
                }
            }
            _ => out.push(c),
        }
        prev = Some(c);
    }

    (out, state)
}

/// Apply [`curly_quote_text`] across consecutive segments
pub fn curly_quote_segments<'a, I>(texts: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut state = CurlyState::default();
    texts
        .into_iter()
        .map(|text| {
            let (curly, next) = curly_quote_text(text, state);
            state = next;
            curly
        })
        .collect()
}
