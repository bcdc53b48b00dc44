/*!
 * Tests for the quotation core across conventions
 */

use std::sync::Arc;

use ebt_translator::errors::QuoteError;
use ebt_translator::quotes::convention::{LDQUOT, LSQUOT, RDQUOT, RSQUOT};
use ebt_translator::quotes::{
    resolve, ConventionTag, NestingScanner, QuotationConvention, QuoteConverter, QuoteSession,
    ScanState,
};

const US_TEXT: &str = "He said, “I heard, ‘thus was it’.” ";

#[test]
fn test_convert_roundTripThroughEveryConvention_shouldRestoreText() {
    let us = QuoteConverter::new(resolve("en-us").unwrap());
    for tag in ConventionTag::ALL {
        let other = resolve(tag.as_str()).unwrap();
        let forward = us.convert(US_TEXT, &other, 0).unwrap();
        assert_eq!(forward.level, 0, "{}", tag);

        let back = QuoteConverter::new(other.clone())
            .convert(&forward.text, us.convention(), 0)
            .unwrap();
        assert_eq!(back.text, US_TEXT, "{}", tag);
        assert_eq!(back.level, 0, "{}", tag);
    }
}

#[test]
fn test_convert_usToPortugal_shouldUseGuillemetsOutside() {
    let us = QuoteConverter::new(resolve("en-us").unwrap());
    let pt = resolve("pt-pt").unwrap();
    let converted = us.convert(US_TEXT, &pt, 0).unwrap();
    assert_eq!(converted.text, "He said, «I heard, “thus was it”.» ");
}

#[test]
fn test_convert_usToFrench_shouldAddThinSpaces() {
    let us = QuoteConverter::new(resolve("en-us").unwrap());
    let fr = resolve("fr").unwrap();
    let converted = us.convert("“Oui”", &fr, 0).unwrap();
    assert_eq!(converted.text, "«\u{2009}Oui\u{2009}»");
}

#[test]
fn test_scan_openingEveryDepth_shouldStopAtMaxDepth() {
    for tag in ConventionTag::ALL {
        let convention = resolve(tag.as_str()).unwrap();
        let scanner = NestingScanner::new(convention.clone());
        let max = convention.max_depth();

        let mut text = String::new();
        for depth in 0..max {
            text.push('a');
            text.push_str(convention.open_glyph(depth).unwrap());
        }
        assert_eq!(
            scanner.scan(&text, 0).unwrap(),
            ScanState { level: max, quotes: max },
            "{}",
            tag
        );

        text.push('a');
        text.push_str(convention.open_glyph(max).unwrap());
        let err = scanner.scan(&text, 0).unwrap_err();
        assert!(matches!(err, QuoteError::NestingExceeded { .. }), "{}: {:?}", tag, err);
    }
}

#[test]
fn test_scan_closingEveryDepth_shouldReturnToZero() {
    for tag in ConventionTag::ALL {
        let convention = resolve(tag.as_str()).unwrap();
        let scanner = NestingScanner::new(convention.clone());
        let max = convention.max_depth();

        let mut text = String::new();
        for depth in (0..max).rev() {
            text.push('a');
            text.push_str(convention.close_glyph(depth).unwrap());
        }
        assert_eq!(scanner.scan(&text, max).unwrap().level, 0, "{}", tag);

        let err = scanner.scan(&text, max - 1).unwrap_err();
        assert!(err.is_structural(), "{}", tag);
    }
}

#[test]
fn test_syncQuoteLevel_fromAnyHint_shouldFindConsistentLevel() {
    let session = QuoteSession::new(resolve("en-deepl").unwrap());
    for hint in 0..4 {
        let result = session.sync_quote_level("<w>a</w>", hint).unwrap();
        assert_eq!(result.start_level, 0, "hint {}", hint);
        assert_eq!(result.end_level, 0, "hint {}", hint);

        let result = session.sync_quote_level("a</x>b", hint).unwrap();
        assert_eq!(result.start_level, 2, "hint {}", hint);
        assert_eq!(result.end_level, 1, "hint {}", hint);
    }
}

#[test]
fn test_syncQuoteLevel_withInconsistentText_shouldReturnHintError() {
    let session = QuoteSession::new(resolve("en-deepl").unwrap());
    // </w> then </y> cannot both close from any start
    let err = session.sync_quote_level("</w>a</y>", 0).unwrap_err();
    assert!(matches!(err, QuoteError::UnmatchedCloseQuote { .. }));
}

#[test]
fn test_session_withTwoLevelConvention_shouldRecoverFromWrongHint() {
    let qc = QuotationConvention::new("us-2", &[LDQUOT, LSQUOT], &[RDQUOT, RSQUOT], RSQUOT)
        .with_max_depth(2);
    let mut session = QuoteSession::new(Arc::new(qc)).with_level(1);
    let en = resolve("en-uk").unwrap();

    // the fragment actually starts outside any quotation
    let text = format!("{LDQUOT}done{RDQUOT}");
    let converted = session.convert_synced(&text, &en).unwrap();
    assert_eq!(converted, format!("{LSQUOT}done{RSQUOT}"));
    assert_eq!(session.level(), 0);
}

#[test]
fn test_convert_apostropheBeforeWordChar_shouldNeverChangeLevel() {
    let en = QuoteConverter::new(resolve("en").unwrap());
    let marker = resolve("en-deepl").unwrap();
    for level in 0..=2 {
        let converted = en.convert("don’t and won’t", &marker, level).unwrap();
        assert_eq!(converted.text, "don't and won't", "level {}", level);
        assert_eq!(converted.level, level);
    }
}

#[test]
fn test_convert_possessiveAtInnerLevel_shouldKeepQuoteOpen() {
    let en = QuoteConverter::new(resolve("en").unwrap());
    let marker = resolve("en-deepl").unwrap();
    let converted = en
        .convert("“I heard ‘the squirrels’ feeding ground’.”", &marker, 0)
        .unwrap();
    assert_eq!(
        converted.text,
        "<w>I heard <x>the squirrels' feeding ground</x>.</w>"
    );
    assert_eq!(converted.level, 0);
}

#[test]
fn test_convert_wordStartingLikeExceptionWord_shouldCloseQuote() {
    let en = QuoteConverter::new(resolve("en").unwrap());
    let marker = resolve("en-deepl").unwrap();
    let converted = en
        .convert("“He said, ‘It is a godsend’.”", &marker, 0)
        .unwrap();
    assert_eq!(converted.text, "<w>He said, <x>It is a godsend</x>.</w>");
    assert_eq!(converted.level, 0);
}

#[test]
fn test_session_parse_shouldAccumulateQuoteCount() {
    let mut session = QuoteSession::new(resolve("en-us").unwrap());
    session.parse("“a ‘b", None).unwrap();
    session.parse("c’ d”", None).unwrap();
    assert_eq!(session.level(), 0);
    assert_eq!(session.quotes(), 4);
}

#[test]
fn test_session_parse_withError_shouldKeepLevel() {
    let mut session = QuoteSession::new(resolve("en-us").unwrap()).with_level(1);
    let err = session.parse("a’", None).unwrap_err();
    assert!(matches!(err, QuoteError::InvalidGlyphForLevel { level: 1, .. }));
    assert_eq!(session.level(), 1);
}
