/*!
 * Tests for error types and conversions
 */

use ebt_translator::errors::{AppError, GlossaryError, ProviderError, QuoteError, TranslationError};

#[test]
fn test_quoteError_structuralVariants_shouldIncludeTextVerbatim() {
    let text = "Eu disse!</x>?</w>".to_string();
    let errors = vec![
        QuoteError::UnmatchedCloseQuote { text: text.clone() },
        QuoteError::NestingExceeded { text: text.clone() },
        QuoteError::InvalidGlyphForLevel {
            glyph: "</x>".to_string(),
            level: 1,
            text: text.clone(),
        },
    ];
    for error in errors {
        assert!(error.is_structural());
        assert!(error.to_string().contains(&text), "{}", error);
    }
}

#[test]
fn test_quoteError_configuration_shouldNameTagAndNotBeStructural() {
    let error = QuoteError::Configuration { tag: "xx-yy".to_string() };
    assert!(!error.is_structural());
    assert!(error.to_string().contains("xx-yy"));
}

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 456,
        message: "Quota exceeded".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("456"));
    assert!(display.contains("Quota exceeded"));
}

#[test]
fn test_providerError_authenticationError_shouldDisplayCorrectly() {
    let error = ProviderError::AuthenticationError("Invalid API key".to_string());
    let display = format!("{}", error);
    assert!(display.contains("Authentication error"));
    assert!(display.contains("Invalid API key"));
}

#[test]
fn test_glossaryError_missingValue_shouldNameKey() {
    let error = GlossaryError::MissingValue { key: "nibbana".to_string() };
    assert!(error.to_string().contains("nibbana"));
}

#[test]
fn test_translationError_fromQuoteError_shouldWrapCorrectly() {
    let quote_error = QuoteError::UnmatchedCloseQuote { text: "a”".to_string() };
    let error: TranslationError = quote_error.clone().into();
    assert!(matches!(error, TranslationError::Quote(ref e) if *e == quote_error));
}

#[test]
fn test_translationError_segmentCountMismatch_shouldDisplayCounts() {
    let error = TranslationError::SegmentCountMismatch { expected: 3, actual: 2 };
    let display = error.to_string();
    assert!(display.contains('3'));
    assert!(display.contains('2'));
}

#[test]
fn test_appError_fromConversions_shouldMapVariants() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
    assert!(matches!(AppError::from(io_error), AppError::File(ref m) if m.contains("missing.json")));

    let any_error = anyhow::anyhow!("something odd");
    assert!(matches!(AppError::from(any_error), AppError::Unknown(_)));

    let provider_error = ProviderError::RequestFailed("timeout".to_string());
    assert!(matches!(AppError::from(provider_error), AppError::Provider(_)));
}
