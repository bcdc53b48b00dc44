/*!
 * Integration tests for the segment translation pipeline
 */

use ebt_translator::app_config::{Config, EngineProvider, TransformRule};
use ebt_translator::errors::{ProviderError, TranslationError};
use ebt_translator::providers::mock::MockEngine;
use ebt_translator::translation::{SegmentTranslator, TextTransform, EMPTY_TEXT};
use crate::common::{self, texts, translator};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[tokio::test]
async fn test_translateTexts_withDictionaryEngine_shouldConvertNestedQuotes() {
    init_logging();
    let engine = MockEngine::dictionary([("He said", "Ele disse"), ("I heard", "Eu ouvi")]);
    let mut xlt = translator(engine, "en", "pt");

    let out = xlt
        .translate_texts(&texts(&["He said, “I heard, ‘thus", "was it’.”"]))
        .await
        .unwrap();
    assert_eq!(out, texts(&["Ele disse, «Eu ouvi, “thus", "was it”.»"]));
    assert_eq!(xlt.source_level(), 0);
    assert_eq!(xlt.target_level(), 0);

    let request = &xlt.engine().requests()[0];
    assert_eq!(
        request.texts,
        texts(&["He said, <w>I heard, <x>thus", "was it</x>.</w> "])
    );
    assert_eq!(request.source_lang, "en");
    assert_eq!(request.target_lang, "pt");
}

#[tokio::test]
async fn test_translateTexts_toBrazil_shouldKeepAmericanNesting() {
    let mut xlt = translator(MockEngine::echo(), "en", "pt-br");
    let out = xlt.translate_texts(&texts(&["“I say: ‘done’”? "])).await.unwrap();
    assert_eq!(out, texts(&["“I say: ‘done’”? "]));
}

#[tokio::test]
async fn test_translateTexts_toBritish_shouldSwapNesting() {
    let mut xlt = translator(MockEngine::echo(), "en-us", "en-uk");
    let out = xlt.translate_texts(&texts(&["“I say: ‘done’”? "])).await.unwrap();
    assert_eq!(out, texts(&["‘I say: “done”’? "]));
}

#[tokio::test]
async fn test_translateTexts_acrossCalls_shouldCarryLevel() {
    let mut xlt = translator(MockEngine::echo(), "en", "pt");
    let first = xlt.translate_texts(&texts(&["He said, “Mendicants, "])).await.unwrap();
    assert_eq!(first, texts(&["He said, «Mendicants, "]));
    assert_eq!(xlt.source_level(), 1);
    assert_eq!(xlt.target_level(), 1);

    let second = xlt.translate_texts(&texts(&["listen.” "])).await.unwrap();
    assert_eq!(second, texts(&["listen.» "]));
    assert_eq!(xlt.target_level(), 0);
}

#[tokio::test]
async fn test_translateTexts_withLossyEngine_shouldKeepTrailingClose() {
    let mut xlt = translator(MockEngine::lossy(), "en", "pt");
    let out = xlt.translate_texts(&texts(&["“Hi”", "“Yo”"])).await.unwrap();
    assert_eq!(out, texts(&["«Hi»", "«Yo»"]));
    assert_eq!(xlt.target_level(), 0);
}

#[tokio::test]
async fn test_translateTexts_withDroppedClose_shouldRecoverNextSegment() {
    init_logging();
    // the engine loses the close tag of the first text
    let engine = MockEngine::dictionary([("Hi</w>", "Hi")]);
    let mut xlt = translator(engine, "en", "pt");

    let out = xlt
        .translate_texts(&texts(&["“Hi”", "plain", "“Yo”"]))
        .await
        .unwrap();
    // the lost close leaves the output level open; the next open is still
    // recognised by resynchronizing
    assert_eq!(out, texts(&["«Hi", "plain", "«Yo»"]));
    assert_eq!(xlt.source_level(), 0);
    assert_eq!(xlt.target_level(), 0);
}

#[tokio::test]
async fn test_translateTexts_withEllipsis_shouldSendEllipsisMarker() {
    let mut xlt = translator(MockEngine::echo(), "en", "pt");
    let out = xlt
        .translate_texts(&texts(&["They understand: “This is suffering”…", "“And this…”"]))
        .await
        .unwrap();
    assert_eq!(out, texts(&["They understand: «This is suffering»…", "«And this…»"]));
    assert_eq!(
        xlt.engine().requests()[0].texts,
        texts(&[
            "They understand: <w>This is suffering</w><ell/> ",
            "<w>And this<ell/></w> ",
        ])
    );
}

#[tokio::test]
async fn test_translateTexts_withEmptyTexts_shouldUsePlaceholder() {
    let mut xlt = translator(MockEngine::echo(), "en", "pt");
    let out = xlt.translate_texts(&texts(&["", "x", ""])).await.unwrap();
    assert_eq!(out, texts(&["", "x", ""]));
    assert_eq!(
        xlt.engine().requests()[0].texts,
        texts(&[EMPTY_TEXT, "x", EMPTY_TEXT])
    );
}

#[tokio::test]
async fn test_translateTexts_withNoTexts_shouldNotCallEngine() {
    let mut xlt = translator(MockEngine::echo(), "en", "pt");
    assert!(xlt.translate_texts(&[]).await.unwrap().is_empty());
    assert!(xlt.engine().requests().is_empty());
}

#[tokio::test]
async fn test_translateTexts_withShortEngine_shouldReportCountMismatch() {
    let mut xlt = translator(MockEngine::short(), "en", "pt");
    let err = xlt.translate_texts(&texts(&["a", "b"])).await.unwrap_err();
    assert!(matches!(
        err,
        TranslationError::SegmentCountMismatch { expected: 2, actual: 1 }
    ));
}

#[tokio::test]
async fn test_translateTexts_withFailingEngine_shouldReturnProviderError() {
    let mut xlt = translator(MockEngine::failing(), "en", "pt");
    let err = xlt.translate_texts(&texts(&["a"])).await.unwrap_err();
    assert!(matches!(
        err,
        TranslationError::Provider(ProviderError::ApiError { status_code: 500, .. })
    ));
}

#[tokio::test]
async fn test_translateTexts_withCurlySource_shouldCurlStraightQuotes() {
    let mut xlt = translator(MockEngine::echo(), "en", "pt").with_curly_source(true);
    let out = xlt
        .translate_texts(&texts(&["He said, \"I heard, 'thus", "was it'.\""]))
        .await
        .unwrap();
    assert_eq!(out, texts(&["He said, «I heard, “thus", "was it”.»"]));
}

#[tokio::test]
async fn test_translateTexts_withTransforms_shouldRewriteBothSides() {
    let mut xlt = translator(MockEngine::echo(), "en", "pt")
        .with_source_transforms(vec![TextTransform::new("Mendicants", "Bhikkhus").unwrap()])
        .with_target_transforms(vec![TextTransform::new(r"Bhikkhus", "Monges").unwrap()]);

    let out = xlt.translate_texts(&texts(&["“Mendicants!”"])).await.unwrap();
    assert_eq!(out, texts(&["«Monges!»"]));
    assert_eq!(xlt.engine().requests()[0].texts, texts(&["<w>Bhikkhus!</w> "]));
}

#[tokio::test]
async fn test_translateTexts_withStartLevel_shouldCloseOpenQuote() {
    let mut xlt = translator(MockEngine::echo(), "en", "pt").with_start_level(1);
    let out = xlt.translate_texts(&texts(&["so it is.” "])).await.unwrap();
    assert_eq!(out, texts(&["so it is.» "]));
    assert_eq!(xlt.target_level(), 0);
}

#[tokio::test]
async fn test_fromConfig_withApostropheDirectory_shouldLoadExceptions() {
    let dir = common::create_temp_dir().unwrap();
    common::create_test_file(dir.path(), "en.txt", "# plural nouns\ndogs\n").unwrap();

    let mut config = Config::default();
    config.engine.provider = EngineProvider::Mock;
    config.apostrophe_directory = Some(dir.path().to_path_buf());

    let mut xlt = SegmentTranslator::from_config(MockEngine::echo(), &config).unwrap();
    let out = xlt
        .translate_texts(&texts(&["“I saw ‘the dogs’ bones’.”"]))
        .await
        .unwrap();
    assert_eq!(out, texts(&["«I saw “the dogs’ bones”.»"]));
}

#[tokio::test]
async fn test_fromConfig_withConventionOverride_shouldUseIt() {
    let mut config = Config::default();
    config.engine.provider = EngineProvider::Mock;
    config.source_convention = Some("en-uk".to_string());
    config.target_convention = Some("pt-br".to_string());
    config.target_transforms.push(TransformRule::new(r"\s+$", ""));

    let mut xlt = SegmentTranslator::from_config(MockEngine::echo(), &config).unwrap();
    let out = xlt.translate_texts(&texts(&["‘I say: “done”’"])).await.unwrap();
    assert_eq!(out, texts(&["“I say: ‘done’”"]));
}

#[test]
fn test_fromConfig_withInvalidTransform_shouldFail() {
    let mut config = Config::default();
    config.source_transforms.push(TransformRule::new("(", ""));
    let result = SegmentTranslator::from_config(MockEngine::echo(), &config);
    assert!(matches!(result, Err(TranslationError::InvalidTransform { .. })));
}
