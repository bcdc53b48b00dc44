/*!
 * Tests for application configuration
 */

use std::str::FromStr;

use ebt_translator::app_config::{Config, EngineProvider, LogLevel, TransformRule};
use crate::common;

fn mock_config() -> Config {
    let mut config = Config::default();
    config.engine.provider = EngineProvider::Mock;
    config
}

#[test]
fn test_default_config_shouldTranslateEnglishToPortuguese() {
    let config = Config::default();
    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "pt");
    assert_eq!(config.source_author, "sujato");
    assert_eq!(config.target_author, "ebt-deepl");
    assert_eq!(config.engine.provider, EngineProvider::DeepL);
    assert_eq!(config.engine.tag_handling, "xml");
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(!config.curly_source);
}

#[test]
fn test_conventionTags_shouldDefaultToLanguages() {
    let mut config = Config::default();
    assert_eq!(config.source_convention_tag(), "en");
    assert_eq!(config.target_convention_tag(), "pt");

    config.target_convention = Some("pt-br".to_string());
    assert_eq!(config.target_convention_tag(), "pt-br");
}

#[test]
fn test_glossaryAuthor_shouldDefaultToTargetAuthor() {
    let mut config = Config::default();
    assert_eq!(config.glossary_author(), "ebt-deepl");
    config.glossary.author = Some("noeismet".to_string());
    assert_eq!(config.glossary_author(), "noeismet");
}

#[test]
fn test_forSource_shouldReplaceSourceSideOnly() {
    let mut config = mock_config();
    config.source_convention = Some("en-uk".to_string());
    config.source_transforms.push(TransformRule::new("Mendicants", "Bhikkhus"));
    config.target_transforms.push(TransformRule::new(r"\s+$", ""));

    let second = config.for_source("de", "sabbamitta");
    assert_eq!(second.source_language, "de");
    assert_eq!(second.source_author, "sabbamitta");
    assert_eq!(second.source_convention_tag(), "de");
    assert!(second.source_transforms.is_empty());
    assert_eq!(second.target_language, "pt");
    assert_eq!(second.target_transforms.len(), 1);
    assert_eq!(second.engine.provider, EngineProvider::Mock);
    assert!(second.validate().is_ok());
}

#[test]
fn test_validate_withMockEngine_shouldSucceed() {
    assert!(mock_config().validate().is_ok());
}

#[test]
fn test_validate_withInvalidLanguage_shouldFail() {
    let mut config = mock_config();
    config.target_language = "xx".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withUnknownConvention_shouldFail() {
    let mut config = mock_config();
    config.source_convention = Some("klingon".to_string());
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withInvalidTransform_shouldFail() {
    let mut config = mock_config();
    config.target_transforms.push(TransformRule::new("([a-z", ""));
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_deepLWithoutKey_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let mut config = Config::default();
    config.engine.auth_file = dir.path().join("missing.auth");
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_deepLWithInlineKey_shouldSucceed() {
    let mut config = Config::default();
    config.engine.api_key = "abc:fx".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_getApiKey_fromAuthFile_shouldTrimKey() {
    let dir = common::create_temp_dir().unwrap();
    let auth = common::create_test_file(dir.path(), "deepl.auth", "  secret-key:fx\n").unwrap();
    let mut config = Config::default();
    config.engine.auth_file = auth;
    assert_eq!(config.engine.get_api_key().unwrap(), "secret-key:fx");
    assert!(config.validate().is_ok());
}

#[test]
fn test_getApiKey_withEmptyAuthFile_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let auth = common::create_test_file(dir.path(), "deepl.auth", "\n").unwrap();
    let mut config = Config::default();
    config.engine.auth_file = auth;
    assert!(config.engine.get_api_key().is_err());
}

#[test]
fn test_saveAndLoad_shouldPreserveSettings() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let mut config = mock_config();
    config.target_language = "pt-br".to_string();
    config.source_transforms.push(TransformRule::new("Mendicants", "Bhikkhus"));
    config.curly_source = true;
    config.save(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.target_language, "pt-br");
    assert_eq!(loaded.engine.provider, EngineProvider::Mock);
    assert_eq!(loaded.source_transforms, config.source_transforms);
    assert!(loaded.curly_source);
}

#[test]
fn test_fromFile_withMinimalJson_shouldApplyDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "conf.json",
        r#"{ "source_language": "de", "target_language": "fr", "engine": { "provider": "mock" } }"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.source_author, "sujato");
    assert_eq!(config.engine.provider, EngineProvider::Mock);
    assert_eq!(config.engine.endpoint, "https://api-free.deepl.com");
    assert_eq!(config.engine.timeout_secs, 30);
    assert!(config.validate().is_ok());
}

#[test]
fn test_engineProvider_fromStr_shouldParseCaseInsensitively() {
    assert_eq!(EngineProvider::from_str("DeepL").unwrap(), EngineProvider::DeepL);
    assert_eq!(EngineProvider::from_str("mock").unwrap(), EngineProvider::Mock);
    assert!(EngineProvider::from_str("ollama").is_err());
    assert_eq!(EngineProvider::DeepL.to_string(), "deepl");
    assert_eq!(EngineProvider::Mock.display_name(), "Mock");
}

#[test]
fn test_logLevel_shouldMapToLevelFilter() {
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
