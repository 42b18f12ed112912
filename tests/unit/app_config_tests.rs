/*!
 * Tests for application configuration
 */

use anyhow::Result;
use ppt_translator::app_config::{Config, LogLevel, TranslationConfig, TranslationProvider};
use ppt_translator::errors::{ErrorClass, TranslationError};
use ppt_translator::translation::concurrency::ProviderProfile;
use ppt_translator::translation::CoordinatorOptions;

use crate::common;

fn config_with_key(provider: TranslationProvider) -> Config {
    let mut config = Config::default();
    config.translation.provider = provider;
    config.translation.active_provider_config_mut().api_key = "sk-test".to_string();
    config
}

#[test]
fn test_defaultConfig_shouldTranslateChineseToEnglishWithDeepSeek() {
    let config = Config::default();
    assert_eq!(config.source_language, "zh");
    assert_eq!(config.target_language, "en");
    assert_eq!(config.translation.provider, TranslationProvider::DeepSeek);
    assert_eq!(config.translation.available_providers.len(), 4);
    assert!(config.cache.enabled);
    assert!(!config.cache.persistent);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefault() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.source_language, config.source_language);
    assert_eq!(reloaded.translation.provider, config.translation.provider);
    Ok(())
}

#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{
            "source_language": "en",
            "target_language": "fr",
            "translation": {
                "provider": "anthropic",
                "available_providers": [{ "type": "anthropic", "model": "claude-custom" }]
            }
        }"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.translation.provider, TranslationProvider::Anthropic);
    assert_eq!(config.translation.get_model(), "claude-custom");
    assert_eq!(config.translation.common.retry_count, 3);
    assert_eq!(config.translation.common.retry_backoff_ms, 1000);
    assert!(config.cache.enabled);
    Ok(())
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;
    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

#[test]
fn test_validate_withValidConfig_shouldPass() {
    let mut config = config_with_key(TranslationProvider::OpenAI);
    config.source_language = "zh-TW".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withInvalidLanguage_shouldFail() {
    let mut config = config_with_key(TranslationProvider::OpenAI);
    config.target_language = "klingon".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroChunkSizeOrWorkers_shouldFail() {
    let mut config = config_with_key(TranslationProvider::OpenAI);
    config.translation.active_provider_config_mut().max_chars_per_request = 0;
    assert!(config.validate().is_err());

    let mut config = config_with_key(TranslationProvider::OpenAI);
    config.translation.active_provider_config_mut().concurrent_requests = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withMissingApiKey_shouldFailWithAuthError() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Grok;
    if std::env::var(TranslationProvider::Grok.api_key_env()).is_ok() {
        return;
    }

    let error = config.validate().unwrap_err();
    let translation_error = error.downcast_ref::<TranslationError>();
    assert!(matches!(
        translation_error,
        Some(TranslationError::Provider(e)) if e.class() == ErrorClass::Auth
    ));
    assert!(error.to_string().contains("GROK_API_KEY"));
}

#[test]
fn test_validate_withMalformedEndpoint_shouldFail() {
    let mut config = config_with_key(TranslationProvider::OpenAI);
    config.translation.active_provider_config_mut().endpoint = "not a url".to_string();
    assert!(config.validate().is_err());

    config.translation.active_provider_config_mut().endpoint = "ftp://example.com".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_getApiKey_withConfiguredKey_shouldTrimAndPreferConfig() {
    let mut config = TranslationConfig::default();
    config.provider = TranslationProvider::Grok;
    config.active_provider_config_mut().api_key = "  xai-key \n".to_string();
    assert_eq!(config.get_api_key(), "xai-key");
}

#[test]
fn test_getEndpoint_withoutOverride_shouldUseProviderDefault() {
    let mut config = TranslationConfig::default();
    config.provider = TranslationProvider::Anthropic;
    assert_eq!(config.get_endpoint(), "https://api.anthropic.com");

    config.provider = TranslationProvider::OpenAI;
    config.active_provider_config_mut().endpoint = "http://localhost:8080/v1".to_string();
    assert_eq!(config.get_endpoint(), "http://localhost:8080/v1");
}

#[test]
fn test_providerConfig_defaults_shouldFollowProfiles() {
    let config = TranslationConfig::default();
    for provider in TranslationProvider::ALL {
        let profile = ProviderProfile::for_provider(provider);
        let provider_config = config
            .get_provider_config(&provider)
            .expect("default config lists every provider");
        assert_eq!(provider_config.concurrent_requests, profile.max_concurrent_requests);
        assert_eq!(provider_config.max_chars_per_request, profile.recommended_chunk_chars);
        assert_eq!(provider_config.model, provider.default_model());
    }
}

#[test]
fn test_coordinatorOptions_fromConfig_shouldUseActiveProvider() {
    let mut config = config_with_key(TranslationProvider::Anthropic);
    config.translation.active_provider_config_mut().max_chars_per_request = 750;
    config.translation.active_provider_config_mut().concurrent_requests = 2;
    config.translation.common.retry_count = 5;

    let options = CoordinatorOptions::from_config(&config);

    assert_eq!(options.max_chunk_size, 750);
    assert_eq!(options.max_workers, 2);
    assert_eq!(options.retry.max_attempts, 6);
    assert_eq!(options.source_language, "zh");
}
