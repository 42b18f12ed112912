/*!
 * Tests for provider client construction
 */

use ppt_translator::app_config::{TranslationConfig, TranslationProvider};
use ppt_translator::providers::openai::OpenAI;
use ppt_translator::providers::{ClientSettings, Provider, ProviderClient};
use std::time::Duration;

fn config_for(provider: TranslationProvider, api_key: &str) -> TranslationConfig {
    let mut config = TranslationConfig::default();
    config.provider = provider;
    config.active_provider_config_mut().api_key = api_key.to_string();
    config
}

#[test]
fn test_providerClient_fromConfig_shouldSelectVariant() {
    let deepseek = ProviderClient::from_config(&config_for(TranslationProvider::DeepSeek, "sk-ds")).unwrap();
    let openai = ProviderClient::from_config(&config_for(TranslationProvider::OpenAI, "sk-oa")).unwrap();
    let anthropic = ProviderClient::from_config(&config_for(TranslationProvider::Anthropic, "sk-an")).unwrap();

    assert!(matches!(deepseek, ProviderClient::DeepSeek(_)));
    assert!(matches!(openai, ProviderClient::OpenAI(_)));
    assert!(matches!(anthropic, ProviderClient::Anthropic(_)));

    assert_eq!(deepseek.name(), "deepseek");
    assert_eq!(deepseek.model(), "deepseek-chat");
    assert_eq!(openai.model(), "gpt-5");
    assert_eq!(anthropic.name(), "anthropic");
    assert_eq!(anthropic.model(), "claude-3-7-sonnet-latest");
}

#[test]
fn test_clientSettings_fromConfig_shouldResolveProfileValues() {
    let settings = ClientSettings::from_config(&config_for(TranslationProvider::Anthropic, "sk-an")).unwrap();

    assert_eq!(settings.api_key, "sk-an");
    assert_eq!(settings.endpoint, "https://api.anthropic.com");
    assert_eq!(settings.timeout, Duration::from_secs(90));
}

#[test]
fn test_openAI_apiUrl_shouldAppendChatCompletions() {
    let settings = ClientSettings {
        api_key: "sk-test".to_string(),
        endpoint: "https://api.deepseek.com/".to_string(),
        model: "deepseek-chat".to_string(),
        timeout: Duration::from_secs(5),
        temperature: 0.3,
        max_tokens: 1024,
    };

    let client = OpenAI::new("deepseek", settings).unwrap();

    assert_eq!(client.api_url(), "https://api.deepseek.com/chat/completions");
}

#[test]
fn test_debugOutput_shouldNotLeakApiKey() {
    let client = ProviderClient::from_config(&config_for(TranslationProvider::OpenAI, "sk-very-secret")).unwrap();
    let debug = format!("{:?}", client);
    assert!(!debug.contains("sk-very-secret"));
}
