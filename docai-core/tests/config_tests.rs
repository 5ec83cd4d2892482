//! Integration tests for configuration resolution and persistence

use docai_core::config::{
    load_config, resolve, save_config, AiConfig, ConfigError, ConfigStore, Direction,
    FileConfigStore, MemoryConfigStore, ProviderId, SecretString, ValidationErrorKind,
    AI_CONFIG_KEY, DEFAULT_BAILIAN_BASE_URL,
};
use proptest::prelude::*;
use tempfile::TempDir;
use test_case::test_case;

fn assert_no_duplicates(priority: &[ProviderId]) {
    for (i, id) in priority.iter().enumerate() {
        assert!(
            !priority[i + 1..].contains(id),
            "duplicate {} in {:?}",
            id,
            priority
        );
    }
}

#[test_case(None ; "absent")]
#[test_case(Some("") ; "empty string")]
#[test_case(Some("{not json") ; "invalid json")]
#[test_case(Some("\"gemini\"") ; "json string")]
#[test_case(Some(r#"{"priority": "gemini"}"#) ; "priority not a list")]
fn test_unusable_blob_yields_defaults(raw: Option<&str>) {
    assert_eq!(resolve(raw), AiConfig::default());
}

#[test_case(r#"{"provider": "gemini", "apiKey": "AIza-old", "model": "gemini-pro"}"#, ProviderId::Gemini ; "flat gemini")]
#[test_case(r#"{"provider": "bailian", "apiKey": "sk-old", "model": "qwen-max"}"#, ProviderId::Bailian ; "flat bailian")]
#[test_case(r#"{"apiKey": "AIza-old"}"#, ProviderId::Gemini ; "flat without provider")]
fn test_flat_shape_moves_credential_to_named_provider(raw: &str, named: ProviderId) {
    let config = resolve(Some(raw));
    let other = named.priority_first()[1];

    assert_eq!(config.priority, named.priority_first());
    assert!(!config.provider(named).credential.is_empty());
    assert!(config.provider(other).credential.is_empty());
    assert!(config.provider(other).model.is_empty());
}

#[test]
fn test_flat_bailian_keeps_model_and_endpoint() {
    let config = resolve(Some(
        r#"{"provider": "bailian", "apiKey": "sk-old", "model": "qwen-max", "baseURL": "https://proxy.example.com/v1"}"#,
    ));

    assert_eq!(config.priority, vec![ProviderId::Bailian, ProviderId::Gemini]);
    assert_eq!(config.bailian.credential.expose_secret(), "sk-old");
    assert_eq!(config.bailian.model, "qwen-max");
    assert_eq!(
        config.bailian.endpoint.as_deref(),
        Some("https://proxy.example.com/v1")
    );
    assert!(config.gemini.credential.is_empty());
}

#[test_case(r#"{"apiKey": "k"}"#, false ; "missing flag")]
#[test_case(r#"{"apiKey": "k", "enabled": false}"#, false ; "explicitly off")]
#[test_case(r#"{"apiKey": "k", "enabled": true}"#, true ; "explicitly on")]
fn test_flat_shape_global_switch(raw: &str, expected: bool) {
    assert_eq!(resolve(Some(raw)).enabled, expected);
}

#[test]
fn test_flat_shape_without_endpoint_uses_default() {
    let config = resolve(Some(r#"{"provider": "bailian", "apiKey": "sk"}"#));
    assert_eq!(
        config.bailian.endpoint.as_deref(),
        Some(DEFAULT_BAILIAN_BASE_URL)
    );
}

#[test]
fn test_unprioritized_shape_enables_both_providers() {
    let config = resolve(Some(
        r#"{
            "enabled": true,
            "provider": "bailian",
            "gemini": {"apiKey": "AIza", "model": "gemini-pro", "enabled": false},
            "bailian": {"apiKey": "sk", "model": "qwen-plus"}
        }"#,
    ));

    assert!(config.gemini.enabled);
    assert!(config.bailian.enabled);
    assert_eq!(config.priority, vec![ProviderId::Bailian, ProviderId::Gemini]);
    assert_eq!(config.gemini.model, "gemini-pro");
    assert_eq!(config.bailian.credential.expose_secret(), "sk");
    assert_eq!(
        config.bailian.endpoint.as_deref(),
        Some(DEFAULT_BAILIAN_BASE_URL)
    );
}

#[test]
fn test_current_shape_merges_over_defaults() {
    let config = resolve(Some(
        r#"{
            "enabled": false,
            "priority": ["bailian", "bailian", "mistral", "gemini"],
            "gemini": {"enabled": false},
            "requestTimeoutSecs": 15
        }"#,
    ));

    assert!(!config.enabled);
    assert_eq!(config.priority, vec![ProviderId::Bailian, ProviderId::Gemini]);
    assert!(!config.gemini.enabled);
    assert!(config.bailian.enabled);
    assert_eq!(config.request_timeout_secs, 15);
    assert_eq!(
        config.bailian.endpoint.as_deref(),
        Some(DEFAULT_BAILIAN_BASE_URL)
    );
}

#[test]
fn test_current_shape_allows_empty_priority() {
    let config = resolve(Some(r#"{"priority": []}"#));
    assert!(config.priority.is_empty());
}

#[test]
fn test_resolve_is_idempotent_on_its_output() {
    let legacy = resolve(Some(r#"{"provider": "bailian", "apiKey": "sk-old"}"#));
    let blob = serde_json::to_string(&legacy).unwrap();
    assert_eq!(resolve(Some(&blob)), legacy);
}

#[test]
fn test_saved_blob_uses_persisted_field_names() {
    let store = MemoryConfigStore::new();
    let mut config = AiConfig::default();
    config.bailian.credential = SecretString::new("sk-live");
    save_config(&store, &config).unwrap();

    let blob: serde_json::Value =
        serde_json::from_str(&store.get(AI_CONFIG_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(blob["bailian"]["apiKey"], "sk-live");
    assert_eq!(blob["priority"], serde_json::json!(["gemini", "bailian"]));
}

#[test]
fn test_file_store_persists_across_instances() {
    let dir = TempDir::new().unwrap();
    let mut config = AiConfig::default();
    config.move_priority(0, Direction::Down);
    config.toggle_provider(ProviderId::Gemini);
    config.gemini.credential = SecretString::new("${GEMINI_API_KEY}");

    save_config(&FileConfigStore::new(dir.path()), &config).unwrap();

    let reopened = FileConfigStore::new(dir.path());
    let loaded = load_config(&reopened).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.active_providers(), vec![ProviderId::Bailian]);
    assert!(dir.path().join(format!("{}.json", AI_CONFIG_KEY)).exists());
}

#[test]
fn test_file_store_missing_directory_reads_defaults() {
    let dir = TempDir::new().unwrap();
    let store = FileConfigStore::new(dir.path().join("not-created-yet"));
    assert_eq!(load_config(&store).unwrap(), AiConfig::default());
}

#[test]
fn test_file_store_reads_legacy_blob() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(format!("{}.json", AI_CONFIG_KEY)),
        r#"{"provider": "bailian", "apiKey": "sk-legacy", "enabled": true}"#,
    )
    .unwrap();

    let config = load_config(&FileConfigStore::new(dir.path())).unwrap();
    assert!(config.enabled);
    assert_eq!(config.priority[0], ProviderId::Bailian);
    assert_eq!(config.bailian.credential.expose_secret(), "sk-legacy");
}

#[test]
fn test_save_rejects_bad_endpoint() {
    let store = MemoryConfigStore::new();
    let mut config = AiConfig::default();
    config.bailian.endpoint = Some("ftp://dashscope.example.com".to_string());

    match save_config(&store, &config) {
        Err(ConfigError::ValidationError(e)) => {
            assert_eq!(e.field_path, "bailian.baseURL");
            assert!(matches!(e.kind, ValidationErrorKind::InvalidUrl { .. }));
        }
        other => panic!("Expected validation error, got {:?}", other),
    }
}

fn provider_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("gemini".to_string()),
        Just("bailian".to_string()),
        "[a-z]{0,8}",
    ]
}

fn arbitrary_blob() -> impl Strategy<Value = serde_json::Value> {
    (
        proptest::option::of(any::<bool>()),
        proptest::option::of(proptest::collection::vec(provider_name(), 0..6)),
        proptest::option::of(provider_name()),
        proptest::option::of("[a-zA-Z0-9-]{0,12}"),
        any::<bool>(),
    )
        .prop_map(|(enabled, priority, provider, api_key, with_objects)| {
            let mut blob = serde_json::Map::new();
            if let Some(enabled) = enabled {
                blob.insert("enabled".into(), enabled.into());
            }
            if let Some(priority) = priority {
                blob.insert("priority".into(), priority.into());
            }
            if let Some(provider) = provider {
                blob.insert("provider".into(), provider.into());
            }
            if let Some(api_key) = api_key {
                blob.insert("apiKey".into(), api_key.into());
            }
            if with_objects {
                blob.insert("gemini".into(), serde_json::json!({"apiKey": "g"}));
                blob.insert("bailian".into(), serde_json::json!({"model": "qwen-plus"}));
            }
            serde_json::Value::Object(blob)
        })
}

proptest! {
    #[test]
    fn prop_resolve_never_panics_on_arbitrary_text(raw in ".*") {
        let config = resolve(Some(&raw));
        assert_no_duplicates(&config.priority);
    }

    #[test]
    fn prop_resolved_priority_has_no_duplicates(blob in arbitrary_blob()) {
        let config = resolve(Some(&blob.to_string()));
        assert_no_duplicates(&config.priority);
        prop_assert!(config.priority.len() <= ProviderId::ALL.len());
    }

    #[test]
    fn prop_resolved_config_is_saveable(blob in arbitrary_blob()) {
        let store = MemoryConfigStore::new();
        let config = resolve(Some(&blob.to_string()));
        prop_assert!(save_config(&store, &config).is_ok());
        prop_assert_eq!(load_config(&store).unwrap(), config);
    }
}
