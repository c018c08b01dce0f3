//! Provider clients exercised against local wiremock servers.

use learngen::providers::{cerebras, groq, moonshot, openai, openrouter};
use learngen::{
    AnthropicClient, ChatMessage, ChatRole, GeminiClient, GenerationOptions, ProviderClient,
    ProviderConfig, ProviderKind, ProviderRegistry,
};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{any, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Nothing listens here, so every request fails at connect time.
const UNREACHABLE: &str = "http://127.0.0.1:1";

fn tutor_messages() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("You are a helpful AI tutor."),
        ChatMessage::user("Explain \"Photosynthesis\" in simple terms."),
    ]
}

fn all_clients(base_url: &str) -> Vec<(ProviderKind, Arc<dyn ProviderClient>)> {
    let config = ProviderKind::ALL
        .into_iter()
        .fold(ProviderConfig::new(), |config, kind| config.with_base_url(kind, base_url));
    let registry = ProviderRegistry::new(&config);
    ProviderKind::ALL
        .into_iter()
        .map(|kind| (kind, registry.get(kind).unwrap()))
        .collect()
}

mod missing_credential {
    use super::*;

    #[tokio::test]
    async fn test_empty_key_never_reaches_the_network() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        for (kind, client) in all_clients(&server.uri()) {
            for key in ["", "   "] {
                let err = client
                    .generate_content(key, client.default_model(), &tutor_messages(), None)
                    .await
                    .unwrap_err();

                assert!(err.is_missing_credential(), "{} accepted an empty key", kind);
                assert_eq!(
                    err.to_string(),
                    format!("{} API key is required", kind.display_name())
                );
            }
        }

        assert!(server.received_requests().await.unwrap().is_empty());
    }
}

mod rate_limits {
    use super::*;

    #[tokio::test]
    async fn test_every_provider_adds_a_rate_limit_hint_on_429() {
        for kind in ProviderKind::ALL {
            let server = MockServer::start().await;
            Mock::given(any())
                .respond_with(
                    ResponseTemplate::new(429)
                        .set_body_json(json!({"error": {"message": "Too many requests"}})),
                )
                .expect(1)
                .mount(&server)
                .await;

            let (_, client) = all_clients(&server.uri())
                .into_iter()
                .find(|(k, _)| *k == kind)
                .unwrap();

            let err = client
                .generate_content("test-key", client.default_model(), &tutor_messages(), None)
                .await
                .unwrap_err();

            assert_eq!(err.status(), Some(429), "{}", kind);
            assert!(
                err.to_string().contains("Rate limit reached"),
                "{} error lacked a rate-limit hint: {}",
                kind,
                err
            );
            assert!(err.to_string().contains("Too many requests"));
        }
    }

    #[tokio::test]
    async fn test_unparseable_error_body_still_fails_cleanly() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(503).set_body_string("<html>upstream down</html>"))
            .mount(&server)
            .await;

        let client = groq::client().with_base_url(server.uri());
        let err = client
            .generate_content("gsk_test", groq::DEFAULT_MODEL, &tutor_messages(), None)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Groq API error (503): Service Unavailable");
    }
}

mod openai_format {
    use super::*;

    #[tokio::test]
    async fn test_groq_request_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer gsk_test"))
            .and(body_partial_json(json!({
                "model": "llama-3.1-8b-instant",
                "max_tokens": 256
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "Plants make sugar from light."}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = groq::client().with_base_url(server.uri());
        let options = GenerationOptions::new().with_max_tokens(256);
        let text = client
            .generate_content("gsk_test", "llama-3.1-8b-instant", &tutor_messages(), Some(&options))
            .await
            .unwrap();

        assert_eq!(text, "Plants make sugar from light.");
    }

    #[tokio::test]
    async fn test_openrouter_sends_attribution_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("http-referer", "https://learngen.app"))
            .and(header("x-title", "Learngen"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "ok"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = openrouter::client(Some("https://learngen.app"), Some("Learngen"))
            .with_base_url(server.uri());
        let text = client
            .generate_content("sk-or-test", openrouter::DEFAULT_MODEL, &tutor_messages(), None)
            .await
            .unwrap();

        assert_eq!(text, "ok");
    }

    #[tokio::test]
    async fn test_success_without_text_is_a_response_error() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = cerebras::client().with_base_url(server.uri());
        let err = client
            .generate_content("csk-test", cerebras::DEFAULT_MODEL, &tutor_messages(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, learngen::ProviderError::ResponseError(_)));
    }

    #[tokio::test]
    async fn test_connection_failure_surfaces_on_generation() {
        let client = moonshot::client().with_base_url(UNREACHABLE);
        let err = client
            .generate_content("zai-test", moonshot::DEFAULT_MODEL, &tutor_messages(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, learngen::ProviderError::TransportFailure(_)));
    }

    #[tokio::test]
    async fn test_query_string_key_stays_out_of_transport_errors() {
        let client = GeminiClient::new().with_base_url(UNREACHABLE);
        let err = client
            .generate_content("AIza-SECRET-123", "gemini-2.0-flash", &tutor_messages(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, learngen::ProviderError::TransportFailure(_)));
        assert!(
            !err.to_string().contains("AIza-SECRET-123"),
            "key leaked into: {}",
            err
        );
    }
}

mod system_prompt_placement {
    use super::*;

    #[tokio::test]
    async fn test_anthropic_moves_system_out_of_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(header("x-api-key", "sk-ant-test"))
            .and(header("anthropic-version", "2023-06-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{"type": "text", "text": "Chlorophyll absorbs light."}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = AnthropicClient::new().with_base_url(server.uri());
        let text = client
            .generate_content("sk-ant-test", "claude-3-5-haiku-latest", &tutor_messages(), None)
            .await
            .unwrap();
        assert_eq!(text, "Chlorophyll absorbs light.");

        let requests = server.received_requests().await.unwrap();
        let body: Value = requests[0].body_json().unwrap();

        assert_eq!(body["system"], "You are a helpful AI tutor.");
        let turns = body["messages"].as_array().unwrap();
        assert_eq!(turns.len(), 1);
        assert!(turns.iter().all(|t| t["role"] != "system"));
        assert!(turns
            .iter()
            .all(|t| t["content"] != "You are a helpful AI tutor."));
    }

    #[tokio::test]
    async fn test_gemini_uses_system_instruction_and_query_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .and(query_param("key", "AIza-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": "Light to sugar."}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut messages = tutor_messages();
        messages.push(ChatMessage::assistant("Shall I go deeper?"));
        messages.push(ChatMessage::new(ChatRole::User, "Yes"));

        let client = GeminiClient::new().with_base_url(server.uri());
        let text = client
            .generate_content("AIza-test", "gemini-2.0-flash", &messages, None)
            .await
            .unwrap();
        assert_eq!(text, "Light to sugar.");

        let requests = server.received_requests().await.unwrap();
        assert!(!requests[0].headers.contains_key("authorization"));
        let body: Value = requests[0].body_json().unwrap();

        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            "You are a helpful AI tutor."
        );
        let roles: Vec<&str> = body["contents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["role"].as_str().unwrap())
            .collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
    }
}

mod model_listing {
    use super::*;

    #[tokio::test]
    async fn test_catalog_providers_fall_back_when_unreachable() {
        let clients: Vec<Arc<dyn ProviderClient>> = vec![
            Arc::new(openrouter::client(None, None).with_base_url(UNREACHABLE)),
            Arc::new(groq::client().with_base_url(UNREACHABLE)),
            Arc::new(openai::client().with_base_url(UNREACHABLE)),
        ];

        for client in clients {
            let models = client.list_models(Some("some-key")).await;
            assert!(
                !models.is_empty(),
                "{} returned no fallback models",
                client.descriptor().id
            );
        }
    }

    #[tokio::test]
    async fn test_server_errors_and_bad_json_fall_back() {
        let server = MockServer::start().await;
        Mock::given(path("/models"))
            .and(header("authorization", "Bearer gsk_test"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let groq = groq::client().with_base_url(server.uri());
        assert_eq!(groq.list_models(Some("gsk_test")).await, groq::fallback_models());

        let failing = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .mount(&failing)
            .await;

        let openai = openai::client().with_base_url(failing.uri());
        assert_eq!(openai.list_models(Some("sk-test")).await, openai::fallback_models());
    }

    #[tokio::test]
    async fn test_keyed_catalogs_skip_network_without_key() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let openai = openai::client().with_base_url(server.uri());
        assert!(!openai.list_models(None).await.is_empty());
        let groq = groq::client().with_base_url(server.uri());
        assert!(!groq.list_models(Some("")).await.is_empty());
    }

    #[tokio::test]
    async fn test_openrouter_catalog_orders_free_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [
                {"id": "openai/gpt-4o", "name": "GPT-4o", "context_length": 128000,
                 "pricing": {"prompt": "0.0000025", "completion": "0.00001"}},
                {"id": "qwen/qwen-2.5-72b-instruct:free", "name": "Qwen 2.5 72B (free)",
                 "pricing": {"prompt": "0", "completion": "0"}},
                {"id": "anthropic/claude-3.5-haiku", "name": "Claude 3.5 Haiku",
                 "pricing": {"prompt": "0.0000008", "completion": "0.000004"}},
                {"id": "google/gemma-3-27b-it:free", "name": "Gemma 3 27B (free)"}
            ]})))
            .expect(1)
            .mount(&server)
            .await;

        let client = openrouter::client(None, None).with_base_url(server.uri());
        let models = client.list_models(None).await;

        let ids: Vec<&str> = models.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "google/gemma-3-27b-it:free",
                "qwen/qwen-2.5-72b-instruct:free",
                "anthropic/claude-3.5-haiku",
                "openai/gpt-4o",
            ]
        );
        assert_eq!(models[3].context_length, Some(128000));
    }

    #[tokio::test]
    async fn test_openai_catalog_filters_gpt_models() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [
                {"id": "text-embedding-3-small"},
                {"id": "gpt-4o"},
                {"id": "gpt-4.1"},
                {"id": "tts-1"}
            ]})))
            .mount(&server)
            .await;

        let client = openai::client().with_base_url(server.uri());
        let ids: Vec<String> = client
            .list_models(Some("sk-test"))
            .await
            .into_iter()
            .map(|m| m.id)
            .collect();

        assert_eq!(ids, vec!["gpt-4o", "gpt-4.1"]);
    }

    #[tokio::test]
    async fn test_static_providers_ignore_the_key() {
        let anthropic = AnthropicClient::new().with_base_url(UNREACHABLE);
        let gemini = GeminiClient::new().with_base_url(UNREACHABLE);
        let moonshot = moonshot::client().with_base_url(UNREACHABLE);

        assert_eq!(anthropic.list_models(None).await, anthropic.list_models(Some("k")).await);
        assert!(!gemini.list_models(None).await.is_empty());
        assert!(!moonshot.list_models(Some("k")).await.is_empty());
        assert!(!anthropic.descriptor().supports_list_models);
    }
}
