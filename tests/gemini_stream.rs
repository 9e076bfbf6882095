//! Gemini 后端对接本地 HTTP 服务器的集成测试
//!
//! 服务器按固定状态码和响应体回放，同时记录收到的每个请求。

use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use app_lib::models::chat::{ChatRole, HistoryTurn};
use app_lib::models::settings::AppSettings;
use app_lib::services::chat::gemini::GeminiBackend;
use app_lib::services::chat::{
    ChatBackend, ChatBridge, ChatError, ChatRequest, FALLBACK_FRAGMENT,
};
use app_lib::services::content::ContentStore;
use bytes::Bytes;
use futures_util::StreamExt;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::Value;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
struct Recorded {
    path: String,
    api_key: Option<String>,
    body: Value,
}

struct FakeGemini {
    base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeGemini {
    async fn start(status: StatusCode, content_type: &'static str, reply: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let recorded = Arc::clone(&recorded);
                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let recorded = Arc::clone(&recorded);
                        async move {
                            let path = req
                                .uri()
                                .path_and_query()
                                .map(|p| p.to_string())
                                .unwrap_or_default();
                            let api_key = req
                                .headers()
                                .get("x-goog-api-key")
                                .and_then(|v| v.to_str().ok())
                                .map(str::to_string);
                            let bytes = req
                                .into_body()
                                .collect()
                                .await
                                .map(|b| b.to_bytes())
                                .unwrap_or_default();
                            let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
                            recorded.lock().unwrap().push(Recorded {
                                path,
                                api_key,
                                body,
                            });

                            let response = Response::builder()
                                .status(status)
                                .header("content-type", content_type)
                                .body(Full::new(Bytes::from_static(reply.as_bytes())))
                                .unwrap();
                            Ok::<_, Infallible>(response)
                        }
                    });
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self {
            base_url: format!("http://{}/v1beta/models/", addr),
            requests,
        }
    }

    fn backend(&self, api_key: Option<&str>) -> GeminiBackend {
        let settings = AppSettings {
            api_base_url: self.base_url.clone(),
            ..AppSettings::default()
        };
        GeminiBackend::new(api_key.map(str::to_string), &settings)
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

const SSE_REPLY: &str = concat!(
    "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Nikhilesh builds \"}],\"role\":\"model\"}}]}\r\n\r\n",
    "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"ML systems\"}]}}]}\n\n",
    "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\".\"}]},\"finishReason\":\"STOP\"}]}\n\n",
);

fn bridge_over(backend: GeminiBackend) -> ChatBridge {
    let content = ContentStore::embedded().unwrap();
    ChatBridge::new(Arc::new(backend), content.portfolio(), 0.7)
}

#[tokio::test]
async fn test_streams_fragments_in_order() {
    let server = FakeGemini::start(StatusCode::OK, "text/event-stream", SSE_REPLY).await;
    let bridge = bridge_over(server.backend(Some("test-key")));

    let history = vec![HistoryTurn {
        role: ChatRole::Assistant,
        text: "System initialized.".into(),
    }];
    let mut fragments = Vec::new();
    let reply = bridge
        .send(history, "What do you build?".into(), |f| {
            fragments.push(f.to_string())
        })
        .await;

    assert_eq!(fragments, vec!["Nikhilesh builds ", "ML systems", "."]);
    assert_eq!(reply, "Nikhilesh builds ML systems.");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(
        request.path,
        "/v1beta/models/gemini-2.5-flash:streamGenerateContent?alt=sse"
    );
    assert_eq!(request.api_key.as_deref(), Some("test-key"));

    let contents = request.body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 2);
    assert_eq!(contents[0]["role"], "model");
    assert_eq!(contents[1]["role"], "user");
    assert_eq!(contents[1]["parts"][0]["text"], "What do you build?");
    let instruction = request.body["systemInstruction"]["parts"][0]["text"]
        .as_str()
        .unwrap();
    assert!(instruction.contains("Nikhilesh Pal"));
    assert!((request.body["generationConfig"]["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
}

#[tokio::test]
async fn test_client_error_keeps_api_status() {
    let server = FakeGemini::start(
        StatusCode::BAD_REQUEST,
        "application/json",
        r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#,
    )
    .await;
    let backend = server.backend(Some("bad-key"));
    let request = ChatRequest {
        system_instruction: "sys".into(),
        history: Vec::new(),
        message: "hi".into(),
        temperature: 0.7,
    };

    match backend.open_stream(&request).await {
        Err(ChatError::Api { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "INVALID_ARGUMENT: API key not valid.");
        }
        Err(other) => panic!("意外的错误: {:?}", other),
        Ok(_) => panic!("应当返回错误"),
    }
}

#[tokio::test]
async fn test_server_error_becomes_single_fallback() {
    let server = FakeGemini::start(
        StatusCode::INTERNAL_SERVER_ERROR,
        "text/plain",
        "upstream exploded",
    )
    .await;
    let bridge = bridge_over(server.backend(Some("k")));

    let fragments: Vec<String> = bridge
        .stream_reply(Vec::new(), "hi".into())
        .collect()
        .await;
    assert_eq!(fragments, vec![FALLBACK_FRAGMENT]);
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_missing_key_never_reaches_server() {
    let server = FakeGemini::start(StatusCode::OK, "text/event-stream", SSE_REPLY).await;
    let bridge = bridge_over(server.backend(None));

    let reply = bridge.send(Vec::new(), "hi".into(), |_| {}).await;
    assert_eq!(reply, FALLBACK_FRAGMENT);
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_in_stream_error_keeps_prefix() {
    const PARTIAL: &str = concat!(
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Partial\"}]}}]}\n\n",
        "data: {\"error\":{\"code\":503,\"message\":\"overloaded\",\"status\":\"UNAVAILABLE\"}}\n\n",
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"never\"}]}}]}\n\n",
    );
    let server = FakeGemini::start(StatusCode::OK, "text/event-stream", PARTIAL).await;
    let bridge = bridge_over(server.backend(Some("k")));

    let fragments: Vec<String> = bridge
        .stream_reply(Vec::new(), "hi".into())
        .collect()
        .await;
    assert_eq!(fragments, vec!["Partial".to_string(), FALLBACK_FRAGMENT.to_string()]);
}
