//! # Gemini 流式接口后端
//!
//! 直接调用 Gemini REST API 的 `streamGenerateContent`（`alt=sse`），
//! 把 SSE 事件中的 JSON 分块解析为文本片段：
//! - 片段为 `candidates[0].content.parts[*].text` 的拼接，没有文本的分块跳过
//! - 非 2xx 响应解析错误体为 `STATUS: message`
//! - 流中出现 `error` 对象时以 `ChatError::Api` 结束

use std::collections::VecDeque;

use bytes::Bytes;
use futures_util::stream::{self, Stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::sse::SseDecoder;
use super::{BoxFuture, ChatBackend, ChatError, ChatRequest, FragmentStream};
use crate::models::settings::AppSettings;

/// Gemini API 后端
#[derive(Clone)]
pub struct GeminiBackend {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiBackend {
    /// 创建后端
    ///
    /// # 参数
    /// - `api_key` - 启动时读取的 API Key；为 `None` 时每次请求都以 `MissingApiKey` 失败
    /// - `settings` - 提供模型名称和 API 根路径
    pub fn new(api_key: Option<String>, settings: &AppSettings) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: settings.model.clone(),
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn stream_url(&self) -> String {
        format!("{}/{}:streamGenerateContent?alt=sse", self.base_url, self.model)
    }
}

impl ChatBackend for GeminiBackend {
    fn open_stream<'a>(
        &'a self,
        request: &'a ChatRequest,
    ) -> BoxFuture<'a, Result<FragmentStream, ChatError>> {
        Box::pin(async move {
            let api_key = self.api_key.as_deref().ok_or(ChatError::MissingApiKey)?;

            let response = self
                .client
                .post(self.stream_url())
                .header("x-goog-api-key", api_key)
                .json(&GenerateContentRequest::from(request))
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "无法读取错误响应".to_string());
                return Err(parse_api_error(status, &body));
            }

            log::debug!("Gemini 流已建立: model={}", self.model);
            Ok(decode_fragments(response.bytes_stream()))
        })
    }
}

// ============ 请求体 ============

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

impl<'a> From<&'a ChatRequest> for GenerateContentRequest<'a> {
    fn from(request: &'a ChatRequest) -> Self {
        let mut contents: Vec<Content<'a>> = request
            .history
            .iter()
            .map(|turn| Content {
                role: Some(turn.role.as_api_str()),
                parts: vec![Part { text: &turn.text }],
            })
            .collect();
        contents.push(Content {
            role: Some("user"),
            parts: vec![Part {
                text: &request.message,
            }],
        });

        Self {
            contents,
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: &request.system_instruction,
                }],
            },
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        }
    }
}

// ============ 响应分块 ============

#[derive(Debug, Deserialize)]
struct StreamChunk {
    candidates: Option<Vec<Candidate>>,
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<u16>,
    message: Option<String>,
    status: Option<String>,
}

impl ErrorBody {
    fn into_error(self, fallback_status: u16, raw: &str) -> ChatError {
        let message = self.message.unwrap_or_else(|| raw.to_string());
        let message = match self.status {
            Some(status) if !status.is_empty() => format!("{}: {}", status, message),
            _ => message,
        };
        ChatError::Api {
            status: self.code.unwrap_or(fallback_status),
            message,
        }
    }
}

/// 把非 2xx 响应体转换为错误；无法解析时原样保留响应体
pub(crate) fn parse_api_error(status: u16, body: &str) -> ChatError {
    match serde_json::from_str::<ErrorWrapper>(body) {
        Ok(wrapper) => wrapper.error.into_error(status, body),
        Err(_) => ChatError::Api {
            status,
            message: body.to_string(),
        },
    }
}

/// 解析一个 SSE 事件的 JSON 数据
///
/// # 返回值
/// - `Ok(Some(text))` - 分块包含文本
/// - `Ok(None)` - 没有文本（例如只有 finishReason 或用量统计），或无法解析
///
/// # 错误
/// 分块中包含 `error` 对象时返回 `ChatError::Api`
fn parse_chunk(data: &str) -> Result<Option<String>, ChatError> {
    let chunk: StreamChunk = match serde_json::from_str(data) {
        Ok(chunk) => chunk,
        Err(e) => {
            log::debug!("跳过无法解析的流分块: {} - data: {}", e, data);
            return Ok(None);
        }
    };

    if let Some(error) = chunk.error {
        return Err(error.into_error(0, data));
    }

    let text: String = chunk
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    Ok((!text.is_empty()).then_some(text))
}

/// 解码状态
struct DecodeState<S> {
    bytes: std::pin::Pin<Box<S>>,
    decoder: SseDecoder,
    events: VecDeque<String>,
    exhausted: bool,
}

/// 把响应字节流转换为文本片段流
///
/// 出现第一个错误后流立即结束。
pub(crate) fn decode_fragments<S, E>(bytes: S) -> FragmentStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Into<ChatError> + Send + 'static,
{
    let state = DecodeState {
        bytes: Box::pin(bytes),
        decoder: SseDecoder::new(),
        events: VecDeque::new(),
        exhausted: false,
    };

    stream::unfold(Some(state), |state| async move {
        let mut state = state?;
        loop {
            if let Some(event) = state.events.pop_front() {
                match parse_chunk(&event) {
                    Ok(Some(text)) => return Some((Ok(text), Some(state))),
                    Ok(None) => continue,
                    Err(e) => return Some((Err(e), None)),
                }
            }
            if state.exhausted {
                return None;
            }
            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    let events = state.decoder.feed(&chunk);
                    state.events.extend(events);
                }
                Some(Err(e)) => return Some((Err(e.into()), None)),
                None => {
                    state.exhausted = true;
                    state.events.extend(state.decoder.finish());
                }
            }
        }
    })
    .boxed()
}
