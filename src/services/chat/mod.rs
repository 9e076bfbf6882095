//! # 聊天桥（Chat Bridge）
//!
//! 把终端面板的用户消息转发给生成式模型，并以流式片段的形式返回回复。
//!
//! ## 分层
//!
//! | 模块 | 职责 |
//! |------|------|
//! | `prompt` | 根据作品集内容生成系统指令 |
//! | `sse` | SSE 增量解码 |
//! | `gemini` | Gemini REST 流式接口（`ChatBackend` 的默认实现） |
//! | `transcript` | 内存中的对话记录 |
//!
//! ## 失败处理
//!
//! 后端的任何失败（缺少 API Key、网络错误、非 2xx 响应、流中断）都不会
//! 作为错误返回给调用方：回复流会产出一条固定的系统错误片段后结束，
//! 调用方总是把收到的片段追加到消息里，不需要区分成功和失败。

pub mod gemini;
pub mod prompt;
pub mod sse;
pub mod transcript;

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

use futures_util::stream::{self, BoxStream, StreamExt};

use crate::models::chat::{ChatEvent, ChatMessage, HistoryTurn};
use crate::models::portfolio::Portfolio;
use transcript::Transcript;

/// 后端失败时追加到回复末尾的固定片段
pub const FALLBACK_FRAGMENT: &str =
    "\n[System Error: Unable to connect to neural interface. Please check API key configuration.]";

/// 聊天后端内部错误，不会离开聊天桥
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("未配置 API Key")]
    MissingApiKey,

    #[error("请求失败: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API 返回错误 ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("流读取失败: {0}")]
    Stream(String),
}

/// 装箱的 Send future
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// 后端返回的原始片段流：第一个错误之后不再有元素
pub type FragmentStream = BoxStream<'static, Result<String, ChatError>>;

/// 一次请求的完整输入
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system_instruction: String,
    pub history: Vec<HistoryTurn>,
    pub message: String,
    pub temperature: f32,
}

/// 生成式模型后端
pub trait ChatBackend: Send + Sync {
    /// 发起请求并返回片段流
    ///
    /// # 错误
    /// 请求无法发出或服务端拒绝时返回错误
    fn open_stream<'a>(
        &'a self,
        request: &'a ChatRequest,
    ) -> BoxFuture<'a, Result<FragmentStream, ChatError>>;
}

/// 回复流的内部状态
enum ReplyState {
    Pending {
        backend: Arc<dyn ChatBackend>,
        request: ChatRequest,
    },
    Streaming(FragmentStream),
    Done,
}

/// 聊天桥：持有后端和固定的系统指令
#[derive(Clone)]
pub struct ChatBridge {
    backend: Arc<dyn ChatBackend>,
    system_instruction: String,
    temperature: f32,
}

impl ChatBridge {
    /// 创建聊天桥
    ///
    /// # 参数
    /// - `backend` - 模型后端
    /// - `portfolio` - 作品集内容，用于生成系统指令
    /// - `temperature` - 采样温度
    pub fn new(backend: Arc<dyn ChatBackend>, portfolio: &Portfolio, temperature: f32) -> Self {
        Self {
            backend,
            system_instruction: prompt::build_system_instruction(portfolio),
            temperature,
        }
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    fn request(&self, history: Vec<HistoryTurn>, message: String) -> ChatRequest {
        ChatRequest {
            system_instruction: self.system_instruction.clone(),
            history,
            message,
            temperature: self.temperature,
        }
    }

    /// 获取一条回复的片段流
    ///
    /// 流是惰性的，第一次轮询时才发起请求；流只能消费一次，结束后不会重启。
    /// 空片段会被丢弃；出现第一个错误时产出 `FALLBACK_FRAGMENT` 并结束。
    ///
    /// # 参数
    /// - `history` - 本次消息之前的对话（不含本次消息）
    /// - `message` - 本次用户消息
    pub fn stream_reply(&self, history: Vec<HistoryTurn>, message: String) -> BoxStream<'static, String> {
        let state = ReplyState::Pending {
            backend: Arc::clone(&self.backend),
            request: self.request(history, message),
        };

        stream::unfold(state, |mut state| async move {
            loop {
                match state {
                    ReplyState::Pending { backend, request } => {
                        match backend.open_stream(&request).await {
                            Ok(fragments) => state = ReplyState::Streaming(fragments),
                            Err(e) => {
                                log::warn!("聊天请求失败: {}", e);
                                return Some((FALLBACK_FRAGMENT.to_string(), ReplyState::Done));
                            }
                        }
                    }
                    ReplyState::Streaming(mut fragments) => match fragments.next().await {
                        Some(Ok(text)) if text.is_empty() => {
                            state = ReplyState::Streaming(fragments);
                        }
                        Some(Ok(text)) => return Some((text, ReplyState::Streaming(fragments))),
                        Some(Err(e)) => {
                            log::warn!("聊天流中断: {}", e);
                            return Some((FALLBACK_FRAGMENT.to_string(), ReplyState::Done));
                        }
                        None => return None,
                    },
                    ReplyState::Done => return None,
                }
            }
        })
        .boxed()
    }

    /// 回调形式的回复接口
    ///
    /// # 参数
    /// - `sink` - 按到达顺序接收每个片段
    ///
    /// # 返回值
    /// 全部片段拼接后的完整回复
    pub async fn send(
        &self,
        history: Vec<HistoryTurn>,
        message: String,
        mut sink: impl FnMut(&str),
    ) -> String {
        let mut reply = String::new();
        let mut fragments = self.stream_reply(history, message);
        while let Some(fragment) = fragments.next().await {
            sink(&fragment);
            reply.push_str(&fragment);
        }
        reply
    }

    /// 完成一次完整的问答并写入对话记录
    ///
    /// # 参数
    /// - `transcript` - 共享的对话记录
    /// - `input` - 用户输入
    /// - `on_event` - 接收 Started / Fragment / Finished 事件
    ///
    /// # 返回值
    /// 冻结后的助手消息
    ///
    /// # 错误
    /// 输入为空、上一条回复仍在接收中或对话记录锁失效时返回错误
    pub async fn relay(
        &self,
        transcript: &RwLock<Transcript>,
        input: &str,
        mut on_event: impl FnMut(ChatEvent),
    ) -> Result<ChatMessage, String> {
        let exchange = transcript
            .write()
            .map_err(|e| format!("获取对话记录锁失败: {}", e))?
            .begin_exchange(input)?;

        on_event(ChatEvent::Started {
            user_id: exchange.user_id.clone(),
            reply_id: exchange.reply_id.clone(),
        });

        let reply_id = exchange.reply_id;
        let mut fragments = self.stream_reply(exchange.history, exchange.message);
        while let Some(fragment) = fragments.next().await {
            transcript
                .write()
                .map_err(|e| format!("获取对话记录锁失败: {}", e))?
                .append_fragment(&reply_id, &fragment)?;
            on_event(ChatEvent::Fragment {
                id: reply_id.clone(),
                text: fragment,
            });
        }

        let message = transcript
            .write()
            .map_err(|e| format!("获取对话记录锁失败: {}", e))?
            .finish(&reply_id)?;
        on_event(ChatEvent::Finished {
            message: message.clone(),
        });
        Ok(message)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::chat::ChatRole;
    use crate::services::content::ContentStore;
    use std::sync::Mutex;

    /// 按脚本返回片段的后端，并记录收到的请求
    pub(crate) struct ScriptedBackend {
        open_error: bool,
        script: Vec<Result<&'static str, &'static str>>,
        pub(crate) requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedBackend {
        pub(crate) fn replying(script: Vec<Result<&'static str, &'static str>>) -> Self {
            Self {
                open_error: false,
                script,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn unreachable() -> Self {
            Self {
                open_error: true,
                script: Vec::new(),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl ChatBackend for ScriptedBackend {
        fn open_stream<'a>(
            &'a self,
            request: &'a ChatRequest,
        ) -> BoxFuture<'a, Result<FragmentStream, ChatError>> {
            Box::pin(async move {
                self.requests.lock().unwrap().push(request.clone());
                if self.open_error {
                    return Err(ChatError::MissingApiKey);
                }
                let items: Vec<Result<String, ChatError>> = self
                    .script
                    .iter()
                    .map(|item| match item {
                        Ok(text) => Ok(text.to_string()),
                        Err(reason) => Err(ChatError::Stream(reason.to_string())),
                    })
                    .collect();
                Ok(stream::iter(items).boxed())
            })
        }
    }

    fn bridge_with(backend: Arc<ScriptedBackend>) -> ChatBridge {
        let store = ContentStore::embedded().unwrap();
        ChatBridge::new(backend, store.portfolio(), 0.7)
    }

    #[tokio::test]
    async fn test_fragments_in_order_and_empty_dropped() {
        let backend = Arc::new(ScriptedBackend::replying(vec![Ok("He"), Ok(""), Ok("llo")]));
        let bridge = bridge_with(backend);

        let fragments: Vec<String> = bridge.stream_reply(Vec::new(), "hi".into()).collect().await;
        assert_eq!(fragments, vec!["He", "llo"]);
    }

    #[tokio::test]
    async fn test_open_failure_yields_single_fallback() {
        let bridge = bridge_with(Arc::new(ScriptedBackend::unreachable()));
        let fragments: Vec<String> = bridge.stream_reply(Vec::new(), "hi".into()).collect().await;
        assert_eq!(fragments, vec![FALLBACK_FRAGMENT]);
    }

    #[tokio::test]
    async fn test_mid_stream_failure_keeps_prefix_then_fallback() {
        let backend = Arc::new(ScriptedBackend::replying(vec![
            Ok("partial"),
            Err("reset"),
            Ok("never"),
        ]));
        let bridge = bridge_with(backend);

        let mut seen = Vec::new();
        let reply = bridge
            .send(Vec::new(), "hi".into(), |f| seen.push(f.to_string()))
            .await;
        assert_eq!(seen, vec!["partial".to_string(), FALLBACK_FRAGMENT.to_string()]);
        assert_eq!(reply, format!("partial{}", FALLBACK_FRAGMENT));
    }

    #[tokio::test]
    async fn test_stream_is_lazy() {
        let backend = Arc::new(ScriptedBackend::replying(vec![Ok("x")]));
        let bridge = bridge_with(Arc::clone(&backend));

        let stream = bridge.stream_reply(Vec::new(), "hi".into());
        assert!(backend.requests.lock().unwrap().is_empty());
        drop(stream);
        assert!(backend.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_relay_updates_transcript() {
        let backend = Arc::new(ScriptedBackend::replying(vec![Ok("Python"), Ok(" and SQL")]));
        let bridge = bridge_with(Arc::clone(&backend));
        let transcript = RwLock::new(Transcript::new("Nikhilesh"));

        let mut events = Vec::new();
        let message = bridge
            .relay(&transcript, " what stack? ", |e| events.push(e))
            .await
            .unwrap();

        assert_eq!(message.text, "Python and SQL");
        assert!(!message.streaming);
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], ChatEvent::Started { .. }));
        assert!(matches!(events[3], ChatEvent::Finished { .. }));

        let requests = backend.requests.lock().unwrap();
        assert_eq!(requests[0].message, "what stack?");
        // 历史只有开场白，不包含本次提交
        assert_eq!(requests[0].history.len(), 1);
        assert_eq!(requests[0].history[0].role, ChatRole::Assistant);
        assert_eq!(requests[0].system_instruction, bridge.system_instruction());

        let transcript = transcript.read().unwrap();
        assert_eq!(transcript.messages().len(), 3);
        assert!(!transcript.is_busy());
    }

    #[tokio::test]
    async fn test_relay_with_failing_backend_appends_one_fallback() {
        let bridge = bridge_with(Arc::new(ScriptedBackend::unreachable()));
        let transcript = RwLock::new(Transcript::new("A"));

        let message = bridge.relay(&transcript, "hello", |_| {}).await.unwrap();
        assert_eq!(message.text, FALLBACK_FRAGMENT);
        assert_eq!(message.text.matches("[System Error").count(), 1);
    }

    #[tokio::test]
    async fn test_relay_rejects_empty_input() {
        let bridge = bridge_with(Arc::new(ScriptedBackend::replying(vec![])));
        let transcript = RwLock::new(Transcript::new("A"));
        assert!(bridge.relay(&transcript, "   ", |_| {}).await.is_err());
        assert_eq!(transcript.read().unwrap().messages().len(), 1);
    }
}
