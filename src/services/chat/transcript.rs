//! # 终端聊天对话记录
//!
//! 只保存在内存中的消息列表，按提交顺序排列。
//! 一次问答（exchange）的生命周期：
//! 1. `begin_exchange` - 追加用户消息和一条空的、处于流式状态的助手消息
//! 2. `append_fragment` - 片段按到达顺序追加到助手消息末尾
//! 3. `finish` - 冻结助手消息，允许下一次提交
//!
//! 同一时刻最多只有一条消息处于流式状态。

use crate::models::chat::{ChatMessage, ChatRole, HistoryTurn};

/// 开场白消息的固定标识符
pub const GREETING_ID: &str = "init";

/// 开场白文本
pub fn greeting_text(first_name: &str) -> String {
    format!(
        "System initialized. Neural interface active.\nHello! I am the AI representation of {}. Ask me about my projects, skills, or experience.",
        first_name
    )
}

/// 一次问答开始时的上下文
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub user_id: String,
    pub reply_id: String,
    /// 本次问答之前的全部非空消息
    pub history: Vec<HistoryTurn>,
    /// 去掉首尾空白后的用户输入
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    next_seq: u64,
    /// 正在接收流式片段的助手消息 id
    pending: Option<String>,
}

impl Transcript {
    /// 创建只包含开场白的对话记录
    pub fn new(first_name: &str) -> Self {
        Self {
            messages: vec![ChatMessage {
                id: GREETING_ID.to_string(),
                role: ChatRole::Assistant,
                text: greeting_text(first_name),
                streaming: false,
            }],
            next_seq: 1,
            pending: None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn message(&self, id: &str) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// 是否有回复仍在流式接收中（此时输入框处于禁用状态）
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// 发给模型的历史记录：全部非空消息（含开场白）
    pub fn history(&self) -> Vec<HistoryTurn> {
        self.messages
            .iter()
            .filter(|m| !m.text.is_empty())
            .map(|m| HistoryTurn {
                role: m.role,
                text: m.text.clone(),
            })
            .collect()
    }

    /// 开始一次问答
    ///
    /// # 参数
    /// - `input` - 用户输入，首尾空白会被去掉
    ///
    /// # 返回值
    /// 新消息的 id、提交之前的历史快照以及清理后的用户输入
    ///
    /// # 错误
    /// 输入为空或上一条回复仍在接收中时返回错误，对话记录保持不变
    pub fn begin_exchange(&mut self, input: &str) -> Result<Exchange, String> {
        let message = input.trim();
        if message.is_empty() {
            return Err("消息内容为空".to_string());
        }
        if self.is_busy() {
            return Err("上一条回复仍在接收中".to_string());
        }

        // 快照在追加新消息之前获取，本次的用户消息单独发送
        let history = self.history();

        let user_id = self.next_id();
        let reply_id = self.next_id();
        self.messages.push(ChatMessage {
            id: user_id.clone(),
            role: ChatRole::User,
            text: message.to_string(),
            streaming: false,
        });
        self.messages.push(ChatMessage {
            id: reply_id.clone(),
            role: ChatRole::Assistant,
            text: String::new(),
            streaming: true,
        });
        self.pending = Some(reply_id.clone());

        Ok(Exchange {
            user_id,
            reply_id,
            history,
            message: message.to_string(),
        })
    }

    /// 向流式消息末尾追加一个片段
    ///
    /// # 错误
    /// 消息不存在或已冻结时返回错误
    pub fn append_fragment(&mut self, id: &str, fragment: &str) -> Result<(), String> {
        let message = self
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| format!("消息不存在: {}", id))?;
        if !message.streaming {
            return Err(format!("消息已结束，不能追加: {}", id));
        }
        message.text.push_str(fragment);
        Ok(())
    }

    /// 冻结流式消息并返回其最终内容
    pub fn finish(&mut self, id: &str) -> Result<ChatMessage, String> {
        let message = self
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| format!("消息不存在: {}", id))?;
        message.streaming = false;
        let frozen = message.clone();

        if self.pending.as_deref() == Some(id) {
            self.pending = None;
        }
        Ok(frozen)
    }

    fn next_id(&mut self) -> String {
        let id = format!("msg-{}", self.next_seq);
        self.next_seq += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_greeting() {
        let transcript = Transcript::new("Nikhilesh");
        let messages = transcript.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, GREETING_ID);
        assert_eq!(messages[0].role, ChatRole::Assistant);
        assert!(!messages[0].streaming);
        assert!(messages[0].text.contains("AI representation of Nikhilesh."));
    }

    #[test]
    fn test_exchange_appends_user_then_streaming_reply() {
        let mut transcript = Transcript::new("A");
        let exchange = transcript.begin_exchange("  hello  ").unwrap();

        assert_eq!(exchange.message, "hello");
        // 历史快照不包含本次提交
        assert_eq!(exchange.history.len(), 1);
        assert_eq!(exchange.history[0].role, ChatRole::Assistant);

        let messages = transcript.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(messages[1].text, "hello");
        assert_eq!(messages[2].id, exchange.reply_id);
        assert!(messages[2].streaming);
        assert!(messages[2].text.is_empty());
        assert!(transcript.is_busy());
    }

    #[test]
    fn test_rejects_empty_and_busy_submissions() {
        let mut transcript = Transcript::new("A");
        assert!(transcript.begin_exchange("   ").is_err());
        assert_eq!(transcript.messages().len(), 1);

        let first = transcript.begin_exchange("one").unwrap();
        assert!(transcript.begin_exchange("two").is_err());
        assert_eq!(transcript.messages().len(), 3);

        transcript.finish(&first.reply_id).unwrap();
        assert!(transcript.begin_exchange("two").is_ok());
    }

    #[test]
    fn test_fragments_concatenate_in_order() {
        let mut transcript = Transcript::new("A");
        let exchange = transcript.begin_exchange("q").unwrap();
        for fragment in ["Hel", "lo", ", world"] {
            transcript.append_fragment(&exchange.reply_id, fragment).unwrap();
        }
        let frozen = transcript.finish(&exchange.reply_id).unwrap();
        assert_eq!(frozen.text, "Hello, world");
        assert!(!frozen.streaming);
        assert!(!transcript.is_busy());
    }

    #[test]
    fn test_frozen_message_rejects_fragments() {
        let mut transcript = Transcript::new("A");
        let exchange = transcript.begin_exchange("q").unwrap();
        transcript.finish(&exchange.reply_id).unwrap();

        assert!(transcript.append_fragment(&exchange.reply_id, "late").is_err());
        assert!(transcript.append_fragment(GREETING_ID, "x").is_err());
        assert!(transcript.append_fragment("missing", "x").is_err());
    }

    #[test]
    fn test_ids_unique_and_history_skips_empty_text() {
        let mut transcript = Transcript::new("A");
        let first = transcript.begin_exchange("one").unwrap();
        // 回复为空就结束
        transcript.finish(&first.reply_id).unwrap();
        let second = transcript.begin_exchange("two").unwrap();

        let ids: Vec<&str> = transcript.messages().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["init", "msg-1", "msg-2", "msg-3", "msg-4"]);

        let roles: Vec<ChatRole> = second.history.iter().map(|t| t.role).collect();
        assert_eq!(roles, [ChatRole::Assistant, ChatRole::User]);
    }
}
