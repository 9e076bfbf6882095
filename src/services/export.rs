//! # 对话记录导出服务
//!
//! 将终端聊天的对话记录导出为 Markdown 或 JSON 格式的字符串。
//!
//! ## 导出策略
//! - **Markdown**：标题、导出时间，每条消息一个 `## YOU` / `## AI ASSISTANT` 小节
//! - **JSON**：消息数组的完整结构，美化输出
//!
//! 仍在流式接收中的消息按当前已收到的内容导出。

use crate::models::chat::{ChatMessage, ChatRole};

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Markdown,
    Json,
}

/// 按指定格式导出
pub fn export(messages: &[ChatMessage], format: ExportFormat, title: &str) -> String {
    match format {
        ExportFormat::Markdown => to_markdown(messages, title),
        ExportFormat::Json => to_json(messages),
    }
}

/// 将对话记录导出为 Markdown
///
/// # 参数
/// - `messages` - 对话记录中的消息（按提交顺序）
/// - `title` - 文档标题
///
/// # 返回值
/// Markdown 格式的字符串
pub fn to_markdown(messages: &[ChatMessage], title: &str) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("# {}", title));
    lines.push(String::new());

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    lines.push(format!("导出时间: (UTC epoch: {})", now));
    lines.push(String::new());
    lines.push("---".into());
    lines.push(String::new());

    for message in messages {
        let role = match message.role {
            ChatRole::User => "YOU",
            ChatRole::Assistant => "AI ASSISTANT",
        };
        lines.push(format!("## {}", role));
        lines.push(String::new());

        let text = message.text.trim();
        if !text.is_empty() {
            lines.push(text.to_string());
        }
        lines.push(String::new());
        lines.push("---".into());
        lines.push(String::new());
    }

    lines.join("\n")
}

/// 将对话记录导出为美化的 JSON（2 空格缩进）
pub fn to_json(messages: &[ChatMessage]) -> String {
    serde_json::to_string_pretty(messages).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::chat::transcript::Transcript;

    fn sample() -> Transcript {
        let mut transcript = Transcript::new("Nikhilesh");
        let exchange = transcript.begin_exchange("What do you build?").unwrap();
        transcript
            .append_fragment(&exchange.reply_id, "ML systems.")
            .unwrap();
        transcript.finish(&exchange.reply_id).unwrap();
        transcript
    }

    #[test]
    fn test_markdown_sections_in_order() {
        let transcript = sample();
        let md = to_markdown(transcript.messages(), "NEURAL_OS TERMINAL");

        assert!(md.starts_with("# NEURAL_OS TERMINAL\n"));
        let greeting = md.find("System initialized.").unwrap();
        let question = md.find("## YOU\n\nWhat do you build?").unwrap();
        let answer = md.find("ML systems.").unwrap();
        assert!(greeting < question && question < answer);
        assert_eq!(md.matches("## AI ASSISTANT").count(), 2);
    }

    #[test]
    fn test_json_keeps_frontend_field_names() {
        let transcript = sample();
        let json = to_json(transcript.messages());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["id"], "init");
        assert_eq!(items[1]["role"], "user");
        assert_eq!(items[2]["role"], "model");
        assert_eq!(items[2]["isStreaming"], false);
    }

    #[test]
    fn test_export_dispatch() {
        let transcript = sample();
        let json = export(transcript.messages(), ExportFormat::Json, "t");
        assert!(json.trim_start().starts_with('['));
        let md = export(transcript.messages(), ExportFormat::Markdown, "t");
        assert!(md.starts_with("# t"));
    }
}
