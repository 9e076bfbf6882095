//! # Server-Sent Events 增量解码器
//!
//! 网络分块的边界与 SSE 行边界无关，解码器把收到的字节暂存在缓冲区中，
//! 每次只处理完整的行：
//! - 行尾可以是 `\n` 或 `\r\n`
//! - `:` 开头的行是注释，忽略
//! - 同一事件的多个 `data:` 行用 `\n` 连接
//! - 空行结束一个事件；流结束时没有空行收尾的事件由 `finish` 补发

use bytes::BytesMut;

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: BytesMut,
    data: Option<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 送入一段字节，返回其中已完整的事件数据
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = memchr::memchr(b'\n', &self.buffer) {
            let mut line = self.buffer.split_to(pos + 1);
            line.truncate(pos);
            if line.last() == Some(&b'\r') {
                line.truncate(pos - 1);
            }
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }
        events
    }

    /// 流结束：处理缓冲区中剩余的最后一行，并补发未结束的事件
    pub fn finish(&mut self) -> Option<String> {
        if !self.buffer.is_empty() {
            let rest = self.buffer.split();
            let line: &[u8] = &rest;
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            if let Some(event) = self.process_line(line) {
                return Some(event);
            }
        }
        self.data.take()
    }

    fn process_line(&mut self, line: &[u8]) -> Option<String> {
        if line.is_empty() {
            return self.data.take();
        }
        if line[0] == b':' {
            return None;
        }

        let (field, value) = match memchr::memchr(b':', line) {
            Some(colon) => {
                let value = &line[colon + 1..];
                (&line[..colon], value.strip_prefix(b" ").unwrap_or(value))
            }
            None => (line, &[][..]),
        };

        // 只关心 data 字段，event / id / retry 对聊天流没有意义
        if field == b"data" {
            let value = String::from_utf8_lossy(value);
            match self.data.as_mut() {
                Some(data) => {
                    data.push('\n');
                    data.push_str(&value);
                }
                None => self.data = Some(value.into_owned()),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_event() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"data: {\"a\":1}\n\n");
        assert_eq!(events, vec!["{\"a\":1}".to_string()]);
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_arbitrary_splits_and_crlf() {
        let body = b"data: first\r\n\r\n: keep-alive\r\ndata: second\r\n\r\n";
        for split in 1..body.len() {
            let mut decoder = SseDecoder::new();
            let mut events = decoder.feed(&body[..split]);
            events.extend(decoder.feed(&body[split..]));
            assert_eq!(events, vec!["first", "second"], "split at {}", split);
        }
    }

    #[test]
    fn test_multi_line_data_is_joined() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"event: message\ndata: line one\ndata:line two\n\n");
        assert_eq!(events, vec!["line one\nline two"]);
    }

    #[test]
    fn test_finish_flushes_unterminated_event() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: tail").is_empty());
        assert_eq!(decoder.finish().as_deref(), Some("tail"));
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_multibyte_text_split_inside_character() {
        let body = "data: 你好\n\n".as_bytes();
        let mut decoder = SseDecoder::new();
        let mut events = decoder.feed(&body[..8]);
        events.extend(decoder.feed(&body[8..]));
        assert_eq!(events, vec!["你好"]);
    }
}
