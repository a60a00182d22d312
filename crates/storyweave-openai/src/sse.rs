//! Incremental parser for the `text/event-stream` body of a streaming chat
//! completion.
//!
//! Only `data:` fields matter here. Comment lines (`: keep-alive`) and other
//! fields are skipped, CRLF line endings are accepted, and the `[DONE]`
//! sentinel ends the stream.

use crate::error::OpenAiError;

const DONE: &str = "[DONE]";

#[derive(Debug, Default)]
pub struct SseFrameDecoder {
    buf: Vec<u8>,
    data: Option<String>,
    done: bool,
}

impl SseFrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` once `[DONE]` was seen. Later input is ignored.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed raw bytes; returns the data payloads of every event they complete.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<String>, OpenAiError> {
        let mut payloads = Vec::new();
        if self.done {
            return Ok(payloads);
        }
        self.buf.extend_from_slice(chunk);

        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let line = std::str::from_utf8(&line)?;

            if line.is_empty() {
                self.dispatch(&mut payloads);
                if self.done {
                    self.buf.clear();
                    break;
                }
            } else {
                self.field(line);
            }
        }
        Ok(payloads)
    }

    /// Flush an event the server did not terminate with a blank line.
    pub fn finish(&mut self) -> Result<Vec<String>, OpenAiError> {
        let mut payloads = Vec::new();
        if self.done {
            return Ok(payloads);
        }
        if !self.buf.is_empty() {
            let rest = std::mem::take(&mut self.buf);
            let line = std::str::from_utf8(&rest)?;
            self.field(line.trim_end_matches('\r'));
        }
        self.dispatch(&mut payloads);
        Ok(payloads)
    }

    fn field(&mut self, line: &str) {
        if line.starts_with(':') {
            return;
        }
        let (name, value) = match line.split_once(':') {
            Some((name, value)) => (name, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        if name != "data" {
            return;
        }
        match &mut self.data {
            Some(data) => {
                data.push('\n');
                data.push_str(value);
            }
            None => self.data = Some(value.to_owned()),
        }
    }

    fn dispatch(&mut self, payloads: &mut Vec<String>) {
        let Some(data) = self.data.take() else {
            return;
        };
        if data.trim() == DONE {
            self.done = true;
        } else if !data.trim().is_empty() {
            payloads.push(data);
        }
    }
}
