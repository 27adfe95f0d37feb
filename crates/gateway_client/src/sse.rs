//! Incremental aggregation of a streamed chat completion.
//!
//! The gateway streams tokens as newline-terminated SSE records: significant
//! lines carry the `data: ` prefix, the payload is either an OpenAI-style
//! chunk whose `choices[0].delta.content` holds one text fragment, or the
//! `[DONE]` sentinel. Chunks arrive with arbitrary line-boundary alignment, so
//! [`SseLineParser`] keeps the unresolved tail of bytes between reads and only
//! ever interprets complete lines.
//!
//! [`aggregate`] drives one parser over one byte stream and has exactly three
//! terminal outcomes: completed (sentinel seen, or the source ended without
//! one), cancelled, or failed because the source itself failed. Individual
//! lines that do not decode are skipped; the gateway is known to interleave
//! keep-alive records between content deltas.

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::error::GatewayError;
use crate::models::ChatCompletionStreamChunk;

const DATA_PREFIX: &str = "data: ";
const DONE_SENTINEL: &str = "[DONE]";

/// Outcome of one parsed line.
#[derive(Debug, PartialEq, Eq)]
enum SseLine {
    Token(String),
    Done,
    Skip,
}

fn parse_line(line: &str) -> SseLine {
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return SseLine::Skip;
    };
    if payload == DONE_SENTINEL {
        return SseLine::Done;
    }
    match serde_json::from_str::<ChatCompletionStreamChunk>(payload) {
        Ok(chunk) => match chunk.delta_content() {
            Some(text) if !text.is_empty() => SseLine::Token(text.to_string()),
            _ => SseLine::Skip,
        },
        // Keep-alive or malformed record; never fatal.
        Err(_) => SseLine::Skip,
    }
}

/// Line-buffering token parser for one stream.
///
/// One parser is created per stream invocation, mutated only by that
/// invocation, and discarded with it. `accumulated` is append-only: at any
/// point it is exactly the in-order concatenation of the tokens emitted so
/// far.
#[derive(Debug, Default)]
pub struct SseLineParser {
    buffer: Vec<u8>,
    accumulated: String,
    finished: bool,
}

impl SseLineParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of bytes; returns the tokens completed by it, in
    /// arrival order.
    ///
    /// A trailing partial line is retained and prefixed onto the next chunk.
    /// Once the sentinel has been seen the parser is finished: remaining
    /// buffered bytes are dropped and further input is ignored.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<String> {
        if self.finished {
            return Vec::new();
        }
        self.buffer.extend_from_slice(chunk);

        let mut tokens = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line[..line.len() - 1]);
            match parse_line(line.trim_end_matches('\r')) {
                SseLine::Token(token) => {
                    self.accumulated.push_str(&token);
                    tokens.push(token);
                }
                SseLine::Done => {
                    self.finished = true;
                    self.buffer.clear();
                    break;
                }
                SseLine::Skip => {}
            }
        }
        tokens
    }

    /// True once the `[DONE]` sentinel has been observed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn accumulated(&self) -> &str {
        &self.accumulated
    }

    pub fn into_accumulated(self) -> String {
        self.accumulated
    }
}

/// Terminal outcome of [`aggregate`] short of a transport failure.
#[derive(Debug, PartialEq, Eq)]
pub enum StreamOutcome {
    /// The sentinel was seen, or the source ended without one. Carries the
    /// full concatenation of every token delivered.
    Completed(String),
    /// The caller cancelled; no completion value is produced.
    Cancelled,
}

/// Consume a byte stream of SSE records, invoking `on_token` once per content
/// fragment in arrival order.
///
/// The read loop suspends only while awaiting the next chunk; cancellation is
/// observed there, so tokens already parsed from received chunks may still be
/// delivered, but no further chunk is requested after the token fires. A
/// source-level failure terminates the stream and is reported once as
/// [`GatewayError::Stream`]; one call corresponds to one connection attempt
/// and retrying is the caller's responsibility.
pub async fn aggregate<S, E, F>(
    mut source: S,
    cancel: CancellationToken,
    mut on_token: F,
) -> Result<StreamOutcome, GatewayError>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::fmt::Display,
    F: FnMut(&str),
{
    let mut parser = SseLineParser::new();
    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::debug!("stream cancelled after {} bytes of text", parser.accumulated().len());
                return Ok(StreamOutcome::Cancelled);
            }
            chunk = source.next() => chunk,
        };
        match chunk {
            Some(Ok(bytes)) => {
                for token in parser.push_chunk(&bytes) {
                    on_token(&token);
                }
                if parser.is_finished() {
                    return Ok(StreamOutcome::Completed(parser.into_accumulated()));
                }
            }
            Some(Err(err)) => return Err(GatewayError::Stream(err.to_string())),
            // End-of-data without the sentinel still completes.
            None => return Ok(StreamOutcome::Completed(parser.into_accumulated())),
        }
    }
}
