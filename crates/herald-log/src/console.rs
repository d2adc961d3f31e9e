//! Console sink writer for the tracing backend.
//!
//! # Design
//! - Writes formatted output to stdout or stderr.
//! - Mirrors each complete line to a per-backend broadcast tap so hosts can observe
//!   exactly what the sink rendered.
//! - Sending on the tap never blocks; lines are dropped when nobody subscribes.

use std::io::{self, Write};

use tokio::sync::broadcast;
use tracing_subscriber::fmt::MakeWriter;

/// Number of rendered lines buffered for slow tap subscribers.
pub(crate) const TAP_CAPACITY: usize = 1024;

/// Output stream used by the console sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleTarget {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

impl ConsoleTarget {
    /// Parse `stdout` / `stderr` (case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stdout" => Some(Self::Stdout),
            "stderr" => Some(Self::Stderr),
            _ => None,
        }
    }
}

/// `tracing_subscriber` writer factory for the console sink.
#[derive(Clone)]
pub(crate) struct ConsoleMakeWriter {
    target: ConsoleTarget,
    tap: broadcast::Sender<String>,
}

impl ConsoleMakeWriter {
    pub(crate) const fn new(target: ConsoleTarget, tap: broadcast::Sender<String>) -> Self {
        Self { target, tap }
    }
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            stream: match self.target {
                ConsoleTarget::Stdout => ConsoleStream::Stdout(io::stdout()),
                ConsoleTarget::Stderr => ConsoleStream::Stderr(io::stderr()),
            },
            tap: self.tap.clone(),
            buffer: LineBuffer::default(),
        }
    }
}

enum ConsoleStream {
    Stdout(io::Stdout),
    Stderr(io::Stderr),
}

impl Write for ConsoleStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Stdout(stream) => stream.write(buf),
            Self::Stderr(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(stream) => stream.flush(),
            Self::Stderr(stream) => stream.flush(),
        }
    }
}

/// Writer handed out per event; flushes a trailing partial line on drop.
pub(crate) struct ConsoleWriter {
    stream: ConsoleStream,
    tap: broadcast::Sender<String>,
    buffer: LineBuffer,
}

impl ConsoleWriter {
    fn emit_lines(&self, lines: Vec<String>) {
        if self.tap.receiver_count() == 0 {
            return;
        }
        for line in lines {
            if line.is_empty() {
                continue;
            }
            let _ = self.tap.send(line);
        }
    }
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write_all(buf)?;
        let lines = self.buffer.push(buf);
        self.emit_lines(lines);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if let Some(line) = self.buffer.finish() {
            self.emit_lines(vec![line]);
        }
    }
}

#[derive(Default)]
struct LineBuffer {
    buffer: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut lines = Vec::new();
        let mut start = 0usize;
        for (idx, byte) in self.buffer.iter().enumerate() {
            if *byte == b'\n' {
                lines.push(trim_line(&self.buffer[start..idx]));
                start = idx + 1;
            }
        }
        if start > 0 {
            self.buffer.drain(0..start);
        }
        lines
    }

    fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let line = trim_line(&self.buffer);
        self.buffer.clear();
        Some(line)
    }
}

fn trim_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(['\r', '\n'])
        .to_string()
}
