//! Console adapter for retail-service.
//!
//! Presentation glue only: gathers typed fields from an input source,
//! hands fully-formed requests to the database service, and renders the
//! typed results. Generic over reader/writer so a test harness can drive
//! the menus with in-memory buffers.

mod input;
mod menu;

pub use input::{normalize_method, parse_amount, parse_id, parse_quantity};
pub use menu::run;

use retail_core::error::AppError;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};

/// Line-oriented console over any async reader/writer pair.
pub struct Console<R, W> {
    reader: R,
    writer: W,
}

impl Console<BufReader<Stdin>, Stdout> {
    /// Console over the process's stdin/stdout.
    pub fn stdio() -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
            writer: tokio::io::stdout(),
        }
    }
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Write a line of output.
    pub async fn say(&mut self, msg: &str) -> Result<(), AppError> {
        self.writer.write_all(msg.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Prompt and read one trimmed line. `None` means end of input.
    pub async fn prompt(&mut self, msg: &str) -> Result<Option<String>, AppError> {
        self.writer.write_all(msg.as_bytes()).await?;
        self.writer.flush().await?;

        let mut line = String::new();
        let read = self.reader.read_line(&mut line).await?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
