#![allow(dead_code)]

use nimiq_payment_validator::Transaction;
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

pub const TX_HASH: &str = "abcdef1234567890abcdef1234567890abcdef12";
pub const RECEIVER: &str = "NQ01 RECEIVER";

/// Transaction to `RECEIVER` worth `value` luna
pub fn transaction(value: &str, confirmations: u64) -> Transaction {
    Transaction {
        hash: TX_HASH.to_string(),
        sender_address: "NQXX SENDER".to_string(),
        recipient_address: RECEIVER.to_string(),
        value: value.to_string(),
        message: String::new(),
        block_height: 123456,
        timestamp: 1672531200,
        confirmations,
        extra: None,
    }
}

/// Captures formatted log output in memory
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Install a thread-local subscriber writing into the returned buffer
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
