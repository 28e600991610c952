//! Shared test support: an in-memory transport fed from a host script.

use std::io::{self, Read, Write};

/// Capture crate logs in test output when RUST_LOG is set.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Reads come from a fixed byte script; everything written is captured for
/// assertions.
pub struct ScriptedTransport {
    input: io::Cursor<Vec<u8>>,
    pub output: Vec<u8>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<u8>) -> Self {
        Self {
            input: io::Cursor::new(script),
            output: Vec::new(),
        }
    }
}

impl Read for ScriptedTransport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for ScriptedTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
