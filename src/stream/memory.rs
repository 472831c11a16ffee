//! In-memory stream
//!
//! Holds bytes that have no physical pages yet, such as a freshly built
//! stream table or a stream supplied by the caller.

use bytes::Bytes;

use crate::error::Result;

use super::MsfStream;

/// Stream backed by an owned byte buffer
#[derive(Debug, Clone, Default)]
pub struct MemoryStream {
    data: Bytes,
    pos: u64,
}

impl MemoryStream {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
        }
    }

    /// The full contents, independent of the cursor
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl MsfStream for MemoryStream {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn pos(&self) -> u64 {
        self.pos
    }

    fn set_pos(&mut self, pos: u64) -> Result<()> {
        self.pos = pos;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let start = match usize::try_from(self.pos) {
            Ok(start) if start < self.data.len() => start,
            _ => return Ok(0),
        };

        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        self.pos += n as u64;
        Ok(n)
    }
}
