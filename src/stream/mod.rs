//! Stream Module
//!
//! Page-addressable logical byte streams.
//!
//! ## Responsibilities
//! - Sequential reads from a cursor position
//! - Absolute seeks within the logical stream
//! - Reporting the declared logical length
//!
//! Two backings exist: [`FileStream`] maps logical offsets through a page
//! list onto a shared file handle, and [`MemoryStream`] stages bytes that do
//! not have pages yet.

mod file;
mod memory;

use std::io::{self, Read};

use crate::error::Result;

pub use file::{FileStream, SharedFile};
pub use memory::MemoryStream;

/// A logical stream stored in (or destined for) an MSF container
pub trait MsfStream {
    /// Total logical length in bytes
    fn len(&self) -> u64;

    /// Current cursor position
    fn pos(&self) -> u64;

    /// Move the cursor to an absolute offset.
    ///
    /// Positions past the end are allowed; reads from there return 0.
    fn set_pos(&mut self, pos: u64) -> Result<()>;

    /// Read from the cursor into `buf`, advancing the cursor.
    ///
    /// Returns fewer than `buf.len()` bytes only at end of stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the whole stream from offset 0
    ///
    /// The buffer grows as bytes arrive, so a stream whose declared length
    /// is larger than its backing data does not allocate the full length.
    fn read_all(&mut self) -> Result<Vec<u8>> {
        const CHUNK: usize = 64 * 1024;

        self.set_pos(0)?;
        let len = usize::try_from(self.len()).unwrap_or(usize::MAX);
        let mut out = Vec::with_capacity(len.min(CHUNK));
        let mut chunk = vec![0u8; CHUNK];
        while out.len() < len {
            let want = (len - out.len()).min(CHUNK);
            let n = self.read(&mut chunk[..want])?;
            if n == 0 {
                break;
            }
            out.extend_from_slice(&chunk[..n]);
        }
        Ok(out)
    }
}

/// Read until `buf` is full or the reader is exhausted, returning the count
pub(crate) fn read_fully<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
