//! File-backed stream
//!
//! Maps logical offsets onto physical pages of a shared file handle.
//!
//! ## Offset Mapping
//! ```text
//! logical offset o
//!   page index  = o / page_size
//!   page offset = o % page_size
//!   physical    = pages[page index] * page_size + page offset
//! ```

use std::io::{Read, Seek, SeekFrom};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;

use super::{read_fully, MsfStream};

/// File handle shared by every stream of a parsed container.
///
/// Streams reposition the cursor on each read, so reads are serialized by
/// the mutex and never interleave.
pub type SharedFile<R> = Arc<Mutex<R>>;

/// Stream whose bytes live in a list of pages of a real file
pub struct FileStream<R> {
    /// Shared handle (cursor is repositioned on every read)
    file: SharedFile<R>,
    /// Bytes per page
    page_size: u32,
    /// Declared logical length
    length: u32,
    /// Physical page numbers in stream order
    pages: Vec<u32>,
    /// Logical cursor
    pos: u64,
}

impl<R: Read + Seek> FileStream<R> {
    /// Create a stream of `length` bytes over `pages`.
    ///
    /// `page_size` must be non-zero. Reads stop early if `pages` is shorter
    /// than `length` requires.
    pub fn new(file: SharedFile<R>, page_size: u32, length: u32, pages: Vec<u32>) -> Self {
        Self {
            file,
            page_size,
            length,
            pages,
            pos: 0,
        }
    }

    /// Physical pages backing this stream
    pub fn pages(&self) -> &[u32] {
        &self.pages
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

impl<R: Read + Seek> MsfStream for FileStream<R> {
    fn len(&self) -> u64 {
        u64::from(self.length)
    }

    fn pos(&self) -> u64 {
        self.pos
    }

    fn set_pos(&mut self, pos: u64) -> Result<()> {
        self.pos = pos;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let page_size = u64::from(self.page_size);
        let length = u64::from(self.length);
        let mut file = self.file.lock();
        let mut filled = 0;

        while filled < buf.len() && self.pos < length {
            let page = match self.pages.get((self.pos / page_size) as usize) {
                Some(&page) => page,
                None => break,
            };
            let offset = self.pos % page_size;

            let chunk = (page_size - offset)
                .min(length - self.pos)
                .min((buf.len() - filled) as u64) as usize;

            file.seek(SeekFrom::Start(u64::from(page) * page_size + offset))?;
            let n = read_fully(&mut *file, &mut buf[filled..filled + chunk])?;

            filled += n;
            self.pos += n as u64;

            // Handle ended inside the page
            if n < chunk {
                break;
            }
        }

        Ok(filled)
    }
}
