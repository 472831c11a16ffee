//! Container write path
//!
//! ## Write Order
//! 1. Four blank preamble pages (header, FPM pair, reserved)
//! 2. Each stream's pages, in index order
//! 3. The stream table built from the pages recorded in step 2
//! 4. The stream table's page list
//! 5. Back to page 0: header plus the page list of step 4
//!
//! Whenever the next page would land on an FPM slot, two blank FPM pages
//! are emitted first. FPM pages are left zero-filled.

use std::io::{self, Seek, SeekFrom, Write};

use bytes::{BufMut, BytesMut};
use tracing::{debug, trace};

use crate::config::Config;
use crate::error::{MsfError, Result};
use crate::format::{
    encode_words, is_fpm_page, page_count, MsfHeader, StreamDirectory, StreamEntry,
    ACTIVE_FREE_PAGE_MAP, HEADER_SIZE, PREAMBLE_PAGES,
};
use crate::stream::{MemoryStream, MsfStream};

use super::MsfFile;

impl MsfFile<'_> {
    /// Write the container to `out` with the default 4096-byte pages.
    ///
    /// Stream contents and slots are left unchanged; only stream cursors move.
    /// On error the output is incomplete and should be discarded.
    pub fn write<W: Write + Seek>(&mut self, out: &mut W) -> Result<()> {
        self.write_with_config(out, &Config::default())
    }

    /// Write the container to `out` using the page size from `config`.
    ///
    /// `out` must be positioned at offset 0, since page numbers are absolute.
    pub fn write_with_config<W: Write + Seek>(&mut self, out: &mut W, config: &Config) -> Result<()> {
        config.validate()?;

        let start = out
            .stream_position()
            .map_err(MsfError::io_op("failed reading output position"))?;
        if start != 0 {
            return Err(MsfError::Config(format!(
                "output must be positioned at offset 0, not {}",
                start
            )));
        }

        let mut pages = PageWriter::new(out, config.page_size);
        pages.write_preamble()?;

        let mut directory = StreamDirectory::default();
        for (index, slot) in self.streams.iter_mut().enumerate() {
            let entry = match slot {
                Some(stream) => {
                    let size = u32::try_from(stream.len()).map_err(|_| MsfError::StreamTooLarge {
                        index,
                        len: stream.len(),
                    })?;
                    let stream_pages = pages.write_stream(&mut **stream)?;
                    trace!(index, size, pages = stream_pages.len(), "Flushed stream");
                    Some(StreamEntry {
                        size,
                        pages: stream_pages,
                    })
                }
                None => None,
            };
            directory.streams.push(entry);
        }

        let table = directory.encode();
        let table_size = u32::try_from(table.len())
            .map_err(|_| MsfError::Config("stream table exceeds 4 GiB".to_string()))?;
        let table_pages = pages.write_stream(&mut MemoryStream::new(table))?;
        let root_pages = pages.write_stream(&mut MemoryStream::new(encode_words(&table_pages)))?;

        let page_size = config.page_size as usize;
        if HEADER_SIZE + root_pages.len() * 4 > page_size {
            return Err(MsfError::Config(format!(
                "root page list of {} entries does not fit in a {} byte header page",
                root_pages.len(),
                page_size
            )));
        }

        let header = MsfHeader {
            page_size: config.page_size,
            free_page_map: ACTIVE_FREE_PAGE_MAP,
            page_count: pages.page_count,
            stream_table_size: table_size,
        };
        debug!(
            streams = directory.len(),
            page_count = header.page_count,
            stream_table_size = table_size,
            root_pages = root_pages.len(),
            "Finalizing MSF header"
        );

        let mut header_page = BytesMut::with_capacity(page_size);
        header.encode(&mut header_page);
        for &page in &root_pages {
            header_page.put_u32_le(page);
        }
        header_page.resize(page_size, 0);

        let end = pages
            .out
            .stream_position()
            .map_err(MsfError::io_op("failed reading output position"))?;
        let out = pages.out;
        out.seek(SeekFrom::Start(start))
            .map_err(MsfError::io_op("seek failed"))?;
        out.write_all(&header_page)
            .map_err(MsfError::io_op("failed writing MSF header"))?;
        out.seek(SeekFrom::Start(end))
            .map_err(MsfError::io_op("seek failed"))?;
        out.flush().map_err(MsfError::io_op("failed flushing output"))?;

        Ok(())
    }
}

/// Appends whole pages to the output, tracking the global page count
struct PageWriter<'w, W> {
    out: &'w mut W,
    page_size: u32,
    /// Pages written so far; also the index of the next page
    page_count: u32,
    /// Scratch buffer for the next data page
    buf: Vec<u8>,
    blank: Vec<u8>,
}

impl<'w, W: Write> PageWriter<'w, W> {
    fn new(out: &'w mut W, page_size: u32) -> Self {
        Self {
            out,
            page_size,
            page_count: 0,
            buf: vec![0u8; page_size as usize],
            blank: vec![0u8; page_size as usize],
        }
    }

    fn write_preamble(&mut self) -> Result<()> {
        for _ in 0..PREAMBLE_PAGES {
            self.emit(true, "failed writing MSF preamble")?;
        }
        Ok(())
    }

    /// Write the next page (blank, or the scratch buffer) and return its index
    fn emit(&mut self, blank: bool, op: &'static str) -> Result<u32> {
        let index = self.page_count;
        self.page_count = index.checked_add(1).ok_or_else(|| {
            MsfError::Config("container exceeds the maximum page count".to_string())
        })?;

        let page = if blank { &self.blank } else { &self.buf };
        self.out.write_all(page).map_err(MsfError::io_op(op))?;
        Ok(index)
    }

    /// Write the scratch buffer as a data page, stepping over an FPM pair
    fn emit_data_page(&mut self) -> Result<u32> {
        if is_fpm_page(self.page_count, self.page_size) {
            self.emit(true, "failed writing free page map")?;
            self.emit(true, "failed writing free page map")?;
        }
        self.emit(false, "failed writing page")
    }

    /// Write a stream page by page, returning the pages it occupies.
    ///
    /// Empty streams produce no pages. The final page is zero-padded.
    fn write_stream(&mut self, stream: &mut dyn MsfStream) -> Result<Vec<u32>> {
        let mut remaining = stream.len();
        let mut written = Vec::with_capacity(
            page_count(self.page_size, u32::try_from(remaining).unwrap_or(u32::MAX)) as usize,
        );
        stream.set_pos(0)?;

        while remaining > 0 {
            let want = remaining.min(u64::from(self.page_size)) as usize;
            let got = fill(stream, &mut self.buf[..want])?;
            if got < want {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "stream ended before its declared length",
                )
                .into());
            }
            self.buf[want..].fill(0);
            written.push(self.emit_data_page()?);
            remaining -= want as u64;
        }

        Ok(written)
    }
}

/// Read from `stream` until `buf` is full or the stream ends
fn fill(stream: &mut dyn MsfStream, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = stream.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
