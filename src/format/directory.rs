//! Stream Directory
//!
//! The decoded stream table: one entry per stream slot, each carrying the
//! stream's byte length and the pages that hold it.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::debug;

use crate::error::{MsfError, Result};

use super::{decode_words, page_count};

/// Size word marking a nil stream slot
pub const NIL_STREAM_SIZE: u32 = u32::MAX;

/// Location of a single stream inside the container
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamEntry {
    /// Byte length of the stream
    pub size: u32,
    /// Physical page numbers, in stream order
    pub pages: Vec<u32>,
}

/// Decoded stream table
///
/// `None` slots are nil streams: they own no pages and are written back with
/// a size of 0.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamDirectory {
    pub streams: Vec<Option<StreamEntry>>,
}

impl StreamDirectory {
    /// Decode the stream table bytes for a container with `page_size` pages.
    ///
    /// Every page-list slice is bounds-checked before it is taken, so a
    /// hostile stream count or size cannot index past the table.
    pub fn decode(bytes: &[u8], page_size: u32) -> Result<Self> {
        let words = decode_words(bytes);

        let stream_count = *words
            .first()
            .ok_or_else(|| MsfError::invalid("invalid stream count: stream table is empty"))?;

        let sizes_end = (stream_count as usize)
            .checked_add(1)
            .filter(|&end| end <= words.len())
            .ok_or_else(|| {
                MsfError::invalid(format!(
                    "invalid stream count {} in stream table of {} words",
                    stream_count,
                    words.len()
                ))
            })?;

        let sizes = &words[1..sizes_end];
        let pages = &words[sizes_end..];

        let mut streams = Vec::with_capacity(sizes.len());
        let mut offset: usize = 0;

        for (index, &size) in sizes.iter().enumerate() {
            if size == NIL_STREAM_SIZE {
                streams.push(None);
                continue;
            }

            let needed = page_count(page_size, size) as usize;
            let end = offset
                .checked_add(needed)
                .filter(|&end| end <= pages.len())
                .ok_or_else(|| {
                    MsfError::invalid(format!(
                        "invalid stream count: stream {} needs pages {}..{} but table lists {}",
                        index,
                        offset,
                        offset.saturating_add(needed),
                        pages.len()
                    ))
                })?;

            streams.push(Some(StreamEntry {
                size,
                pages: pages[offset..end].to_vec(),
            }));
            offset = end;
        }

        debug!(
            streams = streams.len(),
            page_entries = offset,
            "Decoded stream table"
        );

        Ok(Self { streams })
    }

    /// Encode as stream table bytes: count, sizes, then page lists
    pub fn encode(&self) -> Bytes {
        let page_entries: usize = self
            .streams
            .iter()
            .flatten()
            .map(|entry| entry.pages.len())
            .sum();
        let mut buf = BytesMut::with_capacity(4 * (1 + self.streams.len() + page_entries));

        buf.put_u32_le(self.streams.len() as u32);
        for slot in &self.streams {
            buf.put_u32_le(slot.as_ref().map_or(0, |entry| entry.size));
        }
        for entry in self.streams.iter().flatten() {
            for &page in &entry.pages {
                buf.put_u32_le(page);
            }
        }

        buf.freeze()
    }

    /// Number of stream slots
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}
