//! MSF Header
//!
//! Fixed-size preamble at the start of page 0.

use std::io::Read;

use bytes::{Buf, BufMut};

use crate::error::{MsfError, Result};
use crate::stream::read_fully;

use super::{page_count, HEADER_SIZE, MAGIC};

/// Decoded MSF header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MsfHeader {
    /// Bytes per page
    pub page_size: u32,
    /// Index of the active Free Page Map copy
    pub free_page_map: u32,
    /// Total pages in the file
    pub page_count: u32,
    /// Byte length of the stream table stream
    pub stream_table_size: u32,
}

impl MsfHeader {
    /// Decode a header from the first `HEADER_SIZE` bytes of `bytes`
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(MsfError::invalid(format!(
                "missing MSF header: expected {} bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        if &bytes[..MAGIC.len()] != MAGIC {
            return Err(MsfError::invalid("invalid MSF header magic"));
        }

        let mut buf = &bytes[MAGIC.len()..HEADER_SIZE];
        let page_size = buf.get_u32_le();
        let free_page_map = buf.get_u32_le();
        let page_count = buf.get_u32_le();
        let stream_table_size = buf.get_u32_le();
        let _reserved = buf.get_u32_le();

        if page_size == 0 {
            return Err(MsfError::invalid("page size is zero"));
        }

        Ok(Self {
            page_size,
            free_page_map,
            page_count,
            stream_table_size,
        })
    }

    /// Read and decode a header from the current position of `reader`
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut bytes = [0u8; HEADER_SIZE];
        let n = read_fully(reader, &mut bytes)?;
        Self::decode(&bytes[..n])
    }

    /// Append the encoded header (`HEADER_SIZE` bytes) to `buf`
    pub fn encode(&self, buf: &mut impl BufMut) {
        buf.put_slice(MAGIC);
        buf.put_u32_le(self.page_size);
        buf.put_u32_le(self.free_page_map);
        buf.put_u32_le(self.page_count);
        buf.put_u32_le(self.stream_table_size);
        buf.put_u32_le(0);
    }

    /// Physical size the header claims for the file
    pub fn file_size(&self) -> u64 {
        u64::from(self.page_size) * u64::from(self.page_count)
    }

    /// Number of entries in the root page list that follows the header
    pub fn root_page_count(&self) -> u32 {
        page_count(self.page_size, self.stream_table_size)
    }
}
