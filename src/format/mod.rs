//! MSF On-Disk Format
//!
//! Constants and codecs for the bits of the container that live on disk.
//!
//! ## File Layout
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Page 0: Header                                               │
//! │   Magic (32) | PageSize (4) | FreePageMap (4) | PageCount (4)│
//! │   StreamTableSize (4) | Reserved (4) | Root page list ...    │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Page 1, 2: Free Page Map pair                                │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Page 3: reserved                                             │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Pages 4..: stream data, stream table, stream table page list │
//! │   (pages p with p % PageSize in {1, 2} are FPM pages again)  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stream Table
//! ```text
//! ┌────────────┬──────────────────────┬──────────────────────────────┐
//! │ Count (4)  │ Size (4) x Count     │ Page numbers (4) per stream  │
//! └────────────┴──────────────────────┴──────────────────────────────┘
//! ```
//!
//! All integers are little-endian.

mod directory;
mod header;
mod layout;

pub use directory::{StreamDirectory, StreamEntry, NIL_STREAM_SIZE};
pub use header::MsfHeader;
pub use layout::{is_fpm_page, page_count};

// =============================================================================
// Shared Constants
// =============================================================================

/// Magic bytes identifying an MSF 7.00 container
pub const MAGIC: &[u8; 32] = b"Microsoft C/C++ MSF 7.00\r\n\x1aDS\0\0\0";

/// Header size: Magic (32) + PageSize (4) + FreePageMap (4) + PageCount (4)
/// + StreamTableSize (4) + Reserved (4) = 52 bytes
pub const HEADER_SIZE: usize = 52;

/// Page size emitted by the writer unless configured otherwise
pub const DEFAULT_PAGE_SIZE: u32 = 4096;

/// Pages written before the first stream page: header, FPM pair, reserved
pub const PREAMBLE_PAGES: u32 = 4;

/// FPM copy recorded as active in written headers
pub const ACTIVE_FREE_PAGE_MAP: u32 = 1;

/// Decode a run of little-endian u32 words, ignoring any trailing partial word
pub fn decode_words(mut buf: &[u8]) -> Vec<u32> {
    use bytes::Buf;

    let mut words = Vec::with_capacity(buf.len() / 4);
    while buf.remaining() >= 4 {
        words.push(buf.get_u32_le());
    }
    words
}

/// Encode u32 words as little-endian bytes
pub fn encode_words(words: &[u32]) -> bytes::Bytes {
    use bytes::BufMut;

    let mut buf = bytes::BytesMut::with_capacity(words.len() * 4);
    for &word in words {
        buf.put_u32_le(word);
    }
    buf.freeze()
}
