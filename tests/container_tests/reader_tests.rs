//! Tests for parsing MSF containers
//!
//! These tests verify:
//! - Hand-assembled containers parse through both page-list levels
//! - Header rejection (magic, file length, truncation)
//! - Stream table rejection (missing page lists, hostile stream counts)
//! - Nil streams decode to absent slots

use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use msfkit::format::{encode_words, NIL_STREAM_SIZE};
use msfkit::{Config, MsfError, MsfFile, MsfHeader, MsfStream};
use tempfile::NamedTempFile;

// =============================================================================
// Helper Functions
// =============================================================================

/// Assemble a container by hand.
///
/// Layout: page 0 header with root list [5], pages 1-3 blank, page 4 the
/// stream table, page 5 the stream table page list [4], pages 6.. data.
fn handmade(page_size: usize, table_words: &[u32], data_pages: &[&[u8]]) -> Vec<u8> {
    let table = encode_words(table_words);
    assert!(table.len() <= page_size);

    let page_count = 6 + data_pages.len();
    let mut file = vec![0u8; page_count * page_size];

    let header = MsfHeader {
        page_size: page_size as u32,
        free_page_map: 1,
        page_count: page_count as u32,
        stream_table_size: table.len() as u32,
    };
    let mut head = Vec::new();
    header.encode(&mut head);
    head.extend_from_slice(&5u32.to_le_bytes());
    file[..head.len()].copy_from_slice(&head);

    file[4 * page_size..4 * page_size + table.len()].copy_from_slice(&table);
    file[5 * page_size..5 * page_size + 4].copy_from_slice(&4u32.to_le_bytes());

    for (i, page) in data_pages.iter().enumerate() {
        let offset = (6 + i) * page_size;
        file[offset..offset + page.len()].copy_from_slice(page);
    }
    file
}

fn header_only(header: MsfHeader, total_len: usize) -> Vec<u8> {
    let mut bytes = Vec::new();
    header.encode(&mut bytes);
    bytes.resize(total_len, 0);
    bytes
}

/// Handle that reads normally but cannot seek relative to the end
struct NoEndSeek {
    inner: Cursor<Vec<u8>>,
}

impl Read for NoEndSeek {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Seek for NoEndSeek {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match pos {
            SeekFrom::End(_) => Err(io::Error::new(io::ErrorKind::Other, "device cannot seek")),
            other => self.inner.seek(other),
        }
    }
}

fn assert_invalid(bytes: Vec<u8>) {
    match MsfFile::open(Cursor::new(bytes)) {
        Err(MsfError::InvalidContainer(_)) => {}
        Err(e) => panic!("expected InvalidContainer, got {:?}", e),
        Ok(msf) => panic!("expected InvalidContainer, parsed {:?}", msf),
    }
}

// =============================================================================
// Successful Parse Tests
// =============================================================================

#[test]
fn test_parse_handmade_container() {
    let bytes = handmade(512, &[2, 10, 20, 6, 7], &[&b"0123456789"[..], &[b'x'; 20][..]]);

    let mut msf = MsfFile::open(Cursor::new(bytes)).unwrap();
    assert_eq!(msf.stream_count(), 2);
    assert_eq!(msf.read_stream(0).unwrap().unwrap(), b"0123456789");
    assert_eq!(msf.read_stream(1).unwrap().unwrap(), vec![b'x'; 20]);
}

#[test]
fn test_parse_stream_with_out_of_order_pages() {
    let first = vec![b'a'; 512];
    let second = vec![b'b'; 5];
    // Stream data lives in page 7 first, then page 6
    let bytes = handmade(512, &[1, 517, 7, 6], &[&second[..], &first[..]]);

    let mut msf = MsfFile::open(Cursor::new(bytes)).unwrap();
    let data = msf.read_stream(0).unwrap().unwrap();

    assert_eq!(data.len(), 517);
    assert!(data[..512].iter().all(|&b| b == b'a'));
    assert_eq!(&data[512..], b"bbbbb");
}

#[test]
fn test_parse_nil_stream() {
    let bytes = handmade(512, &[3, 4, NIL_STREAM_SIZE, 0, 6], &[&b"abcd"[..]]);

    let mut msf = MsfFile::open(Cursor::new(bytes)).unwrap();
    assert_eq!(msf.stream_count(), 3);
    assert!(msf.stream(1).is_none());
    assert_eq!(msf.stream(2).unwrap().len(), 0);
    assert_eq!(msf.read_stream(0).unwrap().unwrap(), b"abcd");
}

#[test]
fn test_parse_from_real_file() {
    let bytes = handmade(1024, &[1, 3, 6], &[&b"xyz"[..]]);
    let mut temp = NamedTempFile::new().unwrap();
    temp.write_all(&bytes).unwrap();
    temp.flush().unwrap();

    let mut file = temp.reopen().unwrap();
    let mut msf = MsfFile::open(&mut file).unwrap();
    assert_eq!(msf.read_stream(0).unwrap().unwrap(), b"xyz");
}

// =============================================================================
// Header Rejection Tests
// =============================================================================

#[test]
fn test_reject_empty_input() {
    assert_invalid(Vec::new());
}

#[test]
fn test_reject_corrupted_magic() {
    let mut bytes = handmade(512, &[0], &[]);
    bytes[0] = b'X';
    assert_invalid(bytes);
}

#[test]
fn test_reject_truncated_header() {
    let bytes = handmade(512, &[0], &[]);
    assert_invalid(bytes[..30].to_vec());
}

#[test]
fn test_reject_file_length_mismatch() {
    let mut bytes = handmade(512, &[0], &[]);
    bytes.push(0);
    assert_invalid(bytes);

    let bytes = handmade(512, &[0], &[]);
    assert_invalid(bytes[..bytes.len() - 512].to_vec());
}

#[test]
fn test_reject_stream_table_larger_than_file() {
    let header = MsfHeader {
        page_size: 512,
        free_page_map: 1,
        page_count: 4,
        stream_table_size: 4096,
    };
    assert_invalid(header_only(header, 2048));
}

// =============================================================================
// Stream Table Rejection Tests
// =============================================================================

#[test]
fn test_reject_missing_root_page_list() {
    // 53-byte file: the root list entry would start at offset 52
    let header = MsfHeader {
        page_size: 53,
        free_page_map: 1,
        page_count: 1,
        stream_table_size: 53,
    };
    assert_invalid(header_only(header, 53));
}

#[test]
fn test_reject_root_list_pointing_past_file() {
    let header = MsfHeader {
        page_size: 512,
        free_page_map: 1,
        page_count: 4,
        stream_table_size: 8,
    };
    let mut bytes = header_only(header, 2048);
    bytes[52..56].copy_from_slice(&99u32.to_le_bytes());
    assert_invalid(bytes);
}

#[test]
fn test_reject_stream_table_page_past_file() {
    let mut bytes = handmade(512, &[0], &[]);
    // Redirect the stream table to a page that does not exist
    bytes[5 * 512..5 * 512 + 4].copy_from_slice(&1000u32.to_le_bytes());
    assert_invalid(bytes);
}

#[test]
fn test_reject_hostile_stream_count() {
    // Three one-page streams, but only one page entry in the table
    assert_invalid(handmade(512, &[3, 100, 100, 100, 6], &[&[0u8; 100][..]]));
}

#[test]
fn test_reject_stream_count_past_table() {
    assert_invalid(handmade(512, &[u32::MAX, 1, 6], &[&[0u8; 1][..]]));
}

// =============================================================================
// Pinned Page Size Tests
// =============================================================================

#[test]
fn test_open_with_config_matching_page_size() {
    let bytes = handmade(512, &[1, 3, 6], &[&b"abc"[..]]);
    let config = Config::builder().page_size(512).build();

    let mut msf = MsfFile::open_with_config(Cursor::new(bytes), &config).unwrap();
    assert_eq!(msf.read_stream(0).unwrap().unwrap(), b"abc");
}

#[test]
fn test_open_with_config_rejects_other_page_size() {
    let bytes = handmade(512, &[1, 3, 6], &[&b"abc"[..]]);

    let result = MsfFile::open_with_config(Cursor::new(bytes.clone()), &Config::default());
    assert!(matches!(result, Err(MsfError::InvalidContainer(_))));

    // The same bytes parse when the page size is not pinned
    assert!(MsfFile::open(Cursor::new(bytes)).is_ok());
}

// =============================================================================
// I/O Failure Tests
// =============================================================================

#[test]
fn test_file_size_seek_failure_names_operation() {
    let bytes = handmade(512, &[0], &[]);
    let handle = NoEndSeek {
        inner: Cursor::new(bytes),
    };

    match MsfFile::open(handle) {
        Err(MsfError::IoOp { op, .. }) => assert_eq!(op, "seek failed"),
        Err(e) => panic!("expected IoOp, got {:?}", e),
        Ok(msf) => panic!("expected IoOp, parsed {:?}", msf),
    }
}
