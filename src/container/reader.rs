//! Container parse path
//!
//! header → root page list → stream table page list → stream table →
//! one [`FileStream`] per stream.
//!
//! The stream table can be large enough that its own page list spans
//! several pages, so it is located through two levels of page lists. Each
//! level is read through its own [`FileStream`].

use std::io::{Read, Seek, SeekFrom};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{MsfError, Result};
use crate::format::{decode_words, MsfHeader, StreamDirectory};
use crate::stream::{read_fully, FileStream, MsfStream, SharedFile};

use super::MsfFile;

impl<'a> MsfFile<'a> {
    /// Parse a container from `file`, which must be positioned at the header.
    ///
    /// Pass `&mut File` (or `&mut Cursor<..>`) to keep ownership of the
    /// handle; the returned container borrows it for its lifetime.
    pub fn open<R: Read + Seek + 'a>(file: R) -> Result<Self> {
        Self::parse(file, None)
    }

    /// Parse a container whose page size must equal `config.page_size`.
    ///
    /// A header declaring any other page size is rejected as an invalid
    /// container before anything past the header is read.
    pub fn open_with_config<R: Read + Seek + 'a>(file: R, config: &Config) -> Result<Self> {
        Self::parse(file, Some(config.page_size))
    }

    fn parse<R: Read + Seek + 'a>(file: R, expected_page_size: Option<u32>) -> Result<Self> {
        Self::parse_pages(file, expected_page_size).inspect_err(|e| {
            if let MsfError::InvalidContainer(reason) = e {
                warn!(reason = %reason, "Rejected MSF container");
            }
        })
    }

    fn parse_pages<R: Read + Seek + 'a>(mut file: R, expected_page_size: Option<u32>) -> Result<Self> {
        let header = MsfHeader::read_from(&mut file)?;
        debug!(
            page_size = header.page_size,
            page_count = header.page_count,
            stream_table_size = header.stream_table_size,
            "Read MSF header"
        );

        if let Some(expected) = expected_page_size {
            if header.page_size != expected {
                return Err(MsfError::invalid(format!(
                    "page size {} does not match required page size {}",
                    header.page_size, expected
                )));
            }
        }

        let physical_size = file_size(&mut file)?;
        if header.file_size() != physical_size {
            return Err(MsfError::invalid(format!(
                "invalid MSF file length: header claims {} bytes, file has {}",
                header.file_size(),
                physical_size
            )));
        }
        if u64::from(header.stream_table_size) > physical_size {
            return Err(MsfError::invalid(format!(
                "stream table size {} exceeds file size {}",
                header.stream_table_size, physical_size
            )));
        }

        let root_pages = read_root_page_list(&mut file, header.root_page_count())?;

        let file: SharedFile<R> = Arc::new(Mutex::new(file));
        let table_pages = read_stream_table_pages(&file, &header, root_pages)?;
        let table = read_stream_table(&file, &header, table_pages)?;
        let directory = StreamDirectory::decode(&table, header.page_size)?;

        let mut msf = MsfFile::new();
        for slot in directory.streams {
            let stream = slot.map(|entry| {
                Box::new(FileStream::new(
                    Arc::clone(&file),
                    header.page_size,
                    entry.size,
                    entry.pages,
                )) as Box<dyn MsfStream + 'a>
            });
            msf.add_stream(stream);
        }

        debug!(streams = msf.stream_count(), "Parsed MSF container");
        Ok(msf)
    }
}

/// Size of the file behind `file`, leaving its position unchanged
fn file_size<S: Seek>(file: &mut S) -> Result<u64> {
    let pos = file
        .stream_position()
        .map_err(MsfError::io_op("failed reading file position"))?;
    let size = file
        .seek(SeekFrom::End(0))
        .map_err(MsfError::io_op("seek failed"))?;
    file.seek(SeekFrom::Start(pos))
        .map_err(MsfError::io_op("seek failed"))?;
    Ok(size)
}

/// First level: page numbers stored directly after the header
fn read_root_page_list<R: Read>(file: &mut R, count: u32) -> Result<Vec<u32>> {
    let mut bytes = vec![0u8; count as usize * 4];
    if read_fully(file, &mut bytes)? != bytes.len() {
        return Err(MsfError::invalid("missing root stream table page list"));
    }
    Ok(decode_words(&bytes))
}

/// Second level: the page list of the stream table, read through the root pages
fn read_stream_table_pages<R: Read + Seek>(
    file: &SharedFile<R>,
    header: &MsfHeader,
    root_pages: Vec<u32>,
) -> Result<Vec<u32>> {
    let count = root_pages.len();
    let length = u32::try_from(count * 4)
        .map_err(|_| MsfError::invalid("stream table page list too large"))?;
    let mut stream = FileStream::new(Arc::clone(file), header.page_size, length, root_pages);

    let mut bytes = vec![0u8; count * 4];
    if stream.read(&mut bytes)? != bytes.len() {
        return Err(MsfError::invalid("failed to read stream table page list"));
    }
    Ok(decode_words(&bytes))
}

/// The stream table bytes themselves
fn read_stream_table<R: Read + Seek>(
    file: &SharedFile<R>,
    header: &MsfHeader,
    table_pages: Vec<u32>,
) -> Result<Vec<u8>> {
    let mut stream = FileStream::new(
        Arc::clone(file),
        header.page_size,
        header.stream_table_size,
        table_pages,
    );

    let mut table = vec![0u8; header.stream_table_size as usize];
    if stream.read(&mut table)? != table.len() {
        return Err(MsfError::invalid("failed to read stream table"));
    }
    Ok(table)
}
