//! Container Module
//!
//! [`MsfFile`] owns an ordered list of stream slots. Slot `i` is stream
//! index `i`; a slot may be empty (a nil stream).
//!
//! ## Responsibilities
//! - Parse an existing container into file-backed streams (`reader`)
//! - Serialize the current slots into a new container (`writer`)
//! - Index-based bookkeeping: add, get, replace, count

mod reader;
mod writer;

use crate::error::{MsfError, Result};
use crate::stream::MsfStream;

/// Owned stream slot
pub type StreamBox<'a> = Box<dyn MsfStream + 'a>;

/// An MSF container: an ordered set of logical streams
///
/// The lifetime ties file-backed streams to the handle they were parsed
/// from. The container never opens or closes that handle.
#[derive(Default)]
pub struct MsfFile<'a> {
    streams: Vec<Option<StreamBox<'a>>>,
}

impl<'a> MsfFile<'a> {
    /// Create an empty container
    pub fn new() -> Self {
        Self {
            streams: Vec::new(),
        }
    }

    /// Append a stream (or a nil slot) and return its index
    pub fn add_stream(&mut self, stream: Option<StreamBox<'a>>) -> usize {
        self.streams.push(stream);
        self.streams.len() - 1
    }

    /// Get a stream by index.
    ///
    /// Returns `None` for nil slots and for indices past the end.
    pub fn stream(&self, index: usize) -> Option<&(dyn MsfStream + 'a)> {
        self.streams.get(index)?.as_deref()
    }

    /// Mutable access to a stream, for reading through its cursor
    pub fn stream_mut(&mut self, index: usize) -> Option<&mut (dyn MsfStream + 'a)> {
        match self.streams.get_mut(index) {
            Some(Some(stream)) => Some(&mut **stream),
            _ => None,
        }
    }

    /// Replace the stream in an existing slot, returning the previous one.
    ///
    /// The slot must already exist; the container never grows here.
    pub fn replace_stream(
        &mut self,
        index: usize,
        stream: Option<StreamBox<'a>>,
    ) -> Result<Option<StreamBox<'a>>> {
        let count = self.streams.len();
        let slot = self
            .streams
            .get_mut(index)
            .ok_or(MsfError::StreamIndex { index, count })?;
        Ok(std::mem::replace(slot, stream))
    }

    /// Number of slots, nil slots included
    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }

    /// Read the full contents of a stream. `None` if the slot is absent.
    pub fn read_stream(&mut self, index: usize) -> Result<Option<Vec<u8>>> {
        match self.stream_mut(index) {
            Some(stream) => stream.read_all().map(Some),
            None => Ok(None),
        }
    }

    /// Iterate over all slots in index order
    pub fn iter(&self) -> impl Iterator<Item = Option<&(dyn MsfStream + 'a)>> + '_ {
        self.streams.iter().map(|slot| slot.as_deref())
    }
}

impl std::fmt::Debug for MsfFile<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.streams.iter().map(|slot| slot.as_ref().map(|s| s.len())))
            .finish()
    }
}
