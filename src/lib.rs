//! # msfkit
//!
//! Reader and writer for the Multi-Stream Format (MSF) container, the
//! page-based layout underneath Program Database (PDB) files:
//! - Parsing with full validation of untrusted input
//! - Two-level page-list indirection for the stream table
//! - Writing with Free Page Map pages interleaved at the expected slots
//! - Index-addressed stream slots, including nil streams
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        MsfFile                              │
//! │             (ordered stream slots, add/get/replace)         │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │ open                         │ write
//!                ▼                              ▼
//!   ┌─────────────────────────┐     ┌─────────────────────────┐
//!   │ MsfHeader → root pages  │     │ PageWriter              │
//!   │ → table pages → table   │     │ (FPM-aware page flush)  │
//!   │ → StreamDirectory       │     │ → StreamDirectory       │
//!   └────────────┬────────────┘     └────────────┬────────────┘
//!                │                               │
//!                ▼                               ▼
//!         ┌─────────────┐                 ┌─────────────┐
//!         │ FileStream  │                 │MemoryStream │
//!         │ (page list) │                 │  (staging)  │
//!         └─────────────┘                 └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::fs::File;
//! use msfkit::{MemoryStream, MsfFile};
//!
//! let mut msf = MsfFile::new();
//! msf.add_stream(Some(Box::new(MemoryStream::new(b"hello".to_vec()))));
//! msf.add_stream(None);
//!
//! let mut out = File::create("out.msf")?;
//! msf.write(&mut out)?;
//!
//! let mut file = File::open("out.msf")?;
//! let mut parsed = MsfFile::open(&mut file)?;
//! assert_eq!(parsed.read_stream(0)?.as_deref(), Some(&b"hello"[..]));
//! # Ok::<(), msfkit::MsfError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod format;
pub mod stream;
pub mod container;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{MsfError, Result};
pub use config::Config;
pub use container::{MsfFile, StreamBox};
pub use format::{is_fpm_page, page_count, MsfHeader};
pub use stream::{FileStream, MemoryStream, MsfStream};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of msfkit
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
