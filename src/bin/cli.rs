//! msftool
//!
//! Command-line interface for inspecting and rebuilding MSF containers.

use std::fs::{self, File};
use std::io::{Seek, SeekFrom};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use msfkit::{page_count, Config, MemoryStream, MsfFile, MsfHeader};
use tracing_subscriber::{fmt, EnvFilter};

/// msftool
#[derive(Parser, Debug)]
#[command(name = "msftool")]
#[command(about = "Inspect and rebuild MSF (PDB) containers")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print header fields and a per-stream summary
    Info {
        /// Container to inspect
        file: PathBuf,
    },

    /// Write one stream's bytes to a file
    Extract {
        /// Container to read
        file: PathBuf,

        /// Stream index
        index: usize,

        /// Output path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Build a container whose streams are the given files ("-" for a nil stream)
    Create {
        /// Output container
        output: PathBuf,

        /// Stream contents, in index order
        inputs: Vec<String>,

        /// Page size in bytes
        #[arg(short, long, default_value = "4096")]
        page_size: u32,
    },

    /// Parse a container and write it back out
    Repack {
        /// Container to read
        input: PathBuf,

        /// Output container
        output: PathBuf,

        /// Page size in bytes
        #[arg(short, long, default_value = "4096")]
        page_size: u32,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,msfkit=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args.command) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> msfkit::Result<()> {
    match command {
        Commands::Info { file } => info(file),
        Commands::Extract {
            file,
            index,
            output,
        } => extract(file, index, output),
        Commands::Create {
            output,
            inputs,
            page_size,
        } => create(output, inputs, page_size),
        Commands::Repack {
            input,
            output,
            page_size,
        } => repack(input, output, page_size),
    }
}

fn info(path: PathBuf) -> msfkit::Result<()> {
    let mut file = File::open(&path)?;
    let header = MsfHeader::read_from(&mut file)?;
    file.seek(SeekFrom::Start(0))?;

    println!("file:              {}", path.display());
    println!("page size:         {}", header.page_size);
    println!("page count:        {}", header.page_count);
    println!("free page map:     {}", header.free_page_map);
    println!("stream table size: {}", header.stream_table_size);

    let mut msf = MsfFile::open(&mut file)?;
    println!("streams:           {}", msf.stream_count());
    println!();
    println!("{:>6}  {:>10}  {:>6}  {:>8}", "index", "size", "pages", "crc32");

    for index in 0..msf.stream_count() {
        match msf.stream_mut(index) {
            Some(stream) => {
                let data = stream.read_all()?;
                let size = u32::try_from(data.len()).unwrap_or(u32::MAX);
                println!(
                    "{:>6}  {:>10}  {:>6}  {:08x}",
                    index,
                    data.len(),
                    page_count(header.page_size, size),
                    crc32fast::hash(&data)
                );
            }
            None => println!("{:>6}  {:>10}  {:>6}  {:>8}", index, "nil", "-", "-"),
        }
    }

    Ok(())
}

fn extract(path: PathBuf, index: usize, output: PathBuf) -> msfkit::Result<()> {
    let mut file = File::open(&path)?;
    let mut msf = MsfFile::open(&mut file)?;

    let count = msf.stream_count();
    let data = match msf.read_stream(index)? {
        Some(data) => data,
        None if index < count => Vec::new(),
        None => return Err(msfkit::MsfError::StreamIndex { index, count }),
    };

    fs::write(&output, &data)?;
    tracing::info!(index, bytes = data.len(), output = %output.display(), "Extracted stream");
    Ok(())
}

fn create(output: PathBuf, inputs: Vec<String>, page_size: u32) -> msfkit::Result<()> {
    let mut msf = MsfFile::new();
    for input in &inputs {
        if input == "-" {
            msf.add_stream(None);
        } else {
            let stream = MemoryStream::new(fs::read(input)?);
            msf.add_stream(Some(Box::new(stream)));
        }
    }

    let config = Config::builder().page_size(page_size).build();
    let mut out = File::create(&output)?;
    msf.write_with_config(&mut out, &config)?;
    out.sync_all()?;

    tracing::info!(streams = msf.stream_count(), output = %output.display(), "Created container");
    Ok(())
}

fn repack(input: PathBuf, output: PathBuf, page_size: u32) -> msfkit::Result<()> {
    let mut file = File::open(&input)?;
    let mut msf = MsfFile::open(&mut file)?;

    let config = Config::builder().page_size(page_size).build();
    let mut out = File::create(&output)?;
    msf.write_with_config(&mut out, &config)?;
    out.sync_all()?;

    let total: u64 = msf.iter().flatten().map(|stream| stream.len()).sum();
    tracing::info!(
        streams = msf.stream_count(),
        bytes = total,
        output = %output.display(),
        "Repacked container"
    );
    Ok(())
}
