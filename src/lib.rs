//! Single-pass min/avg/max aggregation over `name;value` measurement streams.
//!
//! Input is pulled through one reusable chunk buffer. [`ChunkTokenizer`] splits
//! each chunk into records, carrying tokens cut by a chunk boundary into the next
//! read, and [`AggregationTable`] folds them into per-station statistics.
//!
//! ```
//! use rs_1brc_stream::{process_reader, render, Config};
//!
//! let input = b"Paris;12.3\nParis;9.8\nLondon;5.0\n";
//! let records = process_reader(&input[..], &Config::default())?;
//! assert_eq!(render(&records), "{London=5.0/5.0/5.0, Paris=9.8/11.1/12.3}\n");
//! # Ok::<(), rs_1brc_stream::BrcError>(())
//! ```

use std::fs::File;
use std::io::{ErrorKind, Read};

use tracing::{debug, info};

pub mod config;
pub mod error;
pub mod format;
pub mod parse;
pub mod table;
pub mod tokenizer;

pub use config::Config;
pub use error::{BrcError, Result};
pub use format::{format_record, format_records, render};
pub use parse::{is_well_formed, parse_value, parse_value_fast, round_tenth};
pub use table::{AggregationTable, Stat};
pub use tokenizer::ChunkTokenizer;

/// Station count the table is pre-sized for.
const EXPECTED_STATIONS: usize = 10_000;

/// Reads `reader` to the end and returns the folded statistics.
pub fn aggregate<R: Read>(mut reader: R, config: &Config) -> Result<AggregationTable> {
    config.validate()?;

    let mut buf = vec![0u8; config.chunk_size];
    let mut table = AggregationTable::with_capacity(EXPECTED_STATIONS);
    let mut tokenizer = ChunkTokenizer::new(config.max_token_len);
    let mut bytes = 0u64;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(BrcError::StreamRead(e)),
        };
        debug!(bytes = n, "chunk");
        tokenizer.feed(&buf[..n], &mut table)?;
        bytes += n as u64;
    }
    tokenizer.finish(&mut table)?;

    info!(bytes, records = table.records(), stations = table.len(), "aggregated");
    Ok(table)
}

/// Aggregates `reader` and returns the sorted, formatted records.
pub fn process_reader<R: Read>(reader: R, config: &Config) -> Result<Vec<String>> {
    let table = aggregate(reader, config)?;
    Ok(format_records(&table))
}

/// Opens `config.input` and aggregates it.
pub fn aggregate_path(config: &Config) -> Result<AggregationTable> {
    let file = File::open(&config.input)?;
    aggregate(file, config)
}

/// Like [`aggregate_path`], returning the sorted, formatted records.
pub fn process_path(config: &Config) -> Result<Vec<String>> {
    let table = aggregate_path(config)?;
    Ok(format_records(&table))
}
