//! Stream filter decoding.
//!
//! Filters are stacked lazily on top of the raw stream reader: nothing is
//! decompressed until the returned stream is read. Dropping the stream
//! releases every stage, outermost first.

use std::fmt;
use std::io::{self, Read};

use flate2::read::ZlibDecoder;
use solde_core::{ExtractError, Result};

/// Supported stream filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Flate,
}

impl Filter {
    /// Map a filter name, as found in a stream dictionary, to a filter.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim_start_matches('/') {
            "FlateDecode" | "Fl" => Ok(Filter::Flate),
            other => Err(ExtractError::UnsupportedFilter(other.to_string())),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Flate => f.write_str("FlateDecode"),
        }
    }
}

/// A raw stream with its filters applied, decoding on read.
pub struct DecodedStream<'a> {
    reader: Box<dyn Read + 'a>,
    /// Filters in application order
    filters: Vec<Filter>,
}

impl Read for DecodedStream<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl fmt::Debug for DecodedStream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedStream")
            .field("filters", &self.filters)
            .finish_non_exhaustive()
    }
}

/// Stack `filters`, in order, on top of `raw`.
///
/// Every filter name is checked before any stage is built, so an unknown
/// filter fails without touching the raw source.
pub fn decode_stream<'a, R, S>(raw: R, filters: &[S]) -> Result<DecodedStream<'a>>
where
    R: Read + 'a,
    S: AsRef<str>,
{
    let filters = filters
        .iter()
        .map(|name| Filter::from_name(name.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    let mut reader: Box<dyn Read + 'a> = Box::new(raw);
    for filter in &filters {
        reader = match filter {
            Filter::Flate => Box::new(ZlibDecoder::new(reader)),
        };
    }
    Ok(DecodedStream { reader, filters })
}
