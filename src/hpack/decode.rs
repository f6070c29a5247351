//! HPACK header decoding.

use thiserror::Error;
use tracing::trace;

use super::huffman;
use super::primitives::{decode_integer, decode_string};
use super::table::{DynamicTable, HeaderField, StaticTable};
use crate::frame::ErrorCode;

/// HPACK decoding error.
///
/// Compression state is shared between the two endpoints and cannot be
/// resynchronized once a decode fails, so every variant here is fatal to
/// the whole connection (see [`HpackError::error_code`]).
#[derive(Debug, Error)]
pub enum HpackError {
    /// Header block ended mid-representation.
    #[error("incomplete header block")]
    Incomplete,
    /// Prefixed integer exceeds the representable range (2^32 - 1).
    #[error("integer exceeds the representable range")]
    IntegerOverflow,
    /// Invalid Huffman-coded string literal.
    #[error("invalid Huffman encoding: {0}")]
    InvalidHuffman(#[from] huffman::HuffmanError),
    /// Index 0, or beyond the end of the static+dynamic index space.
    #[error("invalid table index: {0}")]
    InvalidIndex(usize),
    /// Dynamic table size update above the negotiated maximum.
    #[error("invalid table size update")]
    InvalidTableSize,
}

impl HpackError {
    /// The protocol-level error this failure maps to.
    ///
    /// Always COMPRESSION_ERROR: the peer's next header block would be
    /// decoded against a desynchronized dynamic table.
    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::CompressionError
    }
}

/// HPACK decoder.
///
/// Owns the decoding-side dynamic table for one connection direction.
/// State evolves purely from the byte stream handed to [`decode`], so a
/// decoder fed the same bytes as the peer's encoder stays in sync with it
/// by construction.
///
/// [`decode`]: HpackDecoder::decode
pub struct HpackDecoder {
    /// Dynamic table for decoding.
    dynamic_table: DynamicTable,
    /// Maximum table size allowed by the SETTINGS exchange.
    max_table_size: usize,
}

impl Default for HpackDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl HpackDecoder {
    /// Create a new HPACK decoder with default settings.
    pub fn new() -> Self {
        Self {
            dynamic_table: DynamicTable::new(super::DEFAULT_TABLE_SIZE),
            max_table_size: super::DEFAULT_TABLE_SIZE,
        }
    }

    /// Create a new HPACK decoder with a specific table size.
    pub fn with_table_size(size: usize) -> Self {
        Self {
            dynamic_table: DynamicTable::new(size),
            max_table_size: size,
        }
    }

    /// Set the maximum allowed table size (SETTINGS_HEADER_TABLE_SIZE).
    pub fn set_max_table_size(&mut self, size: usize) {
        self.max_table_size = size;
    }

    /// Decode an HPACK header block into a list of headers.
    ///
    /// The input is one logical header block; reassembly of
    /// HEADERS/CONTINUATION fragments into a flat byte sequence is the
    /// caller's job.
    pub fn decode(&mut self, data: &[u8]) -> Result<Vec<HeaderField>, HpackError> {
        let mut headers = Vec::new();
        let mut pos = 0;

        while pos < data.len() {
            let (header, consumed) = self.decode_header(&data[pos..])?;
            if let Some(h) = header {
                headers.push(h);
            }
            pos += consumed;
        }

        Ok(headers)
    }

    /// Decode a single header representation.
    /// Returns (Option<HeaderField>, bytes_consumed).
    fn decode_header(&mut self, data: &[u8]) -> Result<(Option<HeaderField>, usize), HpackError> {
        if data.is_empty() {
            return Err(HpackError::Incomplete);
        }

        let first_byte = data[0];

        if first_byte & 0x80 != 0 {
            // Indexed Header Field (Section 6.1)
            // Format: 1xxxxxxx
            self.decode_indexed(data)
        } else if first_byte & 0x40 != 0 {
            // Literal Header Field with Incremental Indexing (Section 6.2.1)
            // Format: 01xxxxxx
            self.decode_literal_indexed(data)
        } else if first_byte & 0x20 != 0 {
            // Dynamic Table Size Update (Section 6.3)
            // Format: 001xxxxx
            self.decode_table_size_update(data)
        } else {
            // Literal Header Field without Indexing (Section 6.2.2)
            // or Never Indexed (Section 6.2.3)
            // Format: 0000xxxx or 0001xxxx
            self.decode_literal_not_indexed(data)
        }
    }

    /// Decode an indexed header field.
    fn decode_indexed(&mut self, data: &[u8]) -> Result<(Option<HeaderField>, usize), HpackError> {
        let (index, consumed) = decode_integer(data, 7)?;

        if index == 0 {
            return Err(HpackError::InvalidIndex(0));
        }

        let header = self.get_header(index)?;
        Ok((Some(header), consumed))
    }

    /// Decode a literal header field with incremental indexing.
    fn decode_literal_indexed(
        &mut self,
        data: &[u8],
    ) -> Result<(Option<HeaderField>, usize), HpackError> {
        let (name_index, mut consumed) = decode_integer(data, 6)?;

        let name = if name_index > 0 {
            self.get_header(name_index)?.name
        } else {
            let (n, c) = decode_string(&data[consumed..])?;
            consumed += c;
            n
        };

        let (value, c) = decode_string(&data[consumed..])?;
        consumed += c;

        let header = HeaderField::new(name, value);
        self.dynamic_table.insert(header.clone());

        Ok((Some(header), consumed))
    }

    /// Decode a literal header field without indexing (or never indexed;
    /// the two decode identically, the distinction only binds proxies that
    /// re-encode).
    fn decode_literal_not_indexed(
        &mut self,
        data: &[u8],
    ) -> Result<(Option<HeaderField>, usize), HpackError> {
        let (name_index, mut consumed) = decode_integer(data, 4)?;

        let name = if name_index > 0 {
            self.get_header(name_index)?.name
        } else {
            let (n, c) = decode_string(&data[consumed..])?;
            consumed += c;
            n
        };

        let (value, c) = decode_string(&data[consumed..])?;
        consumed += c;

        let header = HeaderField::new(name, value);
        // Not added to dynamic table

        Ok((Some(header), consumed))
    }

    /// Decode a dynamic table size update.
    fn decode_table_size_update(
        &mut self,
        data: &[u8],
    ) -> Result<(Option<HeaderField>, usize), HpackError> {
        let (new_size, consumed) = decode_integer(data, 5)?;

        if new_size > self.max_table_size {
            return Err(HpackError::InvalidTableSize);
        }

        trace!(new_size, "dynamic table size update");
        self.dynamic_table.set_max_size(new_size);

        Ok((None, consumed))
    }

    /// Get a header from the static or dynamic table by index.
    fn get_header(&self, index: usize) -> Result<HeaderField, HpackError> {
        if index == 0 {
            return Err(HpackError::InvalidIndex(0));
        }

        let static_len = StaticTable::len();

        if index <= static_len {
            // Static table
            let (name, value) = StaticTable::get(index).ok_or(HpackError::InvalidIndex(index))?;
            Ok(HeaderField::new(name.to_vec(), value.to_vec()))
        } else {
            // Dynamic table
            let dyn_index = index - static_len - 1;
            self.dynamic_table
                .get(dyn_index)
                .cloned()
                .ok_or(HpackError::InvalidIndex(index))
        }
    }
}
