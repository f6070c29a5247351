//! HPACK header encoding.

use super::primitives::{encode_integer, encode_string};
use super::table::{DynamicTable, HeaderField, StaticTable};

/// HPACK encoder.
///
/// Owns the encoding-side dynamic table for one connection direction. The
/// peer's decoder reconstructs every table mutation from the encoded bytes
/// alone, so the two tables evolve in lockstep as long as the byte stream
/// is delivered in order.
pub struct HpackEncoder {
    /// Dynamic table for encoding.
    dynamic_table: DynamicTable,
    /// Whether to use Huffman encoding for strings.
    use_huffman: bool,
}

impl Default for HpackEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl HpackEncoder {
    /// Create a new HPACK encoder with default settings.
    pub fn new() -> Self {
        Self {
            dynamic_table: DynamicTable::new(super::DEFAULT_TABLE_SIZE),
            use_huffman: true,
        }
    }

    /// Create a new HPACK encoder with a specific table size.
    pub fn with_table_size(size: usize) -> Self {
        Self {
            dynamic_table: DynamicTable::new(size),
            use_huffman: true,
        }
    }

    /// Set whether to use Huffman encoding.
    pub fn set_huffman(&mut self, use_huffman: bool) {
        self.use_huffman = use_huffman;
    }

    /// Set the dynamic table size.
    ///
    /// The peer's decoder only learns of the new size through
    /// [`encode_table_size_update`]; emit one before the next header block
    /// when shrinking below the negotiated value.
    ///
    /// [`encode_table_size_update`]: HpackEncoder::encode_table_size_update
    pub fn set_table_size(&mut self, size: usize) {
        self.dynamic_table.set_max_size(size);
    }

    /// Encode a list of headers into an HPACK header block.
    pub fn encode(&mut self, headers: &[HeaderField], buf: &mut Vec<u8>) {
        for header in headers {
            self.encode_header(header, buf);
        }
    }

    /// Encode a single header field.
    ///
    /// Policy: an exact match is emitted as an indexed field; anything
    /// else becomes a literal with incremental indexing (reusing a
    /// matching name index when one exists) and enters the dynamic table,
    /// mirroring exactly what the peer's decoder will do with the bytes.
    fn encode_header(&mut self, header: &HeaderField, buf: &mut Vec<u8>) {
        let static_match = StaticTable::find(&header.name, &header.value);
        let dynamic_match = self.dynamic_table.find(&header.name, &header.value);

        match (static_match, dynamic_match) {
            // Exact match in static table - use indexed representation
            (Some((idx, true)), _) => {
                self.encode_indexed(idx, buf);
            }
            // Exact match in dynamic table
            (_, Some((dyn_idx, true))) => {
                // Dynamic table index = static table size + 1 + dyn_idx
                let idx = StaticTable::len() + 1 + dyn_idx;
                self.encode_indexed(idx, buf);
            }
            // Name match in static table - use literal with indexing
            (Some((idx, false)), _) => {
                self.encode_literal_indexed(idx, &header.value, buf);
                self.dynamic_table.insert(header.clone());
            }
            // Name match in dynamic table
            (_, Some((dyn_idx, false))) => {
                let idx = StaticTable::len() + 1 + dyn_idx;
                self.encode_literal_indexed(idx, &header.value, buf);
                self.dynamic_table.insert(header.clone());
            }
            // No match - literal with new name
            (None, None) => {
                self.encode_literal_new(&header.name, &header.value, buf);
                self.dynamic_table.insert(header.clone());
            }
        }
    }

    /// Encode an indexed header field (Section 6.1).
    /// Format: 1xxxxxxx
    fn encode_indexed(&self, index: usize, buf: &mut Vec<u8>) {
        encode_integer(index, 7, 0x80, buf);
    }

    /// Encode a literal header field with incremental indexing (Section 6.2.1).
    /// Format: 01xxxxxx
    fn encode_literal_indexed(&self, name_index: usize, value: &[u8], buf: &mut Vec<u8>) {
        encode_integer(name_index, 6, 0x40, buf);
        encode_string(value, self.use_huffman, buf);
    }

    /// Encode a literal header field with new name (Section 6.2.1).
    fn encode_literal_new(&self, name: &[u8], value: &[u8], buf: &mut Vec<u8>) {
        buf.push(0x40); // Literal with incremental indexing, new name
        encode_string(name, self.use_huffman, buf);
        encode_string(value, self.use_huffman, buf);
    }

    /// Encode a dynamic table size update (Section 6.3).
    /// Format: 001xxxxx
    pub fn encode_table_size_update(&self, size: usize, buf: &mut Vec<u8>) {
        encode_integer(size, 5, 0x20, buf);
    }
}
