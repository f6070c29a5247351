//! HPACK static and dynamic tables.

use std::collections::VecDeque;

use tracing::debug;

/// A header field (name-value pair).
///
/// Fields only ever travel as part of an ordered header list; names are
/// not unique within a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    pub name: Vec<u8>,
    pub value: Vec<u8>,
}

impl HeaderField {
    /// Create a new header field.
    pub fn new(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Get the size of this header field for table accounting.
    /// Size = length of name + length of value + 32 (RFC 7541 Section 4.1)
    pub fn size(&self) -> usize {
        self.name.len() + self.value.len() + 32
    }
}

/// The HPACK static table (RFC 7541 Appendix A).
///
/// Index 1-61, index 0 is invalid. Entries with an empty value are
/// name-only and pair with a caller-supplied value literal.
pub struct StaticTable;

impl StaticTable {
    /// `(name, value)` per index; `ENTRIES[0]` is index 1.
    const ENTRIES: [(&'static [u8], &'static [u8]); 61] = [
        (b":authority", b""),
        (b":method", b"GET"),
        (b":method", b"POST"),
        (b":path", b"/"),
        (b":path", b"/index.html"),
        (b":scheme", b"http"),
        (b":scheme", b"https"),
        (b":status", b"200"),
        (b":status", b"204"),
        (b":status", b"206"),
        (b":status", b"304"),
        (b":status", b"400"),
        (b":status", b"404"),
        (b":status", b"500"),
        (b"accept-charset", b""),
        (b"accept-encoding", b"gzip, deflate"),
        (b"accept-language", b""),
        (b"accept-ranges", b""),
        (b"accept", b""),
        (b"access-control-allow-origin", b""),
        (b"age", b""),
        (b"allow", b""),
        (b"authorization", b""),
        (b"cache-control", b""),
        (b"content-disposition", b""),
        (b"content-encoding", b""),
        (b"content-language", b""),
        (b"content-length", b""),
        (b"content-location", b""),
        (b"content-range", b""),
        (b"content-type", b""),
        (b"cookie", b""),
        (b"date", b""),
        (b"etag", b""),
        (b"expect", b""),
        (b"expires", b""),
        (b"from", b""),
        (b"host", b""),
        (b"if-match", b""),
        (b"if-modified-since", b""),
        (b"if-none-match", b""),
        (b"if-range", b""),
        (b"if-unmodified-since", b""),
        (b"last-modified", b""),
        (b"link", b""),
        (b"location", b""),
        (b"max-forwards", b""),
        (b"proxy-authenticate", b""),
        (b"proxy-authorization", b""),
        (b"range", b""),
        (b"referer", b""),
        (b"refresh", b""),
        (b"retry-after", b""),
        (b"server", b""),
        (b"set-cookie", b""),
        (b"strict-transport-security", b""),
        (b"transfer-encoding", b""),
        (b"user-agent", b""),
        (b"vary", b""),
        (b"via", b""),
        (b"www-authenticate", b""),
    ];

    /// Get a static table entry by index (1-61).
    pub fn get(index: usize) -> Option<(&'static [u8], &'static [u8])> {
        if index == 0 || index > Self::len() {
            None
        } else {
            Some(Self::ENTRIES[index - 1])
        }
    }

    /// Find an entry in the static table.
    /// Returns (index, exact_match) where exact_match is true if both name and value match.
    pub fn find(name: &[u8], value: &[u8]) -> Option<(usize, bool)> {
        let mut name_match = None;

        for (i, (entry_name, entry_value)) in Self::ENTRIES.iter().enumerate() {
            if *entry_name == name {
                if *entry_value == value {
                    return Some((i + 1, true));
                }
                if name_match.is_none() {
                    name_match = Some(i + 1);
                }
            }
        }

        name_match.map(|i| (i, false))
    }

    /// Get the number of entries in the static table.
    pub const fn len() -> usize {
        Self::ENTRIES.len()
    }
}

/// The HPACK dynamic table.
///
/// A FIFO of header fields, newest at the front; overall index space
/// continues after the static table, so dynamic index 0 is index 62.
/// Entries are evicted oldest-first when the table exceeds its maximum
/// size.
pub struct DynamicTable {
    /// Header entries, newest first.
    entries: VecDeque<HeaderField>,
    /// Current size in bytes.
    size: usize,
    /// Maximum size in bytes.
    max_size: usize,
}

impl DynamicTable {
    /// Create a new dynamic table with the given maximum size.
    pub(super) fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            size: 0,
            max_size,
        }
    }

    /// Set the maximum size of the table, evicting entries as needed.
    pub(super) fn set_max_size(&mut self, max_size: usize) {
        debug!(
            from = self.max_size,
            to = max_size,
            "resizing dynamic table"
        );
        self.max_size = max_size;
        self.evict();
    }

    /// Get an entry by index (0 = newest entry).
    pub(super) fn get(&self, index: usize) -> Option<&HeaderField> {
        self.entries.get(index)
    }

    /// Insert a new entry at the front of the table.
    ///
    /// An entry larger than the whole table empties it rather than
    /// partially fitting (RFC 7541 Section 4.4).
    pub(super) fn insert(&mut self, field: HeaderField) {
        let entry_size = field.size();

        if entry_size > self.max_size {
            self.entries.clear();
            self.size = 0;
            return;
        }

        // Evict entries until there's room
        while self.size + entry_size > self.max_size {
            if let Some(evicted) = self.entries.pop_back() {
                self.size -= evicted.size();
            } else {
                break;
            }
        }

        self.entries.push_front(field);
        self.size += entry_size;
    }

    /// Find an entry in the dynamic table.
    /// Returns (index, exact_match) where index is 0-based within the dynamic table.
    pub(super) fn find(&self, name: &[u8], value: &[u8]) -> Option<(usize, bool)> {
        let mut name_match = None;

        for (i, entry) in self.entries.iter().enumerate() {
            if entry.name == name {
                if entry.value == value {
                    return Some((i, true));
                }
                if name_match.is_none() {
                    name_match = Some(i);
                }
            }
        }

        name_match.map(|i| (i, false))
    }

    /// Evict entries until the table is within its maximum size.
    fn evict(&mut self) {
        while self.size > self.max_size {
            if let Some(evicted) = self.entries.pop_back() {
                self.size -= evicted.size();
            } else {
                break;
            }
        }
    }

    /// Get the number of entries in the table.
    #[cfg(test)]
    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the current size of the table in bytes.
    #[cfg(test)]
    pub(super) fn size(&self) -> usize {
        self.size
    }

    /// Get the maximum size of the table in bytes.
    #[cfg(test)]
    fn max_size(&self) -> usize {
        self.max_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_table_get() {
        // Test known entries
        let (name, value) = StaticTable::get(1).unwrap();
        assert_eq!(name, b":authority");
        assert_eq!(value, b"");

        let (name, value) = StaticTable::get(2).unwrap();
        assert_eq!(name, b":method");
        assert_eq!(value, b"GET");

        let (name, value) = StaticTable::get(7).unwrap();
        assert_eq!(name, b":scheme");
        assert_eq!(value, b"https");

        let (name, value) = StaticTable::get(8).unwrap();
        assert_eq!(name, b":status");
        assert_eq!(value, b"200");

        let (name, value) = StaticTable::get(61).unwrap();
        assert_eq!(name, b"www-authenticate");

        // Test bounds
        assert!(StaticTable::get(0).is_none());
        assert!(StaticTable::get(62).is_none());
    }

    #[test]
    fn test_static_table_find() {
        // Exact match
        let (idx, exact) = StaticTable::find(b":method", b"GET").unwrap();
        assert_eq!(idx, 2);
        assert!(exact);

        // Name match only
        let (idx, exact) = StaticTable::find(b":method", b"PUT").unwrap();
        assert_eq!(idx, 2); // First :method entry
        assert!(!exact);

        // No match
        assert!(StaticTable::find(b"x-custom", b"value").is_none());
    }

    #[test]
    fn test_dynamic_table_insert() {
        let mut table = DynamicTable::new(256);

        table.insert(HeaderField::new(b"custom-header".to_vec(), b"value1".to_vec()));
        assert_eq!(table.len(), 1);

        table.insert(HeaderField::new(
            b"another-header".to_vec(),
            b"value2".to_vec(),
        ));
        assert_eq!(table.len(), 2);

        // Newest entry should be at index 0
        let entry = table.get(0).unwrap();
        assert_eq!(entry.name, b"another-header");
    }

    #[test]
    fn test_dynamic_table_eviction_oldest_first() {
        // "header1"/"value1" costs 7 + 6 + 32 = 45 bytes; two fit in 100
        let mut table = DynamicTable::new(100);

        table.insert(HeaderField::new(b"header1".to_vec(), b"value1".to_vec()));
        table.insert(HeaderField::new(b"header2".to_vec(), b"value2".to_vec()));
        assert_eq!(table.len(), 2);
        assert_eq!(table.size(), 90);

        // Third entry evicts the oldest
        table.insert(HeaderField::new(b"header3".to_vec(), b"value3".to_vec()));

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0).unwrap().name, b"header3");
        assert_eq!(table.get(1).unwrap().name, b"header2");
        assert!(table.find(b"header1", b"value1").is_none());
    }

    #[test]
    fn test_dynamic_table_oversized_entry_clears_table() {
        let mut table = DynamicTable::new(64);

        table.insert(HeaderField::new(b"small".to_vec(), b"v".to_vec()));
        assert_eq!(table.len(), 1);

        // 40 + 40 + 32 > 64: the entry cannot fit even in an empty table
        table.insert(HeaderField::new(vec![b'n'; 40], vec![b'v'; 40]));

        assert_eq!(table.len(), 0);
        assert_eq!(table.size(), 0);
    }

    #[test]
    fn test_dynamic_table_resize() {
        let mut table = DynamicTable::new(256);

        table.insert(HeaderField::new(b"header1".to_vec(), b"value1".to_vec()));
        table.insert(HeaderField::new(b"header2".to_vec(), b"value2".to_vec()));
        assert_eq!(table.size(), 90);

        // Shrink the table: only the newest entry fits
        table.set_max_size(50);

        assert_eq!(table.len(), 1);
        assert_eq!(table.size(), 45);
        assert_eq!(table.get(0).unwrap().name, b"header2");

        table.set_max_size(0);
        assert_eq!(table.len(), 0);
        assert_eq!(table.size(), 0);
    }

    #[test]
    fn test_dynamic_table_size_accounting() {
        let mut table = DynamicTable::new(4096);

        let fields = [
            HeaderField::new(b"content-type".to_vec(), b"application/json".to_vec()),
            HeaderField::new(b"x-request-id".to_vec(), b"abc123".to_vec()),
            HeaderField::new(b"etag".to_vec(), b"".to_vec()),
        ];

        let mut expected = 0;
        for field in fields {
            expected += field.size();
            table.insert(field);
        }

        assert_eq!(table.size(), expected);
        assert!(table.size() <= table.max_size());
    }

    #[test]
    fn test_header_field_size() {
        let field = HeaderField::new(b"content-type".to_vec(), b"application/json".to_vec());
        // 12 + 16 + 32 = 60
        assert_eq!(field.size(), 60);
    }
}
