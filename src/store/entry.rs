/// An entry in the data store — wraps a value with its write version.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub value: String,
    /// Version stamped by the write that produced this entry. A pending expiry
    /// only removes the entry it was scheduled for.
    pub version: u64,
}

impl Entry {
    pub fn new(value: String, version: u64) -> Self {
        Entry { value, version }
    }
}
