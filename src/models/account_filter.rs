use serde::{Deserialize, Serialize};

/// Condition an account must satisfy to be returned by a program account scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountFilter {
    /// `data[offset..offset + bytes.len()] == bytes`
    Memcmp { offset: usize, bytes: Vec<u8> },
    /// `data.len() == size`
    DataSize(u64),
}

impl AccountFilter {
    pub fn memcmp(offset: usize, bytes: impl Into<Vec<u8>>) -> Self {
        AccountFilter::Memcmp {
            offset,
            bytes: bytes.into(),
        }
    }

    /// Evaluates the filter against raw account data the way the RPC node does.
    pub fn matches(&self, data: &[u8]) -> bool {
        match self {
            AccountFilter::Memcmp { offset, bytes } => data
                .get(*offset..offset + bytes.len())
                .is_some_and(|window| window == bytes.as_slice()),
            AccountFilter::DataSize(size) => data.len() as u64 == *size,
        }
    }
}

/// Portion of the account data returned by a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSlice {
    pub offset: usize,
    pub length: usize,
}

impl DataSlice {
    /// Applies the slice to full account data, truncating at the end of the buffer.
    pub fn apply<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        let start = self.offset.min(data.len());
        let end = (self.offset + self.length).min(data.len());
        &data[start..end]
    }
}
