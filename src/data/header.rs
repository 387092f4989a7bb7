use std::io::{ErrorKind, Read};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::errors::{FormatError, Result};

/// The file map format version written into every header.
pub const VERSION: u64 = 0;

/// Encoded header length. Records always start right after it.
pub const HEADER_SIZE: usize = 24;

/// Fixed-size header at the start of every backing file.
///
/// ```text
/// +-----------+---------------+----------------+
/// |  version  |  data_offset  |  index_offset  |
/// +-----------+---------------+----------------+
///    8 bytes       8 bytes         8 bytes        (big-endian)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
  pub version: u64,

  /// Position of the first record byte.
  pub data_offset: u64,

  /// Position of the first index block byte.
  pub index_offset: u64,
}

impl Default for Header {
  fn default() -> Self {
    Self::new()
  }
}

impl Header {
  pub fn new() -> Self {
    Self {
      version: VERSION,
      data_offset: 0,
      index_offset: 0,
    }
  }

  pub fn set_offsets(&mut self, data_offset: u64, index_offset: u64) {
    self.data_offset = data_offset;
    self.index_offset = index_offset;
  }

  pub fn encode(&self) -> Bytes {
    let mut buf = BytesMut::with_capacity(HEADER_SIZE);
    buf.put_u64(self.version);
    buf.put_u64(self.data_offset);
    buf.put_u64(self.index_offset);
    buf.freeze()
  }

  pub fn decode(mut buf: &[u8]) -> std::result::Result<Self, FormatError> {
    if buf.len() < HEADER_SIZE {
      return Err(FormatError::TruncatedHeader {
        expected: HEADER_SIZE,
        actual: buf.len(),
      });
    }
    Ok(Self {
      version: buf.get_u64(),
      data_offset: buf.get_u64(),
      index_offset: buf.get_u64(),
    })
  }

  /// Reads exactly one header, tolerating short reads from `reader`.
  pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
    let mut buf = [0u8; HEADER_SIZE];
    let mut filled = 0;
    while filled < HEADER_SIZE {
      match reader.read(&mut buf[filled..]) {
        Ok(0) => break,
        Ok(n) => filled += n,
        Err(e) if e.kind() == ErrorKind::Interrupted => continue,
        Err(e) => return Err(e.into()),
      }
    }
    Ok(Self::decode(&buf[..filled])?)
  }

  /// Checks the layout invariants of a header read from a finished file.
  pub fn validate(&self) -> std::result::Result<(), FormatError> {
    if self.data_offset != HEADER_SIZE as u64 {
      return Err(FormatError::InvalidHeader(format!(
        "data offset {} does not follow the header",
        self.data_offset
      )));
    }
    if self.index_offset < self.data_offset {
      return Err(FormatError::InvalidHeader(format!(
        "index offset {} precedes data offset {}",
        self.index_offset, self.data_offset
      )));
    }
    Ok(())
  }
}
