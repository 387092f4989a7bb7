use std::io::Read;

use serde::{de::DeserializeOwned, Serialize};

use crate::errors::CodecError;

use super::Codec;

/// Compact binary records using bincode's default (fixed-int, little-endian)
/// configuration. Every encoding carries its own lengths, so no separator is
/// needed between records.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl Codec for BincodeCodec {
  fn encode<T>(&self, buf: &mut Vec<u8>, value: &T) -> Result<(), CodecError>
  where
    T: Serialize + ?Sized,
  {
    ::bincode::serialize_into(&mut *buf, value)?;
    Ok(())
  }

  fn decode<T, R>(&self, reader: R) -> Result<T, CodecError>
  where
    T: DeserializeOwned,
    R: Read,
  {
    Ok(::bincode::deserialize_from(reader)?)
  }
}

#[cfg(test)]
mod tests {
  use std::io::Cursor;

  use super::*;

  #[test]
  fn test_bincode_sequential_decode() {
    let codec = BincodeCodec;
    let mut buf = Vec::new();
    codec.encode(&mut buf, "flash").unwrap();
    codec.encode(&mut buf, &42u64).unwrap();
    codec.encode(&mut buf, &vec![(1u32, 24i64), (2, 48)]).unwrap();

    let mut cursor = Cursor::new(buf);
    let first: String = codec.decode(&mut cursor).unwrap();
    let second: u64 = codec.decode(&mut cursor).unwrap();
    let third: Vec<(u32, i64)> = codec.decode(&mut cursor).unwrap();
    assert_eq!(first, "flash");
    assert_eq!(second, 42);
    assert_eq!(third, vec![(1, 24), (2, 48)]);
  }

  #[test]
  fn test_bincode_decode_truncated() {
    let codec = BincodeCodec;
    let mut buf = Vec::new();
    codec.encode(&mut buf, &vec![7u8; 16]).unwrap();
    buf.truncate(10);

    let res: Result<Vec<u8>, _> = codec.decode(buf.as_slice());
    assert!(res.is_err());
  }
}
