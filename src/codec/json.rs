use std::io::Read;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::errors::CodecError;

use super::Codec;

/// JSON records, each terminated by a newline so that adjacent scalars
/// never run together.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
  fn encode<T>(&self, buf: &mut Vec<u8>, value: &T) -> Result<(), CodecError>
  where
    T: Serialize + ?Sized,
  {
    serde_json::to_writer(&mut *buf, value)?;
    buf.push(b'\n');
    Ok(())
  }

  fn decode<T, R>(&self, reader: R) -> Result<T, CodecError>
  where
    T: DeserializeOwned,
    R: Read,
  {
    let mut de = serde_json::Deserializer::from_reader(reader);
    Ok(T::deserialize(&mut de)?)
  }
}

#[cfg(test)]
mod tests {
  use std::io::Cursor;

  use super::*;

  #[test]
  fn test_json_adjacent_numbers_stay_apart() {
    let codec = JsonCodec;
    let mut buf = Vec::new();
    codec.encode(&mut buf, &12u32).unwrap();
    let second = buf.len() as u64;
    codec.encode(&mut buf, &34u32).unwrap();

    let mut cursor = Cursor::new(&buf);
    let first: u32 = codec.decode(&mut cursor).unwrap();
    assert_eq!(first, 12);

    cursor.set_position(second);
    let next: u32 = codec.decode(&mut cursor).unwrap();
    assert_eq!(next, 34);
  }

  #[test]
  fn test_json_decode_stops_at_value_end() {
    let codec = JsonCodec;
    let mut buf = Vec::new();
    codec.encode(&mut buf, &vec![1u8, 2, 3]).unwrap();
    codec.encode(&mut buf, "trailing").unwrap();

    let value: Vec<u8> = codec.decode(buf.as_slice()).unwrap();
    assert_eq!(value, vec![1, 2, 3]);
  }

  #[test]
  fn test_json_decode_garbage() {
    let codec = JsonCodec;
    let res: Result<Vec<u8>, _> = codec.decode(&b"{not json"[..]);
    assert!(res.is_err());
  }
}
