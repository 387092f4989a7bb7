use std::{
  collections::{hash_map::Entry, HashMap},
  hash::Hash,
  io::Read,
};

use serde::{de::DeserializeOwned, Serialize};

use crate::{
  codec::Codec,
  data::header::Header,
  errors::{CodecError, FormatError},
};

/// In-memory offset index: key -> byte position of its record.
pub(crate) type Index<K> = HashMap<K, i64>;

/// Appends the index block to `buf`.
///
/// The block is a single encoded sequence of `(key, offset)` pairs, which
/// keeps it decodable for any serializable key type rather than only string
/// keys.
pub(crate) fn encode_index<K, C>(codec: &C, buf: &mut Vec<u8>, index: &Index<K>) -> Result<(), CodecError>
where
  K: Serialize,
  C: Codec,
{
  let entries: Vec<(&K, i64)> = index.iter().map(|(k, off)| (k, *off)).collect();
  codec.encode(buf, &entries)
}

/// Decodes the index block and checks every offset against the header.
pub(crate) fn decode_index<K, C, R>(
  codec: &C,
  reader: R,
  header: &Header,
) -> Result<Index<K>, FormatError>
where
  K: DeserializeOwned + Hash + Eq,
  C: Codec,
  R: Read,
{
  let entries: Vec<(K, i64)> = codec
    .decode(reader)
    .map_err(|e| FormatError::InvalidIndex(e.to_string()))?;

  let mut index = HashMap::with_capacity(entries.len());
  for (key, offset) in entries {
    // a zero-length record may start right at the index block
    if offset < header.data_offset as i64 || offset > header.index_offset as i64 {
      return Err(FormatError::InvalidIndex(format!(
        "offset {} outside data region [{}, {}]",
        offset, header.data_offset, header.index_offset
      )));
    }
    match index.entry(key) {
      Entry::Occupied(_) => {
        return Err(FormatError::InvalidIndex(format!(
          "duplicate key for offset {}",
          offset
        )));
      }
      Entry::Vacant(e) => {
        e.insert(offset);
      }
    }
  }
  Ok(index)
}
