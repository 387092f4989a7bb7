use std::{
  borrow::Borrow,
  collections::HashMap,
  fs::File,
  hash::Hash,
  io::{BufReader, Seek, SeekFrom},
};

use serde::{de::DeserializeOwned, Serialize};

use crate::{
  codec::Codec,
  errors::{Errors, FormatError, Result},
  filemap::FileMap,
};

impl<K, V, C> FileMap<K, V, C>
where
  K: Serialize + DeserializeOwned + Hash + Eq + Clone,
  V: Serialize + DeserializeOwned,
  C: Codec,
{
  /// Looks up a single value.
  ///
  /// A miss returns `Errors::KeyNotFound` without touching the file.
  pub fn lookup<Q>(&self, key: &Q) -> Result<V>
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    // the index guard stays alive across the read so the offset and the
    // handle always belong to the same snapshot
    let index = self.index.read();
    let offset = match index.get(key) {
      Some(offset) => *offset,
      None => return Err(Errors::KeyNotFound),
    };

    let mut guard = self.file.lock();
    let file = guard.as_mut().ok_or(Errors::FileMapClosed)?;
    self.read_record(file, offset)
  }

  /// Looks up several values at once.
  ///
  /// Keys missing from the index are left out of the result; that is not an
  /// error. Records are read in file order under a single file lock.
  pub fn lookup_many<'a, Q, I>(&self, keys: I) -> Result<HashMap<K, V>>
  where
    I: IntoIterator<Item = &'a Q>,
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized + 'a,
  {
    let index = self.index.read();
    // keyed by key: zero-length records let distinct keys share an offset
    let resolved: HashMap<&K, i64> = keys
      .into_iter()
      .filter_map(|key| index.get_key_value(key))
      .map(|(key, offset)| (key, *offset))
      .collect();
    if resolved.is_empty() {
      return Ok(HashMap::new());
    }
    let mut positions: Vec<(&K, i64)> = resolved.into_iter().collect();
    positions.sort_unstable_by_key(|(_, offset)| *offset);

    let mut guard = self.file.lock();
    let file = guard.as_mut().ok_or(Errors::FileMapClosed)?;
    let mut results = HashMap::with_capacity(positions.len());
    for (key, offset) in positions {
      let value = self.read_record(file, offset)?;
      results.insert(key.clone(), value);
    }
    Ok(results)
  }

  fn read_record(&self, file: &mut File, offset: i64) -> Result<V> {
    let pos = u64::try_from(offset)
      .map_err(|_| FormatError::InvalidIndex(format!("negative record offset {}", offset)))?;
    file.seek(SeekFrom::Start(pos))?;
    let reader = BufReader::with_capacity(self.options.read_buffer_size, file);
    self.codec.decode(reader).map_err(Errors::Codec)
  }
}
