use std::{
  borrow::Borrow,
  collections::HashMap,
  fs::File,
  hash::Hash,
  io::{BufReader, Seek, SeekFrom},
  marker::PhantomData,
  path::{Path, PathBuf},
};

use log::{error, info};
use parking_lot::{Mutex, RwLock};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
  codec::{Codec, JsonCodec},
  data::header::Header,
  errors::Result,
  index::{decode_index, Index},
  option::Options,
};

/// A file-backed map with an in-memory offset index.
///
/// Every record lives in a single backing file; the index maps each key to
/// the byte offset of its encoded value. Lookups take the index lock shared
/// and the file lock exclusively (the handle carries a cursor). Updates
/// rebuild the whole file off to the side and swap it in under both locks,
/// always acquired index first, then file.
pub struct FileMap<K, V, C = JsonCodec> {
  pub(crate) path: PathBuf,

  pub(crate) index: RwLock<Index<K>>,

  /// Read-only handle on the live file. `None` before the first snapshot,
  /// after `close` and after a failed swap.
  pub(crate) file: Mutex<Option<File>>,

  pub(crate) codec: C,

  pub(crate) options: Options,

  _value: PhantomData<fn() -> V>,
}

impl<K, V> FileMap<K, V>
where
  K: Serialize + DeserializeOwned + Hash + Eq + Clone,
  V: Serialize + DeserializeOwned,
{
  /// Opens an existing file map written with the JSON codec.
  pub fn open<P>(path: P) -> Result<Self>
  where
    P: AsRef<Path>,
  {
    Self::open_with(path, Options::default(), JsonCodec)
  }

  /// Writes `data` to a fresh file map at `path` using the JSON codec.
  pub fn create<P>(path: P, data: Option<&HashMap<K, V>>) -> Result<Self>
  where
    P: AsRef<Path>,
  {
    Self::create_with(path, data, Options::default(), JsonCodec)
  }
}

impl<K, V, C> FileMap<K, V, C>
where
  K: Serialize + DeserializeOwned + Hash + Eq + Clone,
  V: Serialize + DeserializeOwned,
  C: Codec,
{
  pub fn open_with<P>(path: P, options: Options, codec: C) -> Result<Self>
  where
    P: AsRef<Path>,
  {
    let path = path.as_ref().to_path_buf();
    let mut file = match File::open(&path) {
      Ok(file) => file,
      Err(e) => {
        error!("failed to open file map {}: {}", path.display(), e);
        return Err(e.into());
      }
    };

    let header = Header::read_from(&mut file)?;
    header.validate()?;

    file.seek(SeekFrom::Start(header.index_offset))?;
    let reader = BufReader::with_capacity(options.read_buffer_size, &mut file);
    let index: Index<K> = decode_index(&codec, reader, &header)?;

    info!(
      "opened file map {} (version {}, {} keys)",
      path.display(),
      header.version,
      index.len()
    );

    Ok(Self {
      path,
      index: RwLock::new(index),
      file: Mutex::new(Some(file)),
      codec,
      options,
      _value: PhantomData,
    })
  }

  /// Builds a new file map at `path` from `data`.
  ///
  /// Any file already at `path` is replaced once the snapshot is complete.
  pub fn create_with<P>(
    path: P,
    data: Option<&HashMap<K, V>>,
    options: Options,
    codec: C,
  ) -> Result<Self>
  where
    P: AsRef<Path>,
  {
    let fm = Self {
      path: path.as_ref().to_path_buf(),
      index: RwLock::new(Index::new()),
      file: Mutex::new(None),
      codec,
      options,
      _value: PhantomData,
    };
    fm.update(data)?;
    Ok(fm)
  }

  /// Drops the index and the file handle, then removes temporary files
  /// left behind by interrupted updates.
  ///
  /// Closing twice is harmless. A closed map answers every lookup with
  /// `KeyNotFound`.
  pub fn close(&self) -> Result<()> {
    let mut index = self.index.write();
    let mut file = self.file.lock();
    *index = Index::new();
    file.take();
    self.cleanup_tmp_files()?;
    Ok(())
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn len(&self) -> usize {
    self.index.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.index.read().is_empty()
  }

  pub fn contains_key<Q>(&self, key: &Q) -> bool
  where
    K: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    self.index.read().contains_key(key)
  }
}
