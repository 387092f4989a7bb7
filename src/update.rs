use std::{
  collections::HashMap,
  fs::{self, File, OpenOptions},
  hash::Hash,
  io::{self, BufWriter, ErrorKind, Seek, SeekFrom, Write},
  path::{Path, PathBuf},
};

use log::{debug, error, warn};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
  codec::Codec,
  data::header::{Header, HEADER_SIZE},
  errors::{Errors, Result},
  filemap::FileMap,
  index::{encode_index, Index},
};

pub(crate) const TMP_FILE_SUFFIX: &str = ".tmp";

impl<K, V, C> FileMap<K, V, C>
where
  K: Serialize + DeserializeOwned + Hash + Eq + Clone,
  V: Serialize + DeserializeOwned,
  C: Codec,
{
  /// Replaces the whole dataset with `data`.
  ///
  /// The new snapshot is written to a temporary file with no lock held;
  /// only the final swap blocks readers. Concurrent updates are not
  /// serialized against each other: the last one to swap wins.
  ///
  /// If the rename or the reopen fails, the map is left without index or
  /// handle and must be reopened.
  pub fn update(&self, data: Option<&HashMap<K, V>>) -> Result<()> {
    let data = data.ok_or(Errors::DataIsNil)?;

    let (tmp_path, tmp_file) = self.create_tmp_file()?;
    let index = match self.write_snapshot(tmp_file, data) {
      Ok(index) => index,
      Err(e) => {
        error!("failed to write snapshot {}: {}", tmp_path.display(), e);
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
      }
    };

    self.swap(&tmp_path, index)
  }

  fn create_tmp_file(&self) -> Result<(PathBuf, File)> {
    loop {
      let tmp_path = tmp_file_name(&self.path, rand::random::<u64>());
      match open_exclusive(&tmp_path) {
        Ok(file) => return Ok((tmp_path, file)),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
          debug!("temp file {} already exists, retrying", tmp_path.display());
        }
        Err(e) => {
          error!("failed to create temp file {}: {}", tmp_path.display(), e);
          return Err(e.into());
        }
      }
    }
  }

  /// Serializes header, records and index block into `file`.
  fn write_snapshot(&self, file: File, data: &HashMap<K, V>) -> Result<Index<K>> {
    let mut writer = BufWriter::with_capacity(self.options.write_buffer_size, file);

    // placeholder, rewritten once the offsets are known
    let mut header = Header::new();
    writer.write_all(&header.encode())?;

    let data_offset = HEADER_SIZE as u64;
    let mut cursor = data_offset;
    let mut index = Index::with_capacity(data.len());
    let mut buf = Vec::new();
    for (key, value) in data {
      buf.clear();
      self.codec.encode(&mut buf, value).map_err(Errors::Codec)?;
      writer.write_all(&buf)?;
      index.insert(key.clone(), cursor as i64);
      cursor += buf.len() as u64;
    }

    buf.clear();
    encode_index(&self.codec, &mut buf, &index).map_err(Errors::Codec)?;
    writer.write_all(&buf)?;

    header.set_offsets(data_offset, cursor);
    writer.seek(SeekFrom::Start(0))?;
    writer.write_all(&header.encode())?;

    let file = writer.into_inner().map_err(|e| e.into_error())?;
    if self.options.sync_writes {
      file.sync_all()?;
    }
    Ok(index)
  }

  fn swap(&self, tmp_path: &Path, index: Index<K>) -> Result<()> {
    let mut index_guard = self.index.write();
    let mut file_guard = self.file.lock();

    let keys = index.len();
    *index_guard = index;
    file_guard.take();

    if let Err(e) = fs::rename(tmp_path, &self.path) {
      error!(
        "failed to rename {} to {}: {}",
        tmp_path.display(),
        self.path.display(),
        e
      );
      *index_guard = Index::new();
      return Err(e.into());
    }

    match File::open(&self.path) {
      Ok(file) => *file_guard = Some(file),
      Err(e) => {
        error!("failed to reopen file map {}: {}", self.path.display(), e);
        *index_guard = Index::new();
        return Err(e.into());
      }
    }

    debug!("swapped in snapshot {} ({} keys)", self.path.display(), keys);
    Ok(())
  }

  /// Removes `<name>.<digits>.tmp` siblings of the backing file. Individual
  /// removal failures are ignored.
  pub(crate) fn cleanup_tmp_files(&self) -> io::Result<()> {
    let base = match self.path.file_name().and_then(|name| name.to_str()) {
      Some(base) => base,
      None => return Ok(()),
    };
    let dir = match self.path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };

    let entries = match fs::read_dir(dir) {
      Ok(entries) => entries,
      Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
      Err(e) => {
        error!("failed to read dir {}: {}", dir.display(), e);
        return Err(e);
      }
    };

    for entry in entries.flatten() {
      let file_name = entry.file_name();
      let Some(name) = file_name.to_str() else {
        continue;
      };
      if !is_tmp_file_of(base, name) {
        continue;
      }
      match fs::remove_file(entry.path()) {
        Ok(()) => debug!("removed stale temp file {}", name),
        Err(e) => warn!("failed to remove temp file {}: {}", name, e),
      }
    }
    Ok(())
  }
}

pub(crate) fn tmp_file_name(path: &Path, suffix: u64) -> PathBuf {
  let mut name = path.as_os_str().to_os_string();
  name.push(format!(".{}{}", suffix, TMP_FILE_SUFFIX));
  PathBuf::from(name)
}

fn is_tmp_file_of(base: &str, candidate: &str) -> bool {
  candidate
    .strip_prefix(base)
    .and_then(|rest| rest.strip_prefix('.'))
    .and_then(|rest| rest.strip_suffix(TMP_FILE_SUFFIX))
    .is_some_and(|suffix| !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()))
}

fn open_exclusive(path: &Path) -> io::Result<File> {
  let mut opts = OpenOptions::new();
  opts.write(true).create_new(true);
  #[cfg(unix)]
  {
    use std::os::unix::fs::OpenOptionsExt;
    opts.mode(0o600);
  }
  opts.open(path)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_tmp_file_name() {
    let name = tmp_file_name(Path::new("/tmp/data/fm"), 42);
    assert_eq!(name, PathBuf::from("/tmp/data/fm.42.tmp"));

    let name = tmp_file_name(Path::new("fm.db"), 7);
    assert_eq!(name, PathBuf::from("fm.db.7.tmp"));
  }

  #[test]
  fn test_is_tmp_file_of() {
    assert!(is_tmp_file_of("fm", "fm.123.tmp"));
    assert!(is_tmp_file_of("fm.db", "fm.db.18446744073709551615.tmp"));

    assert!(!is_tmp_file_of("fm", "fm"));
    assert!(!is_tmp_file_of("fm", "fm..tmp"));
    assert!(!is_tmp_file_of("fm", "fm.abc.tmp"));
    assert!(!is_tmp_file_of("fm", "fm2.123.tmp"));
    assert!(!is_tmp_file_of("fm", "other.123.tmp"));
    assert!(!is_tmp_file_of("fm", "fm.123.tmp.bak"));
  }

  #[test]
  fn test_open_exclusive_rejects_existing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fm.1.tmp");
    assert!(open_exclusive(&path).is_ok());
    let res = open_exclusive(&path);
    assert_eq!(res.err().unwrap().kind(), ErrorKind::AlreadyExists);
  }
}
