use std::{io, result};

use thiserror::Error;

/// Boxed error produced by a [`Codec`](crate::codec::Codec) implementation.
pub type CodecError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum Errors {
  #[error("key not found")]
  KeyNotFound,

  #[error("data is nil")]
  DataIsNil,

  #[error("file map is closed")]
  FileMapClosed,

  #[error("malformed file map: {0}")]
  Format(#[from] FormatError),

  #[error("failed to encode or decode record: {0}")]
  Codec(#[source] CodecError),

  #[error(transparent)]
  Io(#[from] io::Error),
}

/// Structural problems found while decoding a backing file.
#[derive(Error, Debug)]
pub enum FormatError {
  #[error("truncated header: expected {expected} bytes, got {actual}")]
  TruncatedHeader { expected: usize, actual: usize },

  #[error("invalid header: {0}")]
  InvalidHeader(String),

  #[error("invalid index block: {0}")]
  InvalidIndex(String),
}

impl Errors {
  pub fn is_not_found(&self) -> bool {
    matches!(self, Errors::KeyNotFound)
  }

  pub fn is_format(&self) -> bool {
    matches!(self, Errors::Format(_))
  }
}

pub type Result<T> = result::Result<T, Errors>;
