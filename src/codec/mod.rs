pub mod bincode;
pub mod json;

use std::io::Read;

use serde::{de::DeserializeOwned, Serialize};

use crate::errors::CodecError;

pub use self::{bincode::BincodeCodec, json::JsonCodec};

/// Turns values into self-delimiting byte sequences and back.
///
/// A decoder positioned at the start of an encoded value must stop at the
/// end of that value without knowing its length up front; records and the
/// index block are laid out back to back in the backing file.
pub trait Codec: Sync + Send {
  /// Appends the encoding of `value` to `buf`.
  fn encode<T>(&self, buf: &mut Vec<u8>, value: &T) -> Result<(), CodecError>
  where
    T: Serialize + ?Sized;

  /// Decodes exactly one value from `reader`.
  fn decode<T, R>(&self, reader: R) -> Result<T, CodecError>
  where
    T: DeserializeOwned,
    R: Read;
}
