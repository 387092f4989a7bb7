#[derive(Debug, Clone)]
pub struct Options {
  /// Fsync the snapshot before it is renamed over the live file.
  pub sync_writes: bool,

  pub write_buffer_size: usize,

  pub read_buffer_size: usize,
}

impl Default for Options {
  fn default() -> Self {
    Self {
      sync_writes: false,
      write_buffer_size: 64 * 1024, // 64KB
      read_buffer_size: 8 * 1024,   // 8KB
    }
  }
}
