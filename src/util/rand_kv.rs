use std::collections::HashMap;

use rand::Rng;

pub fn get_test_key(i: usize) -> String {
  format!("flash-filemap-key-{:09}", i)
}

pub fn get_test_value(i: usize) -> Vec<u8> {
  format!("flash-filemap-value-value-value-value-value-value-{:09}", i).into_bytes()
}

/// Builds `{get_test_key(i): get_test_value(i)}` for `i` in `0..n`.
pub fn get_test_dataset(n: usize) -> HashMap<String, Vec<u8>> {
  (0..n).map(|i| (get_test_key(i), get_test_value(i))).collect()
}

/// Picks `count` keys with indices in `0..upper`.
pub fn get_random_keys(count: usize, upper: usize) -> Vec<String> {
  let mut rng = rand::rng();
  (0..count)
    .map(|_| get_test_key(rng.random_range(0..upper)))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_get_test_key_value() {
    for i in 0..=10 {
      assert!(!get_test_key(i).is_empty());
      assert!(!get_test_value(i).is_empty());
    }
    assert_ne!(get_test_key(1), get_test_key(2));
  }

  #[test]
  fn test_get_test_dataset() {
    let data = get_test_dataset(100);
    assert_eq!(data.len(), 100);
    assert_eq!(data.get(&get_test_key(42)), Some(&get_test_value(42)));
  }

  #[test]
  fn test_get_random_keys() {
    let keys = get_random_keys(50, 10);
    assert_eq!(keys.len(), 50);
    let allowed: Vec<String> = (0..10).map(get_test_key).collect();
    assert!(keys.iter().all(|k| allowed.contains(k)));
  }
}
