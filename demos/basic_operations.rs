use std::collections::HashMap;

use flash_filemap::{errors::Errors, FileMap};
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Account {
  name: String,
  balance: u64,
}

fn main() {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

  let dir = std::env::temp_dir().join("flash-filemap-demo");
  std::fs::create_dir_all(&dir).expect("failed to create demo dir");
  let path = dir.join("accounts");

  let mut accounts = HashMap::new();
  for (id, name) in ["alice", "bob", "carol"].iter().enumerate() {
    accounts.insert(
      id as u32,
      Account {
        name: name.to_string(),
        balance: 100 * (id as u64 + 1),
      },
    );
  }

  let fm = FileMap::create(&path, Some(&accounts)).expect("failed to create file map");

  let bob = fm.lookup(&1).expect("failed to lookup");
  info!("lookup 1 = {:?}", bob);

  match fm.lookup(&9) {
    Err(Errors::KeyNotFound) => info!("lookup 9 = not found"),
    other => info!("lookup 9 = {:?}", other.map(|a| a.name)),
  }

  let found = fm.lookup_many(&[0, 2, 9]).expect("failed to lookup many");
  info!("lookup_many [0, 2, 9] found {} accounts", found.len());

  // replace the whole dataset
  accounts.remove(&0);
  accounts.insert(
    3,
    Account {
      name: "dave".to_string(),
      balance: 42,
    },
  );
  fm.update(Some(&accounts)).expect("failed to update");
  info!("after update: {} accounts, 0 present = {}", fm.len(), fm.contains_key(&0));

  fm.close().expect("failed to close");

  let reopened = FileMap::<u32, Account>::open(&path).expect("failed to reopen");
  info!("reopened: 3 = {:?}", reopened.lookup(&3).expect("failed to lookup"));
  reopened.close().expect("failed to close");

  std::fs::remove_dir_all(&dir).expect("failed to remove demo dir");
}
