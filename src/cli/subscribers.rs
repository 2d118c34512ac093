use std::path::PathBuf;

use clap::Parser;

use crate::subscribers::FileStore;

#[derive(Parser)]
pub struct SubscribersArgs {
    /// File with the subscribed chat IDs, one per line.
    #[clap(long = "subscribers-path", env = "SUBSCRIBERS_PATH", default_value = "users_list.txt")]
    pub path: PathBuf,
}

impl SubscribersArgs {
    pub fn open(self) -> FileStore {
        FileStore::new(self.path)
    }
}
