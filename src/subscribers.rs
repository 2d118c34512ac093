use std::{
    collections::BTreeSet,
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
    path::PathBuf,
    sync::Mutex,
};

use crate::{api::telegram::ChatId, prelude::*};

/// Append-only set of notification recipients.
pub trait SubscriberStore: Sync {
    fn list(&self) -> Result<BTreeSet<ChatId>>;

    /// Returns `false` when the recipient is already subscribed.
    fn add(&self, chat_id: ChatId) -> Result<bool>;
}

/// One chat ID per line, other lines are ignored.
pub struct FileStore {
    path: PathBuf,

    /// Serializes the read-then-append in [`FileStore::add`].
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    /// Raw file contents, `None` when nobody has subscribed yet.
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => {
                Err(error).with_context(|| format!("failed to read `{}`", self.path.display()))
            }
        }
    }
}

fn parse(contents: &str) -> BTreeSet<ChatId> {
    contents.lines().filter_map(|line| line.trim().parse().ok()).collect()
}

impl SubscriberStore for FileStore {
    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn list(&self) -> Result<BTreeSet<ChatId>> {
        let Some(contents) = self.read()? else {
            info!("no subscribers file yet");
            return Ok(BTreeSet::new());
        };
        let subscribers = parse(&contents);
        debug!(n_subscribers = subscribers.len(), "loaded");
        Ok(subscribers)
    }

    #[instrument(skip_all, fields(path = %self.path.display(), chat_id = %chat_id))]
    fn add(&self, chat_id: ChatId) -> Result<bool> {
        let _guard = self.lock.lock().map_err(|_| anyhow!("the subscribers lock is poisoned"))?;
        let contents = self.read()?.unwrap_or_default();
        if parse(&contents).contains(&chat_id) {
            return Ok(false);
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open `{}`", self.path.display()))?;
        // Hand-edited files may lack the final newline:
        if !contents.is_empty() && !contents.ends_with('\n') {
            writeln!(file)?;
        }
        writeln!(file, "{chat_id}")?;
        info!("subscribed");
        Ok(true)
    }
}
