//! Debounced session writer

use std::{sync::mpsc, thread, time::Duration};

use rustc_hash::FxHashMap;
use tracing::debug;

use super::KeyValueStore;

#[derive(Debug)]
enum Command {
    Write { key: &'static str, value: String },
    Flush(mpsc::SyncSender<()>),
}

/// Fire-and-forget writer that coalesces bursts of session writes.
///
/// Mutations schedule whole-payload writes per key; the worker waits for
/// a quiet window before pushing the latest payload for each key to the
/// store. There is no acknowledgment channel and no retry: a failed
/// write leaves stale persisted state until the next successful one, and
/// the in-memory cart stays authoritative. Dropping the writer drains
/// whatever is still pending.
#[derive(Debug)]
pub struct DebouncedWriter {
    sender: Option<mpsc::Sender<Command>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl DebouncedWriter {
    /// Start a writer over the given store with the given quiet window.
    pub fn spawn(store: impl KeyValueStore, window: Duration) -> Self {
        let (sender, receiver) = mpsc::channel();

        let worker = thread::spawn(move || run(store, &receiver, window));

        Self {
            sender: Some(sender),
            worker: Some(worker),
        }
    }

    /// Queue the latest payload for a key.
    ///
    /// Never blocks and never fails; a missing worker is logged and the
    /// write dropped.
    pub fn schedule(&self, key: &'static str, value: String) {
        let Some(sender) = self.sender.as_ref() else {
            return;
        };

        if sender.send(Command::Write { key, value }).is_err() {
            debug!(key, "session writer is gone; dropping write");
        }
    }

    /// Block until every payload scheduled so far has been offered to the
    /// store.
    pub fn flush(&self) {
        let Some(sender) = self.sender.as_ref() else {
            return;
        };

        let (ack, done) = mpsc::sync_channel(0);

        if sender.send(Command::Flush(ack)).is_err() {
            return;
        }

        if done.recv().is_err() {
            debug!("session writer exited before acknowledging flush");
        }
    }
}

impl Drop for DebouncedWriter {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain and exit.
        drop(self.sender.take());

        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            debug!("session writer exited abnormally");
        }
    }
}

fn run(mut store: impl KeyValueStore, receiver: &mpsc::Receiver<Command>, window: Duration) {
    let mut pending: FxHashMap<&'static str, String> = FxHashMap::default();

    loop {
        let command = if pending.is_empty() {
            match receiver.recv() {
                Ok(command) => Some(command),
                Err(_disconnected) => break,
            }
        } else {
            match receiver.recv_timeout(window) {
                Ok(command) => Some(command),
                Err(mpsc::RecvTimeoutError::Timeout) => None,
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        };

        match command {
            Some(Command::Write { key, value }) => {
                pending.insert(key, value);
            }
            Some(Command::Flush(ack)) => {
                write_pending(&mut store, &mut pending);

                if ack.send(()).is_err() {
                    debug!("flush caller went away before acknowledgment");
                }
            }
            None => write_pending(&mut store, &mut pending),
        }
    }

    // Channel closed: push whatever is still pending before exiting.
    write_pending(&mut store, &mut pending);
}

fn write_pending(store: &mut impl KeyValueStore, pending: &mut FxHashMap<&'static str, String>) {
    for (key, value) in pending.drain() {
        if let Err(error) = store.put(key, &value) {
            debug!(key, %error, "session write failed; in-memory state stays authoritative");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use testresult::TestResult;

    use crate::store::{MemoryStore, StoreError};

    use super::*;

    /// Store wrapper that counts how many writes actually land.
    #[derive(Debug, Clone)]
    struct CountingStore {
        inner: MemoryStore,
        puts: std::sync::Arc<AtomicUsize>,
    }

    impl CountingStore {
        fn new(inner: MemoryStore) -> Self {
            Self {
                inner,
                puts: std::sync::Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl KeyValueStore for CountingStore {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn put(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            self.inner.put(key, value)
        }
    }

    #[test]
    fn flush_pushes_scheduled_writes() -> TestResult {
        let store = MemoryStore::new();
        let writer = DebouncedWriter::spawn(store.clone(), Duration::from_millis(50));

        writer.schedule("cartItems", "[1]".to_string());
        writer.flush();

        assert_eq!(store.get("cartItems").as_deref(), Some("[1]"));

        Ok(())
    }

    #[test]
    fn successive_writes_to_one_key_coalesce() -> TestResult {
        let store = MemoryStore::new();
        let counting = CountingStore::new(store.clone());
        let puts = std::sync::Arc::clone(&counting.puts);

        let writer = DebouncedWriter::spawn(counting, Duration::from_millis(50));

        writer.schedule("cartItems", "[1]".to_string());
        writer.schedule("cartItems", "[1,2]".to_string());
        writer.schedule("cartItems", "[1,2,3]".to_string());
        writer.flush();

        assert_eq!(store.get("cartItems").as_deref(), Some("[1,2,3]"));
        assert_eq!(puts.load(Ordering::SeqCst), 1);

        Ok(())
    }

    #[test]
    fn drop_drains_pending_writes() -> TestResult {
        let store = MemoryStore::new();

        {
            let writer = DebouncedWriter::spawn(store.clone(), Duration::from_secs(60));

            writer.schedule("promoCode", "TRYNEW".to_string());
        }

        assert_eq!(store.get("promoCode").as_deref(), Some("TRYNEW"));

        Ok(())
    }

    #[test]
    fn distinct_keys_are_all_written() -> TestResult {
        let store = MemoryStore::new();
        let writer = DebouncedWriter::spawn(store.clone(), Duration::from_millis(50));

        writer.schedule("cartItems", "[]".to_string());
        writer.schedule("savedForLater", "[]".to_string());
        writer.flush();

        assert!(store.get("cartItems").is_some());
        assert!(store.get("savedForLater").is_some());

        Ok(())
    }

    #[test]
    fn flush_on_idle_writer_returns_immediately() {
        let writer = DebouncedWriter::spawn(MemoryStore::new(), Duration::from_millis(50));

        writer.flush();
    }
}
