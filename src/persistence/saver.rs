use super::store::{Schema, Store};
use anyhow::{Context, Result};
use log::{debug, error};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// Snapshot to write, tagged with the model revision it was taken at
#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub revision: u64,
    pub schema: Schema,
}

/// Completion report for a save request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub revision: u64,
    pub result: Result<(), String>,
}

/// Background writer. Requests queued while a write is in flight are coalesced
/// so only the newest snapshot is written.
pub struct Saver {
    requests: Option<Sender<SaveRequest>>,
    outcomes: Receiver<SaveOutcome>,
    handle: Option<JoinHandle<()>>,
}

impl Saver {
    pub fn spawn(store: Store) -> Result<Self> {
        let (request_tx, request_rx) = mpsc::channel::<SaveRequest>();
        let (outcome_tx, outcome_rx) = mpsc::channel::<SaveOutcome>();

        let handle = thread::Builder::new()
            .name("tasklog-saver".to_string())
            .spawn(move || run(store, request_rx, outcome_tx))
            .context("Failed to start saver thread")?;

        Ok(Self {
            requests: Some(request_tx),
            outcomes: outcome_rx,
            handle: Some(handle),
        })
    }

    /// Queue a snapshot. Returns false if the saver thread is gone.
    pub fn submit(&self, request: SaveRequest) -> bool {
        match &self.requests {
            Some(tx) => tx.send(request).is_ok(),
            None => false,
        }
    }

    /// Next finished save, if any, without blocking
    pub fn try_recv(&self) -> Option<SaveOutcome> {
        self.outcomes.try_recv().ok()
    }

    /// Stop accepting requests, wait for queued writes and return their outcomes
    pub fn shutdown(mut self) -> Vec<SaveOutcome> {
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Saver thread panicked");
            }
        }
        self.outcomes.try_iter().collect()
    }
}

fn run(store: Store, requests: Receiver<SaveRequest>, outcomes: Sender<SaveOutcome>) {
    while let Ok(mut request) = requests.recv() {
        while let Ok(newer) = requests.try_recv() {
            request = newer;
        }

        let result = store.save(&request.schema).map_err(|err| {
            let message = format!("{:#}", anyhow::Error::from(err));
            error!("Save of revision {} failed: {}", request.revision, message);
            message
        });
        if result.is_ok() {
            debug!("Saved revision {} to {}", request.revision, store.path().display());
        }

        let outcome = SaveOutcome {
            revision: request.revision,
            result,
        };
        if outcomes.send(outcome).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Task, TaskTree, Timeline};
    use crate::persistence::Settings;

    fn schema_with(title: &str) -> Schema {
        let mut tasks = TaskTree::new();
        tasks.add_task(Task::new(title, "2024-06-01"));
        Schema::new(tasks, Timeline::new(), Settings::default())
    }

    #[test]
    fn test_saves_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let saver = Saver::spawn(Store::new(&path)).unwrap();

        assert!(saver.submit(SaveRequest {
            revision: 1,
            schema: schema_with("First"),
        }));
        let outcomes = saver.shutdown();

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0], SaveOutcome { revision: 1, result: Ok(()) });
        let loaded = Store::new(&path).load().unwrap();
        assert_eq!(loaded.tasks.tasks_for_date("2024-06-01")[0].title, "First");
    }

    #[test]
    fn test_last_request_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let saver = Saver::spawn(Store::new(&path)).unwrap();

        for (revision, title) in [(1, "One"), (2, "Two"), (3, "Three")] {
            saver.submit(SaveRequest {
                revision,
                schema: schema_with(title),
            });
        }
        let outcomes = saver.shutdown();

        assert_eq!(outcomes.last().map(|o| o.revision), Some(3));
        let loaded = Store::new(&path).load().unwrap();
        assert_eq!(loaded.tasks.tasks_for_date("2024-06-01")[0].title, "Three");
    }

    #[test]
    fn test_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the rename fail
        let path = dir.path().join("taken");
        std::fs::create_dir(&path).unwrap();
        let saver = Saver::spawn(Store::new(&path)).unwrap();

        saver.submit(SaveRequest {
            revision: 7,
            schema: schema_with("Doomed"),
        });
        let outcomes = saver.shutdown();

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].revision, 7);
        assert!(outcomes[0].result.is_err());
    }
}
