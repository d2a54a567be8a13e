//! Async search session
//!
//! Runs a [`QueryController`] on its own tokio task. Callers push query
//! changes through a channel and read results from a `watch` channel, so the
//! debounce timer lives in exactly one place and no locks guard the state.

use super::controller::QueryController;
use super::ranking::Score;
use crate::error::AppError;
use crate::records::Searchable;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// A ranked record with its score, owned
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredItem<T> {
    pub item: T,
    pub score: Option<Score>,
}

/// Published view of the controller after every change
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSnapshot<T> {
    pub raw_query: String,
    pub debounced_query: String,
    pub results: Vec<ScoredItem<T>>,
    pub revision: u64,
}

impl<T: Searchable + Clone> SearchSnapshot<T> {
    fn of(controller: &QueryController<T>) -> Self {
        Self {
            raw_query: controller.raw_query().to_string(),
            debounced_query: controller.debounced_query().to_string(),
            results: controller
                .filtered_scored()
                .into_iter()
                .map(|(item, score)| ScoredItem {
                    item: item.clone(),
                    score,
                })
                .collect(),
            revision: controller.revision(),
        }
    }

    /// Results without their scores
    pub fn items(&self) -> Vec<&T> {
        self.results.iter().map(|r| &r.item).collect()
    }
}

enum Command<T> {
    SetQuery(String),
    Clear,
    SetItems(Vec<T>),
}

/// Handle to a running search session
pub struct SearchSession<T> {
    commands: mpsc::UnboundedSender<Command<T>>,
    snapshots: watch::Receiver<SearchSnapshot<T>>,
    task: JoinHandle<QueryController<T>>,
}

impl<T> SearchSession<T>
where
    T: Searchable + Clone + Send + Sync + 'static,
{
    /// Start a session task. Must be called from within a tokio runtime.
    pub fn spawn(controller: QueryController<T>) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(SearchSnapshot::of(&controller));

        let task = tokio::spawn(run(controller, command_rx, snapshot_tx));

        Self {
            commands: command_tx,
            snapshots: snapshot_rx,
            task,
        }
    }

    pub fn set_query(&self, text: impl Into<String>) -> Result<(), AppError> {
        self.send(Command::SetQuery(text.into()))
    }

    pub fn clear_search(&self) -> Result<(), AppError> {
        self.send(Command::Clear)
    }

    pub fn set_items(&self, items: Vec<T>) -> Result<(), AppError> {
        self.send(Command::SetItems(items))
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> SearchSnapshot<T> {
        self.snapshots.borrow().clone()
    }

    /// Receiver that is notified on every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot<T>> {
        self.snapshots.clone()
    }

    /// Stop the session, committing any pending query first, and hand the
    /// controller back
    pub async fn shutdown(self) -> Result<QueryController<T>, AppError> {
        drop(self.commands);
        self.task
            .await
            .map_err(|e| AppError::Internal(format!("Search session task failed: {}", e)))
    }

    fn send(&self, command: Command<T>) -> Result<(), AppError> {
        self.commands
            .send(command)
            .map_err(|_| AppError::SessionClosed)
    }
}

async fn run<T>(
    mut controller: QueryController<T>,
    mut commands: mpsc::UnboundedReceiver<Command<T>>,
    snapshots: watch::Sender<SearchSnapshot<T>>,
) -> QueryController<T>
where
    T: Searchable + Clone,
{
    loop {
        let deadline = controller.deadline();

        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::SetQuery(text)) => controller.set_query(text, Instant::now()),
                Some(Command::Clear) => controller.clear_search(),
                Some(Command::SetItems(items)) => controller.set_items(items),
                None => {
                    controller.flush();
                    snapshots.send_replace(SearchSnapshot::of(&controller));
                    debug!("Search session closed at revision {}", controller.revision());
                    break;
                }
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                controller.poll(Instant::now());
            }
        }

        snapshots.send_replace(SearchSnapshot::of(&controller));
    }

    controller
}
