//! Best-effort mirroring of a board to the remote record store.
//!
//! Local storage stays authoritative for day-to-day use. The remote copy is
//! read on load/refresh and overwritten on an explicit save; there is no
//! merge of divergent copies.

use crate::board::{Board, Issue, IssueStatus};
use crate::storage::{KeyValueStore, StorageError, UserScope};
use crate::submission::ApiError;
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

pub const REMOTE_SAVE_FAILED: &str =
    "Could not save board to the server; changes are kept on this device.";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("Could not save board locally: {0}")]
    Local(#[from] StorageError),
    #[error("Could not save board remotely: {0}")]
    Remote(#[from] ApiError),
}

impl SyncError {
    pub fn user_message(&self) -> String {
        match self {
            SyncError::Local(e) => format!("Could not save board on this device: {e}"),
            SyncError::Remote(_) => REMOTE_SAVE_FAILED.to_string(),
        }
    }
}

/// Wire shape of a board in the remote record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardRecord {
    pub username: String,
    pub todo_items: Vec<Issue>,
    pub in_progress_items: Vec<Issue>,
    pub done_items: Vec<Issue>,
}

impl BoardRecord {
    pub fn from_board(username: &str, board: &Board) -> Self {
        let column = |status| -> Vec<Issue> { board.issues_in(status).cloned().collect() };
        Self {
            username: username.to_string(),
            todo_items: column(IssueStatus::ToDo),
            in_progress_items: column(IssueStatus::InProgress),
            done_items: column(IssueStatus::Done),
        }
    }

    /// Flattens the columns back into issues. The column an issue arrives in
    /// wins over its own `status` field.
    pub fn into_issues(self) -> Vec<Issue> {
        let with_status = |items: Vec<Issue>, status| {
            items.into_iter().map(move |mut issue| {
                issue.status = status;
                issue
            })
        };
        with_status(self.todo_items, IssueStatus::ToDo)
            .chain(with_status(self.in_progress_items, IssueStatus::InProgress))
            .chain(with_status(self.done_items, IssueStatus::Done))
            .collect()
    }
}

/// HTTP access to the remote record store.
#[automock]
pub trait RecordStore {
    /// `GET <board-base>?username=<name>`; `Ok(None)` when the store has no
    /// board for this user.
    async fn load(&self, username: &str) -> Result<Option<BoardRecord>, ApiError>;

    /// `POST <board-base>` with the record as JSON.
    async fn save(&self, record: &BoardRecord) -> Result<(), ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardSource {
    Remote,
    Local,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedBoard {
    pub board: Board,
    pub source: BoardSource,
}

/// Loads the remote board, falling back to local storage (or its defaults)
/// when the remote store fails or has nothing. A remote board replaces the
/// local issues and is persisted locally.
///
/// Local storage is read only once the remote call has returned, so writes
/// made while it was in flight are part of the result.
#[instrument(skip(remote, store))]
pub async fn load_board(
    remote: &impl RecordStore,
    store: &impl KeyValueStore,
    scope: &UserScope,
) -> LoadedBoard {
    let fetched = remote.load(scope.as_str()).await;
    let mut board = Board::load(store, scope);
    match fetched {
        Ok(Some(record)) => {
            board.replace_issues(record.into_issues());
            if let Err(e) = board.save(store, scope) {
                warn!(error = %e, "Failed to cache remote board locally");
            }
            info!(issues = board.issues().len(), "Loaded board from record store");
            LoadedBoard {
                board,
                source: BoardSource::Remote,
            }
        }
        Ok(None) => {
            info!("No remote board, using local copy");
            LoadedBoard {
                board,
                source: BoardSource::Local,
            }
        }
        Err(e) => {
            warn!(error = %e, "Record store unavailable, using local copy");
            LoadedBoard {
                board,
                source: BoardSource::Local,
            }
        }
    }
}

/// Saves locally, then mirrors to the record store. Both are attempted; a
/// local failure is reported in preference to a remote one.
#[instrument(skip(remote, store, board))]
pub async fn save_board(
    remote: &impl RecordStore,
    store: &impl KeyValueStore,
    scope: &UserScope,
    board: &Board,
) -> Result<(), SyncError> {
    let local = board.save(store, scope);
    if let Err(e) = &local {
        warn!(error = %e, "Failed to save board locally");
    }

    let record = BoardRecord::from_board(scope.as_str(), board);
    let mirrored = remote.save(&record).await;
    if let Err(e) = &mirrored {
        warn!(error = %e, "Failed to mirror board to record store");
    }

    local?;
    mirrored?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use mockall::predicate::*;

    fn scope() -> UserScope {
        UserScope::new("Jane", "Doe")
    }

    fn remote_record() -> BoardRecord {
        BoardRecord {
            username: "Jane.Doe".to_string(),
            todo_items: vec![],
            in_progress_items: vec![Issue {
                id: "SCRUM-7".to_string(),
                title: "Crane inspection".to_string(),
                description: "Annual check".to_string(),
                status: IssueStatus::ToDo,
                assignee: Some("Jane".to_string()),
            }],
            done_items: vec![],
        }
    }

    #[test]
    fn test_record_wire_format() {
        // Arrange
        let record = BoardRecord::from_board("Jane.Doe", &Board::default());

        // Act
        let json: serde_json::Value = serde_json::to_value(&record).unwrap();

        // Assert
        assert_eq!(json["username"], "Jane.Doe");
        assert_eq!(json["todoItems"].as_array().unwrap().len(), 2);
        assert_eq!(json["inProgressItems"].as_array().unwrap().len(), 1);
        assert_eq!(json["doneItems"][0]["status"], "DONE");
    }

    #[test]
    fn test_into_issues_trusts_column_over_status() {
        let issues = remote_record().into_issues();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].status, IssueStatus::InProgress);
    }

    #[tokio::test]
    async fn load_prefers_remote_and_caches_locally() {
        // Arrange
        let store = MemoryStore::new();
        let mut remote = MockRecordStore::new();
        remote
            .expect_load()
            .with(eq("Jane.Doe"))
            .times(1)
            .returning(|_| Ok(Some(remote_record())));

        // Act
        let loaded = load_board(&remote, &store, &scope()).await;

        // Assert
        assert_eq!(loaded.source, BoardSource::Remote);
        assert_eq!(loaded.board.issues().len(), 1);
        assert_eq!(loaded.board.issues()[0].id, "SCRUM-7");
        assert_eq!(Board::load(&store, &scope()), loaded.board);
    }

    #[tokio::test]
    async fn load_falls_back_to_local_on_remote_error() {
        // Arrange
        let store = MemoryStore::new();
        let mut local = Board::default();
        local.add_issue("Local only", "", None);
        local.save(&store, &scope()).unwrap();

        let mut remote = MockRecordStore::new();
        remote
            .expect_load()
            .times(1)
            .returning(|_| Err(ApiError::Transport("offline".to_string())));

        // Act
        let loaded = load_board(&remote, &store, &scope()).await;

        // Assert
        assert_eq!(loaded.source, BoardSource::Local);
        assert_eq!(loaded.board, local);
    }

    #[tokio::test]
    async fn load_falls_back_to_defaults_when_nothing_anywhere() {
        // Arrange
        let store = MemoryStore::new();
        let mut remote = MockRecordStore::new();
        remote.expect_load().times(1).returning(|_| Ok(None));

        // Act
        let loaded = load_board(&remote, &store, &scope()).await;

        // Assert
        assert_eq!(loaded.source, BoardSource::Local);
        assert_eq!(loaded.board, Board::default());
    }

    /// Record store whose lookup gives the user time to edit the local
    /// board before it answers.
    struct SlowRecordStore<'a> {
        store: &'a MemoryStore,
        answer: Result<Option<BoardRecord>, ApiError>,
    }

    impl RecordStore for SlowRecordStore<'_> {
        async fn load(&self, _username: &str) -> Result<Option<BoardRecord>, ApiError> {
            let mut board = Board::load(self.store, &scope());
            board.add_issue("Added while offline", "", None);
            board.add_comment("SCRUM-1", "Gate code changed");
            board.save(self.store, &scope()).unwrap();
            self.answer.clone()
        }

        async fn save(&self, _record: &BoardRecord) -> Result<(), ApiError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn load_failure_keeps_edits_made_while_waiting() {
        // Arrange
        let store = MemoryStore::new();
        let remote = SlowRecordStore {
            store: &store,
            answer: Err(ApiError::Transport("offline".to_string())),
        };

        // Act
        let loaded = load_board(&remote, &store, &scope()).await;

        // Assert
        assert_eq!(loaded.source, BoardSource::Local);
        assert_eq!(loaded.board, Board::load(&store, &scope()));
        assert_eq!(loaded.board.issue("SCRUM-5").unwrap().title, "Added while offline");
    }

    #[tokio::test]
    async fn remote_load_keeps_comments_made_while_waiting() {
        // Arrange
        let store = MemoryStore::new();
        let mut record = remote_record();
        record.todo_items.push(Board::default().issue("SCRUM-1").unwrap().clone());
        let remote = SlowRecordStore {
            store: &store,
            answer: Ok(Some(record)),
        };

        // Act
        let loaded = load_board(&remote, &store, &scope()).await;

        // Assert
        assert_eq!(loaded.source, BoardSource::Remote);
        assert_eq!(loaded.board.comments().for_issue("SCRUM-1"), ["Gate code changed"]);
        assert!(loaded.board.issue("SCRUM-5").is_none());
    }

    #[tokio::test]
    async fn save_writes_local_and_posts_record() {
        // Arrange
        let store = MemoryStore::new();
        let board = Board::default();
        let expected = BoardRecord::from_board("Jane.Doe", &board);
        let mut remote = MockRecordStore::new();
        remote
            .expect_save()
            .with(eq(expected))
            .times(1)
            .returning(|_| Ok(()));

        // Act
        let result = save_board(&remote, &store, &scope(), &board).await;

        // Assert
        assert_eq!(result, Ok(()));
        assert_eq!(Board::load(&store, &scope()), board);
    }

    #[tokio::test]
    async fn remote_save_failure_keeps_local_copy() {
        // Arrange
        let store = MemoryStore::new();
        let mut board = Board::default();
        board.move_issue("SCRUM-1", IssueStatus::Done);
        let mut remote = MockRecordStore::new();
        remote
            .expect_save()
            .times(1)
            .returning(|_| Err(ApiError::Status(502)));

        // Act
        let result = save_board(&remote, &store, &scope(), &board).await;

        // Assert
        let error = result.unwrap_err();
        assert_eq!(error, SyncError::Remote(ApiError::Status(502)));
        assert_eq!(error.user_message(), REMOTE_SAVE_FAILED);
        assert_eq!(Board::load(&store, &scope()), board);
    }
}
