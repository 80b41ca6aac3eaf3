//! Core domain models and workflows for the worksite face gate.
//!
//! Nothing in here touches the browser: the web crate plugs cookies, storage
//! and HTTP in through the port traits defined by each module.
pub mod board;
pub mod capture;
pub mod config;
pub mod identity;
pub mod session;
pub mod storage;
pub mod submission;
pub mod sync;
pub mod todo;

pub use board::{Board, Comments, Issue, IssueStatus};
pub use capture::{CaptureError, CaptureState, CaptureWorkflow, CapturedImage};
pub use config::AppConfig;
pub use identity::Identity;
pub use session::{CookieJar, SessionError, SessionState, SessionStore, SessionToken};
pub use storage::{KeyValueStore, StorageError, UserScope};
pub use submission::{
    ApiError, AuthOutcome, FaceApi, ImageStore, ObjectKey, SubmissionError, Verification,
};
pub use sync::{BoardRecord, BoardSource, LoadedBoard, RecordStore, SyncError};
pub use todo::{TodoItem, TodoList};
