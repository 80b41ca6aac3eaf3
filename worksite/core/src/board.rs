//! Kanban issue board scoped to a single user.
//!
//! Issues and their comments are persisted under separate keys,
//! `jira-issues-<scope>` and `jira-comments-<scope>`.

use crate::storage::{self, KeyValueStore, StorageError, UserScope};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

const ISSUE_PREFIX: &str = "SCRUM-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueStatus {
    #[serde(rename = "TO DO")]
    ToDo,
    #[serde(rename = "IN PROGRESS")]
    InProgress,
    #[serde(rename = "DONE")]
    Done,
}

impl IssueStatus {
    pub const ALL: [IssueStatus; 3] = [IssueStatus::ToDo, IssueStatus::InProgress, IssueStatus::Done];

    pub fn label(&self) -> &'static str {
        match self {
            IssueStatus::ToDo => "TO DO",
            IssueStatus::InProgress => "IN PROGRESS",
            IssueStatus::Done => "DONE",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: IssueStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

impl Issue {
    fn new(id: &str, title: &str, description: &str, status: IssueStatus, assignee: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            status,
            assignee: assignee.map(str::to_string),
        }
    }

    fn number(&self) -> Option<u32> {
        self.id.strip_prefix(ISSUE_PREFIX)?.parse().ok()
    }
}

/// Comment threads keyed by issue id, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Comments(HashMap<String, Vec<String>>);

impl Comments {
    pub fn for_issue(&self, id: &str) -> &[String] {
        self.0.get(id).map(Vec::as_slice).unwrap_or_default()
    }
}

fn default_issues() -> Vec<Issue> {
    vec![
        Issue::new(
            "SCRUM-1",
            "Site safety induction",
            "Complete the safety induction before entering the site.",
            IssueStatus::ToDo,
            None,
        ),
        Issue::new(
            "SCRUM-2",
            "Inspect scaffolding on level 3",
            "Check fixings and guard rails, log any defects.",
            IssueStatus::ToDo,
            None,
        ),
        Issue::new(
            "SCRUM-3",
            "Order replacement PPE",
            "Hard hats and high-visibility vests for the new crew.",
            IssueStatus::InProgress,
            None,
        ),
        Issue::new(
            "SCRUM-4",
            "Register facial profile",
            "Upload a reference photo for worksite access.",
            IssueStatus::Done,
            None,
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    issues: Vec<Issue>,
    comments: Comments,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            issues: default_issues(),
            comments: Comments::default(),
        }
    }
}

impl Board {
    pub fn new(issues: Vec<Issue>, comments: Comments) -> Self {
        Self { issues, comments }
    }

    /// Loads issues and comments for `scope`. Each key falls back to its own
    /// defaults (the starter issues, no comments) when absent or malformed.
    pub fn load(store: &impl KeyValueStore, scope: &UserScope) -> Self {
        let issues = storage::load_or_seed(store, &scope.issues_key(), |_| true, default_issues);
        let comments = storage::load_or_seed(
            store,
            &scope.comments_key(),
            |_| true,
            Comments::default,
        );
        Self { issues, comments }
    }

    pub fn save(&self, store: &impl KeyValueStore, scope: &UserScope) -> Result<(), StorageError> {
        storage::save(store, &scope.issues_key(), &self.issues)?;
        storage::save(store, &scope.comments_key(), &self.comments)
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn issue(&self, id: &str) -> Option<&Issue> {
        self.issues.iter().find(|issue| issue.id == id)
    }

    pub fn issues_in(&self, status: IssueStatus) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |issue| issue.status == status)
    }

    pub fn comments(&self) -> &Comments {
        &self.comments
    }

    /// `SCRUM-<n>` one past the highest number in use, so the new id never
    /// collides with a live issue. Deleting the highest issue frees its
    /// number for the next one. An id already at `u32::MAX` cannot be
    /// followed and is left out of the count.
    pub fn next_issue_id(&self) -> String {
        let highest = self
            .issues
            .iter()
            .filter_map(Issue::number)
            .filter(|n| *n < u32::MAX)
            .max()
            .unwrap_or(0);
        format!("{ISSUE_PREFIX}{}", highest + 1)
    }

    /// Adds a new issue to the TO DO column. Blank titles are ignored.
    pub fn add_issue(&mut self, title: &str, description: &str, assignee: Option<&str>) -> Option<String> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let id = self.next_issue_id();
        let assignee = assignee.map(str::trim).filter(|a| !a.is_empty());
        self.issues.push(Issue::new(&id, title, description.trim(), IssueStatus::ToDo, assignee));
        debug!(%id, "Added issue");
        Some(id)
    }

    pub fn move_issue(&mut self, id: &str, status: IssueStatus) -> bool {
        match self.issues.iter_mut().find(|issue| issue.id == id) {
            Some(issue) => {
                issue.status = status;
                true
            }
            None => false,
        }
    }

    /// Removes the issue and its comment thread.
    pub fn delete_issue(&mut self, id: &str) -> bool {
        let before = self.issues.len();
        self.issues.retain(|issue| issue.id != id);
        let removed = self.issues.len() != before;
        if removed {
            self.comments.0.remove(id);
        }
        removed
    }

    /// Appends a comment to an existing issue. Blank text is ignored.
    pub fn add_comment(&mut self, id: &str, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() || self.issue(id).is_none() {
            return false;
        }
        self.comments
            .0
            .entry(id.to_string())
            .or_default()
            .push(text.to_string());
        true
    }

    /// Replaces the issues, keeping comments of issues that still exist.
    pub fn replace_issues(&mut self, issues: Vec<Issue>) {
        self.issues = issues;
        let ids: Vec<String> = self.issues.iter().map(|issue| issue.id.clone()).collect();
        self.comments.0.retain(|id, _| ids.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn scope() -> UserScope {
        UserScope::new("Jane", "Doe")
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&IssueStatus::ALL).unwrap();

        assert_eq!(json, r#"["TO DO","IN PROGRESS","DONE"]"#);
    }

    #[test]
    fn test_load_seeds_both_keys() {
        // Arrange
        let store = MemoryStore::new();

        // Act
        let board = Board::load(&store, &scope());

        // Assert
        assert_eq!(board, Board::default());
        assert_eq!(
            store.get_raw("jira-issues-Jane.Doe").unwrap(),
            serde_json::to_string(&default_issues()).unwrap()
        );
        assert_eq!(store.get_raw("jira-comments-Jane.Doe").as_deref(), Some("{}"));
    }

    #[test]
    fn test_load_malformed_comments_keeps_stored_issues() {
        // Arrange
        let store = MemoryStore::new();
        let issues = r#"[{"id":"SCRUM-9","title":"Pour slab","description":"","status":"DONE"}]"#;
        store.set_raw("jira-issues-Jane.Doe", issues).unwrap();
        store.set_raw("jira-comments-Jane.Doe", "[1,2]").unwrap();

        // Act
        let board = Board::load(&store, &scope());

        // Assert
        assert_eq!(board.issues().len(), 1);
        assert_eq!(board.issues()[0].status, IssueStatus::Done);
        assert_eq!(board.issues()[0].assignee, None);
        assert_eq!(board.comments(), &Comments::default());
    }

    #[test]
    fn test_load_unknown_status_falls_back_to_defaults() {
        // Arrange
        let issues = r#"[{"id":"SCRUM-1","title":"x","description":"","status":"BLOCKED"}]"#;
        let store = MemoryStore::with_entry("jira-issues-Jane.Doe", issues);

        // Act
        let board = Board::load(&store, &scope());

        // Assert
        assert_eq!(board.issues(), default_issues().as_slice());
    }

    #[test]
    fn test_save_then_load() {
        // Arrange
        let store = MemoryStore::new();
        let mut board = Board::load(&store, &scope());
        let id = board.add_issue("Fix gate sensor", "Sensor at north gate", Some("Jane")).unwrap();
        board.add_comment(&id, "Parts ordered");

        // Act
        board.save(&store, &scope()).unwrap();
        let reloaded = Board::load(&store, &scope());

        // Assert
        assert_eq!(reloaded, board);
        assert_eq!(reloaded.comments().for_issue(&id), ["Parts ordered".to_string()]);
    }

    #[test]
    fn test_add_issue_goes_to_todo_with_next_id() {
        // Arrange
        let mut board = Board::default();

        // Act
        let id = board.add_issue("  Fix gate sensor ", "", Some("  ")).unwrap();

        // Assert
        assert_eq!(id, "SCRUM-5");
        let issue = board.issue(&id).unwrap();
        assert_eq!(issue.title, "Fix gate sensor");
        assert_eq!(issue.status, IssueStatus::ToDo);
        assert_eq!(issue.assignee, None);
    }

    #[test]
    fn test_add_issue_ignores_blank_title() {
        let mut board = Board::default();

        assert_eq!(board.add_issue(" ", "desc", None), None);
        assert_eq!(board.issues().len(), 4);
    }

    #[test]
    fn test_new_id_never_collides_with_live_ids_after_delete() {
        // Arrange
        let mut board = Board::default();
        assert!(board.delete_issue("SCRUM-2"));

        // Act
        let id = board.add_issue("Replacement", "", None).unwrap();

        // Assert
        assert_eq!(id, "SCRUM-5");
        let ids: std::collections::HashSet<&str> =
            board.issues().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.len(), board.issues().len());
    }

    #[test]
    fn test_deleting_highest_issue_frees_its_number() {
        let mut board = Board::default();
        assert!(board.delete_issue("SCRUM-4"));

        assert_eq!(board.next_issue_id(), "SCRUM-4");
    }

    #[test]
    fn test_next_id_skips_number_that_cannot_grow() {
        // Arrange
        let mut board = Board::new(
            vec![
                Issue::new("SCRUM-4294967295", "Imported", "", IssueStatus::ToDo, None),
                Issue::new("SCRUM-9", "Local", "", IssueStatus::Done, None),
            ],
            Comments::default(),
        );

        // Act
        let id = board.add_issue("Next", "", None).unwrap();

        // Assert
        assert_eq!(id, "SCRUM-10");
        assert_eq!(board.issues().len(), 3);
    }

    #[test]
    fn test_next_id_ignores_foreign_ids() {
        let board = Board::new(
            vec![Issue::new("OPS-40", "x", "", IssueStatus::ToDo, None)],
            Comments::default(),
        );

        assert_eq!(board.next_issue_id(), "SCRUM-1");
    }

    #[test]
    fn test_move_issue_between_columns() {
        // Arrange
        let mut board = Board::default();

        // Act
        let moved = board.move_issue("SCRUM-1", IssueStatus::InProgress);

        // Assert
        assert!(moved);
        assert_eq!(board.issues_in(IssueStatus::ToDo).count(), 1);
        assert_eq!(board.issues_in(IssueStatus::InProgress).count(), 2);
        assert!(!board.move_issue("SCRUM-99", IssueStatus::Done));
    }

    #[test]
    fn test_comments_append_in_order_and_drop_with_issue() {
        // Arrange
        let mut board = Board::default();

        // Act
        assert!(board.add_comment("SCRUM-3", "Quote requested"));
        assert!(board.add_comment("SCRUM-3", "Approved"));
        assert!(!board.add_comment("SCRUM-3", "  "));
        assert!(!board.add_comment("SCRUM-99", "orphan"));

        // Assert
        assert_eq!(
            board.comments().for_issue("SCRUM-3"),
            ["Quote requested".to_string(), "Approved".to_string()]
        );
        assert!(board.delete_issue("SCRUM-3"));
        assert!(board.comments().for_issue("SCRUM-3").is_empty());
    }

    #[test]
    fn test_replace_issues_prunes_orphan_comments() {
        // Arrange
        let mut board = Board::default();
        board.add_comment("SCRUM-1", "keep");
        board.add_comment("SCRUM-2", "drop");

        // Act
        board.replace_issues(vec![default_issues().remove(0)]);

        // Assert
        assert_eq!(board.comments().for_issue("SCRUM-1"), ["keep".to_string()]);
        assert!(board.comments().for_issue("SCRUM-2").is_empty());
    }
}
