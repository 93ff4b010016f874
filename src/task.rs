//! Task board data model.
//!
//! The whole board is one JSON object, task id -> task record. Records
//! keep the flat shape `{id, name, area, creator, chat}` so the file
//! stays trivially inspectable and diffable.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{Error, Result};

/// Workflow area of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Area {
    Idea,
    InProgress,
    Decided,
    Done,
}

impl Area {
    /// All areas, in board order.
    pub const ALL: [Area; 4] = [Area::Idea, Area::InProgress, Area::Decided, Area::Done];

    /// The areas shown as board columns (everything except `done`).
    pub const ACTIVE: [Area; 3] = [Area::Idea, Area::InProgress, Area::Decided];

    /// Canonical token used on the wire and on the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Area::Idea => "idea",
            Area::InProgress => "in_progress",
            Area::Decided => "decided",
            Area::Done => "done",
        }
    }

    /// Human-facing column header.
    pub fn label(&self) -> &'static str {
        match self {
            Area::Idea => "Idea",
            Area::InProgress => "In progress",
            Area::Decided => "Decided",
            Area::Done => "Done",
        }
    }

    /// Parse a user-supplied area token.
    ///
    /// Accepts the canonical token case-insensitively, with `-` or a
    /// space in place of `_`.
    pub fn parse(value: &str) -> Result<Area> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "idea" => Ok(Area::Idea),
            "in_progress" => Ok(Area::InProgress),
            "decided" => Ok(Area::Decided),
            "done" => Ok(Area::Done),
            _ => Err(Error::InvalidArgument(format!(
                "unknown area '{}' (expected idea, in_progress, decided, or done)",
                value.trim()
            ))),
        }
    }
}

impl std::fmt::Display for Area {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single chat message on a task. Append-only, ordered by send time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    pub message: String,
}

/// A unit of work on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, immutable after creation.
    pub id: String,
    pub name: String,
    pub area: Area,
    /// User name that created the task.
    pub creator: String,
    /// Chat thread, oldest first. Absent in older files.
    #[serde(default)]
    pub chat: Vec<Message>,
}

impl Task {
    /// Creation time recovered from a ULID task id.
    ///
    /// Seeded tasks use plain numeric ids, so this is best-effort and
    /// display-only.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let ulid = Ulid::from_string(&self.id).ok()?;
        Some(DateTime::<Utc>::from(ulid.datetime()))
    }
}

/// Generate a fresh task id: a lowercase ULID (millisecond timestamp
/// plus random tie-breaker bits).
pub fn new_task_id() -> String {
    Ulid::new().to_string().to_ascii_lowercase()
}

/// The full task collection, persisted as one JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    tasks: BTreeMap<String, Task>,
}

impl Board {
    /// The board written on first use: one example task per active area.
    pub fn seed() -> Self {
        let mut board = Board::default();
        let seeds = [
            Task {
                id: "1".to_string(),
                name: "Design review".to_string(),
                area: Area::Idea,
                creator: "system".to_string(),
                chat: vec![Message {
                    sender: "system".to_string(),
                    message: "Let's discuss the first draft.".to_string(),
                }],
            },
            Task {
                id: "2".to_string(),
                name: "Feature work".to_string(),
                area: Area::InProgress,
                creator: "system".to_string(),
                chat: Vec::new(),
            },
            Task {
                id: "3".to_string(),
                name: "Final check".to_string(),
                area: Area::Decided,
                creator: "system".to_string(),
                chat: Vec::new(),
            },
        ];
        for task in seeds {
            board.tasks.insert(task.id.clone(), task);
        }
        board
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.get_mut(id)
    }

    /// Insert a new task, rejecting duplicate ids.
    pub fn insert(&mut self, task: Task) -> Result<()> {
        if self.tasks.contains_key(&task.id) {
            return Err(Error::InvalidArgument(format!(
                "task id already exists: {}",
                task.id
            )));
        }
        self.tasks.insert(task.id.clone(), task);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// All tasks in stable id order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Tasks in one area, in stable id order.
    pub fn in_area(&self, area: Area) -> Vec<&Task> {
        self.tasks.values().filter(|task| task.area == area).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_tokens_round_trip() {
        for area in Area::ALL {
            let json = serde_json::to_string(&area).unwrap();
            assert_eq!(json, format!("\"{}\"", area.as_str()));
            let back: Area = serde_json::from_str(&json).unwrap();
            assert_eq!(back, area);
        }
    }

    #[test]
    fn area_parse_accepts_variants() {
        assert_eq!(Area::parse("idea").unwrap(), Area::Idea);
        assert_eq!(Area::parse("In-Progress").unwrap(), Area::InProgress);
        assert_eq!(Area::parse("in progress").unwrap(), Area::InProgress);
        assert_eq!(Area::parse(" DONE ").unwrap(), Area::Done);
        assert!(Area::parse("parked").is_err());
    }

    #[test]
    fn board_serializes_as_plain_object() {
        let board = Board::seed();
        let json = serde_json::to_string(&board).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.is_object());
        assert_eq!(value["1"]["name"], "Design review");
        assert_eq!(value["1"]["area"], "idea");
        assert_eq!(value["1"]["chat"][0]["sender"], "system");
    }

    #[test]
    fn chat_defaults_to_empty_on_read() {
        let json = r#"{"9": {"id": "9", "name": "Bare", "area": "idea", "creator": "a"}}"#;
        let board: Board = serde_json::from_str(json).unwrap();
        assert!(board.get("9").unwrap().chat.is_empty());
    }

    #[test]
    fn insert_rejects_duplicate_ids() {
        let mut board = Board::seed();
        let dup = Task {
            id: "1".to_string(),
            name: "Clone".to_string(),
            area: Area::Idea,
            creator: "test".to_string(),
            chat: Vec::new(),
        };
        assert!(board.insert(dup).is_err());
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn seed_covers_first_three_areas() {
        let board = Board::seed();
        assert_eq!(board.len(), 3);
        assert_eq!(board.in_area(Area::Idea).len(), 1);
        assert_eq!(board.in_area(Area::InProgress).len(), 1);
        assert_eq!(board.in_area(Area::Decided).len(), 1);
        assert!(board.in_area(Area::Done).is_empty());
    }

    #[test]
    fn in_area_keeps_id_order() {
        let mut board = Board::default();
        for id in ["b", "a", "c"] {
            board
                .insert(Task {
                    id: id.to_string(),
                    name: format!("task {id}"),
                    area: Area::Idea,
                    creator: "test".to_string(),
                    chat: Vec::new(),
                })
                .unwrap();
        }
        let ids: Vec<&str> = board.in_area(Area::Idea).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn new_ids_are_distinct_and_timestamped() {
        let a = new_task_id();
        let b = new_task_id();
        assert_ne!(a, b);
        let task = Task {
            id: a,
            name: "t".to_string(),
            area: Area::Idea,
            creator: "test".to_string(),
            chat: Vec::new(),
        };
        assert!(task.created_at().is_some());
    }
}
