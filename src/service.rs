//! Task service: the only legitimate way to mutate the board.
//!
//! Every operation is one synchronous load-mutate-save cycle through
//! [`TaskStore::update`], so the advisory lock covers the full window.
//! Lookups by id fail softly with [`Error::TaskNotFound`]; disk errors
//! propagate unchanged and are fatal for the attempted operation.

use crate::error::{Error, Result};
use crate::store::TaskStore;
use crate::task::{new_task_id, Area, Board, Message, Task};

/// A validated, tagged update to an existing task.
///
/// Fields not named by the update are left as stored; an update never
/// replaces the whole record.
#[derive(Debug, Clone)]
pub enum TaskUpdate {
    SetArea(Area),
    Rename(String),
}

#[derive(Debug, Clone)]
pub struct TaskService {
    store: TaskStore,
}

impl TaskService {
    pub fn new(store: TaskStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Read-only snapshot of the board.
    pub fn board(&self) -> Result<Board> {
        self.store.load()
    }

    /// Create a task with a fresh id and an empty chat thread.
    pub fn create_task(&self, name: &str, area: Area, creator: &str) -> Result<Task> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidArgument(
                "task name cannot be empty".to_string(),
            ));
        }
        let name = name.to_string();
        let creator = creator.to_string();

        self.store.update(move |board| {
            // ULID collisions are not expected in practice; regenerate
            // anyway so the uniqueness invariant never depends on luck.
            let mut id = new_task_id();
            while board.get(&id).is_some() {
                id = new_task_id();
            }

            let task = Task {
                id,
                name,
                area,
                creator,
                chat: Vec::new(),
            };
            board.insert(task.clone())?;
            Ok(task)
        })
    }

    /// Apply one tagged update to an existing task.
    ///
    /// An unknown id signals [`Error::TaskNotFound`] and never creates
    /// a record.
    pub fn update_task(&self, task_id: &str, update: TaskUpdate) -> Result<Task> {
        let update = match update {
            TaskUpdate::Rename(name) => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(Error::InvalidArgument(
                        "task name cannot be empty".to_string(),
                    ));
                }
                TaskUpdate::Rename(name)
            }
            other => other,
        };

        self.store.update(|board| {
            let task = board
                .get_mut(task_id)
                .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;
            match update {
                TaskUpdate::SetArea(area) => task.area = area,
                TaskUpdate::Rename(name) => task.name = name,
            }
            Ok(task.clone())
        })
    }

    /// Append a chat message to a task's thread.
    pub fn add_chat_message(&self, task_id: &str, sender: &str, message: &str) -> Result<Task> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::InvalidArgument(
                "chat message cannot be empty".to_string(),
            ));
        }
        let entry = Message {
            sender: sender.to_string(),
            message: message.to_string(),
        };

        self.store.update(|board| {
            let task = board
                .get_mut(task_id)
                .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;
            task.chat.push(entry);
            Ok(task.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    fn service_in(temp: &TempDir) -> TaskService {
        TaskService::new(TaskStore::new(temp.path().join("tasks.json")))
    }

    #[test]
    fn created_ids_are_pairwise_distinct() {
        let temp = TempDir::new().unwrap();
        let service = service_in(&temp);

        let mut ids = HashSet::new();
        for n in 0..20 {
            let task = service
                .create_task(&format!("task {n}"), Area::Idea, "mika")
                .unwrap();
            assert!(ids.insert(task.id));
        }
        assert_eq!(service.board().unwrap().len(), 20 + 3);
    }

    #[test]
    fn create_sets_fields_and_empty_chat() {
        let temp = TempDir::new().unwrap();
        let service = service_in(&temp);

        let task = service.create_task("  Write docs  ", Area::Decided, "mika").unwrap();
        assert_eq!(task.name, "Write docs");
        assert_eq!(task.area, Area::Decided);
        assert_eq!(task.creator, "mika");
        assert!(task.chat.is_empty());

        let stored = service.board().unwrap().get(&task.id).cloned().unwrap();
        assert_eq!(stored, task);
    }

    #[test]
    fn create_rejects_empty_name() {
        let temp = TempDir::new().unwrap();
        let service = service_in(&temp);

        assert!(matches!(
            service.create_task("   ", Area::Idea, "mika"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn every_area_transition_is_allowed() {
        let temp = TempDir::new().unwrap();
        let service = service_in(&temp);
        let task = service.create_task("movable", Area::Idea, "mika").unwrap();

        // Any area is reachable from any other, including leaving done.
        for target in Area::ALL.iter().chain(Area::ALL.iter().rev()) {
            let updated = service
                .update_task(&task.id, TaskUpdate::SetArea(*target))
                .unwrap();
            assert_eq!(updated.area, *target);
            let reloaded = service.board().unwrap().get(&task.id).cloned().unwrap();
            assert_eq!(reloaded.area, *target);
        }
    }

    #[test]
    fn update_merges_without_touching_other_fields() {
        let temp = TempDir::new().unwrap();
        let service = service_in(&temp);

        service.add_chat_message("1", "mika", "keep me").unwrap();
        let updated = service.update_task("1", TaskUpdate::SetArea(Area::Done)).unwrap();

        assert_eq!(updated.area, Area::Done);
        assert_eq!(updated.name, "Design review");
        assert_eq!(updated.creator, "system");
        assert_eq!(updated.chat.len(), 2);
    }

    #[test]
    fn rename_trims_and_validates() {
        let temp = TempDir::new().unwrap();
        let service = service_in(&temp);

        let renamed = service
            .update_task("1", TaskUpdate::Rename(" Design review v2 ".to_string()))
            .unwrap();
        assert_eq!(renamed.name, "Design review v2");

        assert!(matches!(
            service.update_task("1", TaskUpdate::Rename("  ".to_string())),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn chat_appends_preserve_order() {
        let temp = TempDir::new().unwrap();
        let service = service_in(&temp);

        service.add_chat_message("2", "mika", "first").unwrap();
        let task = service.add_chat_message("2", "rui", "second").unwrap();

        let tail: Vec<(&str, &str)> = task
            .chat
            .iter()
            .map(|m| (m.sender.as_str(), m.message.as_str()))
            .collect();
        assert_eq!(tail, [("mika", "first"), ("rui", "second")]);
    }

    #[test]
    fn chat_rejects_empty_message() {
        let temp = TempDir::new().unwrap();
        let service = service_in(&temp);

        assert!(matches!(
            service.add_chat_message("1", "mika", "  "),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn unknown_id_signals_not_found_and_changes_nothing() {
        let temp = TempDir::new().unwrap();
        let service = service_in(&temp);

        service.board().unwrap();
        let before = fs::read_to_string(service.store().path()).unwrap();

        assert!(matches!(
            service.update_task("nonexistent", TaskUpdate::SetArea(Area::Done)),
            Err(Error::TaskNotFound(_))
        ));
        assert!(matches!(
            service.add_chat_message("nonexistent", "mika", "hello"),
            Err(Error::TaskNotFound(_))
        ));

        let after = fs::read_to_string(service.store().path()).unwrap();
        assert_eq!(before, after);
    }
}
