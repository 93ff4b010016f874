//! Board actions: thin wrappers over the task service that translate
//! results into UI status messages.

use crate::error::Result;
use crate::service::{TaskService, TaskUpdate};
use crate::session::Session;
use crate::task::Area;

#[derive(Debug, Clone)]
pub struct NewTaskInput {
    pub name: String,
    pub area: Area,
}

#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub message: String,
    pub task_id: Option<String>,
}

pub fn create_task(
    service: &TaskService,
    session: &Session,
    input: NewTaskInput,
) -> Result<ActionOutcome> {
    let task = service.create_task(&input.name, input.area, session.user())?;
    Ok(ActionOutcome {
        message: format!("created '{}' in {}", task.name, task.area.as_str()),
        task_id: Some(task.id),
    })
}

pub fn move_task(service: &TaskService, task_id: &str, area: Area) -> Result<ActionOutcome> {
    let task = service.update_task(task_id, TaskUpdate::SetArea(area))?;
    Ok(ActionOutcome {
        message: format!("moved '{}' to {}", task.name, task.area.as_str()),
        task_id: Some(task.id),
    })
}

pub fn send_message(
    service: &TaskService,
    session: &Session,
    task_id: &str,
    draft: &str,
) -> Result<ActionOutcome> {
    let task = service.add_chat_message(task_id, session.user(), draft)?;
    Ok(ActionOutcome {
        message: format!("sent ({} in thread)", task.chat.len()),
        task_id: Some(task.id),
    })
}
