//! taskdeck command implementations.

use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::service::{TaskService, TaskUpdate};
use crate::session::GUEST_USER;
use crate::task::{Area, Task};

pub struct NewOptions {
    pub name: String,
    pub area: String,
    pub user: Option<String>,
    pub service: TaskService,
    pub output: OutputOptions,
}

pub struct ListOptions {
    pub area: Option<String>,
    pub service: TaskService,
    pub output: OutputOptions,
}

pub struct ShowOptions {
    pub id: String,
    pub service: TaskService,
    pub output: OutputOptions,
}

pub struct MoveOptions {
    pub id: String,
    pub area: String,
    pub service: TaskService,
    pub output: OutputOptions,
}

pub struct RenameOptions {
    pub id: String,
    pub name: String,
    pub service: TaskService,
    pub output: OutputOptions,
}

pub struct ChatOptions {
    pub id: String,
    pub message: String,
    pub user: Option<String>,
    pub service: TaskService,
    pub output: OutputOptions,
}

pub fn run_new(options: NewOptions) -> Result<()> {
    let area = Area::parse(&options.area)?;
    let creator = options.user.as_deref().unwrap_or(GUEST_USER);
    let task = options.service.create_task(&options.name, area, creator)?;

    let mut human = HumanOutput::new(format!("Created task {}", task.id));
    human.push_summary("name", &task.name);
    human.push_summary("area", task.area.as_str());
    human.push_summary("creator", &task.creator);
    human.push_next_step(format!("taskdeck show {}", task.id));

    emit_success(options.output, "new", &task, Some(&human))
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let filter = options.area.as_deref().map(Area::parse).transpose()?;
    let board = options.service.board()?;

    let tasks: Vec<Task> = match filter {
        Some(area) => board.in_area(area).into_iter().cloned().collect(),
        None => board.iter().cloned().collect(),
    };

    let mut human = HumanOutput::new(format!("{} task(s)", tasks.len()));
    let areas: &[Area] = match &filter {
        Some(area) => std::slice::from_ref(area),
        None => &Area::ALL,
    };
    for area in areas {
        let in_area: Vec<&Task> = tasks.iter().filter(|task| task.area == *area).collect();
        if in_area.is_empty() {
            continue;
        }
        human.push_detail(format!("{} ({})", area.label(), in_area.len()));
        for task in in_area {
            human.push_detail(format!(
                "  {}  {}  [{}, {} message(s)]",
                task.id,
                task.name,
                task.creator,
                task.chat.len()
            ));
        }
    }

    emit_success(options.output, "list", &tasks, Some(&human))
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let board = options.service.board()?;
    let task = board
        .get(&options.id)
        .cloned()
        .ok_or_else(|| crate::error::Error::TaskNotFound(options.id.clone()))?;

    let mut human = HumanOutput::new(format!("{}  {}", task.id, task.name));
    human.push_summary("area", task.area.as_str());
    human.push_summary("creator", &task.creator);
    if let Some(created) = task.created_at() {
        human.push_summary("created", created.format("%Y-%m-%d %H:%M UTC").to_string());
    }
    if task.chat.is_empty() {
        human.push_detail("no chat messages yet".to_string());
    } else {
        for message in &task.chat {
            human.push_detail(format!("{}: {}", message.sender, message.message));
        }
    }

    emit_success(options.output, "show", &task, Some(&human))
}

pub fn run_move(options: MoveOptions) -> Result<()> {
    let area = Area::parse(&options.area)?;
    let task = options
        .service
        .update_task(&options.id, TaskUpdate::SetArea(area))?;

    let mut human = HumanOutput::new(format!("Moved task {} to {}", task.id, task.area.as_str()));
    human.push_summary("name", &task.name);

    emit_success(options.output, "move", &task, Some(&human))
}

pub fn run_rename(options: RenameOptions) -> Result<()> {
    let task = options
        .service
        .update_task(&options.id, TaskUpdate::Rename(options.name))?;

    let mut human = HumanOutput::new(format!("Renamed task {}", task.id));
    human.push_summary("name", &task.name);

    emit_success(options.output, "rename", &task, Some(&human))
}

pub fn run_chat(options: ChatOptions) -> Result<()> {
    let sender = options.user.as_deref().unwrap_or(GUEST_USER);
    let task = options
        .service
        .add_chat_message(&options.id, sender, &options.message)?;

    let mut human = HumanOutput::new(format!(
        "Sent message to task {} ({} in thread)",
        task.id,
        task.chat.len()
    ));
    if let Some(last) = task.chat.last() {
        human.push_detail(format!("{}: {}", last.sender, last.message));
    }

    emit_success(options.output, "chat", &task, Some(&human))
}
