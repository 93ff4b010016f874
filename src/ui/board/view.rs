use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::session::Page;
use crate::task::{Area, Task};

use super::app::{AppState, Overlay, StatusKind};
use super::input::LineInput;

const COLOR_TEXT: Color = Color::Rgb(234, 236, 239);
const COLOR_MUTED: Color = Color::Rgb(160, 165, 172);
const COLOR_MUTED_DARK: Color = Color::Rgb(118, 124, 130);
const COLOR_BG_MUTED: Color = Color::Rgb(52, 56, 60);
const COLOR_INFO: Color = Color::Rgb(116, 198, 219);
const COLOR_WARNING: Color = Color::Rgb(244, 200, 98);
const COLOR_ERROR: Color = Color::Rgb(255, 107, 107);
const COLOR_SUCCESS: Color = Color::Rgb(126, 210, 146);
const COLOR_ACCENT: Color = Color::Rgb(122, 170, 255);

fn area_color(area: Area) -> Color {
    match area {
        Area::Idea => COLOR_INFO,
        Area::InProgress => COLOR_WARNING,
        Area::Decided => COLOR_ACCENT,
        Area::Done => COLOR_SUCCESS,
    }
}

pub fn render(frame: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(frame.size());
    let header = chunks[0];
    let main = chunks[1];
    let footer = chunks[2];

    render_header(frame, app, header);

    match app.session.page() {
        Page::Board => render_board(frame, app, main),
        Page::Chat => render_chat(frame, app, main),
    }

    render_footer(frame, app, footer);

    match app.overlay.as_ref() {
        Some(Overlay::Login(input)) => render_login_modal(frame, input),
        Some(Overlay::NewTask { input, area }) => render_new_task_modal(frame, input, *area),
        None => {}
    }
}

fn render_header(frame: &mut Frame, app: &AppState, area: Rect) {
    let mut spans = vec![
        Span::styled(
            "taskdeck",
            Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ", Style::default()),
        Span::styled(
            format!("user: {}", app.session.user()),
            Style::default().fg(COLOR_MUTED),
        ),
    ];
    if let Some(err) = &app.watch_error {
        spans.push(Span::styled(
            format!("  watch: {err}"),
            Style::default().fg(COLOR_WARNING),
        ));
    }

    let widget = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(COLOR_BG_MUTED)),
    );
    frame.render_widget(widget, area);
}

fn render_board(frame: &mut Frame, app: &AppState, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(7)].as_ref())
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage(33),
                Constraint::Percentage(34),
                Constraint::Percentage(33),
            ]
            .as_ref(),
        )
        .split(rows[0]);

    for (idx, column_area) in Area::ACTIVE.iter().enumerate() {
        render_area_list(frame, app, columns[idx], *column_area);
    }

    render_area_list(frame, app, rows[1], Area::Done);
}

fn render_area_list(frame: &mut Frame, app: &AppState, rect: Rect, area: Area) {
    let tasks = app.board.in_area(area);
    let focused = app.focus == area;
    let selected = app.selected_in(area);

    let border_color = if focused { area_color(area) } else { COLOR_BG_MUTED };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            format!(" {} ({}) ", area.label(), tasks.len()),
            Style::default().fg(area_color(area)).add_modifier(Modifier::BOLD),
        ));

    let mut lines = Vec::with_capacity(tasks.len().max(1));
    if tasks.is_empty() {
        lines.push(Line::from(Span::styled(
            "no tasks",
            Style::default().fg(COLOR_MUTED_DARK),
        )));
    }
    for (idx, task) in tasks.iter().enumerate() {
        lines.push(task_line(task, focused && idx == selected));
    }

    // Keep the cursor visible in columns taller than the viewport.
    let inner_height = rect.height.saturating_sub(2) as usize;
    let scroll = if focused && inner_height > 0 && selected >= inner_height {
        (selected + 1 - inner_height) as u16
    } else {
        0
    };

    let widget = Paragraph::new(lines).block(block).scroll((scroll, 0));
    frame.render_widget(widget, rect);
}

fn task_line(task: &Task, highlighted: bool) -> Line<'static> {
    let mut style = Style::default().fg(COLOR_TEXT);
    if highlighted {
        style = style.bg(COLOR_BG_MUTED).add_modifier(Modifier::BOLD);
    }
    let mut spans = vec![Span::styled(task.name.clone(), style)];
    if !task.chat.is_empty() {
        spans.push(Span::styled(
            format!("  ({})", task.chat.len()),
            Style::default().fg(COLOR_MUTED_DARK),
        ));
    }
    Line::from(spans)
}

fn render_chat(frame: &mut Frame, app: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    let task = app
        .session
        .selected_task()
        .and_then(|id| app.board.get(id));

    let Some(task) = task else {
        let widget = Paragraph::new("task no longer exists (Esc to go back)")
            .style(Style::default().fg(COLOR_ERROR))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(widget, area);
        return;
    };

    // Task summary
    let mut meta = vec![
        Line::from(Span::styled(
            task.name.clone(),
            Style::default().fg(COLOR_TEXT).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("area: ", Style::default().fg(COLOR_MUTED)),
            Span::styled(task.area.as_str(), Style::default().fg(area_color(task.area))),
            Span::styled(
                format!("   creator: {}", task.creator),
                Style::default().fg(COLOR_MUTED),
            ),
        ]),
    ];
    if let Some(created) = task.created_at() {
        meta.push(Line::from(Span::styled(
            format!("created: {}", created.format("%Y-%m-%d %H:%M UTC")),
            Style::default().fg(COLOR_MUTED_DARK),
        )));
    }
    let widget = Paragraph::new(meta).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(COLOR_BG_MUTED)),
    );
    frame.render_widget(widget, chunks[0]);

    // Message thread: own messages on the right, everyone else's on
    // the left, always labeled with the actual sender name.
    let mut lines: Vec<Line> = Vec::new();
    if task.chat.is_empty() {
        lines.push(Line::from(Span::styled(
            "no chat messages yet",
            Style::default().fg(COLOR_MUTED_DARK),
        )));
    }
    for message in &task.chat {
        let own = message.sender == app.session.user();
        let alignment = if own { Alignment::Right } else { Alignment::Left };
        let sender_color = if own { COLOR_SUCCESS } else { COLOR_INFO };
        lines.push(
            Line::from(Span::styled(
                message.sender.clone(),
                Style::default().fg(sender_color).add_modifier(Modifier::BOLD),
            ))
            .alignment(alignment),
        );
        lines.push(
            Line::from(Span::styled(
                message.message.clone(),
                Style::default().fg(COLOR_TEXT),
            ))
            .alignment(alignment),
        );
        lines.push(Line::default());
    }

    let inner_height = chunks[1].height.saturating_sub(2) as usize;
    let max_from_bottom = lines.len().saturating_sub(inner_height);
    let from_bottom = app.chat_scroll.min(max_from_bottom);
    let scroll = (max_from_bottom - from_bottom) as u16;

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(COLOR_BG_MUTED))
                .title(Span::styled(" chat ", Style::default().fg(COLOR_MUTED))),
        );
    frame.render_widget(widget, chunks[1]);

    // Input line
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_ACCENT))
        .title(Span::styled(" message ", Style::default().fg(COLOR_ACCENT)));
    let inner = input_block.inner(chunks[2]);
    let widget = Paragraph::new(app.chat_input.value().to_string())
        .style(Style::default().fg(COLOR_TEXT))
        .block(input_block);
    frame.render_widget(widget, chunks[2]);
    frame.set_cursor(inner.x + app.chat_input.cursor() as u16, inner.y);
}

fn render_footer(frame: &mut Frame, app: &AppState, area: Rect) {
    let status = match &app.status_message {
        Some((StatusKind::Error, message)) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(COLOR_ERROR),
        )),
        Some((StatusKind::Info, message)) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(COLOR_SUCCESS),
        )),
        None => Line::default(),
    };

    let hints = match (&app.overlay, app.session.page()) {
        (Some(Overlay::Login(_)), _) => "Enter: log in   Esc: quit",
        (Some(Overlay::NewTask { .. }), _) => "Enter: create   Tab: area   Esc: cancel",
        (None, Page::Board) => {
            "←/→: column   ↑/↓: select   Enter: chat   n: new   r: reload   L: logout   q: quit"
        }
        (None, Page::Chat) => "Enter: send   Tab: move area   ↑/↓: scroll   Esc: board",
    };

    let widget = Paragraph::new(vec![
        status,
        Line::from(Span::styled(hints, Style::default().fg(COLOR_MUTED_DARK))),
    ])
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(COLOR_BG_MUTED)),
    );
    frame.render_widget(widget, area);
}

fn render_login_modal(frame: &mut Frame, input: &LineInput) {
    let rect = centered_rect(frame.size(), 40, 5);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_ACCENT))
        .title(Span::styled(
            " login ",
            Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(rect);
    let widget = Paragraph::new(vec![
        Line::from(Span::styled("user name:", Style::default().fg(COLOR_MUTED))),
        Line::from(Span::styled(
            input.value().to_string(),
            Style::default().fg(COLOR_TEXT),
        )),
        Line::from(Span::styled(
            "no password, just a name",
            Style::default().fg(COLOR_MUTED_DARK),
        )),
    ])
    .block(block);
    frame.render_widget(widget, rect);
    frame.set_cursor(inner.x + input.cursor() as u16, inner.y + 1);
}

fn render_new_task_modal(frame: &mut Frame, input: &LineInput, area: Area) {
    let rect = centered_rect(frame.size(), 48, 5);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(area_color(area)))
        .title(Span::styled(
            " new task ",
            Style::default()
                .fg(area_color(area))
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(rect);
    let widget = Paragraph::new(vec![
        Line::from(Span::styled("name:", Style::default().fg(COLOR_MUTED))),
        Line::from(Span::styled(
            input.value().to_string(),
            Style::default().fg(COLOR_TEXT),
        )),
        Line::from(vec![
            Span::styled("area: ", Style::default().fg(COLOR_MUTED)),
            Span::styled(area.as_str(), Style::default().fg(area_color(area))),
            Span::styled(" (Tab to change)", Style::default().fg(COLOR_MUTED_DARK)),
        ]),
    ])
    .block(block);
    frame.render_widget(widget, rect);
    frame.set_cursor(inner.x + input.cursor() as u16, inner.y + 1);
}

fn centered_rect(frame_area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(frame_area.width);
    let height = height.min(frame_area.height);
    Rect {
        x: frame_area.x + (frame_area.width - width) / 2,
        y: frame_area.y + (frame_area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_area_has_a_distinct_color() {
        let mut colors = std::collections::HashSet::new();
        for area in Area::ALL {
            assert!(colors.insert(format!("{:?}", area_color(area))));
        }
    }

    #[test]
    fn centered_rect_fits_inside_the_frame() {
        let frame = Rect::new(0, 0, 80, 24);
        let rect = centered_rect(frame, 40, 5);
        assert!(rect.x >= frame.x && rect.right() <= frame.right());
        assert!(rect.y >= frame.y && rect.bottom() <= frame.bottom());

        // Oversized requests clamp instead of underflowing.
        let rect = centered_rect(Rect::new(0, 0, 20, 4), 40, 10);
        assert_eq!(rect.width, 20);
        assert_eq!(rect.height, 4);
    }
}
