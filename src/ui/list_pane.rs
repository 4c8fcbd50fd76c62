use crate::app::AppState;
use crate::domain::{format_hms, Focus, Task};
use crate::ui::styles::{
    border_style, default_style, edited_style, focused_border_style, muted_style, running_style,
    selected_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the task list for the viewed day
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let read_only = app.is_read_only();

    let items: Vec<ListItem> = app
        .tasks()
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            let style = if idx == app.selected_index && app.focus == Focus::Tasks {
                selected_style()
            } else {
                default_style()
            };
            ListItem::new(create_task_line(task, read_only)).style(style)
        })
        .collect();

    let date = app.viewed_date().format("%Y-%m-%d");
    let mut title = vec![Span::styled(format!(" Tasks for {} ", date), title_style())];
    if read_only {
        title.push(Span::styled("(read-only) ", muted_style()));
    }
    if let Some(active) = app.active_task() {
        title.push(Span::styled(format!("⏱ {} ", active.name), running_style()));
    }

    let border = if app.focus == Focus::Tasks {
        focused_border_style()
    } else {
        border_style()
    };

    let list = if items.is_empty() {
        let hint = if read_only {
            "  No tasks recorded"
        } else {
            "  No tasks yet - press 'a' to add one"
        };
        List::new(vec![ListItem::new(Line::styled(hint, muted_style()))])
    } else {
        List::new(items)
    };

    f.render_widget(
        list.block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(Line::from(title)),
        ),
        area,
    );
}

/// Create a single line for a task
/// Format: [▶] Write report (Edited) (currently active) - 00:12:05
fn create_task_line(task: &Task, read_only: bool) -> Line<'static> {
    let time = format_hms(task.time_spent);

    if read_only {
        return Line::from(vec![
            Span::raw(task.name.clone()),
            Span::raw(format!(" - {}", time)),
        ]);
    }

    let mut spans = Vec::new();
    let marker = if task.is_active { "[▶] " } else { "[ ] " };
    spans.push(Span::raw(marker));
    spans.push(Span::raw(task.name.clone()));

    if task.edited {
        spans.push(Span::styled(" (Edited)", edited_style()));
    }
    if task.is_active {
        spans.push(Span::styled(" (currently active)", running_style()));
    }

    let time_style = if task.is_active {
        running_style()
    } else {
        default_style()
    };
    spans.push(Span::styled(format!(" - {}", time), time_style));

    Line::from(spans)
}
