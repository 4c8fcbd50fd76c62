use crate::app::AppState;
use crate::domain::format_hms;
use crate::ui::styles::{border_style, default_style, running_style, title_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the details pane for the selected task
pub fn render_details_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Details ", title_style()));

    let Some(task) = app.selected_task() else {
        f.render_widget(Paragraph::new("No task selected").block(block), area);
        return;
    };

    let mut lines = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("Name:  ", title_style()),
        Span::raw(task.name.clone()),
    ]));

    let time_style = if task.is_active {
        running_style()
    } else {
        default_style()
    };
    lines.push(Line::from(vec![
        Span::styled("Time:  ", title_style()),
        Span::styled(format_hms(task.time_spent), time_style),
    ]));

    // Previous names
    if task.previous_names.is_empty() {
        lines.push(Line::from(Span::styled(
            "Previous names: (none)",
            default_style(),
        )));
    } else {
        lines.push(Line::from(Span::styled("Previous names:", title_style())));
        for name in &task.previous_names {
            lines.push(Line::raw(format!("  {}", name)));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
