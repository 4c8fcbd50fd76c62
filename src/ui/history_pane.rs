use crate::app::AppState;
use crate::domain::{format_hms, Focus};
use crate::ui::styles::{
    border_style, default_style, focused_border_style, muted_style, running_style,
    selected_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the task history pane: one entry per recorded day, newest first
pub fn render_history_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let items: Vec<ListItem> = app
        .history_dates()
        .into_iter()
        .enumerate()
        .map(|(idx, date)| {
            let mut spans = vec![Span::raw(format!(" {} ", date.format("%Y-%m-%d")))];
            spans.push(Span::styled(
                format_hms(app.archive().day_total(date)),
                muted_style(),
            ));
            if date == app.today() {
                spans.push(Span::styled(" today", running_style()));
            }
            if date == app.viewed_date() {
                spans.push(Span::raw(" ◀"));
            }

            let style = if idx == app.history_index && app.focus == Focus::History {
                selected_style()
            } else {
                default_style()
            };
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    let border = if app.focus == Focus::History {
        focused_border_style()
    } else {
        border_style()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(" Task History ", title_style())),
    );

    f.render_widget(list, area);
}
