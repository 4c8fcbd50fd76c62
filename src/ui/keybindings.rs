use crate::app::AppState;
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Hints for the current day; mutating keys are hidden on read-only days
pub fn hints(read_only: bool) -> Vec<&'static str> {
    let mut hints = vec![" ↑/↓ select   "];
    if !read_only {
        hints.extend(["Enter start/stop   ", "a add   ", "e rename   "]);
    }
    hints.extend(["Tab history   ", "t today   ", "q quit"]);
    hints
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, app: &AppState, area: Rect) {
    let spans: Vec<Span> = hints(app.is_read_only())
        .into_iter()
        .map(Span::raw)
        .collect();

    let paragraph = Paragraph::new(Line::from(spans)).style(hint_style());
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_hints_hide_mutations() {
        assert!(hints(false).iter().any(|h| h.contains("add")));
        assert!(!hints(true).iter().any(|h| h.contains("add")));
        assert!(hints(true).iter().any(|h| h.contains("quit")));
    }
}
