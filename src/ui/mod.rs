pub mod details_pane;
pub mod history_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod styles;

use crate::app::AppState;
use details_pane::render_details_pane;
use history_pane::render_history_pane;
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::render_list_pane;
use ratatui::Frame;

/// Main render function - draws the entire UI from the current state
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let layout = create_layout(size);

    render_keybindings(f, app, layout.keybindings_area);
    render_list_pane(f, app, layout.list_area);
    render_history_pane(f, app, layout.history_area);
    render_details_pane(f, app, layout.details_area);

    if app.input_form.is_some() {
        render_input_form(f, app, size);
    }
}
