mod layout;
pub mod strings;
mod theme;
pub mod widgets;

pub use layout::Layout;
pub use theme::Theme;

use crate::app::WizardApp;
use ratatui::Frame;
use ratatui::widgets::Clear;

pub fn draw(frame: &mut Frame, app: &WizardApp) {
    let layout = Layout::new(frame.area());
    frame.render_widget(Clear, layout.full);

    widgets::draw_header(frame, layout.header, app);
    widgets::draw_sidebar(frame, layout.sidebar, app);
    widgets::draw_page(frame, layout.content, app);

    // Always draw message panel area (shows content only when there's a message)
    widgets::draw_message_panel(frame, layout.message, app);

    widgets::draw_status_bar(frame, layout.status, app);

    // Popups render on top of everything
    widgets::draw_open_dialog(frame, layout.content, app);

    if app.show_help {
        widgets::draw_help(frame, layout.content, app);
    }
}
