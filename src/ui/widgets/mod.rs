mod dialog;
mod header;
mod help;
mod message_panel;
mod page;
mod sidebar;
mod status_bar;

pub use dialog::draw_open_dialog;
pub use header::draw_header;
pub use help::draw_help;
pub use message_panel::draw_message_panel;
pub use page::{control_line, draw_page};
pub use sidebar::draw_sidebar;
pub use status_bar::draw_status_bar;
