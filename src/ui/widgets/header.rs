use crate::app::WizardApp;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

pub fn draw_header(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let title = format!(" {} (v{}) ", app.config.general.title, env!("CARGO_PKG_VERSION"));
    frame.render_widget(
        Paragraph::new(title).style(app.theme.primary_style().add_modifier(Modifier::BOLD)),
        area,
    );

    // Right side: simulated write protection
    let (wp, style) = if app.write_protect_enabled {
        ("[WP: on] ", app.theme.secondary_style())
    } else {
        ("[WP: off] ", app.theme.error_style())
    };
    frame.render_widget(
        Paragraph::new(wp).style(style).alignment(Alignment::Right),
        area,
    );
}
