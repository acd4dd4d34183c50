use crate::app::WizardApp;
use crate::ui::Layout;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

pub fn draw_help(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(Span::styled("Navigation", bold)),
        Line::from("  j/k, Tab   Move between controls"),
        Line::from("  Enter      Activate control"),
        Line::from("  Space      Toggle / select"),
        Line::from("  q, Esc     Quit"),
        Line::from(""),
        Line::from(Span::styled("Simulated device", bold)),
        Line::from("  w          Flip write protection"),
        Line::from("  e          Report a hardware error"),
        Line::from("  r          Announce a reboot"),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", app.theme.muted_style())),
    ];

    let height = help_text.len() as u16 + 2;
    let width = 45u16.min(area.width.saturating_sub(4));
    let help_area = Layout::centered_box(area, width, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(" Help ")
        .title_style(app.theme.primary_style());

    frame.render_widget(Clear, help_area);
    frame.render_widget(Paragraph::new(help_text).block(block), help_area);
}
