use crate::app::WizardApp;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let state = app
        .current_state()
        .map(|state| state.as_str())
        .unwrap_or("none");

    let mut left_spans = vec![
        Span::raw(" "),
        Span::styled(
            format!(" {} ", state),
            app.theme.secondary_style().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];
    if app.orchestrator.all_buttons_disabled() {
        left_spans.push(Span::styled("[DISABLED]", app.theme.error_style()));
    }
    let left = Line::from(left_spans);

    // Right side: keybinding hints
    let hints = [
        ("Enter", ":activate "),
        ("w", ":wp "),
        ("e", ":hw error "),
        ("r", ":reboot "),
        ("?", ":help "),
    ];
    let right = Line::from(
        hints
            .iter()
            .flat_map(|(key, what)| {
                [
                    Span::styled(*key, app.theme.secondary_style()),
                    Span::styled(*what, app.theme.muted_style()),
                ]
            })
            .collect::<Vec<_>>(),
    );

    frame.render_widget(Paragraph::new(left).style(app.theme.style()), area);

    let right_width = right.width() as u16;
    if area.width > right_width {
        let right_area = Rect {
            x: area.x + area.width - right_width - 1,
            y: area.y,
            width: right_width + 1,
            height: 1,
        };
        frame.render_widget(Paragraph::new(right).alignment(Alignment::Right), right_area);
    }
}
