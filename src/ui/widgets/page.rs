use crate::app::WizardApp;
use crate::rma::pages::{ControlHost, ControlKind, ControlNode};
use crate::ui::Theme;
use crate::ui::strings::resolve;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

pub fn draw_page(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let Some(page) = app.page() else {
        return;
    };
    let view = page.render();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if page.all_buttons_disabled() {
            app.theme.border_style()
        } else {
            app.theme.primary_style()
        })
        .title(format!(" {} ", view.tag))
        .title_style(app.theme.muted_style());

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(Span::styled(
            resolve(&view.title),
            app.theme.primary_style().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    if let Some(message) = &view.message {
        lines.push(Line::from(Span::styled(resolve(message), app.theme.style())));
        lines.push(Line::from(""));
    }
    for status in &view.status {
        lines.push(Line::from(Span::styled(
            resolve(status),
            app.theme.secondary_style(),
        )));
    }
    if let Some(failure) = &view.failure {
        lines.push(Line::from(Span::styled(
            format!("! {}", failure),
            app.theme.error_style(),
        )));
    }
    if !view.status.is_empty() || view.failure.is_some() {
        lines.push(Line::from(""));
    }

    let focused = app.focused_id();
    let dialog_open = page
        .controls()
        .visible()
        .iter()
        .any(|(_, host)| *host == ControlHost::Dialog);
    for (control, host) in page.controls().visible() {
        if host != ControlHost::Page || control.kind == ControlKind::RadioGroup {
            continue;
        }
        let is_focused = !dialog_open && focused.as_deref() == Some(control.id.as_str());
        lines.push(control_line(control, is_focused, &app.theme));
    }

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }),
        inner.inner(Margin::new(1, 0)),
    );
}

/// One line for an interactive control: marker, label, focus and disabled styling
pub fn control_line(control: &ControlNode, focused: bool, theme: &Theme) -> Line<'static> {
    let label = resolve(&control.label);
    let text = match control.kind {
        ControlKind::Toggle => format!("[{}] {}", if control.checked { "x" } else { " " }, label),
        ControlKind::Radio => format!("({}) {}", if control.checked { "*" } else { " " }, label),
        _ => format!("< {} >", label),
    };
    Line::from(Span::styled(
        text,
        theme.control_style(focused, control.is_disabled()),
    ))
}
