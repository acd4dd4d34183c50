use crate::app::WizardApp;
use crate::rma::pages::{ControlKind, ControlNode};
use crate::ui::Layout;
use crate::ui::strings::resolve;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::control_line;

fn find_open_dialog(node: &ControlNode) -> Option<&ControlNode> {
    if node.kind == ControlKind::Dialog && node.open {
        return Some(node);
    }
    node.children().iter().find_map(find_open_dialog)
}

/// Draw the active page's open dialog, if any, over the page
pub fn draw_open_dialog(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let Some(dialog) = app.page().and_then(|page| find_open_dialog(page.controls())) else {
        return;
    };

    let focused = app.focused_id();
    let mut text = vec![Line::from("")];
    for (control, _) in dialog.visible() {
        if control.kind == ControlKind::RadioGroup {
            continue;
        }
        let is_focused = focused.as_deref() == Some(control.id.as_str());
        text.push(control_line(control, is_focused, &app.theme));
    }

    let height = text.len() as u16 + 3;
    let dialog_area = Layout::centered_box(area, 40.min(area.width), height.min(area.height));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.primary_style())
        .title(format!(" {} ", resolve(&dialog.label)))
        .title_style(app.theme.primary_style().add_modifier(Modifier::BOLD));

    frame.render_widget(Clear, dialog_area);
    frame.render_widget(
        Paragraph::new(text).block(block).alignment(Alignment::Center),
        dialog_area,
    );
}
