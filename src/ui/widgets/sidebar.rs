use crate::app::WizardApp;
use crate::rma::WizardState;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Scripted flow with the states already visited checked off
pub fn draw_sidebar(frame: &mut Frame, area: Rect, app: &WizardApp) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style())
        .title(" Steps ");

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let current = app.current_state();
    let history = app.orchestrator.history();
    let mut steps: Vec<WizardState> = app
        .config
        .simulation
        .states
        .iter()
        .map(|step| step.state)
        .collect();
    // Off-script pages (reboot, critical error) still show up
    if let Some(state) = current.filter(|state| !steps.contains(state)) {
        steps.push(state);
    }

    for (idx, state) in steps.iter().enumerate() {
        if idx as u16 >= inner.height {
            break;
        }
        let is_current = Some(*state) == current;
        let status = if is_current {
            "[>]"
        } else if history.contains(state) {
            "[x]"
        } else {
            "[ ]"
        };

        let style = if is_current {
            app.theme.primary_style().add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else if *state == WizardState::CriticalError {
            app.theme.error_style()
        } else if history.contains(state) {
            app.theme.success_style()
        } else {
            app.theme.muted_style()
        };

        let line_area = Rect::new(inner.x, inner.y + idx as u16, inner.width, 1);
        frame.render_widget(
            Paragraph::new(format!(" {} {}", status, state.short_name())).style(style),
            line_area,
        );
    }
}
