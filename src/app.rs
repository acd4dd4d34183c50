use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::Result;
use crate::rma::pages::ControlNode;
use crate::rma::{
    ErrorCode, FakeDeviceService, Inbound, MountId, Orchestrator, Outcome, PageInput, StepPage,
    WizardConfig, WizardState,
};
use crate::ui::Theme;

#[derive(Debug, Clone)]
pub struct Message {
    pub text: String,
    pub is_error: bool,
}

/// Terminal front end state around the orchestrator and the simulated device
pub struct WizardApp {
    pub config: WizardConfig,
    pub theme: Theme,
    pub service: Arc<FakeDeviceService>,
    pub orchestrator: Orchestrator,
    /// Index into the active page's focusable controls
    pub focus: usize,
    pub message: Option<Message>,
    /// Last write protection value the simulated device reported
    pub write_protect_enabled: bool,
    pub show_help: bool,
    pub should_exit: bool,
    last_mount: Option<MountId>,
}

impl WizardApp {
    pub fn new(config: WizardConfig) -> Result<Self> {
        let service = Arc::new(config.build_service());
        let mut orchestrator = Orchestrator::new(service.clone(), config.initial_state())
            .with_components(config.simulation.components.clone());
        orchestrator.mount_initial_state()?;

        let mut app = Self {
            config,
            theme: Theme::default(),
            service,
            orchestrator,
            focus: 0,
            message: None,
            write_protect_enabled: true,
            show_help: false,
            should_exit: false,
            last_mount: None,
        };
        app.after_update();
        Ok(app)
    }

    pub fn page(&self) -> Option<&dyn StepPage> {
        self.orchestrator.active_page()
    }

    pub fn current_state(&self) -> Option<WizardState> {
        self.orchestrator.current_state()
    }

    pub fn focusable(&self) -> Vec<&ControlNode> {
        self.page()
            .map(|page| page.controls().focusable())
            .unwrap_or_default()
    }

    pub fn focused_id(&self) -> Option<String> {
        self.focusable().get(self.focus).map(|control| control.id.clone())
    }

    pub fn set_error(&mut self, text: String) {
        warn!("{}", text);
        self.message = Some(Message {
            text,
            is_error: true,
        });
    }

    pub fn set_info(&mut self, text: String) {
        info!("{}", text);
        self.message = Some(Message {
            text,
            is_error: false,
        });
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.show_help {
            self.show_help = false;
            return Ok(());
        }
        // Any key dismisses a message
        self.message = None;

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_exit = true;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.should_exit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => self.move_focus(1),
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => self.move_focus(-1),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate()?,
            KeyCode::Char('w') => {
                self.write_protect_enabled = !self.write_protect_enabled;
                self.service
                    .trigger_write_protect_observer(self.write_protect_enabled, 0);
                self.sync()?;
            }
            KeyCode::Char('e') => {
                self.service
                    .trigger_hardware_error_observer(ErrorCode::CriticalError, 0);
                self.sync()?;
            }
            KeyCode::Char('r') => {
                self.service.trigger_reboot_observer(ErrorCode::ExpectReboot, 0);
                self.sync()?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Feed one inbound event from the async loop
    pub fn handle_inbound(&mut self, inbound: Inbound) -> Result<()> {
        self.orchestrator.handle_inbound(inbound)?;
        self.sync()
    }

    fn move_focus(&mut self, delta: isize) {
        let count = self.focusable().len();
        if count == 0 {
            return;
        }
        self.focus = (self.focus as isize + delta).rem_euclid(count as isize) as usize;
    }

    fn activate(&mut self) -> Result<()> {
        let Some(input) = self
            .focusable()
            .get(self.focus)
            .and_then(|control| PageInput::for_control(control))
        else {
            return Ok(());
        };
        self.orchestrator.handle_input(input)?;
        self.sync()
    }

    /// Drain whatever the orchestrator can handle now, then refresh app state
    fn sync(&mut self) -> Result<()> {
        self.orchestrator.process_pending()?;
        self.after_update();
        Ok(())
    }

    fn after_update(&mut self) {
        let mount = self.orchestrator.mount_id();
        if mount != self.last_mount {
            self.last_mount = mount;
            self.focus = 0;
            self.on_page_mounted();
        }

        let count = self.focusable().len();
        if self.focus >= count {
            self.focus = count.saturating_sub(1);
        }

        if let Some(outcome) = self.orchestrator.outcome() {
            if !self.should_exit {
                self.set_info(match outcome {
                    Outcome::ExitToLogin => "Exiting to login".to_string(),
                    Outcome::Reboot => "Rebooting device".to_string(),
                });
            }
            self.should_exit = true;
        }
    }

    /// Schedule the simulated write protection changes configured for the new page
    fn on_page_mounted(&mut self) {
        let simulation = &self.config.simulation;
        let (enabled, delay_ms) = match self.current_state() {
            Some(WizardState::WaitForManualWpDisable) => (false, simulation.auto_wp_disable_ms),
            Some(WizardState::WaitForManualWpEnable) => (true, simulation.auto_wp_enable_ms),
            _ => return,
        };
        if delay_ms == 0 {
            return;
        }
        self.write_protect_enabled = enabled;
        self.service.trigger_write_protect_observer(enabled, delay_ms);
    }
}
