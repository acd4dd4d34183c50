use super::{ControlNode, PageContext, PageFrame, PageInput, PageView, StepPage, Text};
use crate::rma::mapping::PageAttributes;
use crate::rma::service::DeviceRequest;
use crate::rma::state::WizardState;

pub const TAG: &str = "onboarding-select-components-page";

const CHIPS: &str = "component-repair-chips";

/// One repair chip per replaceable component; "next" reports the checked ones
pub struct SelectComponentsPage {
    frame: PageFrame,
    components: Vec<String>,
}

pub fn build(attributes: &PageAttributes) -> Box<dyn StepPage> {
    Box::new(SelectComponentsPage::new(&attributes.components))
}

impl SelectComponentsPage {
    pub fn new(components: &[String]) -> Self {
        let chips = components
            .iter()
            .map(|name| {
                ControlNode::toggle(name.clone(), Text::new("componentRepairChip").with_arg(name))
            })
            .collect();

        // Nothing to pick means nothing to wait for
        let mut next = ControlNode::button("next", "nextButtonLabel");
        if !components.is_empty() {
            next = next.locked();
        }

        Self {
            frame: PageFrame::new(ControlNode::group(
                "select-components",
                vec![ControlNode::group(CHIPS, chips), next],
            )),
            components: components.to_vec(),
        }
    }

    pub fn selected(&self) -> Vec<String> {
        self.components
            .iter()
            .filter(|name| {
                self.frame
                    .controls
                    .find(name)
                    .is_some_and(|chip| chip.checked)
            })
            .cloned()
            .collect()
    }
}

impl StepPage for SelectComponentsPage {
    fn state(&self) -> WizardState {
        WizardState::SelectComponents
    }

    fn tag(&self) -> &'static str {
        TAG
    }

    fn frame(&self) -> &PageFrame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut PageFrame {
        &mut self.frame
    }

    fn render(&self) -> PageView {
        PageView::new(TAG, Text::new("selectComponentsTitleText"))
            .message(Text::new("selectComponentsDescriptionText"))
            .status(Text::new("selectedComponentsCount").with_arg(self.selected().len()))
            .failure(self.frame.failure.clone())
    }

    fn on_input(&mut self, input: &PageInput, ctx: &mut PageContext) {
        match input {
            PageInput::Toggle(id) if self.components.contains(id) => {
                if let Some(chip) = self.frame.controls.find_mut(id) {
                    chip.checked = !chip.checked;
                }
                let none_selected = !self.components.is_empty() && self.selected().is_empty();
                if let Some(next) = self.frame.controls.find_mut("next") {
                    next.set_locked(none_selected);
                }
            }
            PageInput::Click(id) if id == "next" => {
                let components = self.selected();
                self.frame
                    .issue(DeviceRequest::SetComponentRepair { components }, ctx);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rma::pages::PageEffect;

    fn page() -> SelectComponentsPage {
        SelectComponentsPage::new(&["battery".to_string(), "camera".to_string()])
    }

    #[test]
    fn next_unlocks_once_a_chip_is_checked() {
        let mut page = page();
        let mut ctx = PageContext::new();
        assert!(page.controls().find("next").unwrap().is_disabled());

        page.on_input(&PageInput::toggle("camera"), &mut ctx);
        assert!(!page.controls().find("next").unwrap().is_disabled());

        page.on_input(&PageInput::toggle("camera"), &mut ctx);
        assert!(page.controls().find("next").unwrap().is_disabled());
    }

    #[test]
    fn next_reports_checked_components_in_order() {
        let mut page = page();
        let mut ctx = PageContext::new();
        page.on_input(&PageInput::toggle("camera"), &mut ctx);
        page.on_input(&PageInput::toggle("battery"), &mut ctx);
        page.on_input(&PageInput::click("next"), &mut ctx);

        assert_eq!(
            ctx.effects(),
            &[PageEffect::Request(DeviceRequest::SetComponentRepair {
                components: vec!["battery".to_string(), "camera".to_string()]
            })]
        );
    }

    #[test]
    fn empty_component_list_reports_nothing() {
        let mut page = SelectComponentsPage::new(&[]);
        let mut ctx = PageContext::new();
        assert!(page.controls().is_actionable("next"));

        page.on_input(&PageInput::click("next"), &mut ctx);
        assert_eq!(
            ctx.effects(),
            &[PageEffect::Request(DeviceRequest::SetComponentRepair {
                components: Vec::new()
            })]
        );
    }
}
