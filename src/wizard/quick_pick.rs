//! Single-select prompt adapter.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{trace, warn};

use super::flow::{dismissed, PromptOutcome, ShouldResume, WizardError};
use super::sequencer::MultiStepInput;
use super::surface::{PromptEvent, QuickPickView};

/// Parameters for [`MultiStepInput::show_quick_pick`]
#[derive(Clone)]
pub struct QuickPickParams {
    pub title: String,
    /// 1-based position of this prompt in the wizard
    pub step: usize,
    pub total_steps: usize,
    pub placeholder: String,
    /// Distinct labels, in display order
    pub items: Vec<String>,
    /// Item highlighted when the prompt opens; must be one of `items`
    pub active_item: Option<String>,
    /// Labels of extra buttons; triggering one resolves the prompt with it
    pub buttons: Vec<String>,
    pub should_resume: Arc<dyn ShouldResume>,
}

impl QuickPickParams {
    fn check(&self) -> Result<(), WizardError> {
        let invalid = |reason: &str| WizardError::InvalidPrompt {
            title: self.title.clone(),
            reason: reason.to_string(),
        };

        if self.items.is_empty() {
            return Err(invalid("no items to choose from"));
        }
        let mut seen = HashSet::new();
        if let Some(duplicate) = self.items.iter().find(|item| !seen.insert(item.as_str())) {
            return Err(invalid(&format!("duplicate item '{duplicate}'")));
        }
        if let Some(active) = &self.active_item {
            if !self.items.contains(active) {
                return Err(invalid(&format!("active item '{active}' is not in the list")));
            }
        }
        Ok(())
    }
}

impl MultiStepInput {
    /// Show a pick list and wait for a choice or a navigation signal.
    pub async fn show_quick_pick(
        &mut self,
        params: QuickPickParams,
    ) -> Result<PromptOutcome<String>, WizardError> {
        params.check()?;

        let back_button = self.can_go_back();
        let widget = self.surface().create_quick_pick(QuickPickView {
            title: params.title.clone(),
            step: params.step,
            total_steps: params.total_steps,
            placeholder: params.placeholder.clone(),
            items: params.items.clone(),
            active_item: params.active_item.clone(),
            back_button,
            buttons: params.buttons.clone(),
        });
        let (_prompt, mut events) = self.install(widget);

        loop {
            let event = events
                .recv()
                .await
                .ok_or_else(|| WizardError::SurfaceClosed(params.title.clone()))?;

            match event {
                PromptEvent::Select(label) => {
                    if params.items.contains(&label) {
                        return Ok(PromptOutcome::Value(label));
                    }
                    warn!(title = %params.title, %label, "selection is not one of the items");
                }
                PromptEvent::Back if back_button => return Ok(PromptOutcome::Back),
                PromptEvent::Back => trace!(title = %params.title, "no step to go back to"),
                PromptEvent::Hide => return Ok(dismissed(params.should_resume.as_ref()).await),
                PromptEvent::Button(label) => {
                    if params.buttons.contains(&label) {
                        return Ok(PromptOutcome::Button(label));
                    }
                    warn!(title = %params.title, %label, "button is not offered by this prompt");
                }
                PromptEvent::ChangeValue(_) | PromptEvent::Accept => {}
            }
        }
    }
}
