//! Scripted prompt surface for tests.
//!
//! Each created prompt consumes the next script. Script events are fed to the
//! prompt's listener from a tokio task once the prompt starts listening, so a
//! runtime must be active. After the last scripted item the feeder keeps the
//! channel open for [`SCRIPT_LINGER`] before closing it, which lets pending
//! validations settle first. Use `#[tokio::test(start_paused = true)]` so
//! pauses and the linger cost no wall-clock time.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;

use super::surface::{
    InputBoxView, PromptEvent, PromptEvents, PromptSurface, PromptWidget, QuickPickView,
};

/// How long a prompt stays open after its script ran out
pub const SCRIPT_LINGER: Duration = Duration::from_secs(60);

/// One item of a prompt script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scripted {
    Event(PromptEvent),
    Pause(Duration),
}

impl Scripted {
    pub fn select(label: &str) -> Self {
        Scripted::Event(PromptEvent::Select(label.to_string()))
    }

    pub fn change(text: &str) -> Self {
        Scripted::Event(PromptEvent::ChangeValue(text.to_string()))
    }

    pub fn accept() -> Self {
        Scripted::Event(PromptEvent::Accept)
    }

    pub fn back() -> Self {
        Scripted::Event(PromptEvent::Back)
    }

    pub fn hide() -> Self {
        Scripted::Event(PromptEvent::Hide)
    }

    pub fn button(label: &str) -> Self {
        Scripted::Event(PromptEvent::Button(label.to_string()))
    }

    pub fn pause(duration: Duration) -> Self {
        Scripted::Pause(duration)
    }
}

/// Something the wizard did to a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockAction {
    CreateQuickPick(QuickPickView),
    CreateInputBox(InputBoxView),
    Listen,
    Show,
    Enabled(bool),
    Busy(bool),
    ValidationMessage(Option<String>),
    Dispose,
}

/// A recorded action together with the index of the prompt it targeted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub prompt: usize,
    pub action: MockAction,
}

/// Mock implementation for testing
#[derive(Clone, Default)]
pub struct ScriptedSurface {
    /// Scripts for prompts not created yet
    scripts: Arc<Mutex<VecDeque<Vec<Scripted>>>>,
    /// Record of everything done to any prompt
    log: Arc<Mutex<Vec<MockCall>>>,
    /// Prompts created so far
    created: Arc<Mutex<usize>>,
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ScriptedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the script for the next prompt that will be created
    pub fn with_prompt(self, script: impl IntoIterator<Item = Scripted>) -> Self {
        lock(&self.scripts).push_back(script.into_iter().collect());
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.log).clone()
    }

    /// Actions recorded for the prompt with index `prompt`
    pub fn actions_for(&self, prompt: usize) -> Vec<MockAction> {
        lock(&self.log)
            .iter()
            .filter(|call| call.prompt == prompt)
            .map(|call| call.action.clone())
            .collect()
    }

    /// Validation messages applied to a prompt, in order
    pub fn validation_messages(&self, prompt: usize) -> Vec<Option<String>> {
        self.actions_for(prompt)
            .into_iter()
            .filter_map(|action| match action {
                MockAction::ValidationMessage(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    /// Every pick list created, in creation order
    pub fn quick_pick_views(&self) -> Vec<QuickPickView> {
        lock(&self.log)
            .iter()
            .filter_map(|call| match &call.action {
                MockAction::CreateQuickPick(view) => Some(view.clone()),
                _ => None,
            })
            .collect()
    }

    /// Every input box created, in creation order
    pub fn input_box_views(&self) -> Vec<InputBoxView> {
        lock(&self.log)
            .iter()
            .filter_map(|call| match &call.action {
                MockAction::CreateInputBox(view) => Some(view.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn prompts_created(&self) -> usize {
        *lock(&self.created)
    }

    fn create(&mut self, action: MockAction) -> Box<dyn PromptWidget> {
        let prompt = {
            let mut created = lock(&self.created);
            let index = *created;
            *created += 1;
            index
        };
        lock(&self.log).push(MockCall { prompt, action });
        let script = lock(&self.scripts).pop_front().unwrap_or_default();
        Box::new(ScriptedPrompt {
            prompt,
            script: Some(script),
            log: Arc::clone(&self.log),
        })
    }
}

impl PromptSurface for ScriptedSurface {
    fn create_quick_pick(&mut self, view: QuickPickView) -> Box<dyn PromptWidget> {
        self.create(MockAction::CreateQuickPick(view))
    }

    fn create_input_box(&mut self, view: InputBoxView) -> Box<dyn PromptWidget> {
        self.create(MockAction::CreateInputBox(view))
    }
}

struct ScriptedPrompt {
    prompt: usize,
    script: Option<Vec<Scripted>>,
    log: Arc<Mutex<Vec<MockCall>>>,
}

impl ScriptedPrompt {
    fn record(&self, action: MockAction) {
        lock(&self.log).push(MockCall {
            prompt: self.prompt,
            action,
        });
    }
}

impl PromptWidget for ScriptedPrompt {
    fn show(&mut self) {
        self.record(MockAction::Show);
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.record(MockAction::Enabled(enabled));
    }

    fn set_busy(&mut self, busy: bool) {
        self.record(MockAction::Busy(busy));
    }

    fn set_validation_message(&mut self, message: Option<&str>) {
        self.record(MockAction::ValidationMessage(message.map(str::to_string)));
    }

    fn listen(&mut self) -> PromptEvents {
        self.record(MockAction::Listen);
        let (tx, rx) = mpsc::unbounded_channel();
        let script = self.script.take().unwrap_or_default();
        tokio::spawn(async move {
            for item in script {
                match item {
                    Scripted::Event(event) => {
                        if tx.send(event).is_err() {
                            return;
                        }
                    }
                    Scripted::Pause(duration) => tokio::time::sleep(duration).await,
                }
            }
            tokio::time::sleep(SCRIPT_LINGER).await;
        });
        rx
    }

    fn dispose(&mut self) {
        self.record(MockAction::Dispose);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> QuickPickView {
        QuickPickView {
            title: "t".to_string(),
            step: 1,
            total_steps: 1,
            placeholder: String::new(),
            items: vec!["a".to_string()],
            active_item: None,
            back_button: false,
            buttons: Vec::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_scripts_are_consumed_in_order() {
        let mut surface = ScriptedSurface::new()
            .with_prompt([Scripted::select("a")])
            .with_prompt([Scripted::hide()]);

        let mut first = surface.create_quick_pick(view());
        let mut second = surface.create_quick_pick(view());

        assert_eq!(
            first.listen().recv().await,
            Some(PromptEvent::Select("a".to_string()))
        );
        assert_eq!(second.listen().recv().await, Some(PromptEvent::Hide));
        assert_eq!(surface.prompts_created(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_channel_closes_after_linger() {
        let mut surface = ScriptedSurface::new();
        let mut prompt = surface.create_quick_pick(view());
        let mut events = prompt.listen();

        let started = tokio::time::Instant::now();
        assert_eq!(events.recv().await, None);
        assert!(started.elapsed() >= SCRIPT_LINGER);
    }

    #[test]
    fn test_actions_are_recorded_per_prompt() {
        let mut surface = ScriptedSurface::new();
        let mut prompt = surface.create_quick_pick(view());
        prompt.show();
        prompt.set_busy(true);
        prompt.dispose();

        assert_eq!(
            surface.actions_for(0),
            vec![
                MockAction::CreateQuickPick(view()),
                MockAction::Show,
                MockAction::Busy(true),
                MockAction::Dispose,
            ]
        );
        assert!(surface.actions_for(1).is_empty());
    }
}
