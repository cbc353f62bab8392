//! Rendering seam between the wizard and whatever draws prompts.
//!
//! A [`PromptSurface`] creates widgets; a [`PromptWidget`] shows itself,
//! reflects busy/enabled/validation state and reports user interaction as
//! [`PromptEvent`]s through a listener channel.

use std::ops::{Deref, DerefMut};

use tokio::sync::mpsc;

/// User interaction with the visible prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    /// An item of a pick list was chosen
    Select(String),
    /// The text of an input box changed
    ChangeValue(String),
    /// The user confirmed the text of an input box
    Accept,
    /// The back button was triggered
    Back,
    /// The prompt was dismissed without an answer
    Hide,
    /// An extra button was triggered, identified by its label
    Button(String),
}

/// Listener registration for one prompt. Dropping it unsubscribes.
pub type PromptEvents = mpsc::UnboundedReceiver<PromptEvent>;

/// What a surface needs to render a single-select prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickPickView {
    pub title: String,
    pub step: usize,
    pub total_steps: usize,
    pub placeholder: String,
    pub items: Vec<String>,
    pub active_item: Option<String>,
    pub back_button: bool,
    /// Labels of extra buttons shown after the back button
    pub buttons: Vec<String>,
}

/// What a surface needs to render a text prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBoxView {
    pub title: String,
    pub step: usize,
    pub total_steps: usize,
    pub value: String,
    pub prompt: String,
    pub placeholder: Option<String>,
    pub back_button: bool,
    /// Labels of extra buttons shown after the back button
    pub buttons: Vec<String>,
}

/// One on-screen prompt
pub trait PromptWidget: Send {
    fn show(&mut self);

    fn set_enabled(&mut self, enabled: bool);

    fn set_busy(&mut self, busy: bool);

    fn set_validation_message(&mut self, message: Option<&str>);

    /// Register the event listener. Events raised while nobody listens are dropped.
    fn listen(&mut self) -> PromptEvents;

    fn dispose(&mut self);
}

/// Factory for prompt widgets
pub trait PromptSurface: Send {
    fn create_quick_pick(&mut self, view: QuickPickView) -> Box<dyn PromptWidget>;

    fn create_input_box(&mut self, view: InputBoxView) -> Box<dyn PromptWidget>;
}

/// Owning handle to the displayed prompt. The widget is disposed on drop.
pub struct ActivePrompt {
    widget: Box<dyn PromptWidget>,
}

impl ActivePrompt {
    pub fn new(widget: Box<dyn PromptWidget>) -> Self {
        Self { widget }
    }

    /// Grey out the prompt while the next step is being prepared
    pub fn mark_processing(&mut self) {
        self.widget.set_enabled(false);
        self.widget.set_busy(true);
    }

    pub fn mark_ready(&mut self) {
        self.widget.set_enabled(true);
        self.widget.set_busy(false);
    }
}

impl Deref for ActivePrompt {
    type Target = dyn PromptWidget;

    fn deref(&self) -> &Self::Target {
        self.widget.as_ref()
    }
}

impl DerefMut for ActivePrompt {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.widget.as_mut()
    }
}

impl Drop for ActivePrompt {
    fn drop(&mut self) {
        self.widget.dispose();
    }
}
