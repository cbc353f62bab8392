//! Prompt state shared between the wizard and the terminal worker.
//!
//! Widgets write into the [`Screen`]; the worker reads it to draw and feeds
//! key presses back through [`Screen::handle_key`].

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tracing::trace;

use crate::wizard::{InputBoxView, PromptEvent, PromptEvents, QuickPickView};

use super::keybindings::{action_for, button_for, ShortcutAction, ShortcutContext};

pub(crate) type PromptId = u64;

#[derive(Debug)]
pub(crate) enum PromptKind {
    Pick {
        view: QuickPickView,
        highlighted: usize,
    },
    Input {
        view: InputBoxView,
        value: String,
    },
}

impl PromptKind {
    pub(crate) fn pick(view: QuickPickView) -> Self {
        let highlighted = view
            .active_item
            .as_ref()
            .and_then(|active| view.items.iter().position(|item| item == active))
            .unwrap_or(0);
        PromptKind::Pick { view, highlighted }
    }

    pub(crate) fn input(view: InputBoxView) -> Self {
        let value = view.value.clone();
        PromptKind::Input { view, value }
    }

    pub(crate) fn context(&self) -> ShortcutContext {
        match self {
            PromptKind::Pick { .. } => ShortcutContext::Pick,
            PromptKind::Input { .. } => ShortcutContext::Input,
        }
    }

    pub(crate) fn back_button(&self) -> bool {
        match self {
            PromptKind::Pick { view, .. } => view.back_button,
            PromptKind::Input { view, .. } => view.back_button,
        }
    }

    pub(crate) fn buttons(&self) -> &[String] {
        match self {
            PromptKind::Pick { view, .. } => &view.buttons,
            PromptKind::Input { view, .. } => &view.buttons,
        }
    }
}

#[derive(Debug)]
pub(crate) struct PromptState {
    pub kind: PromptKind,
    pub enabled: bool,
    pub busy: bool,
    pub message: Option<String>,
    listener: Option<mpsc::UnboundedSender<PromptEvent>>,
}

impl PromptState {
    fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            enabled: true,
            busy: false,
            message: None,
            listener: None,
        }
    }

    fn emit(&self, event: PromptEvent) {
        match &self.listener {
            Some(listener) => {
                // A dropped receiver means the prompt is being torn down
                let _ = listener.send(event);
            }
            None => trace!(?event, "No listener, event dropped"),
        }
    }
}

/// Every prompt that exists right now and which one is on screen
#[derive(Debug, Default)]
pub(crate) struct Screen {
    prompts: HashMap<PromptId, PromptState>,
    visible: Option<PromptId>,
    next_id: PromptId,
    closed: bool,
}

impl Screen {
    pub(crate) fn register(&mut self, kind: PromptKind) -> PromptId {
        let id = self.next_id;
        self.next_id += 1;
        self.prompts.insert(id, PromptState::new(kind));
        id
    }

    pub(crate) fn prompt_mut(&mut self, id: PromptId) -> Option<&mut PromptState> {
        self.prompts.get_mut(&id)
    }

    pub(crate) fn show(&mut self, id: PromptId) {
        if self.prompts.contains_key(&id) {
            self.visible = Some(id);
        }
    }

    pub(crate) fn visible(&self) -> Option<&PromptState> {
        self.visible.and_then(|id| self.prompts.get(&id))
    }

    /// Register a listener for `id`, replacing any earlier one.
    ///
    /// On a closed screen the sender is dropped right away, so the receiver
    /// reports a closed channel.
    pub(crate) fn listen(&mut self, id: PromptId) -> PromptEvents {
        let (tx, rx) = mpsc::unbounded_channel();
        if !self.closed {
            if let Some(prompt) = self.prompts.get_mut(&id) {
                prompt.listener = Some(tx);
            }
        }
        rx
    }

    pub(crate) fn dispose(&mut self, id: PromptId) {
        self.prompts.remove(&id);
        if self.visible == Some(id) {
            self.visible = None;
        }
    }

    /// The terminal is gone; every listener sees its channel close
    pub(crate) fn close(&mut self) {
        self.closed = true;
        for prompt in self.prompts.values_mut() {
            prompt.listener = None;
        }
    }

    /// Translate a key press on the visible prompt into edits and events
    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        let Some(id) = self.visible else {
            return;
        };
        let Some(prompt) = self.prompts.get_mut(&id) else {
            return;
        };

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            prompt.emit(PromptEvent::Hide);
            return;
        }
        if !prompt.enabled {
            return;
        }
        if let Some(label) = button_for(prompt.kind.buttons(), key.code) {
            let event = PromptEvent::Button(label.to_string());
            prompt.emit(event);
            return;
        }
        let back_button = prompt.kind.back_button();
        if let Some(action) = action_for(prompt.kind.context(), back_button, key.code) {
            let event = match (&mut prompt.kind, action) {
                (_, ShortcutAction::Back) => Some(PromptEvent::Back),
                (_, ShortcutAction::Dismiss) => Some(PromptEvent::Hide),
                (PromptKind::Pick { highlighted, .. }, ShortcutAction::Up) => {
                    *highlighted = highlighted.saturating_sub(1);
                    None
                }
                (PromptKind::Pick { view, highlighted }, ShortcutAction::Down) => {
                    if *highlighted + 1 < view.items.len() {
                        *highlighted += 1;
                    }
                    None
                }
                (PromptKind::Pick { view, highlighted }, ShortcutAction::Select) => {
                    view.items.get(*highlighted).cloned().map(PromptEvent::Select)
                }
                (PromptKind::Input { .. }, ShortcutAction::Accept) => Some(PromptEvent::Accept),
                _ => None,
            };
            if let Some(event) = event {
                prompt.emit(event);
            }
            return;
        }

        if let PromptKind::Input { value, .. } = &mut prompt.kind {
            let edited = match key.code {
                KeyCode::Backspace => value.pop().is_some(),
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    value.push(c);
                    true
                }
                _ => false,
            };
            if edited {
                let event = PromptEvent::ChangeValue(value.clone());
                prompt.emit(event);
            }
        }
    }
}
