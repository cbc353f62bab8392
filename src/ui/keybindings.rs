//! Keyboard shortcuts of the wizard prompts.
//!
//! [`action_for`] maps key presses to actions for the screen, and
//! [`footer_text`] lists the same shortcuts under each prompt. Text editing
//! keys and Ctrl+C are not shortcuts and are handled by the screen itself.
//! Extra prompt buttons take the function keys in order, see [`button_for`].

use crossterm::event::KeyCode;

/// A keyboard shortcut definition
#[derive(Debug, Clone)]
pub struct Shortcut {
    /// Primary key for this shortcut
    pub key: KeyCode,
    /// Alternative key (e.g., a second binding for the same action)
    pub alt_key: Option<KeyCode>,
    /// What pressing the key does
    pub action: ShortcutAction,
    /// Human-readable description of what this shortcut does
    pub description: &'static str,
    /// Prompt kind where this shortcut is active
    pub context: ShortcutContext,
    /// Only listed when the prompt offers (`Some(true)`) or lacks
    /// (`Some(false)`) a back button
    pub back_button: Option<bool>,
}

/// What a shortcut does to the visible prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Highlight the previous item
    Up,
    /// Highlight the next item
    Down,
    /// Choose the highlighted item
    Select,
    /// Confirm the entered text
    Accept,
    Back,
    Dismiss,
}

/// Prompt kinds with their own shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutContext {
    /// Single-select list
    Pick,
    /// Validated text entry
    Input,
}

impl Shortcut {
    /// Format key for display (e.g., "Enter", "↑/k")
    pub fn key_display(&self) -> String {
        let primary = format_keycode(&self.key);
        match &self.alt_key {
            Some(alt) => format!("{}/{}", primary, format_keycode(alt)),
            None => primary,
        }
    }

    fn applies(&self, context: ShortcutContext, back_button: bool) -> bool {
        self.context == context && self.back_button.map_or(true, |wanted| wanted == back_button)
    }

    fn bound_to(&self, key: KeyCode) -> bool {
        self.key == key || self.alt_key == Some(key)
    }
}

/// Format a KeyCode for display
fn format_keycode(key: &KeyCode) -> String {
    match key {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        _ => format!("{:?}", key),
    }
}

/// Static registry of all prompt shortcuts
pub static SHORTCUTS: &[Shortcut] = &[
    // === Pick ===
    Shortcut {
        key: KeyCode::Up,
        alt_key: None,
        action: ShortcutAction::Up,
        description: "Up",
        context: ShortcutContext::Pick,
        back_button: None,
    },
    Shortcut {
        key: KeyCode::Down,
        alt_key: None,
        action: ShortcutAction::Down,
        description: "Down",
        context: ShortcutContext::Pick,
        back_button: None,
    },
    Shortcut {
        key: KeyCode::Enter,
        alt_key: None,
        action: ShortcutAction::Select,
        description: "Select",
        context: ShortcutContext::Pick,
        back_button: None,
    },
    Shortcut {
        key: KeyCode::Esc,
        alt_key: None,
        action: ShortcutAction::Back,
        description: "Back",
        context: ShortcutContext::Pick,
        back_button: Some(true),
    },
    Shortcut {
        key: KeyCode::Esc,
        alt_key: None,
        action: ShortcutAction::Dismiss,
        description: "Dismiss",
        context: ShortcutContext::Pick,
        back_button: Some(false),
    },
    // === Input ===
    Shortcut {
        key: KeyCode::Enter,
        alt_key: None,
        action: ShortcutAction::Accept,
        description: "Accept",
        context: ShortcutContext::Input,
        back_button: None,
    },
    Shortcut {
        key: KeyCode::Esc,
        alt_key: None,
        action: ShortcutAction::Back,
        description: "Back",
        context: ShortcutContext::Input,
        back_button: Some(true),
    },
    Shortcut {
        key: KeyCode::Esc,
        alt_key: None,
        action: ShortcutAction::Dismiss,
        description: "Dismiss",
        context: ShortcutContext::Input,
        back_button: Some(false),
    },
];

/// Shortcuts that apply to a prompt of `context`
pub fn shortcuts_for(
    context: ShortcutContext,
    back_button: bool,
) -> impl Iterator<Item = &'static Shortcut> {
    SHORTCUTS
        .iter()
        .filter(move |s| s.applies(context, back_button))
}

/// Action bound to `key` on a prompt of `context`
pub fn action_for(
    context: ShortcutContext,
    back_button: bool,
    key: KeyCode,
) -> Option<ShortcutAction> {
    shortcuts_for(context, back_button)
        .find(|s| s.bound_to(key))
        .map(|s| s.action)
}

/// One-line footer, e.g. "Enter Accept  Esc Back  Ctrl+C Cancel"
pub fn footer_text(context: ShortcutContext, back_button: bool) -> String {
    let mut parts: Vec<String> = shortcuts_for(context, back_button)
        .map(|s| format!("{} {}", s.key_display(), s.description))
        .collect();
    parts.push("Ctrl+C Cancel".to_string());
    parts.join("  ")
}

/// The extra button bound to `key`: F1 presses the first one, F2 the second
pub fn button_for(buttons: &[String], key: KeyCode) -> Option<&str> {
    match key {
        KeyCode::F(n) if n > 0 => buttons.get(usize::from(n) - 1).map(String::as_str),
        _ => None,
    }
}

/// One "F<n> label" entry per extra button, or `None` without buttons
pub fn buttons_text(buttons: &[String]) -> Option<String> {
    if buttons.is_empty() {
        return None;
    }
    let parts: Vec<String> = buttons
        .iter()
        .enumerate()
        .map(|(index, label)| format!("F{} {}", index + 1, label))
        .collect();
    Some(parts.join("  "))
}
