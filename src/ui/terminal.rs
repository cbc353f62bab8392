//! [`PromptSurface`] backed by the real terminal.
//!
//! Prompts are drawn on stderr so stdout stays free for command output.
//! A worker thread owns the ratatui terminal. It redraws the shared
//! [`Screen`] and turns key presses into prompt events until the surface is
//! dropped or the terminal fails.

use std::io::{self, IsTerminal, Stderr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error};

use crate::wizard::{InputBoxView, PromptEvents, PromptSurface, PromptWidget, QuickPickView};

use super::render;
use super::screen::{PromptId, PromptKind, PromptState, Screen};
use super::terminal_guard::TerminalGuard;

const TICK_RATE: Duration = Duration::from_millis(50);

type SharedScreen = Arc<Mutex<Screen>>;

fn lock(screen: &SharedScreen) -> MutexGuard<'_, Screen> {
    screen.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct TerminalSurface {
    screen: SharedScreen,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    _guard: TerminalGuard,
}

impl TerminalSurface {
    /// Take over the terminal and start the input worker.
    ///
    /// Fails without touching the terminal when stderr is not a terminal.
    pub fn new() -> io::Result<Self> {
        if !io::stderr().is_terminal() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "prompts need an interactive terminal on stderr",
            ));
        }
        let guard = TerminalGuard::new()?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stderr()))?;

        let screen = SharedScreen::default();
        let stop = Arc::new(AtomicBool::new(false));
        let worker = std::thread::Builder::new()
            .name("prompt-input".to_string())
            .spawn({
                let screen = Arc::clone(&screen);
                let stop = Arc::clone(&stop);
                move || {
                    if let Err(e) = run_worker(terminal, &screen, &stop) {
                        error!("Terminal worker failed: {}", e);
                    }
                    lock(&screen).close();
                }
            })?;

        Ok(Self {
            screen,
            stop,
            worker: Some(worker),
            _guard: guard,
        })
    }

    fn register(&self, kind: PromptKind) -> Box<dyn PromptWidget> {
        let id = lock(&self.screen).register(kind);
        Box::new(TerminalPrompt {
            id,
            screen: Arc::clone(&self.screen),
        })
    }
}

impl PromptSurface for TerminalSurface {
    fn create_quick_pick(&mut self, view: QuickPickView) -> Box<dyn PromptWidget> {
        self.register(PromptKind::pick(view))
    }

    fn create_input_box(&mut self, view: InputBoxView) -> Box<dyn PromptWidget> {
        self.register(PromptKind::input(view))
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Terminal worker panicked");
            }
        }
    }
}

fn run_worker(
    mut terminal: Terminal<CrosstermBackend<Stderr>>,
    screen: &SharedScreen,
    stop: &AtomicBool,
) -> io::Result<()> {
    debug!("Terminal worker started");
    while !stop.load(Ordering::SeqCst) {
        terminal.draw(|frame| render::draw(frame, &lock(screen)))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    lock(screen).handle_key(key);
                }
            }
        }
    }
    terminal.clear()?;
    debug!("Terminal worker stopped");
    Ok(())
}

/// Handle to one prompt registered on the shared screen
struct TerminalPrompt {
    id: PromptId,
    screen: SharedScreen,
}

impl TerminalPrompt {
    fn update(&self, apply: impl FnOnce(&mut PromptState)) {
        if let Some(prompt) = lock(&self.screen).prompt_mut(self.id) {
            apply(prompt);
        }
    }
}

impl PromptWidget for TerminalPrompt {
    fn show(&mut self) {
        lock(&self.screen).show(self.id);
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.update(|prompt| prompt.enabled = enabled);
    }

    fn set_busy(&mut self, busy: bool) {
        self.update(|prompt| prompt.busy = busy);
    }

    fn set_validation_message(&mut self, message: Option<&str>) {
        self.update(|prompt| prompt.message = message.map(str::to_string));
    }

    fn listen(&mut self) -> PromptEvents {
        lock(&self.screen).listen(self.id)
    }

    fn dispose(&mut self) {
        lock(&self.screen).dispose(self.id);
    }
}
