//! Validated free-text prompt adapter.
//!
//! Validation runs live on every change. Requests are numbered; a result is
//! applied only if no newer request was issued after it, so a slow answer
//! for old text never overwrites the message for newer text.

use std::sync::Arc;

use futures_util::future::{BoxFuture, OptionFuture};
use futures_util::stream::{FuturesUnordered, StreamExt};
use tracing::trace;

use super::flow::{dismissed, PromptOutcome, ShouldResume, WizardError};
use super::sequencer::MultiStepInput;
use super::surface::{InputBoxView, PromptEvent};
use super::validate::Validate;

/// Parameters for [`MultiStepInput::show_input_box`]
#[derive(Clone)]
pub struct InputBoxParams {
    pub title: String,
    /// 1-based position of this prompt in the wizard
    pub step: usize,
    pub total_steps: usize,
    /// Initial text
    pub value: String,
    pub prompt: String,
    pub placeholder: Option<String>,
    /// Labels of extra buttons; triggering one resolves the prompt with it
    pub buttons: Vec<String>,
    pub validate: Arc<dyn Validate>,
    pub should_resume: Arc<dyn ShouldResume>,
}

type Validation = BoxFuture<'static, (u64, String, Option<String>)>;

/// Outstanding validations and the generation of the newest one
struct Validations {
    validator: Arc<dyn Validate>,
    latest: u64,
    live: FuturesUnordered<Validation>,
}

impl Validations {
    fn new(validator: Arc<dyn Validate>) -> Self {
        Self {
            validator,
            latest: 0,
            live: FuturesUnordered::new(),
        }
    }

    /// Start validating `text`; the returned future resolves to
    /// `(generation, text, message)`.
    fn request(&mut self, text: String) -> Validation {
        self.latest += 1;
        let generation = self.latest;
        let validator = Arc::clone(&self.validator);
        Box::pin(async move {
            let message = validator.validate(&text).await;
            (generation, text, message)
        })
    }

    /// Validate `text` in the background as the user types
    fn issue(&mut self, text: String) -> u64 {
        let validation = self.request(text);
        self.live.push(validation);
        self.latest
    }

    fn is_current(&self, generation: u64) -> bool {
        generation == self.latest
    }
}

impl MultiStepInput {
    /// Show a text box and wait for validated text or a navigation signal.
    ///
    /// Accepting text the validator rejects keeps the prompt open with the
    /// message displayed.
    pub async fn show_input_box(
        &mut self,
        params: InputBoxParams,
    ) -> Result<PromptOutcome<String>, WizardError> {
        let back_button = self.can_go_back();
        let widget = self.surface().create_input_box(InputBoxView {
            title: params.title.clone(),
            step: params.step,
            total_steps: params.total_steps,
            value: params.value.clone(),
            prompt: params.prompt.clone(),
            placeholder: params.placeholder.clone(),
            back_button,
            buttons: params.buttons.clone(),
        });
        let (prompt, mut events) = self.install(widget);

        let mut value = params.value.clone();
        let mut validations = Validations::new(Arc::clone(&params.validate));
        // Primes the validator; its message is never shown.
        let priming = validations.issue(String::new());
        let mut accepting: Option<Validation> = None;

        loop {
            tokio::select! {
                event = events.recv() => {
                    let event = event.ok_or_else(|| WizardError::SurfaceClosed(params.title.clone()))?;
                    match event {
                        PromptEvent::ChangeValue(text) => {
                            value.clone_from(&text);
                            validations.issue(text);
                        }
                        PromptEvent::Accept => {
                            if accepting.is_some() {
                                trace!(title = %params.title, "accept already in progress");
                                continue;
                            }
                            prompt.mark_processing();
                            accepting = Some(validations.request(value.clone()));
                        }
                        PromptEvent::Back if back_button => return Ok(PromptOutcome::Back),
                        PromptEvent::Back => trace!(title = %params.title, "no step to go back to"),
                        PromptEvent::Hide => {
                            return Ok(dismissed(params.should_resume.as_ref()).await);
                        }
                        PromptEvent::Button(label) if params.buttons.contains(&label) => {
                            return Ok(PromptOutcome::Button(label));
                        }
                        PromptEvent::Button(label) => trace!(
                            title = %params.title,
                            %label,
                            "button is not offered by this prompt"
                        ),
                        PromptEvent::Select(_) => {}
                    }
                }
                Some((generation, text, message)) = validations.live.next(), if !validations.live.is_empty() => {
                    if generation == priming {
                        continue;
                    }
                    if validations.is_current(generation) {
                        prompt.set_validation_message(message.as_deref());
                    } else {
                        trace!(title = %params.title, generation, %text, "discarding stale validation");
                    }
                }
                Some((generation, text, message)) = OptionFuture::from(accepting.as_mut()), if accepting.is_some() => {
                    accepting = None;
                    if message.is_none() {
                        return Ok(PromptOutcome::Value(text));
                    }
                    if validations.is_current(generation) {
                        prompt.set_validation_message(message.as_deref());
                    }
                    prompt.mark_ready();
                }
            }
        }
    }
}
