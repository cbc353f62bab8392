//! Domain-agnostic multi-step input wizard.
//!
//! A wizard is a chain of [`Step`]s run by [`MultiStepInput::run`]. Each
//! step shows one prompt (a pick list or a validated input box), writes the
//! committed answer into the caller's state and names the step to run next.
//! Back, Resume and Cancel come back from prompts as [`PromptOutcome`]
//! variants and are handled by the sequencer.

mod flow;
mod input_box;
pub mod mock;
mod quick_pick;
mod sequencer;
mod step;
mod surface;
pub mod validate;

pub use flow::{AlwaysResume, FlowSignal, NeverResume, PromptOutcome, ShouldResume, WizardError};
pub use input_box::InputBoxParams;
pub use quick_pick::QuickPickParams;
pub use sequencer::MultiStepInput;
pub use step::{Next, Step, StepFuture};
pub use surface::{
    ActivePrompt, InputBoxView, PromptEvent, PromptEvents, PromptSurface, PromptWidget,
    QuickPickView,
};
pub use validate::Validate;
