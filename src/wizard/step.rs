//! Steps: the units of work the sequencer chains together.

use std::fmt;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use super::flow::{FlowSignal, WizardError};
use super::sequencer::MultiStepInput;

/// Future returned by a step body
pub type StepFuture<'a, S> = BoxFuture<'a, Result<Next<S>, WizardError>>;

type StepFn<S> =
    dyn for<'a> Fn(&'a mut MultiStepInput, &'a mut S) -> StepFuture<'a, S> + Send + Sync;

/// What the sequencer should do after a step finished
pub enum Next<S> {
    /// Continue with another step
    Step(Step<S>),
    /// The wizard is complete
    Done,
    /// The step's prompt ended in navigation instead of a value
    Flow(FlowSignal),
}

impl<S> From<FlowSignal> for Next<S> {
    fn from(signal: FlowSignal) -> Self {
        Next::Flow(signal)
    }
}

impl<S> From<Step<S>> for Next<S> {
    fn from(step: Step<S>) -> Self {
        Next::Step(step)
    }
}

impl<S> fmt::Debug for Next<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Next::Step(step) => f.debug_tuple("Step").field(step).finish(),
            Next::Done => f.write_str("Done"),
            Next::Flow(signal) => f.debug_tuple("Flow").field(signal).finish(),
        }
    }
}

/// A re-runnable async step over wizard state `S`.
///
/// Steps are cloned onto the sequencer's stack so that Back and Resume can
/// run them again.
pub struct Step<S> {
    name: &'static str,
    run: Arc<StepFn<S>>,
}

impl<S> Step<S> {
    pub fn new<F>(name: &'static str, run: F) -> Self
    where
        F: for<'a> Fn(&'a mut MultiStepInput, &'a mut S) -> StepFuture<'a, S>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name,
            run: Arc::new(run),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn call<'a>(
        &self,
        input: &'a mut MultiStepInput,
        state: &'a mut S,
    ) -> StepFuture<'a, S> {
        (self.run)(input, state)
    }
}

impl<S> Clone for Step<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            run: Arc::clone(&self.run),
        }
    }
}

impl<S> fmt::Debug for Step<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step").field("name", &self.name).finish()
    }
}
