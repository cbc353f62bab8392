//! Step sequencer: runs a chain of steps and interprets navigation.

use tracing::{debug, error};

use super::flow::{FlowSignal, WizardError};
use super::step::{Next, Step};
use super::surface::{ActivePrompt, PromptEvents, PromptSurface, PromptWidget};

/// Drives a multi-step input flow over a [`PromptSurface`].
///
/// Holds the single displayed prompt. Each prompt adapter replaces it, which
/// disposes the previous one; leaving [`MultiStepInput::run`] on any path
/// disposes the last one.
pub struct MultiStepInput {
    surface: Box<dyn PromptSurface>,
    current: Option<ActivePrompt>,
    /// Number of entries on the step stack while the current step runs
    depth: usize,
}

impl MultiStepInput {
    /// Run the wizard from `start` until a step completes it, the user
    /// cancels, or a step fails.
    ///
    /// Returns `Ok(())` for both completion and cancellation; callers tell
    /// them apart by looking at `state`.
    pub async fn run<S, P>(surface: P, start: Step<S>, state: &mut S) -> Result<(), WizardError>
    where
        S: Send,
        P: PromptSurface + 'static,
    {
        let mut input = MultiStepInput {
            surface: Box::new(surface),
            current: None,
            depth: 0,
        };
        input.step_through(start, state).await
    }

    async fn step_through<S: Send>(
        &mut self,
        start: Step<S>,
        state: &mut S,
    ) -> Result<(), WizardError> {
        let mut steps: Vec<Step<S>> = Vec::new();
        let mut next = Some(start);

        while let Some(step) = next.take() {
            steps.push(step.clone());
            self.depth = steps.len();
            if let Some(prompt) = self.current.as_mut() {
                prompt.mark_processing();
            }

            debug!(step = step.name(), depth = self.depth, "entering step");
            next = match step.call(self, state).await {
                Ok(Next::Step(following)) => Some(following),
                Ok(Next::Done) => {
                    debug!(step = step.name(), "wizard complete");
                    None
                }
                Ok(Next::Flow(signal)) => {
                    debug!(step = step.name(), ?signal, "navigation signal");
                    rewind(&mut steps, signal)
                }
                Err(err) => {
                    error!(step = step.name(), error = %err, "wizard step failed");
                    return Err(err);
                }
            };
        }

        self.current = None;
        Ok(())
    }

    /// Steps entered so far, including the one running now
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether the running step may offer a back button
    pub(crate) fn can_go_back(&self) -> bool {
        self.depth > 1
    }

    pub(crate) fn surface(&mut self) -> &mut dyn PromptSurface {
        self.surface.as_mut()
    }

    /// Make `widget` the displayed prompt.
    ///
    /// The listener is registered before the previous prompt is disposed and
    /// the new one shown, so no early event is lost.
    pub(crate) fn install(
        &mut self,
        widget: Box<dyn PromptWidget>,
    ) -> (&mut ActivePrompt, PromptEvents) {
        let mut prompt = ActivePrompt::new(widget);
        let events = prompt.listen();
        self.current = None;
        let prompt = self.current.insert(prompt);
        prompt.show();
        (prompt, events)
    }
}

/// Pick the step to run after a navigation signal.
///
/// Back from the first step has nothing to rewind to, so that step runs again.
fn rewind<S>(steps: &mut Vec<Step<S>>, signal: FlowSignal) -> Option<Step<S>> {
    match signal {
        FlowSignal::Back => {
            let abandoned = steps.pop();
            if steps.is_empty() {
                abandoned
            } else {
                steps.pop()
            }
        }
        FlowSignal::Resume => steps.pop(),
        FlowSignal::Cancel => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::flow::NeverResume;
    use crate::wizard::mock::{MockAction, MockCall, Scripted, ScriptedSurface};
    use crate::wizard::quick_pick::QuickPickParams;
    use std::sync::Arc;

    fn named(name: &'static str) -> Step<Vec<&'static str>> {
        Step::new(name, move |_input, trace: &mut Vec<&'static str>| {
            Box::pin(async move {
                trace.push(name);
                Ok(Next::Done)
            })
        })
    }

    fn names(steps: &[Step<Vec<&'static str>>]) -> Vec<&'static str> {
        steps.iter().map(Step::name).collect()
    }

    #[test]
    fn test_rewind_back_pops_twice() {
        let mut steps = vec![named("a"), named("b"), named("c")];
        let next = rewind(&mut steps, FlowSignal::Back);
        assert_eq!(next.map(|s| s.name()), Some("b"));
        assert_eq!(names(&steps), vec!["a"]);
    }

    #[test]
    fn test_rewind_back_from_first_step_reruns_it() {
        let mut steps = vec![named("a")];
        let next = rewind(&mut steps, FlowSignal::Back);
        assert_eq!(next.map(|s| s.name()), Some("a"));
        assert!(steps.is_empty());
    }

    #[test]
    fn test_rewind_resume_pops_once() {
        let mut steps = vec![named("a"), named("b")];
        let next = rewind(&mut steps, FlowSignal::Resume);
        assert_eq!(next.map(|s| s.name()), Some("b"));
        assert_eq!(names(&steps), vec!["a"]);
    }

    #[test]
    fn test_rewind_cancel_stops() {
        let mut steps = vec![named("a"), named("b")];
        assert!(rewind(&mut steps, FlowSignal::Cancel).is_none());
        assert_eq!(names(&steps), vec!["a", "b"]);
    }

    fn chain(name: &'static str, then: Option<fn() -> Step<Vec<&'static str>>>) -> Step<Vec<&'static str>> {
        Step::new(name, move |_input, trace: &mut Vec<&'static str>| {
            Box::pin(async move {
                trace.push(name);
                Ok(match then {
                    Some(next) => Next::Step(next()),
                    None => Next::Done,
                })
            })
        })
    }

    fn third() -> Step<Vec<&'static str>> {
        chain("third", None)
    }

    fn second() -> Step<Vec<&'static str>> {
        chain("second", Some(third))
    }

    #[tokio::test]
    async fn test_run_visits_steps_in_returned_order() {
        let mut trace = Vec::new();
        MultiStepInput::run(ScriptedSurface::new(), chain("first", Some(second)), &mut trace)
            .await
            .unwrap();
        assert_eq!(trace, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_back_on_first_step_is_guarded() {
        let mut trace = Vec::new();
        let step = Step::new("only", |input: &mut MultiStepInput, trace: &mut Vec<&'static str>| {
            Box::pin(async move {
                assert_eq!(input.depth(), 1);
                trace.push("only");
                Ok(if trace.len() == 1 {
                    Next::Flow(FlowSignal::Back)
                } else {
                    Next::Done
                })
            })
        });
        MultiStepInput::run(ScriptedSurface::new(), step, &mut trace)
            .await
            .unwrap();
        assert_eq!(trace, vec!["only", "only"]);
    }

    #[tokio::test]
    async fn test_cancel_keeps_state() {
        let mut trace = Vec::new();
        let step = Step::new("cancel", |_input, trace: &mut Vec<&'static str>| {
            Box::pin(async move {
                trace.push("partial");
                Ok(Next::Flow(FlowSignal::Cancel))
            })
        });
        MultiStepInput::run(ScriptedSurface::new(), step, &mut trace)
            .await
            .unwrap();
        assert_eq!(trace, vec!["partial"]);
    }

    #[tokio::test]
    async fn test_step_error_propagates() {
        let mut trace: Vec<&'static str> = Vec::new();
        let step = Step::new("broken", |_input, _trace: &mut Vec<&'static str>| {
            Box::pin(async move {
                Err::<Next<Vec<&'static str>>, _>(WizardError::InvalidPrompt {
                    title: "broken".to_string(),
                    reason: "no items".to_string(),
                })
            })
        });
        let err = MultiStepInput::run(ScriptedSurface::new(), step, &mut trace)
            .await
            .unwrap_err();
        assert!(matches!(err, WizardError::InvalidPrompt { .. }));
    }

    fn pick(placeholder: &'static str, last: bool) -> Step<Vec<String>> {
        Step::new(placeholder, move |input, picked: &mut Vec<String>| {
            Box::pin(async move {
                let params = QuickPickParams {
                    title: "Pick".to_string(),
                    step: picked.len() + 1,
                    total_steps: 2,
                    placeholder: placeholder.to_string(),
                    items: vec!["linux".to_string(), "windows".to_string()],
                    active_item: None,
                    buttons: Vec::new(),
                    should_resume: Arc::new(NeverResume),
                };
                let value = match input.show_quick_pick(params).await?.committed() {
                    Ok(value) => value,
                    Err(signal) => return Ok(signal.into()),
                };
                picked.push(value);
                Ok(if last {
                    Next::Done
                } else {
                    Next::Step(pick("second", true))
                })
            })
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_previous_prompt_is_busy_then_replaced() {
        let surface = ScriptedSurface::new()
            .with_prompt([Scripted::select("linux")])
            .with_prompt([Scripted::select("windows")]);
        let mut picked = Vec::new();

        MultiStepInput::run(surface.clone(), pick("first", false), &mut picked)
            .await
            .unwrap();

        assert_eq!(picked, vec!["linux", "windows"]);
        let calls = surface.calls();
        let position = |prompt: usize, wanted: fn(&MockAction) -> bool| {
            calls
                .iter()
                .position(|call: &MockCall| call.prompt == prompt && wanted(&call.action))
                .unwrap()
        };
        let disabled = position(0, |a| *a == MockAction::Enabled(false));
        let busy = position(0, |a| *a == MockAction::Busy(true));
        let created = position(1, |a| matches!(a, MockAction::CreateQuickPick(_)));
        let disposed = position(0, |a| *a == MockAction::Dispose);
        let shown = position(1, |a| *a == MockAction::Show);

        assert!(disabled < busy);
        assert!(busy < created);
        assert!(created < disposed);
        assert!(disposed < shown);
        // The last prompt is disposed when the run ends
        assert_eq!(surface.actions_for(1).last(), Some(&MockAction::Dispose));
    }
}
