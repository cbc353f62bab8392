//! Flow-control outcomes shared by the sequencer and the prompt adapters.

use std::future::Future;

use async_trait::async_trait;
use thiserror::Error;

/// Navigation outcome of a prompt that did not commit a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowSignal {
    /// Rewind to the previous step
    Back,
    /// Stop the wizard, keeping whatever was collected
    Cancel,
    /// Re-run the step whose prompt was interrupted
    Resume,
}

/// Result of a single prompt interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome<T> {
    Value(T),
    Back,
    Cancel,
    Resume,
    /// One of the prompt's extra buttons was triggered; carries its label
    Button(String),
}

impl<T> PromptOutcome<T> {
    /// Split into the committed value or the flow signal that replaced it.
    ///
    /// A button the caller does not handle here re-runs the step.
    ///
    /// Steps typically write:
    ///
    /// ```ignore
    /// let os = match input.show_quick_pick(params).await?.committed() {
    ///     Ok(os) => os,
    ///     Err(signal) => return Ok(signal.into()),
    /// };
    /// ```
    pub fn committed(self) -> Result<T, FlowSignal> {
        match self {
            PromptOutcome::Value(value) => Ok(value),
            PromptOutcome::Back => Err(FlowSignal::Back),
            PromptOutcome::Cancel => Err(FlowSignal::Cancel),
            PromptOutcome::Resume | PromptOutcome::Button(_) => Err(FlowSignal::Resume),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PromptOutcome<U> {
        match self {
            PromptOutcome::Value(value) => PromptOutcome::Value(f(value)),
            PromptOutcome::Back => PromptOutcome::Back,
            PromptOutcome::Cancel => PromptOutcome::Cancel,
            PromptOutcome::Resume => PromptOutcome::Resume,
            PromptOutcome::Button(label) => PromptOutcome::Button(label),
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, PromptOutcome::Value(_))
    }
}

impl<T> From<FlowSignal> for PromptOutcome<T> {
    fn from(signal: FlowSignal) -> Self {
        match signal {
            FlowSignal::Back => PromptOutcome::Back,
            FlowSignal::Cancel => PromptOutcome::Cancel,
            FlowSignal::Resume => PromptOutcome::Resume,
        }
    }
}

/// Fatal wizard failures. Navigation never ends up here.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("prompt surface stopped delivering events for '{0}'")]
    SurfaceClosed(String),

    #[error("invalid prompt '{title}': {reason}")]
    InvalidPrompt { title: String, reason: String },

    #[error("prompt surface failed: {0}")]
    Surface(#[from] std::io::Error),
}

/// Decides what a dismissed prompt means: `true` resumes the step, `false` cancels.
#[async_trait]
pub trait ShouldResume: Send + Sync {
    async fn should_resume(&self) -> bool;
}

#[async_trait]
impl<F, Fut> ShouldResume for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = bool> + Send,
{
    async fn should_resume(&self) -> bool {
        self().await
    }
}

/// Dismissal always cancels the wizard.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverResume;

#[async_trait]
impl ShouldResume for NeverResume {
    async fn should_resume(&self) -> bool {
        false
    }
}

/// Dismissal always re-runs the interrupted step.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysResume;

#[async_trait]
impl ShouldResume for AlwaysResume {
    async fn should_resume(&self) -> bool {
        true
    }
}

/// Map a dismissal to the matching outcome.
pub(crate) async fn dismissed<T>(policy: &dyn ShouldResume) -> PromptOutcome<T> {
    if policy.should_resume().await {
        PromptOutcome::Resume
    } else {
        PromptOutcome::Cancel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_committed_value() {
        let outcome = PromptOutcome::Value("linux".to_string());
        assert_eq!(outcome.committed(), Ok("linux".to_string()));
    }

    #[test]
    fn test_committed_signals() {
        assert_eq!(
            PromptOutcome::<String>::Back.committed(),
            Err(FlowSignal::Back)
        );
        assert_eq!(
            PromptOutcome::<String>::Cancel.committed(),
            Err(FlowSignal::Cancel)
        );
        assert_eq!(
            PromptOutcome::<String>::Resume.committed(),
            Err(FlowSignal::Resume)
        );
    }

    #[test]
    fn test_unhandled_button_reruns_step() {
        let outcome = PromptOutcome::<String>::Button("Refresh".to_string());
        assert_eq!(outcome.clone().committed(), Err(FlowSignal::Resume));
        assert_eq!(
            outcome.map(|v| v.len()),
            PromptOutcome::Button("Refresh".to_string())
        );
    }

    #[test]
    fn test_signal_into_outcome() {
        let outcome: PromptOutcome<u8> = FlowSignal::Resume.into();
        assert_eq!(outcome, PromptOutcome::Resume);
        assert!(!outcome.is_value());
    }

    #[test]
    fn test_map_keeps_signals() {
        assert_eq!(PromptOutcome::Value(2).map(|v| v * 2), PromptOutcome::Value(4));
        assert_eq!(PromptOutcome::<u8>::Cancel.map(|v| v * 2), PromptOutcome::Cancel);
    }

    #[tokio::test]
    async fn test_dismissed_follows_policy() {
        assert_eq!(dismissed::<()>(&NeverResume).await, PromptOutcome::Cancel);
        assert_eq!(dismissed::<()>(&AlwaysResume).await, PromptOutcome::Resume);

        let policy = || async { true };
        assert_eq!(dismissed::<()>(&policy).await, PromptOutcome::Resume);
    }
}
