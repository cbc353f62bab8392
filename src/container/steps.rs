//! The five-step container metadata wizard:
//! OS, architecture, base image, tag, image name.

use std::sync::Arc;

use crate::config::ContainerizerConfig;
use crate::wizard::validate::{ImageName, ImageTag, NotEmpty};
use crate::wizard::{
    InputBoxParams, MultiStepInput, NeverResume, Next, PromptSurface, QuickPickParams,
    ShouldResume, Step, StepFuture, Validate, WizardError,
};

use super::state::{ContainerState, ARCHITECTURES, OPERATING_SYSTEMS};

pub const TITLE: &str = "Provide container metadata";
pub const TOTAL_STEPS: usize = 5;

/// Values the wizard pre-fills when the state has no answer yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardDefaults {
    pub base_image_name: String,
    pub image_tag: String,
}

impl From<&ContainerizerConfig> for WizardDefaults {
    fn from(config: &ContainerizerConfig) -> Self {
        Self {
            base_image_name: config.base_image_name.clone(),
            image_tag: config.image_tag.clone(),
        }
    }
}

struct Settings {
    defaults: WizardDefaults,
    should_resume: Arc<dyn ShouldResume>,
    base_image: Arc<dyn Validate>,
    tag: Arc<dyn Validate>,
    image_name: Arc<dyn Validate>,
}

/// Builds the steps of the container wizard. Cheap to clone.
#[derive(Clone)]
pub struct ContainerWizard {
    settings: Arc<Settings>,
}

type StepBody = for<'a> fn(
    ContainerWizard,
    &'a mut MultiStepInput,
    &'a mut ContainerState,
) -> StepFuture<'a, ContainerState>;

impl ContainerWizard {
    pub fn new(defaults: WizardDefaults) -> Self {
        Self::with_resume_policy(defaults, Arc::new(NeverResume))
    }

    /// Use `should_resume` to decide what dismissing a prompt means
    pub fn with_resume_policy(
        defaults: WizardDefaults,
        should_resume: Arc<dyn ShouldResume>,
    ) -> Self {
        Self {
            settings: Arc::new(Settings {
                defaults,
                should_resume,
                base_image: Arc::new(NotEmpty::new()),
                tag: Arc::new(ImageTag),
                image_name: Arc::new(ImageName),
            }),
        }
    }

    /// Run the wizard on `surface`, starting from `state`.
    ///
    /// Answers already in `state` become the pre-filled defaults.
    pub async fn collect(
        &self,
        surface: impl PromptSurface + 'static,
        mut state: ContainerState,
    ) -> Result<ContainerState, WizardError> {
        MultiStepInput::run(surface, self.first_step(), &mut state).await?;
        Ok(state)
    }

    pub fn first_step(&self) -> Step<ContainerState> {
        self.step("pick_os", Self::pick_os)
    }

    fn step(&self, name: &'static str, body: StepBody) -> Step<ContainerState> {
        let wizard = self.clone();
        Step::new(name, move |input, state| body(wizard.clone(), input, state))
    }

    fn pick_params(
        &self,
        step: usize,
        placeholder: &str,
        items: &[&str],
        active: Option<&String>,
    ) -> QuickPickParams {
        QuickPickParams {
            title: TITLE.to_string(),
            step,
            total_steps: TOTAL_STEPS,
            placeholder: placeholder.to_string(),
            items: items.iter().map(|item| (*item).to_string()).collect(),
            active_item: active.cloned(),
            buttons: Vec::new(),
            should_resume: Arc::clone(&self.settings.should_resume),
        }
    }

    fn input_params(
        &self,
        step: usize,
        value: String,
        prompt: &str,
        placeholder: Option<&str>,
        validate: &Arc<dyn Validate>,
    ) -> InputBoxParams {
        InputBoxParams {
            title: TITLE.to_string(),
            step,
            total_steps: TOTAL_STEPS,
            value,
            prompt: prompt.to_string(),
            placeholder: placeholder.map(str::to_string),
            buttons: Vec::new(),
            validate: Arc::clone(validate),
            should_resume: Arc::clone(&self.settings.should_resume),
        }
    }

    fn pick_os<'a>(
        self,
        input: &'a mut MultiStepInput,
        state: &'a mut ContainerState,
    ) -> StepFuture<'a, ContainerState> {
        Box::pin(async move {
            let params = self.pick_params(
                1,
                "Choose operating system",
                OPERATING_SYSTEMS,
                state.os.as_ref(),
            );
            let os = match input.show_quick_pick(params).await?.committed() {
                Ok(os) => os,
                Err(signal) => return Ok(signal.into()),
            };
            state.os = Some(os);
            Ok(Next::Step(self.step("pick_arch", Self::pick_arch)))
        })
    }

    fn pick_arch<'a>(
        self,
        input: &'a mut MultiStepInput,
        state: &'a mut ContainerState,
    ) -> StepFuture<'a, ContainerState> {
        Box::pin(async move {
            let params = self.pick_params(
                2,
                "Choose architecture",
                ARCHITECTURES,
                state.architecture.as_ref(),
            );
            let architecture = match input.show_quick_pick(params).await?.committed() {
                Ok(architecture) => architecture,
                Err(signal) => return Ok(signal.into()),
            };
            state.architecture = Some(architecture);
            Ok(Next::Step(self.step("input_base_image", Self::input_base_image)))
        })
    }

    fn input_base_image<'a>(
        self,
        input: &'a mut MultiStepInput,
        state: &'a mut ContainerState,
    ) -> StepFuture<'a, ContainerState> {
        Box::pin(async move {
            let value = answer_or(
                &state.container_base_image,
                &self.settings.defaults.base_image_name,
            );
            let params = self.input_params(
                3,
                value,
                "Provide a base container image URI",
                Some("e.g., mcr.microsoft.com/dotnet/aspnet:7.0"),
                &self.settings.base_image,
            );
            let image = match input.show_input_box(params).await?.committed() {
                Ok(image) => image,
                Err(signal) => return Ok(signal.into()),
            };
            state.container_base_image = Some(image);
            Ok(Next::Step(self.step("input_tag", Self::input_tag)))
        })
    }

    fn input_tag<'a>(
        self,
        input: &'a mut MultiStepInput,
        state: &'a mut ContainerState,
    ) -> StepFuture<'a, ContainerState> {
        Box::pin(async move {
            let value = answer_or(&state.tag, &self.settings.defaults.image_tag);
            let params = self.input_params(
                4,
                value,
                "Provide a tag for the container image",
                Some("latest"),
                &self.settings.tag,
            );
            let tag = match input.show_input_box(params).await?.committed() {
                Ok(tag) => tag,
                Err(signal) => return Ok(signal.into()),
            };
            state.tag = Some(tag);
            Ok(Next::Step(self.step("input_image_name", Self::input_image_name)))
        })
    }

    fn input_image_name<'a>(
        self,
        input: &'a mut MultiStepInput,
        state: &'a mut ContainerState,
    ) -> StepFuture<'a, ContainerState> {
        Box::pin(async move {
            let value = state.image_name.clone().unwrap_or_default();
            let params = self.input_params(
                5,
                value,
                "Provide a name for container image",
                None,
                &self.settings.image_name,
            );
            let name = match input.show_input_box(params).await?.committed() {
                Ok(name) => name,
                Err(signal) => return Ok(signal.into()),
            };
            state.image_name = Some(name);
            Ok(Next::Done)
        })
    }
}

/// Earlier answer if there is a non-empty one, otherwise the configured default
fn answer_or(answer: &Option<String>, default: &str) -> String {
    answer
        .as_deref()
        .filter(|value| !value.is_empty())
        .unwrap_or(default)
        .to_string()
}
