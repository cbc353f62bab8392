//! Answers collected by the container wizard

use serde::Serialize;

pub const OPERATING_SYSTEMS: &[&str] = &["linux", "windows"];
pub const ARCHITECTURES: &[&str] = &["x64", "x86"];

/// Partially filled answers; each wizard step owns one field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerState {
    pub os: Option<String>,
    pub architecture: Option<String>,
    pub container_base_image: Option<String>,
    pub tag: Option<String>,
    pub image_name: Option<String>,
}

/// Complete answers, ready to build commands from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSpec {
    pub os: String,
    pub architecture: String,
    pub container_base_image: String,
    pub tag: String,
    pub image_name: String,
}

impl ContainerState {
    /// `None` when the wizard was cancelled before every field was answered
    pub fn finish(&self) -> Option<ContainerSpec> {
        Some(ContainerSpec {
            os: self.os.clone()?,
            architecture: self.architecture.clone()?,
            container_base_image: self.container_base_image.clone()?,
            tag: self.tag.clone()?,
            image_name: self.image_name.clone()?,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.finish().is_some()
    }
}
