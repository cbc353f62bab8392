//! Input validators for text prompts.
//!
//! A validator returns `None` when the candidate is acceptable and
//! `Some(message)` otherwise. Validation may be asynchronous.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

pub const MUST_NOT_BE_EMPTY: &str = "Must not be empty";
pub const INVALID_IMAGE_NAME: &str = "Must be a lowercase image name";
pub const INVALID_IMAGE_TAG: &str =
    "Must be a valid tag (letters, digits, '_', '.', '-'; at most 128 characters)";

/// Docker repository name: lowercase path components separated by `/`
static IMAGE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*(?:/[a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*)*$")
        .expect("image name pattern is valid")
});

static IMAGE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}$").expect("tag pattern is valid"));

#[async_trait]
pub trait Validate: Send + Sync {
    async fn validate(&self, candidate: &str) -> Option<String>;
}

#[async_trait]
impl<F, Fut> Validate for F
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Option<String>> + Send,
{
    async fn validate(&self, candidate: &str) -> Option<String> {
        self(candidate.to_string()).await
    }
}

/// Rejects the empty string
#[derive(Debug, Clone, Default)]
pub struct NotEmpty {
    delay: Option<Duration>,
}

impl NotEmpty {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer only after `delay`, like a validator backed by a slow lookup
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay: Some(delay) }
    }
}

#[async_trait]
impl Validate for NotEmpty {
    async fn validate(&self, candidate: &str) -> Option<String> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if candidate.is_empty() {
            Some(MUST_NOT_BE_EMPTY.to_string())
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageName;

#[async_trait]
impl Validate for ImageName {
    async fn validate(&self, candidate: &str) -> Option<String> {
        if candidate.is_empty() {
            Some(MUST_NOT_BE_EMPTY.to_string())
        } else if !IMAGE_NAME.is_match(candidate) {
            Some(INVALID_IMAGE_NAME.to_string())
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageTag;

#[async_trait]
impl Validate for ImageTag {
    async fn validate(&self, candidate: &str) -> Option<String> {
        if candidate.is_empty() {
            Some(MUST_NOT_BE_EMPTY.to_string())
        } else if !IMAGE_TAG.is_match(candidate) {
            Some(INVALID_IMAGE_TAG.to_string())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_not_empty() {
        let validator = NotEmpty::new();
        assert_eq!(
            validator.validate("").await.as_deref(),
            Some(MUST_NOT_BE_EMPTY)
        );
        assert_eq!(validator.validate("latest").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_empty_with_delay_waits() {
        let validator = NotEmpty::with_delay(Duration::from_secs(1));
        let started = tokio::time::Instant::now();
        assert!(validator.validate("").await.is_some());
        assert!(started.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_image_name() {
        for good in ["myapp", "team/my-app", "my_app", "a.b/c__d"] {
            assert_eq!(ImageName.validate(good).await, None, "{good}");
        }
        assert_eq!(
            ImageName.validate("").await.as_deref(),
            Some(MUST_NOT_BE_EMPTY)
        );
        for bad in ["MyApp", "-app", "app/", "my app"] {
            assert_eq!(
                ImageName.validate(bad).await.as_deref(),
                Some(INVALID_IMAGE_NAME),
                "{bad}"
            );
        }
    }

    #[tokio::test]
    async fn test_image_tag() {
        assert_eq!(ImageTag.validate("latest").await, None);
        assert_eq!(ImageTag.validate("1.0.0-rc_1").await, None);
        assert_eq!(
            ImageTag.validate(".hidden").await.as_deref(),
            Some(INVALID_IMAGE_TAG)
        );
        assert_eq!(
            ImageTag.validate(&"a".repeat(129)).await.as_deref(),
            Some(INVALID_IMAGE_TAG)
        );
    }

    #[tokio::test]
    async fn test_closure_validator() {
        let validator = |text: String| async move {
            (text.len() < 3).then(|| "Too short".to_string())
        };
        assert_eq!(validator.validate("ab").await.as_deref(), Some("Too short"));
        assert_eq!(validator.validate("abc").await, None);
    }
}
