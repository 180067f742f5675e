//! Operator Prompt Port
//!
//! Interactive questions asked when a value is not preset by flags, config
//! or environment.

use crate::domain::value_objects::Profile;
use crate::error::ProvisionResult;

/// Source of operator answers
///
/// Implementations:
/// - `DialoguerPrompt`: terminal prompts
/// - `NoPrompt`: non-interactive runs, every question is an error
pub trait OperatorPrompt {
    fn select_profile(&self, default: Profile) -> ProvisionResult<Profile>;

    fn input(&self, label: &str, default: Option<&str>) -> ProvisionResult<String>;

    fn confirm(&self, message: &str, default: bool) -> ProvisionResult<bool>;
}

/// Prompt used when no operator is present
pub struct NoPrompt;

impl OperatorPrompt for NoPrompt {
    fn select_profile(&self, default: Profile) -> ProvisionResult<Profile> {
        Ok(default)
    }

    fn input(&self, label: &str, _default: Option<&str>) -> ProvisionResult<String> {
        Err(crate::error::ProvisionError::InvalidInput {
            field: label.to_string(),
            message: "no value given and not running interactively".to_string(),
        })
    }

    fn confirm(&self, _message: &str, _default: bool) -> ProvisionResult<bool> {
        Ok(true)
    }
}
