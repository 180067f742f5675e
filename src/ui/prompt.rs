//! Terminal prompts via dialoguer

use dialoguer::{Confirm, Input, Select};

use crate::domain::ports::OperatorPrompt;
use crate::domain::value_objects::Profile;
use crate::error::{ProvisionError, ProvisionResult};

pub struct DialoguerPrompt;

fn interaction_error(err: dialoguer::Error) -> ProvisionError {
    match err {
        dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted => {
            ProvisionError::Aborted
        }
        dialoguer::Error::IO(io) => ProvisionError::Io(io),
        #[allow(unreachable_patterns)]
        other => ProvisionError::Io(std::io::Error::other(other.to_string())),
    }
}

impl OperatorPrompt for DialoguerPrompt {
    fn select_profile(&self, default: Profile) -> ProvisionResult<Profile> {
        let items: Vec<String> = Profile::ALL
            .iter()
            .map(|p| format!("{:<7} {}", p.name(), p.display_name()))
            .collect();
        let default_idx = Profile::ALL.iter().position(|p| *p == default).unwrap_or(0);
        let choice = Select::new()
            .with_prompt("Choose server purpose")
            .items(&items)
            .default(default_idx)
            .interact_opt()
            .map_err(interaction_error)?;
        match choice {
            Some(idx) => Ok(Profile::ALL[idx]),
            None => Err(ProvisionError::Aborted),
        }
    }

    fn input(&self, label: &str, default: Option<&str>) -> ProvisionResult<String> {
        let mut input = Input::<String>::new().with_prompt(label);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        input.interact_text().map_err(interaction_error)
    }

    fn confirm(&self, message: &str, default: bool) -> ProvisionResult<bool> {
        Confirm::new()
            .with_prompt(message)
            .default(default)
            .interact_opt()
            .map_err(interaction_error)
            .map(|answer| answer.unwrap_or(false))
    }
}
