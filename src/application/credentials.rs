//! Credential manager
//!
//! Ensures every credential the profile needs exists in the store. Existing
//! values are never regenerated or overwritten; only missing names are
//! filled in, and the store is saved only when something was added.

use tracing::{debug, info};

use crate::config::CredentialsConfig;
use crate::domain::entities::{CredentialSet, CredentialSource, CredentialSpec};
use crate::domain::ports::CredentialStore;
use crate::domain::services::secrets::MIN_SECRET_LENGTH;
use crate::domain::services::SecretGenerator;
use crate::domain::value_objects::Profile;
use crate::error::{ProvisionError, ProvisionResult};

pub const ROOT_PASSWORD: &str = "MYSQL_ROOT_PASSWORD";
pub const DATABASE: &str = "MYSQL_DATABASE";
pub const DATABASE_USER: &str = "MYSQL_USER";
pub const USER_PASSWORD: &str = "MYSQL_PASSWORD";

/// Credentials a profile's topology references
pub fn credential_specs(profile: Profile, config: &CredentialsConfig) -> Vec<CredentialSpec> {
    if !profile.has_database() {
        return Vec::new();
    }
    vec![
        CredentialSpec::generated(ROOT_PASSWORD),
        CredentialSpec::fixed(DATABASE, config.database.as_str()),
        CredentialSpec::fixed(DATABASE_USER, config.user.as_str()),
        CredentialSpec::generated(USER_PASSWORD),
    ]
}

pub struct CredentialManager<S, G>
where
    S: CredentialStore,
    G: SecretGenerator,
{
    store: S,
    generator: G,
    secret_length: usize,
}

impl<S, G> CredentialManager<S, G>
where
    S: CredentialStore,
    G: SecretGenerator,
{
    pub fn new(store: S, generator: G, secret_length: usize) -> Self {
        Self {
            store,
            generator,
            secret_length,
        }
    }

    /// Load or create the store; return exactly the `specs` names.
    pub fn ensure_credentials(&self, specs: &[CredentialSpec]) -> ProvisionResult<CredentialSet> {
        if self.secret_length < MIN_SECRET_LENGTH {
            return Err(ProvisionError::InvalidConfig {
                file: self.store.location().to_path_buf(),
                message: format!(
                    "secret length must be at least {} (got {})",
                    MIN_SECRET_LENGTH, self.secret_length
                ),
            });
        }

        let existing = self.store.load()?;
        let created = existing.is_none();
        let mut set = existing.unwrap_or_default();

        let mut added = 0;
        for spec in specs {
            if set.contains(&spec.name) {
                debug!("Keeping existing {}", spec.name);
                continue;
            }
            let value = match &spec.source {
                CredentialSource::Generated => self.generator.generate(self.secret_length),
                CredentialSource::Fixed(value) => value.clone(),
            };
            set.insert_if_absent(spec.name.as_str(), value);
            added += 1;
        }

        if created || added > 0 {
            self.store.save(&set)?;
            info!(
                "Credential store {} written ({} new)",
                self.store.location().display(),
                added
            );
        } else {
            self.store.secure()?;
            info!(
                "Reusing credentials from {}",
                self.store.location().display()
            );
        }

        Ok(set.select(specs.iter().map(|s| s.name.as_str())))
    }

    /// Existing store contents without generating anything
    pub fn current(&self) -> ProvisionResult<Option<CredentialSet>> {
        self.store.load()
    }
}
