//! CredentialStore port - persistence of the credential set

use std::path::Path;

use crate::domain::entities::CredentialSet;
use crate::error::ProvisionResult;

/// Persists a `CredentialSet` owner-only
pub trait CredentialStore {
    /// Load the store; `Ok(None)` when it does not exist yet.
    ///
    /// A store that exists but cannot be parsed is `CredentialStoreCorrupt`.
    fn load(&self) -> ProvisionResult<Option<CredentialSet>>;

    /// Replace the store atomically with mode 0600
    fn save(&self, credentials: &CredentialSet) -> ProvisionResult<()>;

    /// Re-assert mode 0600 on an existing store
    fn secure(&self) -> ProvisionResult<()>;

    fn location(&self) -> &Path;
}
