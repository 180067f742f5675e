//! Property tests for the credential manager.

use proptest::prelude::*;

use quickstack::application::credentials::{credential_specs, CredentialManager};
use quickstack::config::CredentialsConfig;
use quickstack::domain::services::secrets::SECRET_ALPHABET;
use quickstack::domain::services::OsSecretGenerator;
use quickstack::domain::value_objects::Profile;
use quickstack::infrastructure::{DotenvCredentialStore, LocalFs};
use tempfile::TempDir;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 32,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: once written, the store never changes across runs.
    #[test]
    fn property_credentials_are_write_once(
        lengths in proptest::collection::vec(16usize..64, 1..5),
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        let specs = credential_specs(Profile::Dynamic, &CredentialsConfig::default());

        let first = CredentialManager::new(
            DotenvCredentialStore::new(LocalFs, &path),
            OsSecretGenerator,
            lengths[0],
        )
        .ensure_credentials(&specs)
        .unwrap();
        let on_disk = std::fs::read(&path).unwrap();

        for len in &lengths[1..] {
            let again = CredentialManager::new(
                DotenvCredentialStore::new(LocalFs, &path),
                OsSecretGenerator,
                *len,
            )
            .ensure_credentials(&specs)
            .unwrap();
            prop_assert_eq!(&again, &first);
            prop_assert_eq!(std::fs::read(&path).unwrap(), on_disk.clone());
        }
    }

    /// PROPERTY: generated secrets have the requested length and alphabet.
    #[test]
    fn property_generated_secrets_are_well_formed(len in 16usize..96) {
        let dir = TempDir::new().unwrap();
        let specs = credential_specs(Profile::Dynamic, &CredentialsConfig::default());
        let set = CredentialManager::new(
            DotenvCredentialStore::new(LocalFs, dir.path().join(".env")),
            OsSecretGenerator,
            len,
        )
        .ensure_credentials(&specs)
        .unwrap();

        for name in ["MYSQL_ROOT_PASSWORD", "MYSQL_PASSWORD"] {
            let secret = set.get(name).unwrap();
            prop_assert_eq!(secret.len(), len);
            prop_assert!(secret.bytes().all(|b| SECRET_ALPHABET.contains(&b)));
        }
        prop_assert_ne!(set.get("MYSQL_ROOT_PASSWORD"), set.get("MYSQL_PASSWORD"));
    }
}
