//! Domain Entities
//!
//! - `CredentialSet` - persisted secrets, append-only across runs
//! - `Topology` - services, volumes and published ports

mod credentials;
mod topology;

pub use credentials::{CredentialSet, CredentialSource, CredentialSpec, ParseError};
pub use topology::{PortBinding, Service, Topology};
