//! Domain Value Objects
//!
//! Immutable value types captured once per run and passed by value.

mod architecture;
mod environment;
mod profile;

pub use architecture::Architecture;
pub use environment::EnvironmentDescriptor;
pub use profile::Profile;
