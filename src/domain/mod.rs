//! Domain Layer
//!
//! Provisioning decisions without I/O.
//!
//! ## Structure
//!
//! - `entities/` - CredentialSet, Topology
//! - `value_objects/` - EnvironmentDescriptor, Architecture, Profile
//! - `services/` - install plan selection, template rendering, compose patching
//! - `ports/` - command runner, file system, credential store, event sink
//!
//! Everything here is a pure function of its inputs; processes and files are
//! reached only through `ports`.

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
