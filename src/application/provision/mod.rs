//! Provision Module
//!
//! ## Structure
//!
//! - `options` - `ProvisionOptions`
//! - `result` - `ProvisionReport`
//! - `use_case` - `ProvisionUseCase`
//!
//! ## Usage
//!
//! ```ignore
//! use quickstack::application::provision::{ProvisionOptions, ProvisionUseCase};
//!
//! let use_case = ProvisionUseCase::new(&detector, &runner, &fs, &secrets, &prompt);
//! let report = use_case.execute(&ProvisionOptions::new(layout, "ec2-user"), &mut progress)?;
//! ```

mod options;
mod result;
mod use_case;

pub use options::ProvisionOptions;
pub use result::ProvisionReport;
pub use use_case::ProvisionUseCase;
