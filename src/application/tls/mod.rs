//! HTTPS enablement
//!
//! ## Structure
//!
//! - `state` - `TlsState` and input validation
//! - `options` - `TlsSettings`, `EnableHttpsOptions`, `EnableHttpsResult`
//! - `use_case` - `TlsIssuance` state machine and `EnableHttpsUseCase`

mod options;
mod state;
mod use_case;

pub use options::{EnableHttpsOptions, EnableHttpsResult, TlsSettings};
pub use state::{validate_domain, validate_email, TlsState};
pub use use_case::{EnableHttpsUseCase, TlsIssuance};
