//! Terminal concerns: capability detection, spinner, prompts

pub mod prompt;
pub mod spinner;
pub mod terminal;

pub use prompt::DialoguerPrompt;
pub use spinner::{Spinner, SpinnerHandle};
pub use terminal::{detect_capabilities, TerminalCapabilities};
