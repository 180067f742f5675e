//! EnvironmentSource port - where the machine identity comes from

use crate::domain::value_objects::EnvironmentDescriptor;

/// Produces the descriptor once per run; detection never fails
pub trait EnvironmentSource {
    fn detect(&self) -> EnvironmentDescriptor;
}

/// A fixed descriptor, for replays and tests
impl EnvironmentSource for EnvironmentDescriptor {
    fn detect(&self) -> EnvironmentDescriptor {
        self.clone()
    }
}
