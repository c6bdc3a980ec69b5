use std::fmt;
use std::error::Error;

/// Represents errors that can occur while building or stepping a particle simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Indicates an invalid particle radius (non-finite, zero or negative).
    InvalidRadius,
    /// Indicates an invalid time step (non-finite, zero or negative).
    InvalidTimeStep,
    /// Indicates an invalid coefficient; the payload names the offending field.
    InvalidCoefficient(&'static str),
    /// Indicates an invalid uniform grid cell size.
    InvalidCellSize,
    /// Indicates a simulation boundary whose minimum is not strictly below its maximum.
    InvalidBoundary,
    /// The particle store could not grow to the requested capacity.
    AllocationFailed { requested: usize },
    /// A general error for calculations that produce invalid results.
    CalculationError(String),
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PhysicsError::InvalidRadius => write!(f, "Invalid radius value"),
            PhysicsError::InvalidTimeStep => write!(f, "Invalid time step value"),
            PhysicsError::InvalidCoefficient(name) => write!(f, "Invalid coefficient value: {}", name),
            PhysicsError::InvalidCellSize => write!(f, "Invalid grid cell size"),
            PhysicsError::InvalidBoundary => write!(f, "Invalid simulation boundary"),
            PhysicsError::AllocationFailed { requested } => {
                write!(f, "Allocation failed while reserving {} particles", requested)
            }
            PhysicsError::CalculationError(msg) => write!(f, "Calculation error: {}", msg),
        }
    }
}


impl Error for PhysicsError {}
