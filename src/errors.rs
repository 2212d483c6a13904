use std::{
    error::Error,
    fmt::{Debug, Display},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd)]
pub enum SimErrorTypes {
    UnknownError,
    MathError,
    GeometryError,
    ConfigError,
    WorldError,
    RobotError,
    SupervisorError,
    CommandError,
}

impl Display for SimErrorTypes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SimErrorTypes::UnknownError => "UnknownError",
            SimErrorTypes::MathError => "MathError",
            SimErrorTypes::GeometryError => "GeometryError",
            SimErrorTypes::ConfigError => "ConfigError",
            SimErrorTypes::WorldError => "WorldError",
            SimErrorTypes::RobotError => "RobotError",
            SimErrorTypes::SupervisorError => "SupervisorError",
            SimErrorTypes::CommandError => "CommandError",
        };
        write!(f, "{}", name)
    }
}

#[derive(Clone)]
pub struct SimError {
    error_type: SimErrorTypes,
    what: String,
}

impl SimError {
    pub fn new(error_type: SimErrorTypes, what: String) -> Self {
        Self { error_type, what }
    }

    pub fn detailed_error(&self) -> String {
        format!("Simulation Error of type {}: {}", self.error_type, self.what)
    }

    pub fn error_type(&self) -> SimErrorTypes {
        self.error_type
    }

    pub fn what(&self) -> &str {
        &self.what
    }

    pub fn chain(self, what: String) -> Self {
        Self {
            error_type: self.error_type,
            what: format!("{}\n↪ {}", self.what, what),
        }
    }
}

impl Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Simulation Error: {}", self.error_type)
    }
}

impl Debug for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Simulation Error of type {}: {}", self.error_type, self.what)
    }
}

impl Error for SimError {}

pub type SimResult<T> = Result<T, SimError>;
