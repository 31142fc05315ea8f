use std::error::Error;
use std::fmt;

#[derive(Debug, Clone)]
pub enum ArmError {
    Configuration(String),
}

impl Error for ArmError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl fmt::Display for ArmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ArmError::Configuration(ref msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}
