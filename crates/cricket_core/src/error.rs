use std::fmt;

#[derive(Debug)]
pub enum MatchError {
    InvalidSetup(String),
    ScoringBlocked(String),
    InvalidEvent(String),
    NoSelectionPending,
    IneligibleSelection { name: String },
    SerializationError(String),
    DeserializationError(String),
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MatchError::InvalidSetup(msg) => {
                write!(f, "Invalid match setup: {}", msg)
            }
            MatchError::ScoringBlocked(msg) => {
                write!(f, "Scoring blocked: {}", msg)
            }
            MatchError::InvalidEvent(msg) => {
                write!(f, "Invalid scoring event: {}", msg)
            }
            MatchError::NoSelectionPending => {
                write!(f, "No player selection is pending")
            }
            MatchError::IneligibleSelection { name } => {
                write!(f, "Ineligible selection: {}", name)
            }
            MatchError::SerializationError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            MatchError::DeserializationError(msg) => {
                write!(f, "Deserialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for MatchError {}

impl From<serde_json::Error> for MatchError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() {
            MatchError::DeserializationError(err.to_string())
        } else {
            MatchError::SerializationError(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
