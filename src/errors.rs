use std::fmt;

/// Main error type for the skirmish battle core
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A combatant definition failed validation
    Definition(DefinitionError),
    /// A battle could not be set up from the supplied rosters and settings
    Setup(SetupError),
    /// A battle configuration file could not be read or parsed
    Config(ConfigError),
}

/// Errors raised when turning a static definition into a runtime combatant
#[derive(Debug, Clone, PartialEq)]
pub enum DefinitionError {
    /// Max HP must be strictly positive
    NonPositiveMaxHp { id: String, hp: i32 },
    /// ATK, DEF and SPD may not be negative
    NegativeStat { id: String, stat: &'static str, value: i32 },
    /// Basic hit range is empty after clamping the minimum to one
    InvalidHitRange { id: String, min: i32, max: i32 },
    /// Crit rate outside `[0, 100]`
    CritRateOutOfRange { id: String, value: f64 },
    /// Crit damage outside `[100, 300]`
    CritDamageOutOfRange { id: String, value: f64 },
    /// Ultimate cost or cooldown is negative
    InvalidUltimate { id: String, details: String },
    /// Threshold trigger without a ratio in `(0, 1]`
    InvalidPassiveThreshold { id: String, threshold: Option<f64> },
}

/// Errors related to assembling a battle
#[derive(Debug, Clone, PartialEq)]
pub enum SetupError {
    /// Energy settings are inconsistent
    InvalidEnergyConfig(String),
    /// Two combatants on the field share an id
    DuplicateId(String),
}

/// Errors related to loading battle configuration files
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Definition(err) => write!(f, "Definition error: {}", err),
            EngineError::Setup(err) => write!(f, "Setup error: {}", err),
            EngineError::Config(err) => write!(f, "Config error: {}", err),
        }
    }
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefinitionError::NonPositiveMaxHp { id, hp } => {
                write!(f, "{}: max HP must be positive, got {}", id, hp)
            }
            DefinitionError::NegativeStat { id, stat, value } => {
                write!(f, "{}: {} may not be negative, got {}", id, stat, value)
            }
            DefinitionError::InvalidHitRange { id, min, max } => {
                write!(f, "{}: hit range {}..={} is empty", id, min, max)
            }
            DefinitionError::CritRateOutOfRange { id, value } => {
                write!(f, "{}: crit rate {} outside [0, 100]", id, value)
            }
            DefinitionError::CritDamageOutOfRange { id, value } => {
                write!(f, "{}: crit damage {} outside [100, 300]", id, value)
            }
            DefinitionError::InvalidUltimate { id, details } => {
                write!(f, "{}: invalid ultimate: {}", id, details)
            }
            DefinitionError::InvalidPassiveThreshold { id, threshold } => {
                write!(f, "{}: passive threshold {:?} outside (0, 1]", id, threshold)
            }
        }
    }
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::InvalidEnergyConfig(details) => {
                write!(f, "Invalid energy config: {}", details)
            }
            SetupError::DuplicateId(id) => write!(f, "Duplicate combatant id: {}", id),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(details) => write!(f, "Failed to read config file: {}", details),
            ConfigError::Parse(details) => write!(f, "Failed to parse RON: {}", details),
            ConfigError::Invalid(details) => write!(f, "Invalid config: {}", details),
        }
    }
}

impl std::error::Error for EngineError {}
impl std::error::Error for DefinitionError {}
impl std::error::Error for SetupError {}
impl std::error::Error for ConfigError {}

impl From<DefinitionError> for EngineError {
    fn from(err: DefinitionError) -> Self {
        EngineError::Definition(err)
    }
}

impl From<SetupError> for EngineError {
    fn from(err: SetupError) -> Self {
        EngineError::Setup(err)
    }
}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        EngineError::Config(err)
    }
}

/// Type alias for Results using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

/// Type alias for Results using DefinitionError
pub type DefinitionResult<T> = Result<T, DefinitionError>;
