use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No navigation target given")]
    MissingTarget,

    #[error("Unknown screen: {0}")]
    UnknownScreen(String),

    #[error("Screen is already current: {0}")]
    AlreadyCurrent(String),

    #[error("Navigation is locked by an in-flight switch")]
    Busy,

    #[error("No switch in flight to chain onto")]
    NotInFlight,

    #[error("Invalid animation command: {0}")]
    InvalidCommand(String),

    #[error("Invalid numeric value for {field}: {value}")]
    InvalidNumeric { field: &'static str, value: String },

    #[error("Invalid delay flag: {0}")]
    InvalidFlag(String),

    #[error("Unrecognized setting: {0}")]
    UnknownSetting(String),

    #[error("At least two screens with an id are required, found {0}")]
    NotEnoughScreens(usize),

    #[error("No async runtime available to drive the switch")]
    NoRuntime,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
