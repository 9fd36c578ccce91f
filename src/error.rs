use thiserror::Error;

#[derive(Error, Debug)]
pub enum WvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid value for {field} in {block}: {value}")]
    FormatViolation {
        block: &'static str,
        field: &'static str,
        value: u64,
    },

    #[error("unsupported feature in {block}: {feature}")]
    Unsupported {
        block: &'static str,
        feature: &'static str,
    },

    #[error("corrupt stream: {0}")]
    CorruptStream(String),

    #[error("encoding error: {0}")]
    EncodingError(String),
}

pub type WvResult<T> = Result<T, WvError>;
