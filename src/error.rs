use thiserror::Error;

pub type MapResult<T> = Result<T, MapError>;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("failed to load {dataset} dataset: {reason}")]
    Load {
        dataset: &'static str,
        reason: String,
    },

    #[error("failed to parse document: {0}")]
    Parse(String),
}
