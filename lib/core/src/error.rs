use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Woven with ID {0} not found")]
    WovenNotFound(u32),

    #[error("Variant with ID {0} not found")]
    VariantNotFound(u32),

    #[error("Pantone color '{0}' not found")]
    PantoneNotFound(String),

    #[error("{0}")]
    InvalidParameter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Artifact parse error: {0}")]
    Parse(String),
}

impl Error {
    /// True for the request-local "requested key is absent" outcomes.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::WovenNotFound(_) | Error::VariantNotFound(_) | Error::PantoneNotFound(_)
        )
    }
}
