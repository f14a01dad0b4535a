// One error type for the whole app.
// Every variant states *where* things went wrong.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Creating the window failed
    #[error("Window init error: {0}")]
    WindowInit(String),

    /// Updating the window buffer failed
    #[error("Window update error: {0}")]
    WindowUpdate(String),

    /// Turning the bitmap into PNG bytes failed
    #[error("Encode error: {0}")]
    Encode(String),

    /// Writing the downloaded file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Command line values that cannot produce a surface
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Encode(e.to_string())
    }
}
