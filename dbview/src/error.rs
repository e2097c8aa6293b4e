use rowdom::DomError;
use thiserror::Error;
use vscroll::ScrollerError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Scroller(#[from] ScrollerError),

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error("failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
