use thiserror::Error;

pub mod context;

pub mod logging;

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error {0}")]
    Configuration(String),

    #[error(transparent)]
    Logged(#[from] logged::Error),
}
