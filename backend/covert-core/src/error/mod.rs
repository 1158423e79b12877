pub mod config;
pub mod option;
pub mod registry;
pub mod session;
pub mod transport;
pub mod wire;

pub use config::ConfigError;
pub use option::OptionError;
pub use registry::RegistryError;
pub use session::SessionError;
pub use transport::TransportError;
pub use wire::WireError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Option(#[from] option::OptionError),

    #[error(transparent)]
    Registry(#[from] registry::RegistryError),

    #[error(transparent)]
    Session(#[from] session::SessionError),

    #[error(transparent)]
    Wire(#[from] wire::WireError),

    #[error(transparent)]
    Transport(#[from] transport::TransportError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}
