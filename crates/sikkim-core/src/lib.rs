pub mod config;
pub mod error;

pub use config::{ChatConfig, GeneralConfig, SikkimConfig};
pub use error::{Result, SikkimError};
