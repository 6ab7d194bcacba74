pub mod alphabet;
pub mod analysis;
pub mod api;
pub mod cipher;
pub mod config;
pub mod consts;
pub mod error;
pub mod optimizer;
pub mod scorer;
pub mod stream;

pub use self::error::{RfResult, RuneForgeError};
