#![warn(clippy::all)]
#![deny(rust_2018_idioms)]

pub mod board;
pub mod cli;
pub mod config;
pub mod decision;
pub mod dice;
pub mod engine;
pub mod ept;
pub mod error;
pub mod markov;
pub mod snapshot;
pub mod valuator;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use markov::JailPolicy;
pub use snapshot::{GameSnapshot, PlayerSnapshot, SquareState};
