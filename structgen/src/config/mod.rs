//! Configuration loading: `.env`, optional settings file, environment, CLI

pub mod defaults;
mod settings;

pub use settings::*;
