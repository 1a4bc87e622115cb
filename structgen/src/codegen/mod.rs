//! Code generation module

mod code_generator;
mod go_generator;
mod naming;
mod type_mapper;

pub use code_generator::*;
pub use go_generator::*;
pub use naming::*;
pub use type_mapper::*;
