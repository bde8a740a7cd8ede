pub mod bindings;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod interactive;
pub mod namer;
pub mod pipeline;
pub mod preview;
pub mod resolver;
pub mod retention;
pub mod session;
