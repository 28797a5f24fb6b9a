//! DevBot: a developer chat CLI with multi-language code execution.

pub mod cli;
pub mod config;
pub mod handlers;
pub mod printer;
pub mod responder;
pub mod runner;
pub mod session;
