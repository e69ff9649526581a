//! Side-effecting operations: process execution, HTTP gateways, configuration.

pub mod config;
pub mod gateway;
pub mod process;
pub mod prompt;
pub mod shell;
