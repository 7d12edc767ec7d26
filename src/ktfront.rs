//! Main module for ktfront library functionality

pub mod analysis;
pub mod config;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod processor;

#[cfg(test)]
pub mod testing;
