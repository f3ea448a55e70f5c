// src/core/mod.rs

pub mod config_loader;
pub mod diagnostics;
pub mod entries;
pub mod lexer;
pub mod parser;
pub mod paths;
pub mod resolver;
