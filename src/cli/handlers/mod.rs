// EN: src/cli/handlers/mod.rs

// One module per CLI action.

pub mod plan;
