//! xopen: run a user-declared command on files, chosen by extension or tag.
//!
//! The configuration (`~/.config/xopen.conf`) binds commands to extensions:
//!
//! ```text
//! evince - pdf
//! mpv - mp4 mkv @VIDEO
//! nautilus - /
//! emacs
//! ```
//!
//! [`core::config_loader::load_instructions`] parses such a file into an
//! [`models::InstructionStore`], and a [`core::resolver::Resolver`] assigns each file to
//! the instruction responsible for it.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

pub mod cli;
pub mod constants;
pub mod core;
pub mod dev_utils;
pub mod models;
