// src/constants.rs

/// The program name, used as a prefix for messages written to stderr.
pub const ME: &str = "xopen";

/// The name of the configuration file (inside the user's config directory).
pub const CONFIG_FILENAME: &str = "xopen.conf";

/// Environment variable that overrides the configuration file location.
pub const CONFIG_ENV_VAR: &str = "XOPEN_CONFIG";

/// Maximum number of instructions read from one configuration file.
pub const INSTRUCTION_CAPACITY: usize = 255;

/// Maximum number of extensions a single instruction may declare.
pub const EXTENSION_CAPACITY: usize = 255;

/// The pseudo-extension matched by directories. It can never be a real file suffix.
pub const DIRECTORY_EXTENSION: &str = "/";
