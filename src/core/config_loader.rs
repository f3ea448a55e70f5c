//! # Config Loader
//!
//! The entry point used by callers outside the core: read a configuration file from disk
//! and parse it into an [`InstructionStore`].
//!
//! The whole file is read into one buffer before lexing starts. Instructions own their
//! text, so the buffer is released as soon as parsing returns, whatever the outcome.
use crate::{
    core::{
        diagnostics::DiagnosticSink,
        parser::{ParseError, ParseLimits, parse_instructions},
    },
    dev_utils,
    models::InstructionStore,
};
use std::{fs, path::Path};
use thiserror::Error;

/// Terminal failures of [`load_instructions`]. Line-scoped problems are diagnostics, not
/// errors.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be read at all.
    #[error("Could not read config file '{path}': {source}")]
    Read {
        /// The file that failed.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file was read but parsing had to be abandoned.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Reads and parses the configuration at `path`, keeping at most `capacity` instructions.
///
/// Diagnostics for malformed lines go to `sink`; those lines are skipped. Bytes that are
/// not valid UTF-8 are replaced rather than rejected.
pub fn load_instructions(
    path: &Path,
    capacity: usize,
    sink: &mut dyn DiagnosticSink,
) -> Result<InstructionStore, LoadError> {
    load_instructions_with(path, ParseLimits::with_capacity(capacity), sink)
}

/// Like [`load_instructions`] with full control over the capacity bounds.
pub fn load_instructions_with(
    path: &Path,
    limits: ParseLimits,
    sink: &mut dyn DiagnosticSink,
) -> Result<InstructionStore, LoadError> {
    let _timer = dev_utils::BlockTimer::new("load_instructions");
    log::debug!("Loading instructions from '{}'", path.display());

    let bytes = fs::read(path).map_err(|source| LoadError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);

    let store = parse_instructions(&text, path, limits, sink)?;
    if store.is_empty() {
        log::debug!("'{}' declares no command", path.display());
    }
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constants::INSTRUCTION_CAPACITY, core::diagnostics::Diagnostic};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_loads_instructions_from_disk() {
        let file = config_file(b"evince - pdf\n- junk\nemacs\n");
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        let store = load_instructions(file.path(), INSTRUCTION_CAPACITY, &mut diagnostics).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.source(), file.path());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].file, file.path().display().to_string());
        assert_eq!(diagnostics[0].line, 2);
    }

    #[test]
    fn test_capacity_is_applied() {
        let file = config_file(b"a - 1\nb - 2\nc - 3\n");
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        let store = load_instructions(file.path(), 2, &mut diagnostics).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.is_truncated());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let file = config_file(b"evince - pdf \xff\xfe\nemacs\n");
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        let store = load_instructions(file.path(), INSTRUCTION_CAPACITY, &mut diagnostics).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().extensions, vec!["pdf"]);
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let result = load_instructions(
            Path::new("definitely_missing_xopen.conf"),
            INSTRUCTION_CAPACITY,
            &mut diagnostics,
        );
        assert!(matches!(result, Err(LoadError::Read { .. })));
    }

    #[test]
    fn test_parse_error_is_propagated() {
        let file = config_file(b"evince pdf\n");
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        let result = load_instructions(file.path(), INSTRUCTION_CAPACITY, &mut diagnostics);
        assert!(matches!(
            result,
            Err(LoadError::Parse(ParseError::UnexpectedLiteral { .. }))
        ));
    }
}
