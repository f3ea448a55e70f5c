// src/models.rs

use std::path::{Path, PathBuf};

/// One rule of the configuration file: a command bound to extensions and an optional tag.
///
/// All text is owned, so an `Instruction` never depends on the buffer it was parsed from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Instruction {
    /// The executable or shell function to run.
    pub command: String,
    /// Absolute path of `command`, bound later by whoever executes it.
    pub command_path: Option<PathBuf>,
    /// The optional label (`@VIDEO`) without its leading `@`.
    pub tag: Option<String>,
    /// Dot-less extensions in declaration order. Duplicates are kept.
    pub extensions: Vec<String>,
    /// Files assigned to this instruction during resolution.
    pub arguments: Vec<PathBuf>,
    /// 1-based line of the configuration file the instruction was declared on.
    pub line: usize,
}

impl Instruction {
    /// Starts a new instruction for `command`, with no extensions, tag or arguments.
    pub fn new(command: impl Into<String>, line: usize) -> Self {
        Self {
            command: command.into(),
            line,
            ..Default::default()
        }
    }

    /// An instruction without extensions is the fallback for everything unmatched.
    pub fn is_default(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Exact, case-sensitive lookup of a declared extension.
    pub fn handles(&self, extension: &str) -> bool {
        self.extensions.iter().any(|e| e == extension)
    }

    /// Returns `true` if the instruction's tag is one of `tags`.
    pub fn tagged_with_any(&self, tags: &[String]) -> bool {
        self.tag
            .as_deref()
            .is_some_and(|tag| tags.iter().any(|t| t == tag))
    }

    /// Records where `command` lives once an executor has looked it up.
    pub fn bind_command_path(&mut self, path: impl Into<PathBuf>) {
        self.command_path = Some(path.into());
    }
}

/// The ordered result of parsing one configuration file.
///
/// The store is immutable after parsing, except for the per-instruction `arguments` and
/// `command_path`, which are filled in by the resolver and the executor.
#[derive(Debug, Clone, Default)]
pub struct InstructionStore {
    instructions: Vec<Instruction>,
    default_index: Option<usize>,
    source: PathBuf,
    truncated: bool,
}

impl InstructionStore {
    /// Builds a store and identifies its default instruction (the first one without
    /// extensions, in declaration order).
    pub fn new(instructions: Vec<Instruction>, source: impl Into<PathBuf>) -> Self {
        let default_index = instructions.iter().position(Instruction::is_default);
        Self {
            instructions,
            default_index,
            source: source.into(),
            truncated: false,
        }
    }

    /// Marks the store as cut short by the instruction capacity.
    pub(crate) fn with_truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }

    /// The configuration file the instructions come from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// `true` if parsing stopped early because the capacity was reached.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// `true` if the file declared no usable instruction.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instructions in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// The instruction at `index`.
    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Instruction> {
        self.instructions.get_mut(index)
    }

    /// Position of the default instruction, if the file declared one.
    pub fn default_index(&self) -> Option<usize> {
        self.default_index
    }

    /// The default instruction, if the file declared one.
    pub fn default_instruction(&self) -> Option<&Instruction> {
        self.default_index.and_then(|i| self.instructions.get(i))
    }

    /// Index of the first instruction declaring `extension`. Declaration order breaks ties.
    pub fn position_of(&self, extension: &str) -> Option<usize> {
        self.instructions.iter().position(|i| i.handles(extension))
    }
}

impl<'a> IntoIterator for &'a InstructionStore {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

/// A file (or directory) given to the program, with the extension used to match it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The path as given, without any trailing separator.
    pub path: PathBuf,
    /// The dot-less extension, `/` for a directory, or empty when there is none.
    pub extension: String,
}
