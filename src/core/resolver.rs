//! # Resolver
//!
//! Maps a file's extension (and optional tag filters) to the instruction responsible for
//! it. Lookups scan instructions in declaration order and the first exact match wins;
//! anything unmatched goes to the default instruction when there is one.
//!
//! Extensions routed to the default are remembered in an explicit fallback cache owned
//! by the resolver. The parsed instructions themselves are never rewritten during a
//! lookup, only their `arguments` grow when a file is [assigned](Resolver::assign).

use crate::models::{Entry, Instruction, InstructionStore};
use thiserror::Error;

/// Per-file resolution failures. They never stop the other files.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Nothing handles the extension and there is no default instruction.
    #[error("{entry}: no command specified for extension '{extension}'.")]
    NoCommand {
        /// The file, as given.
        entry: String,
        /// Its extension.
        extension: String,
    },
}

/// The outcome of resolving one extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The instruction at `index` handles the file.
    Matched {
        /// Position of the instruction in the store.
        index: usize,
        /// `true` when the default instruction was used.
        via_default: bool,
    },
    /// An instruction was found but the tag filters rejected it. Not an error.
    Filtered {
        /// Position of the rejected instruction.
        index: usize,
    },
    /// No instruction and no default.
    Unmatched,
}

/// Resolves files against an [`InstructionStore`] it owns for the duration of a run.
#[derive(Debug)]
pub struct Resolver {
    store: InstructionStore,
    /// Extensions the default instruction has absorbed, in first-seen order.
    fallback_cache: Vec<String>,
}

impl Resolver {
    /// Creates a resolver over `store`.
    pub fn new(store: InstructionStore) -> Self {
        if let Some(default) = store.default_instruction() {
            log::debug!("Default command is '{}'", default.command);
        }
        Self {
            store,
            fallback_cache: Vec::new(),
        }
    }

    /// Selects the instruction for `extension`.
    ///
    /// With non-empty `tag_filters`, a match only stands if the instruction's tag or the
    /// extension itself is one of the filters; otherwise the result is
    /// [`Resolution::Filtered`].
    pub fn resolve(&mut self, extension: &str, tag_filters: &[String]) -> Resolution {
        let (index, via_default) = match self.store.position_of(extension) {
            Some(index) => (index, false),
            None => match self.store.default_index() {
                Some(index) => {
                    self.remember_fallback(extension);
                    (index, true)
                }
                None => return Resolution::Unmatched,
            },
        };

        if !tag_filters.is_empty() && !self.passes_filters(index, extension, tag_filters) {
            return Resolution::Filtered { index };
        }
        Resolution::Matched { index, via_default }
    }

    /// Resolves `entry` and, on a match, appends its path to the instruction's arguments.
    pub fn assign(
        &mut self,
        entry: &Entry,
        tag_filters: &[String],
    ) -> Result<Resolution, ResolveError> {
        let resolution = self.resolve(&entry.extension, tag_filters);
        match resolution {
            Resolution::Matched { index, .. } => {
                if let Some(instruction) = self.store.get_mut(index) {
                    log::trace!(
                        "'{}' -> '{}'",
                        entry.path.display(),
                        instruction.command
                    );
                    instruction.arguments.push(entry.path.clone());
                }
                Ok(resolution)
            }
            Resolution::Filtered { .. } => {
                log::debug!("'{}' skipped by tag filters", entry.path.display());
                Ok(resolution)
            }
            Resolution::Unmatched => Err(ResolveError::NoCommand {
                entry: entry.path.display().to_string(),
                extension: entry.extension.clone(),
            }),
        }
    }

    /// The instruction a resolution points at, if any.
    pub fn instruction(&self, resolution: Resolution) -> Option<&Instruction> {
        match resolution {
            Resolution::Matched { index, .. } | Resolution::Filtered { index } => {
                self.store.get(index)
            }
            Resolution::Unmatched => None,
        }
    }

    /// Every extension the default instruction answers for: the ones it declared (none,
    /// by definition) followed by those it absorbed during this run.
    pub fn default_extensions(&self) -> Vec<&str> {
        let Some(default) = self.store.default_instruction() else {
            return Vec::new();
        };
        default
            .extensions
            .iter()
            .chain(&self.fallback_cache)
            .map(String::as_str)
            .collect()
    }

    /// Instructions that received at least one file, in declaration order.
    pub fn planned(&self) -> impl Iterator<Item = &Instruction> {
        self.store.iter().filter(|i| !i.arguments.is_empty())
    }

    /// The underlying store.
    pub fn store(&self) -> &InstructionStore {
        &self.store
    }

    /// Hands the store (with its accumulated arguments) back.
    pub fn into_store(self) -> InstructionStore {
        self.store
    }

    fn remember_fallback(&mut self, extension: &str) {
        if self.fallback_cache.iter().any(|e| e == extension) {
            return;
        }
        log::debug!("Extension '{}' falls back to the default command", extension);
        self.fallback_cache.push(extension.to_string());
    }

    fn passes_filters(&self, index: usize, extension: &str, tag_filters: &[String]) -> bool {
        let tagged = self
            .store
            .get(index)
            .is_some_and(|i| i.tagged_with_any(tag_filters));
        tagged || tag_filters.iter().any(|f| f == extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::{ParseLimits, parse_instructions};
    use std::path::{Path, PathBuf};

    const EXAMPLE: &str = "evince - pdf\nmpv - mp4 mkv @VIDEO\nnautilus - /\nemacs\n";

    fn resolver(text: &str) -> Resolver {
        let mut diagnostics = Vec::new();
        let store = parse_instructions(
            text,
            Path::new("xopen.conf"),
            ParseLimits::default(),
            &mut diagnostics,
        )
        .unwrap();
        Resolver::new(store)
    }

    fn command_for(resolver: &mut Resolver, extension: &str, filters: &[String]) -> Option<String> {
        let resolution = resolver.resolve(extension, filters);
        match resolution {
            Resolution::Matched { .. } => resolver
                .instruction(resolution)
                .map(|i| i.command.clone()),
            _ => None,
        }
    }

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolves_the_documented_example() {
        let mut r = resolver(EXAMPLE);
        assert_eq!(command_for(&mut r, "pdf", &[]).as_deref(), Some("evince"));
        assert_eq!(
            command_for(&mut r, "mp4", &tags(&["VIDEO"])).as_deref(),
            Some("mpv")
        );
        assert_eq!(command_for(&mut r, "/", &[]).as_deref(), Some("nautilus"));
        assert_eq!(command_for(&mut r, "txt", &[]).as_deref(), Some("emacs"));
    }

    #[test]
    fn test_first_declaration_wins() {
        let mut r = resolver("evince - pdf\nzathura - ps pdf\n");
        assert_eq!(
            r.resolve("pdf", &[]),
            Resolution::Matched {
                index: 0,
                via_default: false
            }
        );
        assert_eq!(command_for(&mut r, "ps", &[]).as_deref(), Some("zathura"));
    }

    #[test]
    fn test_default_absorbs_unmatched_extensions() {
        let mut r = resolver(EXAMPLE);
        let expected = Resolution::Matched {
            index: 3,
            via_default: true,
        };
        assert!(r.default_extensions().is_empty());

        assert_eq!(r.resolve("xyz", &[]), expected);
        assert_eq!(r.default_extensions(), vec!["xyz"]);

        assert_eq!(r.resolve("xyz", &[]), expected);
        assert_eq!(r.default_extensions(), vec!["xyz"]);

        // The parsed instruction itself is left untouched.
        assert!(r.store().get(3).unwrap().extensions.is_empty());
    }

    #[test]
    fn test_extensions_are_case_sensitive() {
        let mut r = resolver(EXAMPLE);
        assert_eq!(command_for(&mut r, "PDF", &[]).as_deref(), Some("emacs"));
    }

    #[test]
    fn test_no_default_means_unmatched() {
        let mut r = resolver("evince - pdf\n");
        assert_eq!(r.resolve("txt", &[]), Resolution::Unmatched);
        assert!(r.default_extensions().is_empty());

        let entry = Entry::file("notes.txt");
        let error = r.assign(&entry, &[]).unwrap_err();
        assert_eq!(
            error,
            ResolveError::NoCommand {
                entry: "notes.txt".to_string(),
                extension: "txt".to_string(),
            }
        );
        assert_eq!(
            error.to_string(),
            "notes.txt: no command specified for extension 'txt'."
        );
    }

    #[test]
    fn test_tag_filters() {
        let mut r = resolver(EXAMPLE);
        let video = tags(&["VIDEO"]);
        assert_eq!(command_for(&mut r, "mkv", &video).as_deref(), Some("mpv"));
        assert_eq!(r.resolve("pdf", &video), Resolution::Filtered { index: 0 });
        assert_eq!(r.resolve("txt", &video), Resolution::Filtered { index: 3 });

        // An extension named in the filters is accepted whatever the tag.
        let pdf = tags(&["VIDEO", "pdf"]);
        assert_eq!(command_for(&mut r, "pdf", &pdf).as_deref(), Some("evince"));
    }

    #[test]
    fn test_filtered_default_still_caches_the_extension() {
        let mut r = resolver(EXAMPLE);
        assert_eq!(
            r.resolve("odt", &tags(&["VIDEO"])),
            Resolution::Filtered { index: 3 }
        );
        assert_eq!(r.default_extensions(), vec!["odt"]);
    }

    #[test]
    fn test_assign_accumulates_arguments_in_order() {
        let mut r = resolver(EXAMPLE);
        let video = tags(&["VIDEO"]);
        for name in ["a.mp4", "b.pdf", "c.mkv"] {
            r.assign(&Entry::file(name), &video).unwrap();
        }
        r.assign(&Entry::file("d.pdf"), &[]).unwrap();

        let planned: Vec<_> = r.planned().map(|i| i.command.as_str()).collect();
        assert_eq!(planned, vec!["evince", "mpv"]);

        let store = r.into_store();
        assert_eq!(
            store.get(1).unwrap().arguments,
            vec![PathBuf::from("a.mp4"), PathBuf::from("c.mkv")]
        );
        assert_eq!(store.get(0).unwrap().arguments, vec![PathBuf::from("d.pdf")]);
    }
}
