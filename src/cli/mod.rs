use clap::Parser;

use crate::core::entries::DirectoryMode;

pub mod handlers;

/// xopen: open files with the command declared for their extension.
///
/// Each file is matched against the config file and the matching command is shown
/// together with the files it would receive.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    after_help = t!("cli.help.syntax"),
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
pub struct Cli {
    /// Files or directories to open.
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,

    /// Add sub-directories recursively.
    #[arg(short, long, overrides_with = "directory")]
    pub recursive: bool,

    /// Add directories themselves, not their content (default).
    #[arg(short, long, overrides_with = "recursive")]
    pub directory: bool,

    /// Only keep files whose command has one of these tags (or whose extension is listed).
    #[arg(long, value_name = "TAG", value_delimiter = ',')]
    pub only: Vec<String>,

    /// Read this config file instead of the default one.
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<String>,
}

impl Cli {
    /// How directory arguments should be expanded.
    pub fn directory_mode(&self) -> DirectoryMode {
        if self.recursive {
            DirectoryMode::Recurse
        } else {
            DirectoryMode::AsEntry
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recursive_flag() {
        let cli = Cli::try_parse_from(["xopen", "-r", "docs"]).unwrap();
        assert_eq!(cli.directory_mode(), DirectoryMode::Recurse);
        assert_eq!(cli.files, vec!["docs"]);
    }

    #[test]
    fn test_last_directory_flag_wins() {
        let cli = Cli::try_parse_from(["xopen", "-r", "-d", "docs"]).unwrap();
        assert_eq!(cli.directory_mode(), DirectoryMode::AsEntry);

        let cli = Cli::try_parse_from(["xopen", "-d", "--recursive", "docs"]).unwrap();
        assert_eq!(cli.directory_mode(), DirectoryMode::Recurse);
    }

    #[test]
    fn test_only_accepts_lists_and_repeats() {
        let cli =
            Cli::try_parse_from(["xopen", "--only", "VIDEO,IMG", "--only", "pdf", "a.mp4"])
                .unwrap();
        assert_eq!(cli.only, vec!["VIDEO", "IMG", "pdf"]);
        assert_eq!(cli.files, vec!["a.mp4"]);
    }

    #[test]
    fn test_config_flag() {
        let cli = Cli::try_parse_from(["xopen", "-c", "~/my.conf", "a"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("~/my.conf"));
    }
}
