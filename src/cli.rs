use crate::config::{Config, OutputFormat};
use crate::search::{FileType, SearchOptions};
use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None, args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Directories to search; each must be an absolute path
    #[clap(value_parser)]
    pub paths: Vec<PathBuf>,

    /// Type of object to select
    #[clap(short = 't', long = "type", value_enum)]
    pub file_type: Option<FileType>,

    /// Permission expression: MODE (exact), /MODE (any bit), -MODE (all bits)
    #[clap(long, allow_hyphen_values = true)]
    pub perm: Option<String>,

    /// Stay on the filesystem of each search path
    #[clap(long, overrides_with = "no_xdev")]
    pub xdev: bool,

    /// Descend into other filesystems
    #[clap(long)]
    pub no_xdev: bool,

    /// Follow symbolic links
    #[clap(short = 'L', long = "follow", overrides_with = "no_follow")]
    pub follow: bool,

    /// Report symbolic links as links, without following them
    #[clap(long)]
    pub no_follow: bool,

    #[clap(long, value_parser)]
    pub mindepth: Option<usize>,

    #[clap(long, value_parser)]
    pub maxdepth: Option<usize>,

    /// Owner name or numeric uid
    #[clap(long)]
    pub user: Option<String>,

    /// Group name or numeric gid
    #[clap(long)]
    pub group: Option<String>,

    /// Shell glob matched against the base name
    #[clap(long)]
    pub name: Option<String>,

    #[clap(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Walk search paths concurrently
    #[clap(long)]
    pub parallel: bool,

    #[clap(long, value_parser)]
    pub threads: Option<usize>,

    /// Report entries that could not be read
    #[clap(long)]
    pub show_errors: bool,

    #[clap(long, value_parser)]
    pub config: Option<PathBuf>,

    #[clap(long, value_parser)]
    pub log: Option<PathBuf>,

    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[clap(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print shell completions
    Completions {
        #[clap(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Merges command-line flags over the configured defaults.
    pub fn search_options(&self, config: &Config) -> SearchOptions {
        let xdev = if self.no_xdev {
            false
        } else if self.xdev {
            true
        } else {
            config.defaults.xdev
        };
        let links = if self.no_follow {
            false
        } else if self.follow {
            true
        } else {
            config.defaults.links
        };

        SearchOptions {
            paths: self.paths.clone(),
            file_type: self.file_type.unwrap_or(config.defaults.file_type),
            perms: self.perm.clone(),
            xdev,
            links,
            mindepth: self.mindepth,
            maxdepth: self.maxdepth,
            user: self.user.clone(),
            group: self.group.clone(),
            name: self.name.clone(),
        }
    }

    pub fn output_format(&self, config: &Config) -> OutputFormat {
        self.format.unwrap_or(config.output.format)
    }

    pub fn parallel(&self, config: &Config) -> bool {
        self.parallel || config.performance.parallel
    }

    pub fn threads(&self, config: &Config) -> Option<usize> {
        self.threads.or(config.performance.threads)
    }

    pub fn show_errors(&self, config: &Config) -> bool {
        self.show_errors || config.output.show_diagnostics
    }
}
