// CLI module for argument parsing and configuration

use crate::domain::{DiscoveryOptions, SortBy};
use crate::error::{BrowserError, Result};
use clap::{ArgAction, Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;

/// Imgbrowse - browse the images in a directory from the terminal
///
/// Shows a thumbnail list of the JPEG, PNG and GIF files in a directory next to
/// a scaled preview of the selected image.
#[derive(Parser, Debug, Clone)]
#[command(name = "imgbrowse")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory to browse
    ///
    /// If not specified, defaults to the current directory.
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Sort images by specified criteria
    #[arg(short = 's', long = "sort", value_enum, default_value = "name")]
    pub sort_by: SortOrder,

    /// Reverse sort order
    #[arg(short = 'r', long = "reverse", action = ArgAction::SetTrue)]
    pub reverse: bool,

    /// Fill the preview pane exactly instead of keeping the aspect ratio
    #[arg(long = "stretch", action = ArgAction::SetTrue)]
    pub stretch: bool,

    /// Exit on the first image that fails to load
    #[arg(long = "fail-fast", action = ArgAction::SetTrue)]
    pub fail_fast: bool,

    /// Write diagnostic logs to this file
    ///
    /// Without it, logs are only written when RUST_LOG is set.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Sort order options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum SortOrder {
    /// Sort by file name
    #[default]
    Name,
    /// Sort by modification date (oldest first)
    Date,
    /// Sort by file size (smallest first)
    Size,
}

impl From<SortOrder> for SortBy {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Name => SortBy::Name,
            SortOrder::Date => SortBy::Date,
            SortOrder::Size => SortBy::Size,
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Checks that the directory exists, is a directory and can be listed
    pub fn validate(&self) -> Result<()> {
        let unreadable = || BrowserError::DirectoryUnreadable(self.directory.clone());

        if !self.directory.is_dir() {
            return Err(unreadable());
        }
        fs::read_dir(&self.directory).map_err(|_| unreadable())?;

        Ok(())
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub directory: PathBuf,
    pub sort_by: SortOrder,
    pub reverse: bool,
    pub stretch: bool,
    pub fail_fast: bool,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            sort_by: self.sort_by.into(),
            reverse: self.reverse,
        }
    }
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        AppConfig {
            directory: args.directory,
            sort_by: args.sort_by,
            reverse: args.reverse,
            stretch: args.stretch,
            fail_fast: args.fail_fast,
            log_file: args.log_file,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            directory: PathBuf::from("."),
            sort_by: SortOrder::Name,
            reverse: false,
            stretch: false,
            fail_fast: false,
            log_file: None,
        }
    }
}
