//! CLI definitions: argument parsing, subcommands, and help text.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

pub use clap_complete::generate;

const AFTER_HELP: &str = "\
EXAMPLES:
  chat-enhance render message.md           Render code blocks of a message
  chat-enhance render --page < message.md  Full page with styles and theme applied
  chat-enhance copy message.md --index 1   Copy the second code block to the clipboard
  chat-enhance theme toggle                Switch between light and dark
  chat-enhance prefs set fontSize large    Change a preference
  chat-enhance export chat.json -f md      Export a conversation as Markdown
  chat-enhance config                      Show paths and export settings
  chat-enhance completions bash            Generate bash completions
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "Code highlighting, themes, preferences and export for chat messages",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the fenced code blocks of a message as highlighted HTML
    Render {
        /// Message file ('-' or omitted reads stdin)
        file: Option<PathBuf>,
        /// Print the whole page (styles, theme, header buttons) around the message
        #[arg(long)]
        page: bool,
    },
    /// Copy the original source of a code block
    Copy {
        /// Message file ('-' or omitted reads stdin)
        file: Option<PathBuf>,
        /// Block number, starting at 0
        #[arg(short, long, default_value_t = 0)]
        index: usize,
        /// Print the code instead of using the clipboard
        #[arg(long)]
        print: bool,
    },
    /// Show or change the theme
    Theme {
        #[command(subcommand)]
        subcommand: Option<ThemeSubcommand>,
    },
    /// Show or change preferences
    Prefs {
        #[command(subcommand)]
        subcommand: Option<PrefsSubcommand>,
    },
    /// Export a conversation (JSON array of {role, content, timestamp})
    Export {
        /// Conversation file
        conversation: PathBuf,
        /// text, html, json or markdown
        #[arg(short, long, default_value = "text")]
        format: String,
        /// Output directory (default: CHAT_ENHANCE_EXPORT_DIR or the current directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Open the exported file with the system handler
        #[arg(long)]
        open: bool,
    },
    /// Show config paths and export settings
    Config,
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ThemeSubcommand {
    /// Print the saved theme
    Show,
    /// Switch to the other theme
    Toggle,
    /// Set the theme (light or dark)
    Set { theme: String },
    /// Print the code block styles for the saved theme
    Css,
}

#[derive(Subcommand)]
pub enum PrefsSubcommand {
    /// Print all preferences as JSON
    Show,
    /// Print one preference
    Get { key: String },
    /// Change one preference (e.g. fontSize large, autoScroll false)
    Set { key: String, value: String },
    /// Restore the defaults
    Reset,
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }
}
