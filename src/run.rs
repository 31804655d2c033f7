//! Logger init and command dispatch.

use std::io::{self, Write};

use chrono::Local;
use clap::CommandFactory;

use chat_enhance::core::cli::{self as commands, CliError};
use chat_enhance::core::clipboard::{Clipboard, ClipboardError, SystemClipboard};
use chat_enhance::core::config;

use crate::cli::{Args, Commands, PrefsSubcommand, ThemeSubcommand};

/// Initialize env_logger on stderr; `RUST_LOG` overrides the -v/-q level.
pub fn init_logger(args: &Args) {
    let log_level = args.log_level();
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .try_init();
}

/// Run the parsed command.
pub fn run(args: Args) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Commands::Completions { shell } = args.command {
        let mut cmd = Args::command();
        let name = cmd.get_name().to_string();
        crate::cli::generate(shell, &mut cmd, name, &mut out);
        return Ok(());
    }

    let config = config::load()?;
    log::debug!("Using data dir {}", config.data_dir.display());

    match args.command {
        Commands::Render { file, page } => {
            let input = commands::read_input(file.as_deref())?;
            commands::run_render(&config, &input, page, Local::now(), &mut out)?;
        }
        Commands::Copy { file, index, print } => {
            let input = commands::read_input(file.as_deref())?;
            if print {
                let mut printer = Printer(&mut out);
                commands::run_copy(&input, index, &mut printer)?;
            } else {
                let mut clipboard = SystemClipboard::new()?;
                let text = commands::run_copy(&input, index, &mut clipboard)?;
                eprintln!("Copied {} line(s) to the clipboard", text.lines().count());
            }
        }
        Commands::Theme { subcommand } => match subcommand.unwrap_or(ThemeSubcommand::Show) {
            ThemeSubcommand::Show => commands::run_theme_show(&config, &mut out)?,
            ThemeSubcommand::Toggle => commands::run_theme_toggle(&config, &mut out)?,
            ThemeSubcommand::Set { theme } => commands::run_theme_set(&config, &theme, &mut out)?,
            ThemeSubcommand::Css => commands::run_theme_css(&config, &mut out)?,
        },
        Commands::Prefs { subcommand } => match subcommand.unwrap_or(PrefsSubcommand::Show) {
            PrefsSubcommand::Show => commands::run_prefs_show(&config, &mut out)?,
            PrefsSubcommand::Get { key } => commands::run_prefs_get(&config, &key, &mut out)?,
            PrefsSubcommand::Set { key, value } => {
                commands::run_prefs_set(&config, &key, &value, &mut out)?
            }
            PrefsSubcommand::Reset => commands::run_prefs_reset(&config, &mut out)?,
        },
        Commands::Export {
            conversation,
            format,
            out: dir,
            open,
        } => {
            commands::run_export(&config, &conversation, &format, dir.as_deref(), open, &mut out)?;
        }
        Commands::Config => commands::run_config(&config, &mut out)?,
        Commands::Completions { .. } => {}
    }
    Ok(())
}

/// `copy --print`: the "clipboard" is stdout.
struct Printer<'a, W: Write>(&'a mut W);

impl<W: Write> Clipboard for Printer<'_, W> {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.0.write_all(text.as_bytes())?;
        self.0.flush()?;
        Ok(())
    }
}
