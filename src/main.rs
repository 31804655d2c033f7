//! # chat-enhance
//!
//! Command-line front end of the chat enhancements: renders fenced code blocks
//! as highlighted HTML, copies block sources, manages the theme and
//! preferences, and exports conversations.

mod cli;
mod run;

use clap::Parser;
use dotenv::dotenv;

fn main() {
    // Load environment variables from .env file
    dotenv().ok();

    let args = cli::Args::parse();
    run::init_logger(&args);

    if let Err(e) = run::run(args) {
        log::debug!("Command failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
