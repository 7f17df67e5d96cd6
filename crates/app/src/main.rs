mod args;
mod logging;
mod op;
mod ops;
mod seed;
mod state;

use anyhow::Context as _;
use args::Args;
use clap::{Parser, Subcommand};
use op::Op;
use ops::{Find, Get, Init, Keys, Resolve, Stress, Version};

command_enum! {
    (Find, Find),
    (Get, Get),
    (Init, Init),
    (Keys, Keys),
    (Resolve, Resolve),
    (Stress, Stress),
    (Version, Version),
}

fn main() {
    let args = Args::parse();

    let state = match state::AppState::load(args.config_path).context("failed to load config") {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    let guard = logging::init(args.log_level, &state.config.log_level);
    logging::register_panic_logger();

    let ctx = op::OpContext::new(state);

    let code = match args.command.execute(&ctx) {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {}", e);
            1
        }
    };

    // flush buffered log lines before exiting
    drop(guard);
    std::process::exit(code);
}
