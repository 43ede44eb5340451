mod cli;
mod commands;
mod settings;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use settings::Settings;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging (warn unless RUST_LOG says otherwise)
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rally=warn,rally_core=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::load(args.config.as_deref())?;

    match args.command {
        Some(Command::Play {
            win,
            resume,
            snapshot,
        }) => commands::play::run(&settings, win, resume, snapshot),
        Some(Command::Replay {
            script,
            win,
            first_server,
            output,
            format,
        }) => commands::replay::run(
            &settings,
            &script,
            win,
            first_server,
            output.as_deref(),
            format,
        ),
        Some(Command::Rate {
            rating_a,
            rating_b,
            winner,
            k,
        }) => commands::rate::run(&settings, rating_a, rating_b, winner, k),
        Some(Command::Validate { sets, win }) => commands::validate::run(&settings, &sets, win),
        Some(Command::Show { snapshot, json }) => commands::show::run(&settings, snapshot, json),
        None => commands::play::run(&settings, None, false, None),
    }
}
