//! Quill CLI: the `quill` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics go to stderr so `--json` output stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Notes { graph, json } => commands::notes::run(graph, json),

        Commands::Note {
            graph,
            note_id,
            json,
        } => commands::note::run(graph, note_id, json),

        Commands::NewPost {
            author,
            title,
            body,
            time,
            hash,
        } => commands::new_post::run(commands::new_post::Args {
            author,
            title,
            body,
            time,
            hash,
        }),

        Commands::Inbox {
            notifications,
            group,
            associations,
            archive,
            utc,
            config,
            json,
        } => commands::inbox::run(commands::inbox::Args {
            notifications,
            groups: group,
            associations,
            archive,
            utc,
            config,
            json,
        }),
    }
}
