use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "quill",
    about = "Quill: inspect versioned notebooks and notification inboxes",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List notes newest first with their latest revision
    Notes {
        /// Notebook graph JSON path
        graph: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one note: latest revision, neighbours, and comments
    Note {
        /// Notebook graph JSON path
        graph: String,

        /// Note ID (root key)
        note_id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the node fragment for a new note
    NewPost {
        /// Author identity
        #[arg(long)]
        author: String,

        /// Note title
        #[arg(long)]
        title: String,

        /// Note body
        #[arg(long)]
        body: String,

        /// Creation time in Unix milliseconds (defaults to now)
        #[arg(long)]
        time: Option<u64>,

        /// Fill in content hashes
        #[arg(long)]
        hash: bool,
    },

    /// Render an exported inbox as day sections
    Inbox {
        /// Inbox snapshot JSON path (`{"live": {...}, "archive": {...}}`)
        notifications: String,

        /// Only show notifications from this group (repeatable)
        #[arg(long)]
        group: Vec<String>,

        /// Chat-to-group associations JSON path
        #[arg(long)]
        associations: Option<String>,

        /// Show the archive instead of live notifications
        #[arg(long)]
        archive: bool,

        /// Bucket days in UTC instead of local time
        #[arg(long)]
        utc: bool,

        /// Notification config TOML path
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
