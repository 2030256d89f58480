use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "deskboard")]
#[command(about = "A terminal client for remote kanban boards", long_about = None)]
#[command(version, arg_required_else_help = false)]
pub struct Cli {
    /// Path to the config file (defaults to the platform config dir)
    #[arg(long, value_name = "FILE", env = "DESKBOARD_CONFIG")]
    pub config: Option<String>,

    /// Board id (overrides the config file)
    #[arg(long, env = "DESKBOARD_BOARD")]
    pub board: Option<String>,

    /// Persona profile selecting which buckets are shown
    #[arg(long)]
    pub persona: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch one normalized board snapshot and print it as JSON
    Snapshot,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
