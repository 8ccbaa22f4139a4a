use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "wiretap", version, about = "Chat API fixture generator")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run fixture scenarios against the chat backend
    Run {
        #[arg(long, help = "Run a single scenario instead of all of them")]
        scenario: Option<String>,
        #[arg(long, help = "Fixtures output directory (overrides FIXTURES_DIR)")]
        out: Option<String>,
        #[arg(long, help = "Pin the channel id instead of generating one per run")]
        channel_id: Option<String>,
    },
    /// List available scenarios
    List,
    /// Mint a user token for manual API poking
    Token {
        #[arg(long)]
        user: String,
    },
}
