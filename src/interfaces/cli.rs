use clap::Parser;

#[derive(Parser)]
#[command(name = "washboard")]
#[command(about = "Offline cache and connectivity monitor for the laundry dashboard.")]
#[command(version)]
pub struct Cli {
    /// Cache key for the fetched path (defaults to the path itself)
    #[arg(short = 'k', long)]
    pub key: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Choose color theme
    #[arg(short = 'T', long)]
    pub theme: Option<String>,

    /// Probe connectivity once and show offline status
    #[arg(long)]
    pub status: bool,

    /// Keep polling connectivity and print every change until Ctrl-C
    #[arg(long)]
    pub watch: bool,

    /// Forget the last sync marker
    #[arg(long)]
    pub clear_cache: bool,

    /// Keep the secure store in memory for this run only
    #[arg(long)]
    pub ephemeral: bool,

    /// Generate config sample
    #[arg(long)]
    pub generate_config: bool,

    /// API path to fetch, e.g. /lojas
    pub path: Option<String>,
}
