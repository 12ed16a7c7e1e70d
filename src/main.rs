// Main entry point
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;
use washboard::domain::model::{QueryResult, QuerySource, SyncStatus};
use washboard::domain::traits::SecureStore;
use washboard::infrastructure::config::{self, load_config, Config};
use washboard::infrastructure::network::client::ApiClient;
use washboard::infrastructure::storage::db::SqliteStore;
use washboard::infrastructure::storage::memory::MemoryStore;
use washboard::interfaces::cli::Cli;
use washboard::presentation::theme::Theme;
use washboard::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.generate_config {
        config::generate_config_sample()?;
        return Ok(());
    }

    let config = load_config()?;

    // Initialize logging
    if config.logging.enable {
        init_logging(&config.logging)?;
    }

    let store = open_store(&config, cli.ephemeral).await?;
    let state = AppState::new(store, config.clone()).await?;

    let theme_name = cli.theme.as_deref().unwrap_or(config.theme.as_str());
    let theme = Theme::from_name(theme_name);

    if cli.clear_cache {
        state.cache.clear_cache().await;
        println!("{}", "Cache marker cleared".green());
        return Ok(());
    }

    if cli.watch {
        return watch(&state, &theme, cli.json).await;
    }

    if cli.status {
        state.monitor.tick().await;
        let status = state.offline.status().await;
        print_status(&status, &theme, cli.json)?;
        return Ok(());
    }

    let Some(path) = cli.path.as_deref() else {
        eprintln!("{}", "Please provide an API path, or --status / --watch".red());
        std::process::exit(1);
    };

    let api = ApiClient::from_config(state.http_client.clone(), &config.api)?;
    let key = cli.key.clone().unwrap_or_else(|| path.to_string());
    let fetch_path = path.to_string();
    state.queries.register(key.clone(), move || {
        let api = api.clone();
        let path = fetch_path.clone();
        async move { api.get_json(&path).await }
    });

    state.monitor.tick().await;
    let result = state.queries.fetch(&key).await?;
    let status = state.offline.status().await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", format_result(&result, &status, &theme));
    }

    Ok(())
}

async fn open_store(config: &Config, ephemeral: bool) -> anyhow::Result<Arc<dyn SecureStore>> {
    let max_item_bytes = config.store.max_item_bytes;
    if ephemeral {
        return Ok(Arc::new(MemoryStore::new(max_item_bytes)));
    }

    let store_path = config::get_store_path(config);
    if let Some(parent) = store_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(Arc::new(SqliteStore::open(&store_path, max_item_bytes).await?))
}

/// Run the monitor until Ctrl-C, printing every connectivity change.
async fn watch(state: &AppState, theme: &Theme, json: bool) -> anyhow::Result<()> {
    state.monitor.tick().await;
    print_status(&state.offline.status().await, theme, json)?;

    let mut online_rx = state.monitor.subscribe();
    let mut reconnected_rx = state.monitor.subscribe_reconnected();
    let handle = Arc::clone(&state.monitor).spawn();

    loop {
        tokio::select! {
            changed = online_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = state.offline.status().await;
                print_status(&status, theme, json)?;
            }
            Ok(event) = reconnected_rx.recv() => {
                if !json {
                    println!(
                        "{} {}",
                        (theme.online)("↻ reconnected"),
                        (theme.age)(&event.at.to_rfc3339())
                    );
                }
            }
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nStopping monitor...");
                break;
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

/// Initialize logging with path and level configuration
fn init_logging(logging: &config::Logging) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.filter_directive()));

    if let Some(path) = &logging.path {
        if !path.is_empty() {
            // Log to file
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .init();
            return Ok(());
        }
    }

    // Log to stderr (default)
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn print_status(status: &SyncStatus, theme: &Theme, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(status)?);
    } else {
        print!("{}", format_status(status, theme));
    }
    Ok(())
}

fn format_status(status: &SyncStatus, theme: &Theme) -> String {
    use std::fmt::Write;

    let mut output = String::new();
    let banner = if status.is_online {
        (theme.online)("● online")
    } else {
        (theme.offline)(" offline ")
    };
    writeln!(output, "{} {}", (theme.title)("washboard"), banner).ok();
    writeln!(output, "{}", (theme.line)(&"━".repeat(40))).ok();

    let last_sync = status
        .last_sync_time
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "-".to_string());
    writeln!(
        output,
        "  {} {}",
        (theme.label)("Last sync:"),
        (theme.value)(&last_sync)
    )
    .ok();
    writeln!(
        output,
        "  {} {}",
        (theme.label)("Cache age:"),
        (theme.age)(&status.cache_age)
    )
    .ok();

    output
}

fn format_result(result: &QueryResult, status: &SyncStatus, theme: &Theme) -> String {
    use std::fmt::Write;

    let mut output = String::new();
    let source_indicator = match result.source {
        QuerySource::Network => (theme.online)("[online]"),
        QuerySource::Cache => format!(
            "{} {}",
            (theme.offline)("[cache]"),
            (theme.age)(&status.cache_age)
        ),
    };
    writeln!(output, "{} {}", (theme.title)(&result.name), source_indicator).ok();

    let body = serde_json::to_string_pretty(&result.data).unwrap_or_default();
    for line in body.lines() {
        writeln!(output, "  {}", (theme.value)(line)).ok();
    }

    writeln!(output).ok();
    output
}
