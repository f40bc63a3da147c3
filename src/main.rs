//! SIC3PRO Dashboard CLI
//!
//! - Load the datasets once or keep the dashboard open
//! - Generate sample datasets
//! - Convert SIC3PRO HTML reports
//! - Serve the page and its datasets

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use sic3pro_dashboard::chart::{start_heartbeat, BarChart};
use sic3pro_dashboard::config::{generate_default_config, Config};
use sic3pro_dashboard::datasets::{convert, generate};
use sic3pro_dashboard::loader::{
    DashboardLoader, DatasetFetcher, FileFetcher, HttpFetcher, LoadOutcome, TextPanel,
};
use sic3pro_dashboard::notify::{NotificationCenter, NotificationConfig, NotificationEvent};
use sic3pro_dashboard::server::{self, ServerState};

type Loader = DashboardLoader<Box<dyn DatasetFetcher>, TextPanel>;

#[derive(Parser)]
#[command(name = "sic3pro-dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "SIC3PRO project-control dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load every dataset once and print the KPI panel
    Load {
        /// Fetch over HTTP from this site root
        #[arg(long, conflicts_with = "data_dir")]
        base_url: Option<String>,
        /// Read datasets from this directory
        #[arg(long)]
        data_dir: Option<String>,
    },

    /// Keep the dashboard open; Enter refreshes, Ctrl+C quits
    Watch {
        /// Fetch over HTTP from this site root
        #[arg(long, conflicts_with = "data_dir")]
        base_url: Option<String>,
        /// Read datasets from this directory
        #[arg(long)]
        data_dir: Option<String>,
    },

    /// Write realistic sample datasets
    Generate {
        /// Output directory (default: the configured data directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a SIC3PRO HTML report to JSON
    Convert {
        /// HTML file to convert
        #[arg(required_unless_present = "url", conflicts_with = "url")]
        input: Option<PathBuf>,
        /// Download the report from this URL first
        #[arg(long)]
        url: Option<String>,
        /// Output file
        #[arg(short, long, default_value = convert::DEFAULT_OUTPUT)]
        output: PathBuf,
    },

    /// Serve the dashboard page and datasets
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
        /// Directory served at /
        #[arg(long)]
        static_dir: Option<String>,
        /// Directory served at /data
        #[arg(long)]
        data_root: Option<String>,
    },

    /// Print the Chart.js configuration of the terminations chart
    Chart,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    sic3pro_dashboard::logging::init_tracing(&config.logging);

    match cli.command {
        Commands::Load { base_url, data_dir } => {
            apply_source(&mut config, base_url, data_dir);
            let loader = build_loader(&config);

            loader.load_all().await;
            print_panel(&loader).await;
        }

        Commands::Watch { base_url, data_dir } => {
            apply_source(&mut config, base_url, data_dir);
            watch(&config).await?;
        }

        Commands::Generate { output } => {
            let dir = output.unwrap_or_else(|| PathBuf::from(&config.data.data_dir));
            let now = chrono::Local::now().naive_local();
            let summary = generate(now).write_all(&dir).await?;

            println!("Datasets written to {:?}", dir);
            for file in &summary.files {
                println!("  {}", file);
            }
            println!("Total: {} bytes", summary.total_bytes);
        }

        Commands::Convert { input, url, output } => {
            let report = match (input, url) {
                (_, Some(url)) => {
                    let client = reqwest::Client::new();
                    convert::convert_url(&client, &url, &output).await?
                }
                (Some(input), None) => convert::convert_file(&input, &output).await?,
                (None, None) => anyhow::bail!("an input file or --url is required"),
            };

            println!(
                "Converted {} of {} tables to {:?}",
                report.tables.len(),
                report.metadata.tables_found,
                output
            );
        }

        Commands::Serve {
            host,
            port,
            static_dir,
            data_root,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(dir) = static_dir {
                config.server.static_dir = dir;
            }
            if let Some(dir) = data_root {
                config.server.data_root = dir;
            }

            let state = ServerState::from_config(&config.server);
            server::serve(state, &config.server).await?;
        }

        Commands::Chart => {
            let chart = BarChart::default();
            println!("{}", serde_json::to_string_pretty(&chart.chartjs_config())?);
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)
                        .with_context(|| format!("writing {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Command-line source flags win over the config file
fn apply_source(config: &mut Config, base_url: Option<String>, data_dir: Option<String>) {
    if let Some(url) = base_url {
        config.data.base_url = Some(url);
    }
    if let Some(dir) = data_dir {
        config.data.base_url = None;
        config.data.data_dir = dir;
    }
}

fn build_loader(config: &Config) -> Loader {
    let fetcher: Box<dyn DatasetFetcher> = match config.data.base_url {
        Some(_) => Box::new(HttpFetcher::new()),
        None => Box::new(FileFetcher),
    };

    let notifications = NotificationCenter::new(NotificationConfig {
        display: config.notifications.display(),
        ..Default::default()
    });

    DashboardLoader::new(
        config.data.registry(),
        fetcher,
        TextPanel::new(),
        notifications,
    )
}

async fn print_panel(loader: &Loader) {
    println!("{}", loader.view());
    for notification in loader.notifications().active().await {
        println!("[{}] {}", notification.severity, notification.message);
    }
}

async fn watch(config: &Config) -> anyhow::Result<()> {
    let loader = build_loader(config);
    let shutdown = CancellationToken::new();

    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
        });
    }

    let heartbeat = start_heartbeat(config.chart.heartbeat(), shutdown.clone());

    let mut events = loader.notifications().subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(NotificationEvent::Shown(n)) => println!("[{}] {}", n.severity, n.message),
                Ok(_) => {}
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if loader.load_with_cancel(&shutdown).await == LoadOutcome::Cancelled {
            tracing::info!("Load cancelled");
            break;
        }
        println!("{}", loader.view());

        println!("Press Enter to refresh, Ctrl+C to quit");
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(_) => continue,
                None => {
                    // stdin closed; stay up with the heartbeat until Ctrl+C
                    shutdown.cancelled().await;
                    break;
                }
            },
            _ = shutdown.cancelled() => break,
        }
    }

    shutdown.cancel();
    heartbeat.await?;
    printer.abort();

    tracing::info!("Dashboard closed");
    Ok(())
}
