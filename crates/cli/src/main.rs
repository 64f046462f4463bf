//! Order Desk CLI - browse and manage orders from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # First page of shipped orders, biggest first
//! order-desk list --status shipped --sort total --order desc
//!
//! # Stats for January
//! order-desk stats --from 2026-01-01 --to 2026-01-31
//!
//! # Move one order forward
//! order-desk set-status 1001 processing
//!
//! # Ship several orders on the current page
//! order-desk bulk-status shipped --ids 1001,1002,1003
//!
//! # Export pending orders as CSV
//! order-desk export --status pending --out pending.csv
//! ```
//!
//! # Environment Variables
//!
//! - `ORDER_DESK_API_URL` - Orders API base URL (required)
//! - `ORDER_DESK_API_TOKEN` - Bearer token (optional)
//! - `ORDER_DESK_LOG_FORMAT` - `text` or `json`
//! - `RUST_LOG` - log filter (default: `order_desk_admin=info,order_desk_cli=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use order_desk_admin::config::{AdminConfig, LogFormat};
use order_desk_admin::{AppError, OrderListController, OrdersApiClient};
use order_desk_core::{OrderId, OrderStatus};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::{FilterArgs, SortArgs};

#[derive(Parser)]
#[command(name = "order-desk")]
#[command(author, version, about = "Order Desk CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of orders
    List {
        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        sort: SortArgs,

        /// Page number (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Show order stats
    Stats {
        /// Start date (YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<chrono::NaiveDate>,

        /// End date (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<chrono::NaiveDate>,
    },
    /// Change one order's status
    SetStatus {
        /// Order id (e.g. 1001 or #1001)
        id: OrderId,

        /// New status
        status: OrderStatus,
    },
    /// Change the status of several orders on one page
    BulkStatus {
        /// New status
        status: OrderStatus,

        /// Order ids, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<OrderId>,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        sort: SortArgs,

        /// Page the orders are on
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Export orders matching the filters as CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output file (defaults to the name suggested by the server)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AdminConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(log_format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "order_desk_admin=info,order_desk_cli=info".into());

    let is_json = log_format == LogFormat::Json;
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AdminConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt().with_writer(std::io::stderr).init();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let sentry_guard = init_sentry(&config);
    init_tracing(config.log_format);

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        drop(sentry_guard);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli, config: &AdminConfig) -> Result<(), AppError> {
    let client = OrdersApiClient::new(&config.api)?;
    let mut controller = OrderListController::new(client, config.page_size);
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::List {
            filters,
            sort,
            page,
        } => commands::list::run(&mut controller, &filters, &sort, page, &mut out).await?,
        Commands::Stats { from, to } => {
            commands::stats::run(&mut controller, from, to, &mut out).await?;
        }
        Commands::SetStatus { id, status } => {
            commands::status::set(&mut controller, id, status, &mut out).await?;
        }
        Commands::BulkStatus {
            status,
            ids,
            filters,
            sort,
            page,
        } => {
            commands::status::bulk(
                &mut controller,
                status,
                &ids,
                &filters,
                &sort,
                page,
                &mut out,
            )
            .await?;
        }
        Commands::Export { filters, out: path } => {
            commands::export::run(&mut controller, &filters, path, &mut out).await?;
        }
    }
    Ok(())
}
