//! Creator Trust: creator marketplace store driven from the command line.
//!
//! Loads configuration, builds one in-memory store, optionally seeds the demo
//! marketplace and prints query results as JSON on stdout. Logs go to stderr.

use clap::{Parser, Subcommand};
use creator_trust_core::config::{AppConfig, LoggingConfig};
use creator_trust_marketplace::models::{CampaignFilter, CampaignStatus, CreatorSearch, Platform};
use creator_trust_marketplace::{seed_demo_data, DemoSummary, MarketplaceStore};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "creator-trust")]
#[command(about = "Creator marketplace with escrowed campaign payments")]
#[command(version)]
struct Cli {
    /// Start with an empty store instead of the demo marketplace
    #[arg(long, global = true, default_value_t = false)]
    no_seed: bool,

    /// Record metrics with a Prometheus recorder and print them on exit
    #[arg(long, global = true, default_value_t = false)]
    metrics: bool,

    /// Prefix for generated payment references (overrides config)
    #[arg(long, env = "CREATOR_TRUST__MARKETPLACE__PAYMENT_REFERENCE_PREFIX")]
    payment_reference_prefix: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Seed the demo marketplace and print every dashboard
    Demo,
    /// Store-wide totals
    Overview,
    /// Search creator profiles
    Search {
        #[arg(long)]
        niche: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// Minimum followers summed across platforms
        #[arg(long)]
        min_followers: Option<u64>,
        /// Only creators with a handle on this platform
        #[arg(long)]
        platform: Option<Platform>,
    },
    /// List campaigns
    Campaigns {
        #[arg(long)]
        status: Option<CampaignStatus>,
        #[arg(long)]
        niche: Option<String>,
        #[arg(long)]
        budget_min: Option<f64>,
        #[arg(long)]
        budget_max: Option<f64>,
    },
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter.as_str().into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = AppConfig::load();
    let mut config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => AppConfig::default(),
    };
    init_tracing(&config.logging);
    if let Err(e) = loaded {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
    }

    // Apply CLI overrides
    if let Some(prefix) = cli.payment_reference_prefix {
        config.marketplace.payment_reference_prefix = prefix;
    }
    if cli.no_seed {
        config.marketplace.seed_demo_data = false;
    }

    let prometheus = if cli.metrics {
        Some(metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?)
    } else {
        None
    };

    info!(
        seed_demo_data = config.marketplace.seed_demo_data,
        payment_reference_prefix = %config.marketplace.payment_reference_prefix,
        "Configuration loaded"
    );

    let store = Arc::new(MarketplaceStore::new(&config.marketplace));
    let seeded = if config.marketplace.seed_demo_data {
        Some(seed_demo_data(&store)?)
    } else {
        None
    };

    let output = match cli.command {
        Commands::Demo => {
            let summary = match seeded {
                Some(summary) => summary,
                None => seed_demo_data(&store)?,
            };
            demo_report(&store, &summary)
        }
        Commands::Overview => serde_json::to_value(store.get_overview())?,
        Commands::Search {
            niche,
            location,
            min_followers,
            platform,
        } => {
            let query = CreatorSearch {
                niche,
                location,
                min_followers,
                platform,
            };
            serde_json::to_value(store.search_creators(&query))?
        }
        Commands::Campaigns {
            status,
            niche,
            budget_min,
            budget_max,
        } => {
            let filter = CampaignFilter {
                status,
                niche,
                budget_min,
                budget_max,
            };
            serde_json::to_value(store.list_campaigns(&filter))?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    if let Some(handle) = prometheus {
        eprintln!("{}", handle.render());
    }
    Ok(())
}

fn demo_report(store: &MarketplaceStore, summary: &DemoSummary) -> serde_json::Value {
    let brands: Vec<_> = summary
        .brand_users
        .iter()
        .map(|id| {
            json!({
                "dashboard": store.brand_dashboard(*id),
                "analytics": store.brand_analytics(*id),
            })
        })
        .collect();
    let creators: Vec<_> = summary
        .creator_users
        .iter()
        .map(|id| {
            json!({
                "dashboard": store.creator_dashboard(*id),
                "analytics": store.creator_analytics(*id),
            })
        })
        .collect();
    let campaigns: Vec<_> = summary
        .campaigns
        .iter()
        .map(|id| {
            json!({
                "detail": store.campaign_detail(*id),
                "analytics": store.campaign_analytics(*id),
                "payment": store.get_payment_by_campaign(*id),
            })
        })
        .collect();

    json!({
        "summary": summary,
        "overview": store.get_overview(),
        "brands": brands,
        "creators": creators,
        "campaigns": campaigns,
    })
}
