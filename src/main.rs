use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use film_catalog::catalog::{FilmRecord, RatingTier, UNKNOWN_FIELD};
use film_catalog::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_DB_CACHE_TTL_SEC, DEFAULT_FETCH_TIMEOUT_SEC,
    DEFAULT_LOOKUP_TTL_SEC, DEFAULT_MAX_RESULTS,
};
use film_catalog::lookup::{CachedLookup, FilmDetails, FilmLookup, OmdbLookup};
use film_catalog::search::{query, FilterSpec, QueryOutcome, ResultGroup, SortField, SortSpec};
use film_catalog::source::{fetcher_for_source, DEFAULT_TABLE};
use film_catalog::CatalogService;
use futures::future::join_all;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

fn parse_tier(s: &str) -> Result<RatingTier, String> {
    RatingTier::from_name(s).ok_or_else(|| format!("Unknown rating tier: {}", s))
}

#[derive(Parser, Debug)]
#[clap(version = concat!(env!("CARGO_PKG_VERSION"), "-", env!("GIT_HASH")))]
struct CliArgs {
    /// Path to a TOML config file. Values in the file override CLI flags.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// URL or local path of the SQLite film database.
    #[clap(long)]
    pub source: Option<String>,

    /// Name of the film table.
    #[clap(long, default_value = DEFAULT_TABLE)]
    pub table: String,

    /// How long a fetched database stays fresh, in seconds.
    #[clap(long, default_value_t = DEFAULT_DB_CACHE_TTL_SEC)]
    pub db_cache_ttl_sec: u64,

    /// Timeout in seconds for fetching the database.
    #[clap(long, default_value_t = DEFAULT_FETCH_TIMEOUT_SEC)]
    pub fetch_timeout_sec: u64,

    /// How long poster and plot lookups stay cached, in seconds.
    #[clap(long, default_value_t = DEFAULT_LOOKUP_TTL_SEC)]
    pub lookup_ttl_sec: u64,

    /// OMDb API key used for poster and plot lookups.
    #[clap(long, env = "OMDB_API_KEY", hide_env_values = true)]
    pub omdb_api_key: Option<String>,

    /// Maximum number of titles to print.
    #[clap(long, default_value_t = DEFAULT_MAX_RESULTS)]
    pub limit: usize,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the catalog.
    Search {
        /// Case-insensitive title fragment.
        text: Option<String>,

        /// Only show one rating tier (star4, star3, star2, star1, classic, box, unrated).
        #[clap(long, value_parser = parse_tier)]
        tier: Option<RatingTier>,

        /// Only show films that were never seen.
        #[clap(long)]
        unseen: bool,

        /// Sort field.
        #[clap(long, default_value = "title")]
        sort: SortField,

        /// Sort descending.
        #[clap(long)]
        desc: bool,

        /// Fetch poster and plot for each title.
        #[clap(long)]
        details: bool,

        /// Print results as JSON.
        #[clap(long)]
        json: bool,
    },
    /// Print the number of distinct titles per rating tier.
    Badges,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            source: self.source.clone(),
            table: self.table.clone(),
            db_cache_ttl_sec: self.db_cache_ttl_sec,
            fetch_timeout_sec: self.fetch_timeout_sec,
            max_results: self.limit,
            omdb_api_key: self.omdb_api_key.clone(),
            lookup_ttl_sec: self.lookup_ttl_sec,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;
    debug!("Resolved config: {:?}", config);

    let fetcher = fetcher_for_source(&config.source)?;
    let service = CatalogService::new(fetcher, config.refresh_settings());
    let index = service
        .snapshot()
        .await
        .with_context(|| format!("Failed to load catalog from {}", config.source))?;

    match cli_args.command {
        Command::Badges => {
            for (tier, count) in index.badge_counts() {
                println!("{:<10} {}", tier.label(), count);
            }
        }
        Command::Search {
            text,
            tier,
            unseen,
            sort,
            desc,
            details,
            json,
        } => {
            let filter = FilterSpec {
                search: text,
                tier,
                unseen_only: unseen,
            };
            let sort = SortSpec {
                field: sort,
                ascending: !desc,
            };

            let groups = match query(&index, &filter, &sort) {
                QueryOutcome::Idle => {
                    println!("Type a title fragment or pick a rating tier to search.");
                    return Ok(());
                }
                QueryOutcome::Groups(groups) => groups,
            };

            if groups.is_empty() && !json {
                println!("No films found.");
                return Ok(());
            }

            let lookup = if details {
                let omdb = OmdbLookup::new(
                    &config.lookup.base_url,
                    config.lookup.api_key.clone(),
                    Duration::from_secs(config.fetch_timeout_sec),
                )?;
                if !omdb.has_credentials() {
                    warn!("No OMDb API key configured, details will be empty");
                }
                Some(CachedLookup::new(
                    Arc::new(omdb),
                    Duration::from_secs(config.lookup.ttl_sec),
                ))
            } else {
                None
            };

            let shown: Vec<&ResultGroup<'_>> = groups.iter().take(config.max_results).collect();
            let details: Vec<Option<FilmDetails>> = match &lookup {
                Some(lookup) => {
                    join_all(
                        shown
                            .iter()
                            .map(|group| fetch_details(lookup, group.key.external_id())),
                    )
                    .await
                }
                None => vec![None; shown.len()],
            };

            if json {
                let view = search_view(&groups, details);
                println!("{}", serde_json::to_string_pretty(&view)?);
                return Ok(());
            }

            for (group, details) in shown.iter().zip(&details) {
                print_group(group);
                if let Some(details) = details {
                    print_details(details);
                }
                println!();
            }
            if groups.len() > shown.len() {
                println!(
                    "... {} more titles, refine your search.",
                    groups.len() - shown.len()
                );
            }
        }
    }

    Ok(())
}

/// JSON search output. `total` counts every matching title, `groups` holds
/// at most `max_results` of them.
#[derive(Serialize)]
struct SearchView<'a> {
    total: usize,
    truncated: bool,
    groups: Vec<GroupView<'a>>,
}

#[derive(Serialize)]
struct GroupView<'a> {
    #[serde(flatten)]
    group: &'a ResultGroup<'a>,
    details: Option<FilmDetails>,
}

/// Pair the first `details.len()` groups with their details.
fn search_view<'a>(
    groups: &'a [ResultGroup<'a>],
    details: Vec<Option<FilmDetails>>,
) -> SearchView<'a> {
    SearchView {
        total: groups.len(),
        truncated: groups.len() > details.len(),
        groups: groups
            .iter()
            .zip(details)
            .map(|(group, details)| GroupView { group, details })
            .collect(),
    }
}

fn seen_marker(record: &FilmRecord) -> String {
    if record.is_seen() {
        format!("last seen: {}", record.last_seen.trim())
    } else {
        "never seen".to_string()
    }
}

fn print_group(group: &ResultGroup<'_>) {
    let lead = group.lead();
    let year = lead
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| UNKNOWN_FIELD.to_string());
    let duration = lead
        .duration_minutes
        .map(|m| format!("{} min", m))
        .unwrap_or_else(|| UNKNOWN_FIELD.to_string());

    println!(
        "{} ({}) | {} | {} | {}",
        lead.title,
        year,
        duration,
        seen_marker(lead),
        lead.rating_tier
    );

    for record in &group.records {
        let tech = record.tech_meta.clone().unwrap_or_default();
        println!(
            "    {} | {} | {} | {}",
            tech.resolution, tech.codec, tech.file_name, record.file_size_display
        );
    }
}

fn print_details(details: &FilmDetails) {
    if let Some(poster) = &details.poster_url {
        println!("    poster: {}", poster);
    }
    if let Some(plot) = &details.plot {
        println!("    plot: {}", plot);
    }
}

async fn fetch_details(lookup: &CachedLookup, external_id: Option<&str>) -> Option<FilmDetails> {
    let external_id = external_id?;
    match lookup.lookup(external_id).await {
        Ok(details) => Some(details),
        Err(err) => {
            warn!("Lookup for {} failed: {}", external_id, err);
            None
        }
    }
}
