use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use droidbrb_search::config::{AppConfig, ConfigLoader};
use droidbrb_search::geo::{
    calculate_distance, format_distance, GooglePlacesClient, GoogleGeocoder, SuggestionLookup,
};
use droidbrb_search::models::Coordinates;
use droidbrb_search::search::{JsonFileListingStore, SearchEngine, SearchFilters};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "droidbrb-search", about = "Find rentable robots near you", version)]
struct Cli {
    /// Configuration file (defaults to ./droidbrb.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search listings exported as a JSON array
    Search(SearchArgs),
    /// Suggest places for partial location text
    Suggest { input: String },
    /// Distance in miles between two points
    Distance {
        #[arg(allow_hyphen_values = true)]
        lat1: f64,
        #[arg(allow_hyphen_values = true)]
        lon1: f64,
        #[arg(allow_hyphen_values = true)]
        lat2: f64,
        #[arg(allow_hyphen_values = true)]
        lon2: f64,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// JSON file of listings
    #[arg(long, default_value = "demos/robots.json")]
    listings: PathBuf,
    #[arg(long)]
    query: Option<String>,
    /// Place name or zipcode
    #[arg(long)]
    location: Option<String>,
    /// Category name or "all"
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    min_price: Option<f64>,
    #[arg(long)]
    max_price: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,
    /// Radius in miles
    #[arg(long)]
    max_distance: Option<f64>,
    /// Only keep listings with this availability
    #[arg(long)]
    available: Option<bool>,
    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

impl SearchArgs {
    fn filters(&self) -> SearchFilters {
        SearchFilters {
            query: self.query.clone(),
            location: self.location.clone(),
            category: self.category.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            user_latitude: self.lat,
            user_longitude: self.lon,
            max_distance: self.max_distance,
            is_available: self.available,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    let config = loader.load().context("Failed to load configuration")?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .context("Invalid logging level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Search(args) => search(&config, args).await,
        Command::Suggest { input } => suggest(&config, &input).await,
        Command::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => {
            let distance =
                calculate_distance(Coordinates::new(lat1, lon1), Coordinates::new(lat2, lon2));
            println!("{} ({})", distance, format_distance(distance));
            Ok(())
        }
    }
}

async fn search(config: &AppConfig, args: SearchArgs) -> anyhow::Result<()> {
    let store = JsonFileListingStore::new(&args.listings);
    let geocoder = GoogleGeocoder::new(&config.geocoding)?;
    let engine = SearchEngine::new(Arc::new(store), Arc::new(geocoder));

    let results = engine.search_robots_with_distance(&args.filters()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    info!("Found {} robots", results.len());
    for (i, hit) in results.iter().enumerate() {
        let listing = &hit.listing;
        println!("{}. {} (${:.2}/day)", i + 1, listing.name, listing.price);
        println!("   {} · {}", listing.category, listing.location);
        if let Some(distance) = hit.distance {
            println!("   {} away", format_distance(distance));
        }
        println!("   ID: {}", listing.id);
        println!();
    }

    Ok(())
}

async fn suggest(config: &AppConfig, input: &str) -> anyhow::Result<()> {
    let client = GooglePlacesClient::new(&config.places)?;
    let lookup =
        SuggestionLookup::with_min_chars(Arc::new(client), config.search.min_suggestion_chars);

    for suggestion in lookup.get_location_suggestions(input).await {
        println!("{}  [{}]", suggestion.description, suggestion.place_id);
    }

    Ok(())
}
