use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use bayut_client::{
    Agency, AgencySearch, AgencySlug, BayutClient, Category, Config, FilterCoordinator, FilterSet,
    FurnishingStatus, PagedFetcher, PropertySummary, Purpose, RentFrequency, Result,
    DEFAULT_PAGE_SIZE,
};
use bayut_client::{BayutError, PageSource};

#[derive(Parser)]
#[command(name = "bayut")]
#[command(about = "Search the Bayut real-estate listings API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Location auto-complete for a free-text query
    Suggest {
        /// Search text
        query: String,
    },

    /// Search property listings with filters
    Search {
        /// Location external ID (e.g. 5002 for Dubai)
        #[arg(long, default_value = "5002")]
        location_id: String,

        /// Transaction type: for-sale or for-rent
        #[arg(long)]
        purpose: Option<Purpose>,

        /// Property category (e.g. apartment, villas, office)
        #[arg(long)]
        category: Option<Category>,

        /// Minimum rooms
        #[arg(long)]
        rooms_min: Option<u32>,

        /// Maximum rooms
        #[arg(long)]
        rooms_max: Option<u32>,

        /// Minimum bathrooms
        #[arg(long)]
        baths_min: Option<u32>,

        /// Maximum bathrooms
        #[arg(long)]
        baths_max: Option<u32>,

        /// Furnishing status: furnished or unfurnished
        #[arg(long)]
        furnishing: Option<FurnishingStatus>,

        /// Rent frequency: daily, weekly, monthly, yearly
        #[arg(long)]
        rent_frequency: Option<RentFrequency>,

        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: u32,
    },

    /// Full record for one listing
    Detail {
        /// Listing external ID
        external_id: String,
    },

    /// Search the agency directory
    Agencies {
        /// Search text (empty lists all)
        #[arg(default_value = "")]
        query: String,

        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: u32,
    },

    /// Listings published by one agency
    Listings {
        /// Agency slug
        slug: String,

        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: u32,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set a configuration value (api_key, agencies_api_key, debounce_ms)
    Set { key: String, value: String },

    /// Print the current configuration file location and contents
    Show,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn client() -> Result<BayutClient> {
    let config = Config::load()?;
    BayutClient::from_config(&config)
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Suggest { query } => {
            let hits = client()?.auto_complete(&query).await?;
            if hits.is_empty() {
                println!("no suggestions");
            }
            for hit in hits {
                println!("{}\t{}", hit.external_id, hit.name);
            }
            Ok(())
        }

        Commands::Search {
            location_id,
            purpose,
            category,
            rooms_min,
            rooms_max,
            baths_min,
            baths_max,
            furnishing,
            rent_frequency,
            pages,
        } => {
            let filters = FilterSet {
                location_external_ids: Some(location_id),
                purpose,
                category,
                rooms_min,
                rooms_max,
                baths_min,
                baths_max,
                furnishing_status: furnishing,
                rent_frequency,
            };

            let coordinator =
                FilterCoordinator::new(Arc::new(client()?), FilterSet::default());
            coordinator.apply_filters(filters).await;
            for _ in 1..pages {
                if !coordinator.load_next_page().await {
                    break;
                }
            }

            let snapshot = coordinator.snapshot();
            if snapshot.failed && snapshot.items.is_empty() {
                return Err(BayutError::Api("listing fetch failed".to_string()));
            }
            for item in &snapshot.items {
                print_property(item);
            }
            println!(
                "{} listings{}",
                snapshot.items.len(),
                if snapshot.has_more { " (more available)" } else { "" }
            );
            Ok(())
        }

        Commands::Detail { external_id } => {
            let detail = client()?.property_detail(&external_id).await?;
            println!("{}", detail.title);
            println!("price: {}", detail.price);
            println!("rooms: {}  baths: {}  area: {:.0}", detail.rooms, detail.baths, detail.area);
            if let Some(contact) = &detail.contact_name {
                println!("contact: {}", contact);
            }
            if !detail.description.is_empty() {
                println!("\n{}", detail.description);
            }
            Ok(())
        }

        Commands::Agencies { query, pages } => {
            let source: Arc<dyn PageSource<AgencySearch, Agency>> = Arc::new(client()?);
            let fetcher = PagedFetcher::new(source, AgencySearch(query), DEFAULT_PAGE_SIZE);
            load_pages(&fetcher, pages).await?;

            for agency in &fetcher.snapshot().items {
                let agents = agency
                    .agents_count
                    .map(|n| format!("{} agents", n))
                    .unwrap_or_default();
                println!("{}\t{}\t{}", agency.slug, agency.name, agents);
            }
            Ok(())
        }

        Commands::Listings { slug, pages } => {
            let source: Arc<dyn PageSource<AgencySlug, PropertySummary>> = Arc::new(client()?);
            let fetcher = PagedFetcher::new(source, AgencySlug(slug), DEFAULT_PAGE_SIZE);
            load_pages(&fetcher, pages).await?;

            for item in &fetcher.snapshot().items {
                print_property(item);
            }
            Ok(())
        }

        Commands::Config { command } => match command {
            ConfigCommands::Set { key, value } => {
                let mut config = Config::load()?;
                match key.as_str() {
                    "api_key" => config.set_api_key(value),
                    "agencies_api_key" => config.set_agencies_api_key(value),
                    "debounce_ms" => {
                        let ms = value.parse().map_err(|_| {
                            BayutError::Config(format!("invalid debounce_ms '{}'", value))
                        })?;
                        config.debounce_ms = Some(ms);
                    }
                    _ => {
                        return Err(BayutError::Config(format!(
                            "unknown config key '{}'",
                            key
                        )));
                    }
                }
                config.save()?;
                Ok(())
            }
            ConfigCommands::Show => {
                println!("path: {}", Config::config_path()?.display());
                let config = Config::load()?;
                print!("{}", serde_yaml_ng::to_string(&config)?);
                Ok(())
            }
        },
    }
}

async fn load_pages<C, T>(fetcher: &PagedFetcher<C, T>, pages: u32) -> Result<()>
where
    C: Clone + Send + Sync,
    T: Send + Clone,
{
    for _ in 0..pages {
        if !fetcher.load_next_page().await {
            break;
        }
    }
    let snapshot = fetcher.snapshot();
    if snapshot.failed && snapshot.items.is_empty() {
        return Err(BayutError::Api("list fetch failed".to_string()));
    }
    Ok(())
}

fn print_property(item: &PropertySummary) {
    let purpose = item
        .purpose
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".to_string());
    let external = item.external_id.as_deref().unwrap_or("-");
    println!(
        "{}\t{}\t{}\t{} rooms / {} baths\t{}",
        external, purpose, item.price, item.rooms, item.baths, item.title
    );
}
