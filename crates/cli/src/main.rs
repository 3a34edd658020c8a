//! Yummeal CLI - browse restaurants, build a cart and place orders.
//!
//! # Usage
//!
//! ```bash
//! # Restaurants near a location
//! yummeal restaurants --location Chicago --cuisine Vegan
//!
//! # Catalog items filtered by nutrition
//! yummeal foods --high-protein --max-calories 400
//!
//! # Sign in (password from --password or YUMMEAL_PASSWORD)
//! yummeal login --email user@example.com
//!
//! # Order two quinoa bowls and a smoothie for pickup
//! yummeal order --item 1:2 --item 7 --pickup
//! ```
//!
//! # Commands
//!
//! - `restaurants`, `cuisines`, `menu`, `popular` - Restaurant listings
//! - `foods` - Filter the food catalog
//! - `login`, `signup`, `logout`, `whoami` - Session management
//! - `order` - Place an order

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yummeal_storefront::StoreConfig;
use yummeal_storefront::filters::{FoodFilter, MAX_CALORIES, MenuCategory};

mod commands;

use commands::order::ItemSpec;

#[derive(Parser)]
#[command(name = "yummeal")]
#[command(author, version, about = "Yummeal food-delivery storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List restaurants for a location
    Restaurants {
        #[command(flatten)]
        location: LocationArg,

        /// Only restaurants whose name or cuisine contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Only restaurants with exactly this cuisine
        #[arg(short, long)]
        cuisine: Option<String>,
    },
    /// List the cuisines available at a location
    Cuisines {
        #[command(flatten)]
        location: LocationArg,
    },
    /// Show a restaurant's mains and sides
    Menu {
        /// Restaurant ID
        restaurant_id: String,

        #[command(flatten)]
        location: LocationArg,

        /// Only dishes whose name or description contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Filter the food catalog by nutrition
    Foods(FoodArgs),
    /// Featured restaurants and popular dishes
    Popular {
        #[command(flatten)]
        location: LocationArg,
    },
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "YUMMEAL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Signup {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "YUMMEAL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in customer
    Whoami,
    /// Build a cart from catalog items and place an order
    Order {
        /// Item to order as ID or ID:QTY (repeatable)
        #[arg(short, long = "item", required = true, value_parser = ItemSpec::parse)]
        items: Vec<ItemSpec>,

        /// Collect the order instead of having it delivered
        #[arg(long)]
        pickup: bool,
    },
}

#[derive(Args)]
struct LocationArg {
    /// Location to list restaurants for (default: `YUMMEAL_LOCATION`)
    #[arg(short, long)]
    location: Option<String>,
}

#[derive(Args)]
struct FoodArgs {
    /// Only dishes whose name or description contains this text
    #[arg(short, long, default_value = "")]
    search: String,

    #[arg(long, default_value_t = 0)]
    min_calories: u32,

    #[arg(long, default_value_t = MAX_CALORIES)]
    max_calories: u32,

    /// At most 300 calories
    #[arg(long)]
    low_calorie: bool,

    /// At least 20 g protein
    #[arg(long)]
    high_protein: bool,

    /// At most 30 g carbohydrates
    #[arg(long)]
    low_carb: bool,

    #[arg(long)]
    vegan: bool,

    /// `all`, `meals` or `salads`
    #[arg(long, default_value = "all")]
    category: MenuCategory,
}

impl From<FoodArgs> for FoodFilter {
    fn from(args: FoodArgs) -> Self {
        Self {
            search: args.search,
            min_calories: args.min_calories,
            max_calories: args.max_calories,
            low_calorie: args.low_calorie,
            high_protein: args.high_protein,
            low_carb: args.low_carb,
            vegan: args.vegan,
            category: args.category,
        }
    }
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StoreConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration errors are reported once tracing is up
    let config = StoreConfig::from_env();

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "yummeal_storefront=info,yummeal_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mut config: StoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Restaurants {
            location,
            search,
            cuisine,
        } => {
            location.apply(&mut config);
            commands::catalog::restaurants(&config, search, cuisine).await?;
        }
        Commands::Cuisines { location } => {
            location.apply(&mut config);
            commands::catalog::cuisines(&config).await?;
        }
        Commands::Menu {
            restaurant_id,
            location,
            search,
        } => {
            location.apply(&mut config);
            commands::catalog::menu(&config, &restaurant_id, search.as_deref()).await?;
        }
        Commands::Foods(args) => commands::catalog::foods(&FoodFilter::from(args)),
        Commands::Popular { location } => {
            location.apply(&mut config);
            commands::catalog::popular(&config).await?;
        }
        Commands::Login { email, password } => {
            commands::account::login(&config, &email, password.into()).await?;
        }
        Commands::Signup {
            name,
            email,
            password,
        } => {
            commands::account::signup(&config, &name, &email, password.into()).await?;
        }
        Commands::Logout => commands::account::logout(&config).await?,
        Commands::Whoami => commands::account::whoami(&config).await?,
        Commands::Order { items, pickup } => {
            commands::order::place(&config, &items, pickup).await?;
        }
    }
    Ok(())
}

impl LocationArg {
    fn apply(self, config: &mut StoreConfig) {
        if let Some(location) = self.location {
            config.default_location = location;
        }
    }
}
