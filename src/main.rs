//! Decora CLI

use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;
use tracing::debug;

use decora::{
    calculator::{CalculatorError, CurtainJob, RollSpec, Surface, WallpaperJob},
    cart::{Cart, CartError},
    catalog::{Catalog, CatalogError, ProductQuery, SortOrder},
    config::{LoggingConfig, Settings, SettingsError},
    fixtures::{Fixture, FixtureError},
    observability,
    prices::{DEFAULT_CURRENCY, PriceError, from_major},
    pricing::{PaymentMethod, PricingError, QuoteRequest, Services},
    products::{Category, ProductDetails},
};

/// Decora storefront tools
#[derive(Debug, Parser)]
#[command(name = "decora", about = "Decora storefront tools", long_about = None)]
struct Cli {
    /// Settings file (YAML)
    #[arg(long, env = "DECORA_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Fixture directory
    #[arg(long, env = "DECORA_FIXTURES", default_value = "./fixtures", global = true)]
    fixtures: PathBuf,

    /// Fixture set name
    #[arg(long, env = "DECORA_FIXTURE_SET", default_value = "decora", global = true)]
    fixture_set: String,

    /// Logging output settings.
    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List and filter the catalog
    Catalog(CatalogArgs),

    /// Price a cart
    Quote(QuoteArgs),

    /// Estimate wallpaper rolls for a set of walls
    Wallpaper(WallpaperArgs),

    /// Estimate curtain fabric for a window
    Curtain(CurtainArgs),
}

#[derive(Debug, Args)]
struct CatalogArgs {
    /// Category slug (papel-de-parede, cortinas, decoracao)
    #[arg(long, value_parser = parse_category)]
    category: Option<Category>,

    /// Text to look for in name, description and tags
    #[arg(long)]
    search: Option<String>,

    /// Minimum price
    #[arg(long)]
    min_price: Option<Decimal>,

    /// Maximum price
    #[arg(long)]
    max_price: Option<Decimal>,

    /// Only featured products
    #[arg(long)]
    featured: bool,

    /// Only products in stock
    #[arg(long)]
    in_stock: bool,

    /// Sort order
    #[arg(long, value_enum, default_value_t = SortOrder::Relevance)]
    sort: SortOrder,
}

#[derive(Debug, Args)]
struct QuoteArgs {
    /// Cart line as PRODUCT_ID:QUANTITY (repeatable)
    #[arg(long = "item", value_parser = parse_item, required = true)]
    items: Vec<(String, u32)>,

    /// Coupon code
    #[arg(long)]
    coupon: Option<String>,

    /// Book professional installation
    #[arg(long)]
    installation: bool,

    /// Book a measurement visit
    #[arg(long)]
    measurement: bool,

    /// Payment method
    #[arg(long, value_enum)]
    payment: Option<PaymentMethod>,

    /// Credit card installments
    #[arg(long, default_value_t = 1)]
    installments: u32,
}

#[derive(Debug, Args)]
struct WallpaperArgs {
    /// Wall as WIDTHxHEIGHT in metres (repeatable)
    #[arg(long = "wall", value_parser = parse_surface, required = true)]
    walls: Vec<Surface>,

    /// Door or window as WIDTHxHEIGHT in metres (repeatable)
    #[arg(long = "opening", value_parser = parse_surface)]
    openings: Vec<Surface>,

    /// Take the roll size from a wallpaper product
    #[arg(long)]
    product: Option<String>,

    /// Waste allowance as a fraction
    #[arg(long, default_value = "0.10")]
    waste: Decimal,
}

#[derive(Debug, Args)]
struct CurtainArgs {
    /// Window width in metres
    #[arg(long)]
    width: Decimal,

    /// Window height in metres
    #[arg(long)]
    height: Decimal,

    /// Fabric width per metre of window
    #[arg(long, default_value = "2.0")]
    fullness: Decimal,

    /// Fabric bolt width in metres
    #[arg(long, default_value = "2.80")]
    bolt_width: Decimal,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Price(#[from] PriceError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Calculator(#[from] CalculatorError),

    #[error("product {0} is not a wallpaper")]
    NotWallpaper(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

fn parse_category(s: &str) -> Result<Category, String> {
    Category::from_slug(s).ok_or_else(|| format!("unknown category: {s}"))
}

fn parse_item(s: &str) -> Result<(String, u32), String> {
    let Some((id, quantity)) = s.split_once(':') else {
        return Ok((s.to_string(), 1));
    };

    let quantity = quantity
        .parse::<u32>()
        .map_err(|err| format!("invalid quantity in {s}: {err}"))?;

    Ok((id.to_string(), quantity))
}

fn parse_surface(s: &str) -> Result<Surface, String> {
    let (width, height) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s}"))?;

    let width = width
        .trim()
        .parse::<Decimal>()
        .map_err(|err| format!("invalid width in {s}: {err}"))?;
    let height = height
        .trim()
        .parse::<Decimal>()
        .map_err(|err| format!("invalid height in {s}: {err}"))?;

    Ok(Surface::new(width, height))
}

fn load_settings(cli: &Cli) -> Result<Settings, CliError> {
    match &cli.config {
        Some(path) => Ok(Settings::load(path)?),
        None => Ok(Settings::default()),
    }
}

fn load_catalog(cli: &Cli) -> Result<Catalog, CliError> {
    let catalog = Fixture::with_base_path(&cli.fixtures).load_catalog(&cli.fixture_set)?;

    debug!(products = catalog.len(), set = %cli.fixture_set, "catalog loaded");

    Ok(catalog)
}

fn run_catalog(cli: &Cli, args: &CatalogArgs, out: &mut impl Write) -> Result<(), CliError> {
    let catalog = load_catalog(cli)?;
    let currency = DEFAULT_CURRENCY;

    let query = ProductQuery {
        category: args.category,
        search: args.search.clone(),
        min_price: args.min_price.map(|amount| from_major(amount, currency)).transpose()?,
        max_price: args.max_price.map(|amount| from_major(amount, currency)).transpose()?,
        featured_only: args.featured,
        in_stock_only: args.in_stock,
        sort: args.sort,
    };

    let mut builder = Builder::default();

    builder.push_record(["Id", "Name", "Category", "Price", "Stock", "Rating"]);

    for product in catalog.search(&query) {
        builder.push_record([
            product.id.clone(),
            product.name.clone(),
            product.category().to_string(),
            format!("{}", product.price),
            product.stock.to_string(),
            product.rating.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..6), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

fn run_quote(cli: &Cli, args: &QuoteArgs, out: &mut impl Write) -> Result<(), CliError> {
    let settings = load_settings(cli)?;
    let catalog = load_catalog(cli)?;
    let coupons = Fixture::with_base_path(&cli.fixtures).load_coupons(&cli.fixture_set)?;

    let mut cart = Cart::default();

    for (id, quantity) in &args.items {
        cart.add_item(catalog.get(id)?.clone(), *quantity)?;
    }

    if let Some(code) = &args.coupon {
        cart.apply_coupon(code, &coupons)?;
    }

    let request = QuoteRequest {
        services: Services {
            installation: args.installation,
            measurement: args.measurement,
        },
        payment: args.payment,
    };

    let quote = cart.quote(&request, &settings.pricing)?;

    quote.write_to(out)?;

    if args.installments > 1 {
        let installments = quote.installments(args.installments, settings.pricing.max_installments)?;

        if let Some(first) = installments.first() {
            writeln!(out, "{}x of {first}", installments.len())?;
        }
    }

    Ok(())
}

fn run_wallpaper(cli: &Cli, args: &WallpaperArgs, out: &mut impl Write) -> Result<(), CliError> {
    let mut job = WallpaperJob::new(args.walls.clone());

    job.openings.clone_from(&args.openings);
    job.waste = args.waste;

    if let Some(id) = &args.product {
        let catalog = load_catalog(cli)?;
        let product = catalog.get(id)?;

        let ProductDetails::Wallpaper(attributes) = &product.details else {
            return Err(CliError::NotWallpaper(id.clone()));
        };

        job = job.with_roll(RollSpec::from(attributes));
    }

    let estimate = job.estimate()?;

    writeln!(out, "Area: {} m²", estimate.area_m2.normalize())?;
    writeln!(
        out,
        "Area with waste: {} m²",
        estimate.area_with_waste_m2.normalize()
    )?;
    writeln!(out, "Rolls: {}", estimate.rolls)?;

    Ok(())
}

fn run_curtain(args: &CurtainArgs, out: &mut impl Write) -> Result<(), CliError> {
    let job = CurtainJob {
        fullness: args.fullness,
        bolt_width_m: args.bolt_width,
        ..CurtainJob::new(Surface::new(args.width, args.height))
    };

    let estimate = job.estimate()?;

    writeln!(out, "Fabric width: {} m", estimate.fabric_width_m.normalize())?;
    writeln!(out, "Panels: {}", estimate.panels)?;
    writeln!(out, "Cut length: {} m", estimate.cut_length_m.normalize())?;
    writeln!(out, "Fabric to buy: {} m", estimate.total_fabric_m.normalize())?;

    Ok(())
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let mut out = io::stdout().lock();

    match &cli.command {
        Command::Catalog(args) => run_catalog(cli, args, &mut out),
        Command::Quote(args) => run_quote(cli, args, &mut out),
        Command::Wallpaper(args) => run_wallpaper(cli, args, &mut out),
        Command::Curtain(args) => run_curtain(args, &mut out),
    }
}

fn main() -> ExitCode {
    // Load .env file if present (ignore if missing)
    _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };

    if let Err(source) = observability::init(&cli.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("Failed to initialize logging: {source}");
        }

        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(source) => {
            debug!(?source, "command failed");

            #[expect(
                clippy::print_stderr,
                reason = "errors must reach the terminal regardless of log level"
            )]
            {
                eprintln!("error: {source}");
            }

            ExitCode::FAILURE
        }
    }
}
