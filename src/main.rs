use analytics::{AnalyticsError, MetricsEngine};
use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use configuration::{Config, StorageBackend};
use core_types::{UnitEconomicsInputs, ValuationInputs};
use database::{DbRepository, InMemoryStore, RecordStore, UnitEconomicsRecord};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::time::Duration;
use vc_matching::{VcFilter, VcMatcher, VcQuery};

mod render;

/// The main entry point for the Runway advisory tool.
#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    let config = match configuration::load_config_from(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(2);
        }
    };

    // Held until exit so the file writer flushes.
    let _log_guard = match configuration::init_tracing(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error initialising logging: {}", e);
            std::process::exit(2);
        }
    };

    let backend = cli.store.unwrap_or(config.storage.backend);

    // Execute the appropriate command
    let result = match cli.command {
        Commands::Onboard(args) => handle_onboard(args, &config, backend).await,
        Commands::Valuation(args) => handle_valuation(args, &config, backend).await,
        Commands::UnitEconomics(args) => handle_unit_economics(args, &config, backend).await,
        Commands::Vcs(args) => handle_vcs(args, &config),
    };

    if let Err(e) = result {
        tracing::error!(error = ?e, "Command failed.");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Startup advisory calculators: valuation, unit economics and VC matching.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, default_value = configuration::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Record store to use, overriding the configuration.
    #[arg(long, global = true, value_enum)]
    store: Option<StorageBackend>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a user and seed their calculator records.
    Onboard(OnboardArgs),
    /// Value the business with a discounted-cash-flow projection.
    Valuation(ValuationArgs),
    /// Derive margin, LTV and LTV:CAC from per-order economics.
    UnitEconomics(UnitEconomicsArgs),
    /// Search the investor dataset.
    Vcs(VcsArgs),
}

#[derive(Args)]
struct OnboardArgs {
    /// The user identifier supplied by the session provider.
    #[arg(long)]
    user: String,
}

/// Where a calculator's starting record comes from. With neither flag the defaults are used.
#[derive(Args)]
#[group(multiple = false)]
struct InputSource {
    /// A JSON file holding the record.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Load the record stored for this user.
    #[arg(long)]
    user: Option<String>,
}

#[derive(Args)]
struct ValuationArgs {
    #[command(flatten)]
    source: InputSource,

    /// Annual revenue.
    #[arg(long, allow_negative_numbers = true)]
    revenue: Option<Decimal>,
    /// Total addressable market (display only).
    #[arg(long)]
    market_size: Option<Decimal>,
    /// Serviceable obtainable market, in percent (display only).
    #[arg(long)]
    som: Option<Decimal>,
    /// Annual cash outflow.
    #[arg(long, allow_negative_numbers = true)]
    outflow: Option<Decimal>,
    /// Annual growth rate, in percent.
    #[arg(long, allow_negative_numbers = true)]
    growth: Option<Decimal>,
    /// Number of years to project.
    #[arg(long)]
    years: Option<u32>,
    /// Market value of equity.
    #[arg(long, allow_negative_numbers = true)]
    equity: Option<Decimal>,
    /// Market value of debt.
    #[arg(long, allow_negative_numbers = true)]
    debt: Option<Decimal>,
    /// Tax rate, in percent.
    #[arg(long, allow_negative_numbers = true)]
    tax: Option<Decimal>,
    /// Expected market return, in percent.
    #[arg(long, allow_negative_numbers = true)]
    equity_cost: Option<Decimal>,
    /// Interest rate on debt, in percent.
    #[arg(long, allow_negative_numbers = true)]
    debt_cost: Option<Decimal>,

    /// Write the (possibly edited) inputs back to the user's record.
    #[arg(long, requires = "user")]
    save: bool,
}

#[derive(Args)]
struct UnitEconomicsArgs {
    #[command(flatten)]
    source: InputSource,

    /// Average order value.
    #[arg(long)]
    aov: Option<Decimal>,
    /// Average number of orders per customer.
    #[arg(long)]
    orders: Option<Decimal>,
    /// Customer acquisition cost.
    #[arg(long)]
    cac: Option<Decimal>,
    /// Churn rate, in percent.
    #[arg(long)]
    churn: Option<Decimal>,
    /// Weight LTV by churn.
    #[arg(long, conflicts_with = "disable_churn")]
    enable_churn: bool,
    /// Ignore churn when computing LTV.
    #[arg(long)]
    disable_churn: bool,
    /// Business category label.
    #[arg(long)]
    category: Option<String>,

    /// Rename a cost line (OLD=NEW). Renaming onto an existing line overwrites it.
    #[arg(long, value_name = "OLD=NEW", value_parser = parse_rename)]
    rename_cost: Vec<(String, String)>,
    /// Remove a cost line.
    #[arg(long, value_name = "NAME")]
    remove_cost: Vec<String>,
    /// Set a cost line's amount, creating it if needed (NAME=AMOUNT).
    #[arg(long, value_name = "NAME=AMOUNT", value_parser = parse_cost_line)]
    set_cost: Vec<(String, Decimal)>,
    /// Append an empty, automatically named cost line. Repeatable.
    #[arg(long, action = ArgAction::Count)]
    add_cost: u8,

    /// Write the inputs and the updated metrics back to the user's record.
    #[arg(long, requires = "user")]
    save: bool,
}

#[derive(Args)]
struct VcsArgs {
    /// Investor dataset (JSON). Defaults to the configured path.
    #[arg(long)]
    data: Option<PathBuf>,
    /// Country or city to match.
    #[arg(long)]
    location: Option<String>,
    /// Investment stage to match, e.g. "seed".
    #[arg(long)]
    stage: Option<String>,
    /// Investor type to match, e.g. "angel".
    #[arg(long)]
    investor_type: Option<String>,
    /// Smallest acceptable first cheque.
    #[arg(long)]
    min_cheque: Option<Decimal>,
    /// Largest acceptable first cheque.
    #[arg(long)]
    max_cheque: Option<Decimal>,
    /// Share of matches to return, in percent.
    #[arg(long)]
    percentage: Option<Decimal>,
    /// Page to show (1-based).
    #[arg(long, default_value_t = 1)]
    page: usize,
    /// Results per page.
    #[arg(long)]
    per_page: Option<usize>,
}

fn parse_cost_line(raw: &str) -> Result<(String, Decimal), String> {
    let (name, amount) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=AMOUNT, got '{raw}'"))?;
    let amount = amount
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("invalid amount for '{name}': {e}"))?;
    Ok((name.trim().to_string(), amount))
}

fn parse_rename(raw: &str) -> Result<(String, String), String> {
    let (old, new) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected OLD=NEW, got '{raw}'"))?;
    let (old, new) = (old.trim(), new.trim());
    if old.is_empty() || new.is_empty() {
        return Err("cost line names cannot be empty".to_string());
    }
    Ok((old.to_string(), new.to_string()))
}

// ==============================================================================
// Record Store
// ==============================================================================

/// Opens the configured record store.
async fn open_store(
    config: &Config,
    backend: StorageBackend,
) -> anyhow::Result<Box<dyn RecordStore>> {
    match backend {
        StorageBackend::Postgres => {
            let pool = database::connect(
                config.storage.max_connections,
                Duration::from_secs(config.storage.acquire_timeout_secs),
            )
            .await?;
            database::run_migrations(&pool).await?;
            Ok(Box::new(DbRepository::new(pool)))
        }
        StorageBackend::Memory => Ok(Box::new(InMemoryStore::new())),
    }
}

/// Opens the store for a user-backed command. The in-memory store starts empty, so the user
/// is onboarded on the spot.
async fn store_for_user(
    config: &Config,
    backend: StorageBackend,
    uid: &str,
) -> anyhow::Result<Box<dyn RecordStore>> {
    let store = open_store(config, backend).await?;
    if backend == StorageBackend::Memory {
        store.register_user(uid).await?;
    }
    Ok(store)
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

// ==============================================================================
// Command Handlers
// ==============================================================================

async fn handle_onboard(
    args: OnboardArgs,
    config: &Config,
    backend: StorageBackend,
) -> anyhow::Result<()> {
    let store = open_store(config, backend).await?;
    if store.register_user(&args.user).await? {
        println!("Onboarded {} with default valuation and unit-economics records.", args.user);
    } else {
        println!("{} is already registered; existing records were kept.", args.user);
    }
    Ok(())
}

async fn handle_valuation(
    args: ValuationArgs,
    config: &Config,
    backend: StorageBackend,
) -> anyhow::Result<()> {
    let mut store = None;
    let mut inputs = match (&args.source.input, &args.source.user) {
        (Some(path), _) => serde_json::from_value::<ValuationInputs>(read_json(path)?)?,
        (None, Some(uid)) => {
            let opened = store_for_user(config, backend, uid).await?;
            let inputs = opened.load_valuation(uid).await?;
            store = Some(opened);
            inputs
        }
        (None, None) => ValuationInputs::default(),
    };
    apply_valuation_overrides(&mut inputs, &args);

    let engine = MetricsEngine::new();
    match engine.compute_valuation(&inputs) {
        Ok(result) => render::valuation(&inputs, &result, &config.display),
        Err(AnalyticsError::NonFinite { metric }) => {
            tracing::warn!(metric, "Valuation is not finite for these inputs.");
            let discount_rate = engine.compute_wacc(&inputs).ok();
            render::non_finite_valuation(discount_rate, metric, &config.display);
        }
        Err(e) => return Err(e.into()),
    }

    if args.save {
        if let (Some(store), Some(uid)) = (&store, &args.source.user) {
            store.save_valuation(uid, &inputs).await?;
            println!("Saved valuation inputs for {uid}.");
        }
    }
    Ok(())
}

fn apply_valuation_overrides(inputs: &mut ValuationInputs, args: &ValuationArgs) {
    let overrides = [
        (&mut inputs.annual_revenue, args.revenue),
        (&mut inputs.total_addressable_market, args.market_size),
        (&mut inputs.serviceable_obtainable_market_pct, args.som),
        (&mut inputs.annual_cash_outflow, args.outflow),
        (&mut inputs.annual_growth_rate_pct, args.growth),
        (&mut inputs.market_value_of_equity, args.equity),
        (&mut inputs.market_value_of_debt, args.debt),
        (&mut inputs.tax_rate_pct, args.tax),
        (&mut inputs.expected_market_return_pct, args.equity_cost),
        (&mut inputs.annual_interest_rate_pct, args.debt_cost),
    ];
    for (field, value) in overrides {
        if let Some(value) = value {
            *field = value;
        }
    }
    if let Some(years) = args.years {
        inputs.projection_years = years;
    }
}

async fn handle_unit_economics(
    args: UnitEconomicsArgs,
    config: &Config,
    backend: StorageBackend,
) -> anyhow::Result<()> {
    let mut store = None;
    let mut record = match (&args.source.input, &args.source.user) {
        (Some(path), _) => UnitEconomicsRecord::from_json(read_json(path)?)?,
        (None, Some(uid)) => {
            let opened = store_for_user(config, backend, uid).await?;
            let record = opened.load_unit_economics(uid).await?;
            store = Some(opened);
            record
        }
        (None, None) => UnitEconomicsRecord::default(),
    };
    apply_unit_economics_edits(&mut record.inputs, &args);

    let engine = MetricsEngine::new();
    match engine.update_unit_economics(&record.inputs, &record.snapshot) {
        Ok(snapshot) => record.snapshot = snapshot,
        Err(AnalyticsError::NonFinite { metric }) => {
            anyhow::bail!("{metric} is not finite for these inputs");
        }
        Err(e) => return Err(e.into()),
    }
    render::unit_economics(&record.inputs, &record.snapshot, &config.display);

    if args.save {
        if let (Some(store), Some(uid)) = (&store, &args.source.user) {
            store.save_unit_economics(uid, &record).await?;
            println!("Saved unit economics for {uid}.");
        }
    }
    Ok(())
}

fn apply_unit_economics_edits(inputs: &mut UnitEconomicsInputs, args: &UnitEconomicsArgs) {
    if let Some(aov) = args.aov {
        inputs.average_order_value = aov;
    }
    if let Some(orders) = args.orders {
        inputs.average_orders_per_customer = orders;
    }
    if let Some(cac) = args.cac {
        inputs.customer_acquisition_cost = cac;
    }
    if let Some(churn) = args.churn {
        inputs.churn_rate_pct = Some(churn);
    }
    if args.enable_churn {
        inputs.churn_enabled = true;
    }
    if args.disable_churn {
        inputs.churn_enabled = false;
    }
    if let Some(category) = &args.category {
        inputs.category = category.clone();
    }

    let lines = &mut inputs.cost_of_goods_sold;
    for (old, new) in &args.rename_cost {
        if !lines.rename(old, new.as_str()) {
            tracing::warn!(line = %old, "No cost line to rename.");
        }
    }
    for name in &args.remove_cost {
        if lines.remove(name).is_none() {
            tracing::warn!(line = %name, "No cost line to remove.");
        }
    }
    for (name, amount) in &args.set_cost {
        lines.set_amount(name.as_str(), *amount);
    }
    for _ in 0..args.add_cost {
        let name = lines.add_line();
        tracing::debug!(line = %name, "Cost line added.");
    }
}

fn handle_vcs(args: VcsArgs, config: &Config) -> anyhow::Result<()> {
    let settings = &config.vc_matching;
    let path = args.data.as_deref().unwrap_or(settings.dataset_path.as_path());
    let matcher = VcMatcher::from_path(path, settings.sample_seed)?;

    let query = VcQuery {
        filter: VcFilter {
            location: args.location,
            stage: args.stage,
            investor_type: args.investor_type,
            min_cheque: args.min_cheque,
            max_cheque: args.max_cheque,
        },
        percentage: args.percentage.unwrap_or(settings.default_percentage),
        page: args.page,
        per_page: args.per_page.unwrap_or(settings.per_page),
    };

    let page = matcher.search(&query)?;
    render::vc_page(&page, &config.display);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valuation_overrides_accept_negative_amounts() {
        let cli = Cli::try_parse_from([
            "runway", "valuation", "--revenue", "-5", "--outflow", "-1", "--equity", "-2",
            "--debt", "-3", "--tax", "-4",
        ])
        .unwrap();
        let Commands::Valuation(args) = cli.command else {
            panic!("expected the valuation subcommand");
        };
        let mut inputs = ValuationInputs::default();
        apply_valuation_overrides(&mut inputs, &args);

        assert_eq!(inputs.annual_revenue, Decimal::from(-5));
        assert_eq!(inputs.annual_cash_outflow, Decimal::from(-1));
        assert_eq!(inputs.market_value_of_equity, Decimal::from(-2));
        assert_eq!(inputs.market_value_of_debt, Decimal::from(-3));
        assert_eq!(inputs.tax_rate_pct, Decimal::from(-4));
    }

    #[test]
    fn cost_edits_parse_name_and_amount() {
        assert_eq!(
            parse_cost_line("Shipping = 2.5").unwrap(),
            ("Shipping".to_string(), Decimal::new(25, 1))
        );
        assert!(parse_cost_line("Shipping").is_err());
        assert!(parse_rename("=New").is_err());
    }
}
