//! Terminal front end for the supply-chain dashboard.
//!
//! Loads the order export, applies the sidebar-style filters given on the
//! command line, prints the dashboard, and optionally trains, scores and
//! explains the late-delivery model.

use std::path::PathBuf;

use supplydash::config::{self, DashboardConfig};
use supplydash::dashboard::{Dashboard, DashboardError, report};
use supplydash::dataset::{DateRange, OrderFilter, load_csv};
use supplydash::logging;
use supplydash::ml::PredictionInput;
use time::{Date, macros::format_description};

const DEFAULT_TABLE_ROWS: usize = 10;

#[derive(Debug, Default)]
struct CliOptions {
    data: Option<PathBuf>,
    config: Option<PathBuf>,
    regions: Vec<String>,
    modes: Vec<String>,
    categories: Vec<String>,
    from: Option<Date>,
    to: Option<Date>,
    rows: Option<usize>,
    train: bool,
    seed: Option<u64>,
    predict: Option<PredictionInput>,
    explain: bool,
    json: bool,
    save_config: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    let config = load_config(&options).map_err(|err| err.to_string())?;
    let config = apply_overrides(&options, config);
    if let Err(err) = logging::init(&config.logging) {
        eprintln!("Logging disabled: {err}");
    }
    if options.save_config {
        let path = save_config(&options, &config).map_err(|err| err.to_string())?;
        println!("Saved config to {}", path.display());
    }

    let data_path = config
        .dataset
        .path
        .clone()
        .ok_or_else(|| format!("No dataset given\n\n{}", help_text()))?;
    let loaded = load_csv(&data_path).map_err(|err| err.to_string())?;
    let mut dashboard = Dashboard::new(loaded.dataset, &config);
    let filter = build_filter(&options, &dashboard);
    dashboard.apply_filter(filter);

    if options.json {
        let snapshot = dashboard.snapshot();
        let text = serde_json::to_string_pretty(&snapshot).map_err(|err| err.to_string())?;
        println!("{text}");
    } else {
        print_overview(&dashboard, options.rows.unwrap_or(DEFAULT_TABLE_ROWS));
    }

    if options.train {
        match dashboard.train() {
            Ok(model) => print!("{}", report::render_training(&model)),
            Err(err) => println!("{err}"),
        }
    }
    if let Some(input) = &options.predict {
        match dashboard.predict(input) {
            Ok(prediction) => print!("{}", report::render_prediction(&prediction)),
            Err(err) => println!("{err}"),
        }
    }
    if options.explain {
        match dashboard.explain() {
            Ok(rows) => print!("{}", report::render_importance(&rows)),
            Err(err) => println!("{err}"),
        }
    }
    Ok(())
}

fn load_config(options: &CliOptions) -> Result<DashboardConfig, DashboardError> {
    let config = match &options.config {
        Some(path) => config::load_from_path(path)?,
        None => config::load_or_default()?,
    };
    Ok(config)
}

/// Fold `--data` and `--seed` into the loaded config.
fn apply_overrides(options: &CliOptions, mut config: DashboardConfig) -> DashboardConfig {
    if let Some(path) = &options.data {
        config.dataset.path = Some(path.clone());
    }
    if let Some(seed) = options.seed {
        config.training.seed = seed;
    }
    config
}

/// Write `config` to `--config` if given, otherwise to the app directory.
fn save_config(options: &CliOptions, config: &DashboardConfig) -> Result<PathBuf, DashboardError> {
    let path = match &options.config {
        Some(path) => path.clone(),
        None => config::config_path()?,
    };
    config::save_to_path(config, &path)?;
    Ok(path)
}

/// A one-sided date bound is completed from the dataset's own span.
fn build_filter(options: &CliOptions, dashboard: &Dashboard) -> OrderFilter {
    let mut filter = OrderFilter::default();
    if !options.regions.is_empty() {
        filter = filter.with_regions(options.regions.iter().cloned());
    }
    if !options.modes.is_empty() {
        filter = filter.with_shipping_modes(options.modes.iter().cloned());
    }
    if !options.categories.is_empty() {
        filter = filter.with_categories(options.categories.iter().cloned());
    }
    if options.from.is_some() || options.to.is_some() {
        let bounds = dashboard
            .base()
            .date_bounds()
            .map(|(min, max)| (min.date(), max.date()));
        let start = options.from.or(bounds.map(|(min, _)| min));
        let end = options.to.or(bounds.map(|(_, max)| max));
        if let (Some(start), Some(end)) = (start, end) {
            filter = filter.with_date_range(DateRange::new(start, end));
        }
    }
    filter
}

fn print_overview(dashboard: &Dashboard, rows: usize) {
    println!(
        "Supply chain dashboard: {} of {} order lines",
        dashboard.view().len(),
        dashboard.base().len()
    );
    let snapshot = dashboard.snapshot();
    match &snapshot.kpis {
        Some(kpis) => print!("{}", report::render_kpis(kpis)),
        None => {
            if let Err(err) = dashboard.kpis() {
                println!("  {err}");
            }
        }
    }
    println!();
    print!(
        "{}",
        report::render_table(
            "Late Delivery Risk by Region",
            "Region",
            "Late Rate",
            &snapshot.region_late_risk
        )
    );
    for chart in &snapshot.charts {
        println!();
        print!("{}", report::render_chart(chart));
    }
    println!();
    println!("Order details (first {rows})");
    print!("{}", report::render_orders(dashboard.order_table(Some(rows))));
    println!();
}

fn parse_args(args: Vec<String>) -> Result<Option<CliOptions>, String> {
    let mut options = CliOptions::default();

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--data" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--data requires a value".to_string())?;
                options.data = Some(PathBuf::from(value));
            }
            "--config" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--config requires a value".to_string())?;
                options.config = Some(PathBuf::from(value));
            }
            "--region" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--region requires a value".to_string())?;
                options.regions.push(value.clone());
            }
            "--mode" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--mode requires a value".to_string())?;
                options.modes.push(value.clone());
            }
            "--category" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--category requires a value".to_string())?;
                options.categories.push(value.clone());
            }
            "--from" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--from requires a value".to_string())?;
                options.from = Some(parse_date(value, "--from")?);
            }
            "--to" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--to requires a value".to_string())?;
                options.to = Some(parse_date(value, "--to")?);
            }
            "--rows" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--rows requires a value".to_string())?;
                options.rows = Some(
                    value
                        .parse::<usize>()
                        .map_err(|_| format!("Invalid --rows value: {value}"))?,
                );
            }
            "--seed" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--seed requires a value".to_string())?;
                options.seed = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| format!("Invalid --seed value: {value}"))?,
                );
            }
            "--predict" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--predict requires a value".to_string())?;
                options.predict = Some(parse_prediction(value)?);
            }
            "--train" => options.train = true,
            "--explain" => options.explain = true,
            "--json" => options.json = true,
            "--save-config" => options.save_config = true,
            unknown => {
                return Err(format!("Unknown argument: {unknown}\n\n{}", help_text()));
            }
        }
        idx += 1;
    }

    Ok(Some(options))
}

fn parse_date(value: &str, flag: &str) -> Result<Date, String> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|_| format!("Invalid {flag} date (expected YYYY-MM-DD): {value}"))
}

/// `<mode>,<days>,<discount>,<region>`; the region may itself contain commas.
fn parse_prediction(value: &str) -> Result<PredictionInput, String> {
    let mut parts = value.splitn(4, ',').map(str::trim);
    let (Some(mode), Some(days), Some(discount), Some(region)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(format!(
            "Invalid --predict value (expected <mode>,<days>,<discount>,<region>): {value}"
        ));
    };
    Ok(PredictionInput {
        shipping_mode: mode.to_string(),
        scheduled_days: days
            .parse::<i64>()
            .map_err(|_| format!("Invalid scheduled days in --predict: {days}"))?,
        discount_rate: discount
            .parse::<f64>()
            .map_err(|_| format!("Invalid discount rate in --predict: {discount}"))?,
        region: region.to_string(),
    })
}

fn help_text() -> String {
    [
        "supplydash",
        "",
        "Supply chain order analytics with a late-delivery risk model.",
        "",
        "Usage:",
        "  supplydash [--data <csv>] [filters] [--train] [--predict <input>] [--explain]",
        "",
        "Options:",
        "  --data <csv>           Order export to load (default: [dataset] path in config).",
        "  --config <toml>        Config file (default: config.toml in the app directory).",
        "  --region <name>        Keep this region; repeat to select several.",
        "  --mode <name>          Keep this shipping mode; repeatable.",
        "  --category <name>      Keep this product category; repeatable.",
        "  --from <YYYY-MM-DD>    First order date to include.",
        "  --to <YYYY-MM-DD>      Last order date to include.",
        "  --rows <usize>         Order table rows to print (default: 10).",
        "  --json                 Print the dashboard snapshot as JSON.",
        "  --train                Train the late-delivery model on the filtered orders.",
        "  --seed <u64>           Seed for the train/test split (default: 42).",
        "  --predict <input>      Score <mode>,<days>,<discount>,<region>.",
        "  --explain              Print the feature importance table.",
        "  --save-config          Write the effective config (with --data/--seed) and continue.",
    ]
    .join("\n")
}
