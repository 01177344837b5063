use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

use spatial_rules::{
    Access, Config, RuleRegistry, SpatialRuleDefaultFactory, SpatialRuleFactory,
    SpatialRuleListFactory, SpatialRuleLookup, SpatialRuleLookupBuilder, TransportationMode,
    read_feature_collection,
};

#[derive(Parser)]
#[command(author, version, about = "Build a spatial rule lookup from GeoJSON borders", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// GeoJSON FeatureCollection with the borders
    #[arg(short = 'f', long = "features")]
    features: Option<PathBuf>,

    /// Comma-separated rule names, e.g. GermanySpatialRule,AustriaSpatialRule
    #[arg(short = 'r', long = "rules", conflicts_with = "default_factory")]
    rules: Option<String>,

    /// Create one generic rule per feature instead of using registered rules
    #[arg(long = "default-factory")]
    default_factory: bool,

    /// Feature property holding the rule id
    #[arg(short = 'p', long = "property")]
    property: Option<String>,

    /// Region of interest: minLon,maxLon,minLat,maxLat
    #[arg(short = 'b', long = "bounds")]
    bounds: Option<String>,

    /// Grid cell size in degrees
    #[arg(long = "resolution")]
    resolution: Option<f64>,

    /// Test points against the polygons
    #[arg(long = "exact")]
    exact: bool,

    /// Point to resolve: lat,lon (repeatable)
    #[arg(short = 'q', long = "query")]
    queries: Vec<String>,

    /// Highway tag used to report speed and access for each query
    #[arg(long = "highway", default_value = "primary")]
    highway: String,

    /// Transportation mode for speed and access
    #[arg(long = "mode", default_value = "car")]
    mode: TransportationMode,
}

fn main() -> Result<()> {
    // Initialize logger - defaults to RUST_LOG if set, otherwise INFO
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let features_path = config
        .input
        .features
        .clone()
        .ok_or_else(|| anyhow!("No feature file given. Use --features or set [input].features"))?;
    let features = read_feature_collection(&features_path)
        .with_context(|| format!("Failed to read features from {}", features_path.display()))?;
    info!(
        "Loaded {} features from {}",
        features.len(),
        features_path.display()
    );

    let registry = RuleRegistry::with_defaults();
    let factory: Box<dyn SpatialRuleFactory> = if config.uses_default_factory() {
        info!("Using one generic rule per feature");
        Box::new(SpatialRuleDefaultFactory)
    } else {
        Box::new(SpatialRuleListFactory::from_names(
            &registry,
            &config.lookup.rules,
        )?)
    };

    let builder = SpatialRuleLookupBuilder::new();
    let Some(lookup) = builder.build(
        &config.lookup.id_property,
        factory.as_ref(),
        &features,
        &config.bounds()?,
        config.lookup_options(),
    )?
    else {
        warn!("No SpatialRuleLookup created: no rules apply inside the requested bounds");
        return Ok(());
    };

    println!("bounds:    {}", lookup.bounds());
    println!("rules:     {}", lookup.size());
    println!(
        "grid:      {:?} (filled {})",
        lookup.grid_size(),
        lookup.filled_cells()
    );

    for query in &args.queries {
        let (lat, lon) = parse_point(query)?;
        match lookup.lookup_rule(lat, lon) {
            Some(rule) => {
                // NaN fallback marks roads the rule doesn't regulate
                let speed = rule.max_speed(&args.highway, args.mode, f64::NAN);
                let speed = if speed.is_nan() {
                    "unregulated".to_string()
                } else {
                    speed.to_string()
                };
                println!(
                    "{lat},{lon} -> {} (max_speed {}: {}, access: {})",
                    rule.id(),
                    args.highway,
                    speed,
                    rule.access(&args.highway, args.mode, Access::Yes)
                );
            }
            None => println!("{lat},{lon} -> (none)"),
        }
    }

    Ok(())
}

/// Config file (if any), then environment, then command line
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    config.apply_env();

    if let Some(features) = &args.features {
        config.input.features = Some(features.clone());
    }
    if let Some(rules) = &args.rules {
        config.lookup.rules = rules
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        if config.lookup.rules.is_empty() {
            bail!("--rules needs at least one rule name");
        }
    }
    if args.default_factory {
        config.lookup.rules.clear();
    }
    if let Some(property) = &args.property {
        config.lookup.id_property = property.clone();
    }
    if let Some(bounds) = &args.bounds {
        config.lookup.bounds = Some(bounds.clone());
    }
    if let Some(resolution) = args.resolution {
        config.lookup.resolution = resolution;
    }
    if args.exact {
        config.lookup.exact = true;
    }

    config.validate()?;
    Ok(config)
}

fn parse_point(s: &str) -> Result<(f64, f64)> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| anyhow!("Invalid point '{s}', expected lat,lon"))?;
    let lat = lat
        .trim()
        .parse()
        .with_context(|| format!("Invalid latitude in '{s}'"))?;
    let lon = lon
        .trim()
        .parse()
        .with_context(|| format!("Invalid longitude in '{s}'"))?;
    Ok((lat, lon))
}
