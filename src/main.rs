//! Calligraphy CLI - inspect prototype data and property parameter layouts.
//!
//! This is the main entry point for the Calligraphy command-line application.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use calligraphy::prelude::*;
use calligraphy::property::{PropertyValue, MAX_PARAMS};
use calligraphy::prototype::export::ParallelJsonExporter;

/// Calligraphy - game server prototype data tool
#[derive(Parser)]
#[command(name = "calligraphy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Content configuration file (TOML)
    #[arg(long, global = true, env = "CALLIGRAPHY_CONFIG")]
    config: Option<PathBuf>,

    /// Log informational messages, including skipped fields
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one prototype file and print it as JSON
    Inspect {
        /// Prototype file (<id>.prototype)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Load a content directory and export effective records as JSON
    Export {
        /// Content directory
        #[arg(short, long, env = "CONTENT_FOLDER")]
        input: PathBuf,

        /// Blueprint catalog (JSON)
        #[arg(short, long, env = "BLUEPRINT_CATALOG")]
        catalog: PathBuf,

        /// Output directory
        #[arg(short, long, env = "OUTPUT_FOLDER")]
        output: PathBuf,
    },

    /// Print the parameter layout of a property parameter blueprint
    Layout {
        /// Blueprint catalog (JSON)
        #[arg(short, long, env = "BLUEPRINT_CATALOG")]
        catalog: PathBuf,

        /// Parameter blueprint id (hex)
        #[arg(short, long)]
        blueprint: BlueprintId,
    },

    /// Pack parameter values into a property key
    Pack {
        /// Blueprint catalog (JSON)
        #[arg(short, long, env = "BLUEPRINT_CATALOG")]
        catalog: PathBuf,

        /// Parameter blueprint id (hex)
        #[arg(short, long)]
        blueprint: BlueprintId,

        /// Property enum stored in the upper key bits
        #[arg(short, long, default_value_t = 0)]
        property: u16,

        /// Parameter values, slot 0 first (missing values are 0)
        #[arg(num_args = 0..=4)]
        values: Vec<u64>,
    },

    /// Unpack a property key into its parameter values
    Unpack {
        /// Blueprint catalog (JSON)
        #[arg(short, long, env = "BLUEPRINT_CATALOG")]
        catalog: PathBuf,

        /// Parameter blueprint id (hex)
        #[arg(short, long)]
        blueprint: BlueprintId,

        /// Property key (hex)
        key: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => ContentConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ContentConfig::default(),
    };

    match cli.command {
        Commands::Inspect { input } => {
            cmd_inspect(&input, &config)?;
        }
        Commands::Export { input, catalog, output } => {
            cmd_export(&input, &catalog, &output, &config)?;
        }
        Commands::Layout { catalog, blueprint } => {
            cmd_layout(&catalog, blueprint, &config)?;
        }
        Commands::Pack {
            catalog,
            blueprint,
            property,
            values,
        } => {
            cmd_pack(&catalog, blueprint, property, &values, &config)?;
        }
        Commands::Unpack { catalog, blueprint, key } => {
            cmd_unpack(&catalog, blueprint, &key, &config)?;
        }
    }

    Ok(())
}

fn cmd_inspect(input: &Path, config: &ContentConfig) -> Result<()> {
    let file = PrototypeFile::open(input, &config.reader_options()).context("Failed to read prototype file")?;

    if file.trailing_bytes > 0 {
        eprintln!("Warning: {} trailing bytes after record", file.trailing_bytes);
    }

    let json = serde_json::to_string_pretty(&file.record)?;
    println!("{}", json);

    Ok(())
}

fn cmd_export(input: &Path, catalog_path: &Path, output: &Path, config: &ContentConfig) -> Result<()> {
    println!("Loading blueprint catalog: {}", catalog_path.display());
    let catalog = BlueprintCatalog::open(catalog_path).context("Failed to load blueprint catalog")?;

    println!("Loading content: {}", input.display());
    let start = Instant::now();
    let index = load_directory(input, &config.reader_options()).context("Failed to load content")?;
    println!(
        "Loaded {} prototypes and {} blueprints in {:?}",
        index.len(),
        catalog.len(),
        start.elapsed()
    );

    println!("Exporting {} records to {}...", index.len(), output.display());

    let pb = ProgressBar::new(index.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let stats = ParallelJsonExporter::new(&index, &catalog)
        .export_all(output, |done, _| pb.set_position(done as u64))
        .context("Failed to export records")?;

    pb.finish_with_message("Done");
    println!(
        "Exported {} records in {:?} ({} errors)",
        stats.exported,
        start.elapsed(),
        stats.errors
    );

    if !stats.is_complete() {
        bail!("{} of {} records failed to export", stats.errors, stats.total);
    }

    Ok(())
}

fn load_layout(catalog_path: &Path, blueprint: BlueprintId, config: &ContentConfig) -> Result<ParamLayout> {
    let catalog = BlueprintCatalog::open(catalog_path).context("Failed to load blueprint catalog")?;
    let definition = PropertyDefinition::new("cli", 0, PropertyValue::Integer(0)).with_params(blueprint, [0; MAX_PARAMS]);

    definition
        .layout(&catalog, &config.enum_ranges())
        .with_context(|| format!("Failed to compute layout for blueprint {}", blueprint))
}

fn cmd_layout(catalog_path: &Path, blueprint: BlueprintId, config: &ContentConfig) -> Result<()> {
    let layout = load_layout(catalog_path, blueprint, config)?;

    println!("{:<6} {:<10} {:>6} {:>7}  {}", "Slot", "Kind", "Width", "Offset", "Max");
    for (i, slot) in layout.slots().iter().enumerate() {
        println!(
            "{:<6} {:<10} {:>6} {:>7}  {}",
            i,
            slot.kind.as_str(),
            slot.bit_width,
            slot.bit_offset,
            slot.value_max
        );
    }
    println!("Used {} of {} bits", layout.used_bits(), layout.budget());

    Ok(())
}

fn cmd_pack(
    catalog_path: &Path,
    blueprint: BlueprintId,
    property: u16,
    values: &[u64],
    config: &ContentConfig,
) -> Result<()> {
    let layout = load_layout(catalog_path, blueprint, config)?;

    let mut params = [0u64; MAX_PARAMS];
    params[..values.len()].copy_from_slice(values);

    let packed = layout.pack(&params)?;
    let key = PropertyKey::new(property, packed)?;
    println!("{:#018x}", key.raw());

    Ok(())
}

fn cmd_unpack(catalog_path: &Path, blueprint: BlueprintId, key: &str, config: &ContentConfig) -> Result<()> {
    let layout = load_layout(catalog_path, blueprint, config)?;

    let digits = key.trim_start_matches("0x").trim_start_matches("0X");
    let raw = u64::from_str_radix(digits, 16).with_context(|| format!("Invalid key: {}", key))?;
    let key = PropertyKey::from_raw(raw);

    println!("property: {}", key.property_enum());
    for (i, value) in layout.unpack(key.params()).iter().enumerate() {
        println!("Param{}: {}", i, value);
    }

    Ok(())
}
