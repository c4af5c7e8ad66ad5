use clap::{Parser, Subcommand, ValueEnum};
use site_listing::catalog::{CATALOG_FILE, Catalog};
use site_listing::navigation::{NavRegistry, build_navigation};
use site_listing::{config, output, render, search};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// File the navigation forests are written to, inside the output directory.
const NAVIGATION_FILE: &str = "navigation.json";

#[derive(Parser)]
#[command(name = "site-listing")]
#[command(about = "Page listings and navigation trees for multi-version documentation sites")]
#[command(long_about = "\
Page listings and navigation trees for multi-version documentation sites

Pages opt into a listing by naming it in their metadata. A listing is a named
set of ordered sections; each section selects pages by provenance and
attributes, or by tag. Sections marked as navigation roots seed navigation
trees, nesting every page that declares a listing of its own.

Source structure:

  source/
  ├── catalog.json                 # Page records from the content build
  └── config.toml                  # Engine, search and listing config (optional)

Run 'site-listing gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory holding catalog.json and config.toml
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Published site directory
    #[arg(long, default_value = "build/site", global = true)]
    output: PathBuf,

    /// Log progress at info level (otherwise RUST_LOG applies)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble a listing for one page
    Listing {
        /// Listing configuration name
        name: String,
        /// Context page as component:version:module:relative
        #[arg(long)]
        page: String,
        #[arg(long, value_enum, default_value_t = ListingFormat::Json)]
        format: ListingFormat,
    },
    /// Build navigation trees and write navigation.json
    Nav,
    /// Generate the search index from the published site
    SearchIndex,
    /// Validate config and catalog without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum ListingFormat {
    Json,
    Html,
    Text,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Listing { name, page, format } => {
            let site_config = config::load_config(&cli.source)?;
            let listings = site_config.compile_listings()?;
            let catalog = Catalog::load(&cli.source.join(CATALOG_FILE))?;
            let context = catalog
                .find(&page)
                .ok_or_else(|| format!("page not found in catalog: {page}"))?;
            let sections =
                listings.assemble(&name, context, &catalog, site_config.engine.padding);
            match format {
                ListingFormat::Json => println!("{}", serde_json::to_string_pretty(&sections)?),
                ListingFormat::Html => println!(
                    "{}",
                    render::render_listing(&sections, &site_config.engine.data_prefix).into_string()
                ),
                ListingFormat::Text => output::print_listing_output(&name, context, &sections),
            }
        }
        Command::Nav => {
            let site_config = config::load_config(&cli.source)?;
            let listings = site_config.compile_listings()?;
            let catalog = Catalog::load(&cli.source.join(CATALOG_FILE))?;
            let mut registry = NavRegistry::new();
            build_navigation(
                &catalog,
                &listings,
                &site_config.engine.config_attribute,
                &mut registry,
            );
            std::fs::create_dir_all(&cli.output)?;
            let json = serde_json::to_string_pretty(&registry)?;
            std::fs::write(cli.output.join(NAVIGATION_FILE), json)?;
            output::print_nav_output(&registry);
        }
        Command::SearchIndex => {
            let site_config = config::load_config(&cli.source)?;
            if !site_config.search.enabled {
                println!("Search index disabled in config");
                return Ok(());
            }
            let (_, summary) = search::generate_search_index(&cli.output, &site_config.search)?;
            output::print_search_output(&summary);
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let site_config = config::load_config(&cli.source)?;
            let listings = site_config.compile_listings()?;
            let catalog = Catalog::load(&cli.source.join(CATALOG_FILE))?;
            output::print_check_output(&catalog, &listings, &site_config.engine.config_attribute);
            println!("==> Config and catalog are valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
