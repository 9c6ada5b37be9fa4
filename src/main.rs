mod cli;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use masslookup::{
    adduct::{Adduct, AdductMode},
    config::LookupConfig,
    core::store::CompoundStore,
    engine::search::{SearchEngine, SearchResult},
    open_store,
    query::SearchQuery,
    types::{Source, SourceFilter},
};

use cli::{Cli, CliError, Command};

fn main() -> Result<(), CliError> {
    // Logs go to stderr so result output stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    let mut config = match &args.config {
        Some(path) => LookupConfig::from_file(path)?,
        None => LookupConfig::default(),
    };
    if let Some(database) = args.database {
        config.database_path = database;
    }

    if let Command::Adducts = args.command {
        print_adducts();
        return Ok(());
    }

    let store = open_store(&config.database_path)?;

    match args.command {
        Command::Mass {
            value,
            adduct,
            tolerance,
            sources,
            limit,
        } => {
            let adduct: Adduct = adduct.parse()?;
            let mut query = SearchQuery::mass(value, adduct)
                .with_tolerance(tolerance.unwrap_or(config.default_tolerance_da))
                .with_sources(parse_sources(&sources)?);
            query.limit = limit.or(config.max_results);
            run_query(&store, &query, args.json)
        }
        Command::Formula {
            formula,
            sources,
            limit,
        } => {
            let mut query = SearchQuery::formula(formula).with_sources(parse_sources(&sources)?);
            query.limit = limit.or(config.max_results);
            run_query(&store, &query, args.json)
        }
        Command::Stats => {
            let stats = store.stats();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Total compounds: {}", stats.total_compounds);
                for (source, count) in &stats.by_source {
                    println!("  - {source}: {count}");
                }
                if let (Some(lo), Some(hi)) = (stats.min_mass, stats.max_mass) {
                    println!("Mass range: {lo:.4} - {hi:.4} Da");
                }
            }
            Ok(())
        }
        Command::Adducts => Ok(()),
    }
}

fn parse_sources(raw: &[String]) -> Result<SourceFilter, CliError> {
    let sources = raw
        .iter()
        .map(|s| s.parse::<Source>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SourceFilter::only(sources))
}

fn run_query(store: &CompoundStore, query: &SearchQuery, json: bool) -> Result<(), CliError> {
    let results = SearchEngine::new(store).search(query)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else if results.is_empty() {
        println!("No matches.");
    } else {
        print_table(&results);
    }
    Ok(())
}

fn print_table(results: &[SearchResult]) {
    println!(
        "{:<40} {:<16} {:>12} {:>10} {:>10} {:<10} {}",
        "Name", "Formula", "Mass (Da)", "Err (Da)", "Err (ppm)", "Source", "ID"
    );
    for r in results {
        let c = &r.compound;
        let (err_da, err_ppm) = match &r.mass_match {
            Some(m) => (
                format!("{:.4}", m.mass_error_da),
                m.ppm_error.map_or_else(|| "-".to_string(), |ppm| format!("{ppm:.2}")),
            ),
            None => ("-".to_string(), "-".to_string()),
        };
        println!(
            "{:<40} {:<16} {:>12.4} {:>10} {:>10} {:<10} {}",
            truncate(&c.name, 40),
            truncate(&c.formula, 16),
            c.monoisotopic_mass,
            err_da,
            err_ppm,
            c.source,
            c.id
        );
    }
    println!("{} match(es)", results.len());
}

fn print_adducts() {
    for mode in AdductMode::ALL {
        println!(
            "{:<10} {:?}  charge {:+}  shift {:+.6} Da",
            mode.label(),
            mode.ion_mode(),
            mode.charge(),
            mode.mass_shift()
        );
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}
