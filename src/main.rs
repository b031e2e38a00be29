use anyhow::{Context, Result};
use std::time::Instant;
use tracing::error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use usage_to_sqlite::{
    cli::{Cli, Commands, ImportArgs},
    config::Settings,
    filter::resolve_tiers,
    reconcile::{BatchState, Reconciler, RunOptions, RunReport},
    schema::{table_names, DependencyResolver},
    source::{FsSourceReader, SourceFormat},
    store::{Catalog, SqliteStore, Tier},
};

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { db } => {
            let settings = Settings::resolve(db, None, None, None, false)?;
            let store = open_store(&settings)?;
            println!("Initialized {:?}", settings.db_path);
            store.finalize()?;
        }

        Commands::Ladder {
            args,
            gens,
            ladder_ref,
            last_gen,
        } => {
            let settings = Settings::resolve(
                args.db.clone(),
                args.usage_dir.clone(),
                ladder_ref,
                last_gen,
                args.fail_fast,
            )?;
            let store = open_store(&settings)?;

            let mut tiers = Vec::new();
            for gen in settings.generations(&gens) {
                tiers.extend(store.tiers(gen)?);
            }

            run_import(&store, &settings, &args, tiers, &SourceFormat::LADDER)?;
            store.finalize()?;
        }

        Commands::Official { args, gen } => {
            let settings = Settings::resolve(
                args.db.clone(),
                args.usage_dir.clone(),
                None,
                None,
                args.fail_fast,
            )?;
            let store = open_store(&settings)?;
            let tiers = store.official_tiers(gen.unwrap_or(settings.last_gen))?;

            run_import(&store, &settings, &args, tiers, &SourceFormat::STANDINGS)?;
            store.finalize()?;
        }

        Commands::Clear {
            db,
            gen,
            tier,
            provider,
        } => {
            let settings = Settings::resolve(db, None, None, None, false)?;
            let store = open_store(&settings)?;
            let target = store
                .tiers(gen)?
                .into_iter()
                .find(|t| t.usage_name == tier)
                .with_context(|| format!("Unknown tier {} in gen {}", tier, gen))?;

            let deleted = Reconciler::new(&store)?.clear_batch(&target, provider)?;
            println!("Deleted {} rows for {} ({})", deleted, target, provider);
            store.finalize()?;
        }

        Commands::ListTables => {
            println!("Available tables:\n");
            for name in table_names() {
                println!("  {}", name);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default.into())
                .from_env_lossy(),
        )
        .init();
}

fn open_store(settings: &Settings) -> Result<SqliteStore> {
    let store = SqliteStore::open(&settings.db_path)
        .with_context(|| format!("Failed to open database {:?}", settings.db_path))?;

    let tables = DependencyResolver::new()
        .creation_order()
        .map_err(anyhow::Error::msg)?;
    store
        .create_tables(&tables)
        .context("Failed to create tables")?;

    Ok(store)
}

/// Run every selected generation; a failed generation is logged and the
/// next one still runs
fn run_import(
    store: &SqliteStore,
    settings: &Settings,
    args: &ImportArgs,
    tiers: Vec<Tier>,
    format: &SourceFormat,
) -> Result<()> {
    let start = Instant::now();
    let tiers = resolve_tiers(tiers, args.include.as_deref(), args.exclude.as_deref())?;
    let reader = FsSourceReader::new(&settings.usage_dir).with_ladder_ref(&settings.ladder_ref);
    let reconciler = Reconciler::new(store)?;
    let options = RunOptions {
        fail_fast: settings.fail_fast,
    };

    let mut gens: Vec<u8> = tiers.iter().map(|t| t.gen).collect();
    gens.dedup();

    let mut reports = Vec::new();
    for gen in gens {
        let gen_tiers: Vec<Tier> = tiers.iter().filter(|t| t.gen == gen).cloned().collect();

        match reconciler.run_generation(gen, &gen_tiers, format, &reader, options) {
            Ok(report) => reports.push(report),
            Err(e) => error!(gen, "generation aborted: {e}"),
        }
    }

    print_summary(&reports);
    println!(
        "\nImported {} usage records in {:.1}s",
        reports.iter().map(RunReport::records).sum::<usize>(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn print_summary(reports: &[RunReport]) {
    for report in reports {
        for tier in &report.tiers {
            match tier.state {
                BatchState::Done => println!(
                    "  {:<24} {:>4} records  {:>6} facts  {:>6} links",
                    tier.tier.to_string(),
                    tier.primary.records,
                    tier.primary.total_facts(),
                    tier.links.total_created()
                ),
                BatchState::Failed => println!(
                    "  {:<24} failed: {}",
                    tier.tier.to_string(),
                    tier.error.as_deref().unwrap_or("unknown error")
                ),
                state => println!("  {:<24} {}", tier.tier.to_string(), state),
            }
        }
    }
}
