use anyhow::{Context, Result};
use catalogcharts::{
    charts::{Chart, ChartId, Router},
    config::AppConfig,
    dataset::DatasetCache,
    render, ChartError,
};
use clap::{Parser, Subcommand};
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "catalogcharts")]
#[command(about = "Summary tables behind the catalog chart views")]
struct Args {
    /// Catalog source file (.csv or .parquet)
    #[arg(short, long, env = "CATALOG_DATASET")]
    dataset: Option<PathBuf>,

    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Worker threads for `all` (default: one per core)
    #[arg(long)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List chart ids and their menu labels
    List,
    /// Print one chart's title, summary table and description
    Show { id: String },
    /// Print one chart's render payload as JSON
    Export {
        id: String,
        #[arg(long)]
        pretty: bool,
    },
    /// Print every chart, computed in parallel
    All,
    /// Read chart ids from stdin until `quit` or EOF
    Interactive,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    if let Command::List = args.command {
        print_menu();
        return Ok(());
    }

    let cache = DatasetCache::new(config.dataset_path(args.dataset.as_deref()));
    info!(dataset = %cache.path().display(), "startup");
    let table = cache
        .get()
        .with_context(|| format!("preparing {}", cache.path().display()))?;
    let router = Router::new(table);

    match args.command {
        Command::List => unreachable!("handled above"),
        Command::Show { id } => {
            let chart = router.select(&id)?;
            print!("{}", render::text_report(&chart)?);
        }
        Command::Export { id, pretty } => {
            let chart = router.select(&id)?;
            let payload = render::payload(&chart, &config.style)?;
            let json = if pretty {
                serde_json::to_string_pretty(&payload)?
            } else {
                serde_json::to_string(&payload)?
            };
            println!("{json}");
        }
        Command::All => {
            if let Some(n) = args.threads {
                size_worker_pool(n);
            }
            for result in router.aggregate_all() {
                let chart = result?;
                println!("{}", render::text_report(&chart)?);
            }
        }
        Command::Interactive => interactive(&cache)?,
    }

    Ok(())
}

/// Size rayon's global pool. Returns false, with a warning, if the pool was
/// already built; `all` then runs on whatever pool exists.
fn size_worker_pool(threads: usize) -> bool {
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build_global() {
        Ok(()) => true,
        Err(e) => {
            warn!(threads, error = %e, "could not size the worker pool, using the default");
            false
        }
    }
}

fn print_menu() {
    for id in ChartId::ALL {
        println!("{:<6} {}", id.as_str(), id.meta().label);
    }
}

/// Selection loop. Each selection re-checks the cache, so an edited source
/// file is picked up; a bad id is reported and the loop carries on.
fn interactive(cache: &DatasetCache) -> Result<()> {
    print_menu();
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    prompt(&mut stdout)?;

    for line in stdin.lock().lines() {
        let line = line.context("reading selection")?;
        let selection = line.trim();
        match selection {
            "" => {}
            "quit" | "exit" => break,
            "list" => print_menu(),
            _ => {
                let router = Router::new(cache.get()?);
                match router.select(selection) {
                    Ok(chart) => show(&mut stdout, &chart)?,
                    Err(e @ ChartError::UnknownChartId(_)) => {
                        warn!(selection, "unknown chart");
                        writeln!(stdout, "{e}; type `list` to see the charts")?;
                    }
                    Err(e) => {
                        error!(error = %e, "aggregation failed");
                        return Err(e.into());
                    }
                }
            }
        }
        prompt(&mut stdout)?;
    }
    Ok(())
}

fn show(out: &mut impl Write, chart: &Chart) -> Result<()> {
    writeln!(out, "{}", render::text_report(chart)?)?;
    Ok(())
}

fn prompt(out: &mut impl Write) -> Result<()> {
    write!(out, "chart> ")?;
    out.flush()?;
    Ok(())
}
