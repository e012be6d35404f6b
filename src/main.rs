//! jobsim - worker pool simulation with timeouts and historical error injection

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use jobsim_core::{ErrorSampler, LoadSampler, OrchestratorBuilder, RunReport};
use jobsim_samplers::{ErrorFrequencyTable, FixedLoads, HistoricalErrorDistribution, UniformLoad};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, OutputFormat};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.mute);

    if cli.format == OutputFormat::Text {
        println!("Input File: {}", cli.input.display());
        println!("Number of jobs: {}", cli.n);
        println!("Queue Name: {}", cli.queue);
    }

    match run(&cli).and_then(|report| print_report(&report, cli.format)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Default log level; `--mute` drops per-job progress but keeps warnings
fn default_log_level(mute: bool) -> &'static str {
    if mute {
        "warn"
    } else {
        "info"
    }
}

fn init_tracing(mute: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(mute)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the dataset, build the pool and run it to completion
fn run(cli: &Cli) -> Result<RunReport> {
    let table = ErrorFrequencyTable::from_path(&cli.input)
        .with_context(|| format!("failed to load error dataset {}", cli.input.display()))?;

    let config = cli.simulation_config();
    config.validate().context("invalid simulation settings")?;

    let loads: Box<dyn LoadSampler> = if cli.loads.is_empty() {
        let (min_load, max_load) = config.load_range;
        let uniform = UniformLoad::new(min_load, max_load)?;
        match config.seed {
            Some(seed) => Box::new(uniform.with_seed(seed)),
            None => Box::new(uniform),
        }
    } else {
        Box::new(FixedLoads::new(cli.loads.clone()).context("invalid --loads")?)
    };

    let mut error_model = HistoricalErrorDistribution::for_queue(&table, &cli.queue);
    if let Some(seed) = config.seed {
        error_model = error_model.with_seed(seed.wrapping_add(1));
    }

    tracing::info!(
        queue = %cli.queue,
        load_sampler = loads.name(),
        sites = table.len(),
        error_codes = error_model.codes().len(),
        workers = config.num_workers,
        jobs = config.num_jobs,
        realtime = cli.realtime,
        "Loaded error dataset"
    );

    let error_model: Arc<dyn ErrorSampler> = Arc::new(error_model);
    let orchestrator = OrchestratorBuilder::new()
        .config(config)
        .load_sampler(loads)
        .error_sampler(Some(error_model))
        .build()?;

    let runtime = build_runtime(cli.realtime)?;
    let report = runtime.block_on(orchestrator.run())?;
    Ok(report)
}

/// The virtual clock is a paused current-thread runtime: sleeps complete as
/// soon as every task is idle, so runs finish in wall-clock milliseconds.
fn build_runtime(realtime: bool) -> Result<tokio::runtime::Runtime> {
    let runtime = if realtime {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
    } else {
        tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
    };
    runtime.context("failed to start the async runtime")
}

fn print_report(report: &RunReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", jobsim_report::render_text(report)),
        OutputFormat::Json => println!("{}", jobsim_report::render_json(report)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn dataset() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"site-a": {"-1": 9, "-2": 1}, "site-b": {"0": 3}}"#)
            .unwrap();
        file
    }

    fn cli(input: &std::path::Path, queue: &str, n: &str) -> Cli {
        Cli::try_parse_from([
            "jobsim",
            "--input",
            input.to_str().unwrap(),
            "--queue",
            queue,
            "--n",
            n,
            "--seed",
            "5",
            "--mute",
        ])
        .unwrap()
    }

    #[test]
    fn test_run_records_every_job() {
        let file = dataset();
        let report = run(&cli(file.path(), "site-a", "60")).unwrap();

        assert_eq!(report.num_jobs, 60);
        assert_eq!(report.num_workers, 20);
        assert!(report.is_consistent());
        // Timeouts take their codes from the site's history
        for code in report.stats.failures.keys() {
            assert!([-1, -2].contains(code), "unexpected code {code}");
        }
        assert_eq!(report.error_model.as_deref(), Some("history:site-a"));
    }

    #[test]
    fn test_fixed_loads_scenario() {
        let file = dataset();
        let cli = Cli::try_parse_from([
            "jobsim",
            "--input",
            file.path().to_str().unwrap(),
            "--queue",
            "site-b",
            "--n",
            "4",
            "--workers",
            "2",
            "--loads",
            "2,11,3,9.5",
        ])
        .unwrap();
        let report = run(&cli).unwrap();

        assert_eq!(report.total_success(), 3);
        assert_eq!(report.total_failures(), 1);
        assert_eq!(report.stats.failures_for(-1), 1);
        assert_eq!(report.workers[0].processed, vec!["job0", "job2"]);
        assert_eq!(report.workers[1].processed, vec!["job1", "job3"]);
    }

    #[test]
    fn test_invalid_fixed_loads_fail() {
        let file = dataset();
        let cli = Cli::try_parse_from([
            "jobsim",
            "--input",
            file.path().to_str().unwrap(),
            "--queue",
            "site-a",
            "--n",
            "2",
            "--loads",
            "0",
        ])
        .unwrap();

        assert!(run(&cli).is_err());
    }

    #[test]
    fn test_unknown_queue_runs_timeout_only() {
        let file = dataset();
        let report = run(&cli(file.path(), "nowhere", "40")).unwrap();

        assert!(report.is_consistent());
        for code in report.stats.failures.keys() {
            assert_eq!(*code, -1);
        }
    }

    #[test]
    fn test_mute_keeps_warnings() {
        use tracing::level_filters::LevelFilter;

        let muted = EnvFilter::new(default_log_level(true));
        assert_eq!(muted.max_level_hint(), Some(LevelFilter::WARN));

        let verbose = EnvFilter::new(default_log_level(false));
        assert_eq!(verbose.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_missing_dataset_fails_before_running() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&cli(&dir.path().join("absent.json"), "site-a", "5")).unwrap_err();

        assert!(format!("{err:#}").contains("failed to load error dataset"));
    }

    #[test]
    fn test_malformed_dataset_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[1, 2, 3]").unwrap();

        assert!(run(&cli(file.path(), "site-a", "5")).is_err());
    }
}
