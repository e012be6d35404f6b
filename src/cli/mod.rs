//! CLI argument parsing

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use jobsim_core::{InjectionMode, SimulationConfig, DEFAULT_NUM_WORKERS, DEFAULT_TIMEOUT};

#[derive(Parser, Debug)]
#[command(name = "jobsim")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the historical error dataset (JSON)
    #[arg(long)]
    pub input: PathBuf,

    /// Site whose error history drives failure injection
    #[arg(long)]
    pub queue: String,

    /// Number of jobs to simulate
    #[arg(long)]
    pub n: usize,

    /// Suppress per-job progress logging (warnings and errors still shown)
    #[arg(long)]
    pub mute: bool,

    /// Worker pool size
    #[arg(long, default_value_t = DEFAULT_NUM_WORKERS)]
    pub workers: usize,

    /// Fixed job loads, comma separated, replayed in order instead of random loads
    #[arg(long, value_delimiter = ',')]
    pub loads: Vec<f64>,

    /// Seed for reproducible loads and error draws
    #[arg(long)]
    pub seed: Option<u64>,

    /// Processing timeout in time units
    #[arg(long, default_value_t = DEFAULT_TIMEOUT)]
    pub timeout: f64,

    /// How sampled error codes are applied
    #[arg(long, value_enum, default_value_t = InjectionArg::Refine)]
    pub injection: InjectionArg,

    /// Probability of overriding a completed job (with `--injection override`)
    #[arg(long, default_value_t = 0.1)]
    pub override_rate: f64,

    /// Summary output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Run on the wall clock instead of the virtual clock
    #[arg(long)]
    pub realtime: bool,

    /// Wall-clock length of one time unit, in milliseconds
    #[arg(long, default_value_t = 1000, requires = "realtime")]
    pub time_unit_ms: u64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum InjectionArg {
    /// Timed-out jobs take a sampled error code
    Refine,
    /// Completed jobs may also be overridden with a sampled error code
    Override,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// Map the arguments onto a simulation configuration
    pub fn simulation_config(&self) -> SimulationConfig {
        let injection = match self.injection {
            InjectionArg::Refine => InjectionMode::RefineTimeouts,
            InjectionArg::Override => InjectionMode::Override {
                rate: self.override_rate,
            },
        };

        let mut config = SimulationConfig::new(self.workers, self.n)
            .with_timeout(self.timeout)
            .with_injection(injection)
            .with_time_unit(Duration::from_millis(self.time_unit_ms));
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("jobsim").chain(args.iter().copied()))
    }

    #[test]
    fn test_required_arguments() {
        let cli = parse(&["--input", "errors.json", "--queue", "site-a", "--n", "100"]).unwrap();

        assert_eq!(cli.input, PathBuf::from("errors.json"));
        assert_eq!(cli.queue, "site-a");
        assert_eq!(cli.n, 100);
        assert!(!cli.mute);
        assert_eq!(cli.workers, DEFAULT_NUM_WORKERS);
        assert_eq!(cli.injection, InjectionArg::Refine);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.realtime);
    }

    #[test]
    fn test_missing_arguments_are_rejected() {
        assert!(parse(&["--queue", "site-a", "--n", "10"]).is_err());
        assert!(parse(&["--input", "errors.json", "--n", "10"]).is_err());
        assert!(parse(&["--input", "errors.json", "--queue", "site-a"]).is_err());
    }

    #[test]
    fn test_invalid_job_count_is_rejected() {
        assert!(parse(&["--input", "e.json", "--queue", "q", "--n", "many"]).is_err());
        assert!(parse(&["--input", "e.json", "--queue", "q", "--n", "-4"]).is_err());
    }

    #[test]
    fn test_default_config_mapping() {
        let cli = parse(&["--input", "e.json", "--queue", "q", "--n", "7", "--mute"]).unwrap();
        let config = cli.simulation_config();

        assert!(cli.mute);
        assert_eq!(config.num_workers, DEFAULT_NUM_WORKERS);
        assert_eq!(config.num_jobs, 7);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.injection, InjectionMode::RefineTimeouts);
        assert_eq!(config.time_unit, Duration::from_secs(1));
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_override_config_mapping() {
        let cli = parse(&[
            "--input",
            "e.json",
            "--queue",
            "q",
            "--n",
            "7",
            "--workers",
            "4",
            "--seed",
            "11",
            "--injection",
            "override",
            "--override-rate",
            "0.25",
            "--format",
            "json",
        ])
        .unwrap();
        let config = cli.simulation_config();

        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(config.num_workers, 4);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.injection, InjectionMode::Override { rate: 0.25 });
    }

    #[test]
    fn test_out_of_range_override_rate_fails_validation() {
        let cli = parse(&[
            "--input",
            "e.json",
            "--queue",
            "q",
            "--n",
            "1",
            "--injection",
            "override",
            "--override-rate",
            "1.5",
        ])
        .unwrap();

        assert!(cli.simulation_config().validate().is_err());
    }

    #[test]
    fn test_fixed_loads_list() {
        let cli = parse(&["--input", "e", "--queue", "q", "--n", "4", "--loads", "2,11,3,9.5"]).unwrap();
        assert_eq!(cli.loads, vec![2.0, 11.0, 3.0, 9.5]);

        let cli = parse(&["--input", "e", "--queue", "q", "--n", "4"]).unwrap();
        assert!(cli.loads.is_empty());

        assert!(parse(&["--input", "e", "--queue", "q", "--n", "4", "--loads", "2,x"]).is_err());
    }

    #[test]
    fn test_time_unit_requires_realtime() {
        assert!(parse(&["--input", "e", "--queue", "q", "--n", "1", "--time-unit-ms", "5"]).is_err());

        let cli = parse(&[
            "--input",
            "e",
            "--queue",
            "q",
            "--n",
            "1",
            "--realtime",
            "--time-unit-ms",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.simulation_config().time_unit, Duration::from_millis(5));
    }
}
