use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "surfmatter developers",
    version,
    about = "surfmatter CLI - Brownian dynamics of self-propelled particles on curved surfaces.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Integrate a particle configuration on a constraint surface and write snapshots.
    Run(RunArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    // --- Core Arguments ---
    /// Path to the initial particle configuration (whitespace-separated table).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Directory that receives snapshots and the run summary.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Path to the simulation configuration file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    // --- Run Overrides ---
    /// Override the number of integration steps.
    #[arg(short = 'n', long, value_name = "INT")]
    pub steps: Option<u64>,

    /// Override the noise seed.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Override the number of steps between snapshots (0 writes only the initial one).
    #[arg(long, value_name = "INT")]
    pub snapshot_interval: Option<u64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S integrator.dt=0.005
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_arguments_are_parsed() {
        let cli = Cli::try_parse_from([
            "surfmatter",
            "-vv",
            "run",
            "--input",
            "init.dat",
            "--config",
            "sim.toml",
            "-n",
            "500",
            "--seed",
            "9",
            "-S",
            "integrator.dt=0.005",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Commands::Run(args) = cli.command;
        assert_eq!(args.input, PathBuf::from("init.dat"));
        assert_eq!(args.steps, Some(500));
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.output, None);
        assert_eq!(args.set_values, vec!["integrator.dt=0.005".to_string()]);
    }

    #[test]
    fn run_requires_input_and_config() {
        assert!(Cli::try_parse_from(["surfmatter", "run", "--input", "a.dat"]).is_err());
        assert!(Cli::try_parse_from(["surfmatter", "run", "--config", "a.toml"]).is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from([
            "surfmatter", "-q", "-v", "run", "-i", "a.dat", "-c", "a.toml",
        ]);
        assert!(result.is_err());
    }
}
