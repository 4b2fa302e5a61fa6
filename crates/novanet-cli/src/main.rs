use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use novanet_ai::select_validator;
use novanet_core::{DEFAULT_CLI_PROGRAM, DEFAULT_MODEL_PATH, ValidatorBounds, ValidatorInput};
use tracing_subscriber::EnvFilter;

mod display;
mod run;

use run::{StartOptions, StartOutcome};

#[derive(Parser, Debug)]
#[command(name = "novanet-launcher", version)]
#[command(about = "Select a NovaNet validator with the on-device model and start it")]
struct Cli {
    /// Serialized validator selection model
    #[arg(long, global = true, env = "NOVANET_MODEL", default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// Start options used when no subcommand is given
    #[command(flatten)]
    start: StartArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Select a validator and start it (default)
    Start(StartArgs),
    /// Select a validator and print it without starting anything
    Select(SelectArgs),
}

#[derive(Args, Debug)]
struct SelectionArgs {
    /// Model input, four comma-separated values [default: 0.8,0.3,0.6,0.9]
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    input: Option<Vec<f32>>,

    /// Number of validators; selections at or above it are rejected
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    validator_count: Option<u32>,
}

impl SelectionArgs {
    fn input(&self) -> anyhow::Result<ValidatorInput> {
        match &self.input {
            Some(values) => Ok(ValidatorInput::new(values)?),
            None => Ok(ValidatorInput::default()),
        }
    }

    fn bounds(&self) -> ValidatorBounds {
        ValidatorBounds {
            count: self.validator_count,
        }
    }
}

#[derive(Args, Debug)]
struct StartArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Validator CLI to launch
    #[arg(long, env = "NOVANET_CLI", default_value = DEFAULT_CLI_PROGRAM)]
    cli: String,

    /// Print the command that would be started instead of starting it
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct SelectArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Print the selection as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!("novanet-launcher v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(Command::Select(args)) => cmd_select(&cli.model, args),
        Some(Command::Start(args)) => cmd_start(&cli.model, args),
        None => cmd_start(&cli.model, cli.start),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug,ort=warn" } else { "info,ort=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_select(model: &std::path::Path, args: SelectArgs) -> anyhow::Result<()> {
    let input = args.selection.input()?;
    let mut engine = run::load_engine(model)?;
    let selection = select_validator(&mut engine, &input, args.selection.bounds())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&selection)?);
    } else {
        print!("{}", display::selection_card(&selection, model));
    }
    Ok(())
}

fn cmd_start(model: &std::path::Path, args: StartArgs) -> anyhow::Result<()> {
    let opts = StartOptions {
        input: args.selection.input()?,
        bounds: args.selection.bounds(),
        program: args.cli,
        dry_run: args.dry_run,
    };
    let mut engine = run::load_engine(model)?;

    match run::run_start(&mut engine, &opts)? {
        StartOutcome::Planned(selection, plan) => {
            print!("{}", display::selection_card(&selection, model));
            println!("{}", display::launch_line(&plan));
        }
        StartOutcome::Finished(_, record) => {
            eprintln!("{}", display::launch_summary(&record));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_uses_defaults() {
        let cli = Cli::try_parse_from(["novanet-launcher"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.model, PathBuf::from("/novanet/validator_model.trt"));
        assert_eq!(cli.start.cli, "novanet-cli");
        assert!(!cli.start.dry_run);
    }

    #[test]
    fn cli_program_is_a_start_option() {
        let cli = Cli::try_parse_from(["novanet-launcher", "start", "--cli", "/opt/novanet-cli"])
            .unwrap();
        let Some(Command::Start(args)) = cli.command else {
            panic!("expected start");
        };
        assert_eq!(args.cli, "/opt/novanet-cli");

        let cli = Cli::try_parse_from(["novanet-launcher", "--cli", "/opt/novanet-cli"]).unwrap();
        assert_eq!(cli.start.cli, "/opt/novanet-cli");

        assert!(Cli::try_parse_from(["novanet-launcher", "select", "--cli", "foo"]).is_err());
    }

    #[test]
    fn zero_validator_count_rejected() {
        assert!(
            Cli::try_parse_from(["novanet-launcher", "start", "--validator-count", "0"]).is_err()
        );
        assert!(
            Cli::try_parse_from(["novanet-launcher", "select", "--validator-count", "0"]).is_err()
        );
    }

    #[test]
    fn start_parses_input_and_count() {
        let cli = Cli::try_parse_from([
            "novanet-launcher",
            "start",
            "--input",
            "0.1,0.2,-0.3,0.4",
            "--validator-count",
            "8",
            "--dry-run",
        ])
        .unwrap();
        let Some(Command::Start(args)) = cli.command else {
            panic!("expected start");
        };
        assert!(args.dry_run);
        assert_eq!(
            args.selection.input().unwrap().as_slice(),
            &[0.1, 0.2, -0.3, 0.4]
        );
        assert_eq!(args.selection.bounds(), ValidatorBounds::with_count(8));
    }

    #[test]
    fn short_input_rejected() {
        let cli =
            Cli::try_parse_from(["novanet-launcher", "select", "--input", "0.1,0.2"]).unwrap();
        let Some(Command::Select(args)) = cli.command else {
            panic!("expected select");
        };
        assert!(args.selection.input().is_err());
    }
}
