use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use double_pendulum::{
    PendulumErrors,
    config::{OutputFormat, PendulumConfig},
    derivation::{NumericDynamics, SymbolicPendulum},
    model::PendulumModel,
    render::{render_equations, render_numeric, render_report, render_verification},
    verify::{VerifyOptions, verify},
};
use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing::{Level, info};

#[derive(Debug, Parser)]
#[command(version, about = "Closed-form dynamics of a two-link pendulum", long_about = None)]
struct Cli {
    /// Log verbosity, repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Derive the mass matrix, kinetic energy and potential energy
    Derive {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Overrides the format from the config
        #[arg(short, long, value_enum)]
        format: Option<Format>,
        /// Also print the unsimplified engine output
        #[arg(long)]
        raw: bool,
        /// Also print the equations of motion and link positions
        #[arg(long)]
        equations: bool,
    },
    /// Substitute the configured numbers and compare with the numeric model
    Evaluate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Check the derived expressions on random samples
    Verify {
        /// Symbol names and state prefixes to derive with
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short = 'n', long, default_value_t = 32)]
        samples: usize,
        #[arg(short, long, default_value_t = 0)]
        seed: u64,
        #[arg(short, long, default_value_t = 1e-9)]
        tolerance: f64,
    },
    /// Write a default configuration file
    InitConfig { path: PathBuf },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Text,
    Latex,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Latex => OutputFormat::Latex,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<PendulumConfig, PendulumErrors> {
    match path {
        Some(path) => Ok(PendulumConfig::load(path)?),
        None => Ok(PendulumConfig::default()),
    }
}

fn run(command: Commands) -> Result<ExitCode, PendulumErrors> {
    match command {
        Commands::Derive {
            config,
            format,
            raw,
            equations,
        } => {
            let config = load_config(config.as_deref())?;
            let format = format.map(OutputFormat::from).unwrap_or(config.format);
            let pendulum = SymbolicPendulum::new(&config.symbols, &config.state_prefixes)?;
            info!("deriving dynamics");
            let report = pendulum.derive()?;
            print!("{}", render_report(&report, format, raw));
            if equations {
                let eom = pendulum.equations_of_motion(&report.simplified);
                let elbow = pendulum.elbow_position()?;
                let tip = pendulum.tip_position()?;
                print!("{}", render_equations(&eom, &elbow, &tip, format));
            }
        }
        Commands::Evaluate { config } => {
            let config = PendulumConfig::load(&config)?;
            let pendulum = SymbolicPendulum::new(&config.symbols, &config.state_prefixes)?;
            let bindings =
                pendulum.bindings(&config.parameters, &config.state.q, &config.state.v)?;
            let symbolic = pendulum.derive()?.simplified.evaluate(&bindings)?;

            let mut model = PendulumModel::build(&config.parameters)?;
            let q = pendulum_state(&config.state.q, "q")?;
            let v = pendulum_state(&config.state.v, "v")?;
            model.set_state(q, v)?;
            let numeric = NumericDynamics {
                mass_matrix: model.mass_matrix()?,
                kinetic_energy: model.kinetic_energy()?,
                potential_energy: model.potential_energy()?,
            };
            print!("{}", render_numeric(&symbolic, &numeric));
        }
        Commands::Verify {
            config,
            samples,
            seed,
            tolerance,
        } => {
            let config = load_config(config.as_deref())?;
            let pendulum = SymbolicPendulum::new(&config.symbols, &config.state_prefixes)?;
            info!(samples, seed, "verifying derived dynamics");
            let report = verify(
                &pendulum,
                &VerifyOptions {
                    samples,
                    seed,
                    tolerance,
                },
            )?;
            print!("{}", render_verification(&report));
            if !report.all_passed() {
                error("verification failed");
                return Ok(ExitCode::FAILURE);
            }
            success("all checks passed");
        }
        Commands::InitConfig { path } => {
            PendulumConfig::default().save(&path)?;
            success(&format!("wrote {}", path.display()));
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn pendulum_state(values: &[f64], name: &str) -> Result<[f64; 2], PendulumErrors> {
    <[f64; 2]>::try_from(values).map_err(|_| PendulumErrors::NumericStateLength {
        name: name.to_string(),
        expected: 2,
        got: values.len(),
    })
}

fn success(s: &str) {
    println!("{}", s.green())
}

fn error(s: &str) {
    eprintln!("{}", s.red())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_accepts_config() {
        let cli = Cli::try_parse_from([
            "double_pendulum",
            "verify",
            "-c",
            "pendulum.ron",
            "-n",
            "4",
        ])
        .unwrap();
        match cli.command {
            Commands::Verify {
                config,
                samples,
                ..
            } => {
                assert_eq!(config, Some(PathBuf::from("pendulum.ron")));
                assert_eq!(samples, 4);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_verify_config_is_optional() {
        let cli = Cli::try_parse_from(["double_pendulum", "verify"]).unwrap();
        assert!(matches!(cli.command, Commands::Verify { config: None, .. }));
    }
}
