// CLI entry point for the just-intonation lattice explorer.
//
// Two subcommands:
// - `matrix` prints the coloured interval matrix for the given pitch classes,
//   or for the configured scale when none are given.
// - `build` grows a tuning system from 1/1, either from `--step` arguments or
//   from lines typed on stdin, then prints the scale and the recipe.
//
// Usage:
//   ji-lattice matrix [RATIO...] [--config PATH] [--hue-range F]
//                     [--scheme spread|limit] [--no-padding] [--plain]
//   ji-lattice build [--step "<start> <interval> [up|down]"]...
//                    [--check-neighbors] [--matrix] [--config PATH]
//
// Logging goes to stderr and is controlled by RUST_LOG (default: warn).

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ji_lattice::prompt::{AcceptAll, ConfirmExtension, LinePrompt};
use ji_lattice::tuning::{TuneOutcome, TuningStep, TuningSystem};
use ji_lattice::{ColorScheme, LatticeConfig, Result, display, render_matrix};
use ji_lattice_ratio::Ratio;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ji-lattice", version, about = "Explore just-intonation scales")]
struct Cli {
    /// JSON config file; absent fields keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the coloured interval matrix of a set of pitch classes.
    Matrix {
        /// Pitch classes such as 3/2; defaults to the configured scale.
        ratios: Vec<Ratio>,
        #[arg(long)]
        hue_range: Option<f64>,
        #[arg(long, value_enum)]
        scheme: Option<SchemeArg>,
        /// Do not right-align fractions.
        #[arg(long)]
        no_padding: bool,
        /// Print without colour markup.
        #[arg(long)]
        plain: bool,
    },
    /// Grow a tuning system from 1/1 one interval at a time.
    Build {
        /// A tuning step, e.g. "1/1 3/2 up". Repeatable. Reads steps from
        /// stdin when none are given.
        #[arg(long = "step")]
        steps: Vec<TuningStep>,
        /// Confirm each new pitch after seeing its neighbours.
        #[arg(long)]
        check_neighbors: bool,
        /// Also print the interval matrix of the resulting scale.
        #[arg(long)]
        matrix: bool,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum SchemeArg {
    Spread,
    Limit,
}

impl From<SchemeArg> for ColorScheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Spread => ColorScheme::Spread,
            SchemeArg::Limit => ColorScheme::Limit,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => LatticeConfig::load(path)?,
        None => LatticeConfig::default(),
    };

    match cli.command {
        Command::Matrix {
            ratios,
            hue_range,
            scheme,
            no_padding,
            plain,
        } => {
            if let Some(hue_range) = hue_range {
                config.palette.hue_range = hue_range;
            }
            if let Some(scheme) = scheme {
                config.palette.scheme = scheme.into();
            }
            if no_padding {
                config.show_padding = false;
            }
            if !ratios.is_empty() {
                config.scale = ratios;
            }
            config.validate()?;
            print_matrix(&config.scale, &config, plain)
        }
        Command::Build {
            steps,
            check_neighbors,
            matrix,
        } => {
            config.check_neighbors |= check_neighbors;
            config.validate()?;
            let system = if steps.is_empty() {
                build_interactive(&config)?
            } else {
                build_scripted(&steps, &config)?
            };
            println!("{system}");
            for line in system.recipe_lines() {
                println!("{line}");
            }
            if matrix {
                print_matrix(&system.pitch_classes(), &config, false)?;
            }
            Ok(())
        }
    }
}

fn print_matrix(pitches: &[Ratio], config: &LatticeConfig, plain: bool) -> Result<()> {
    let rendered = render_matrix(pitches, config)?;
    let text = if plain {
        display::to_plain_text(&rendered)
    } else {
        display::to_terminal(&rendered)
    };
    println!("{text}");
    Ok(())
}

/// Run every step in order; the first error aborts the whole build.
fn build_scripted(steps: &[TuningStep], config: &LatticeConfig) -> Result<TuningSystem> {
    let mut system = TuningSystem::new();
    let stdin = io::stdin();
    let mut prompt = LinePrompt::new(stdin.lock(), io::stdout(), config.padding());
    let mut accept_all = AcceptAll;
    let reviewer: &mut dyn ConfirmExtension = if config.check_neighbors {
        &mut prompt
    } else {
        &mut accept_all
    };
    for step in steps {
        let outcome = system.apply_step(step, reviewer)?;
        println!("{}", describe(outcome));
    }
    Ok(system)
}

/// Read one step per line until EOF or an empty line. Bad lines are reported
/// and skipped so a typo does not end the session.
fn build_interactive(config: &LatticeConfig) -> Result<TuningSystem> {
    let mut system = TuningSystem::new();
    let stdin = io::stdin();
    let mut prompt = LinePrompt::new(stdin.lock(), io::stdout(), config.padding());

    loop {
        print!("step> ");
        io::stdout().flush()?;
        let Some(line) = prompt.read_line()? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        let step: TuningStep = match line.parse() {
            Ok(step) => step,
            Err(e) => {
                warn!(input = line, "unparseable tuning step");
                eprintln!("error: {e}");
                continue;
            }
        };
        let result = if config.check_neighbors {
            system.apply_step(&step, &mut prompt)
        } else {
            system.apply_step(&step, &mut AcceptAll)
        };
        match result {
            Ok(outcome) => prompt.say(&describe(outcome))?,
            Err(e) => eprintln!("error: {e}"),
        }
        debug!(pitches = system.len(), "tuning step processed");
    }
    Ok(system)
}

fn describe(outcome: TuneOutcome) -> String {
    match outcome {
        TuneOutcome::Added(p) => format!("added {p}"),
        TuneOutcome::AlreadyPresent(p) => format!("{p} is already in the system"),
        TuneOutcome::Declined(p) => format!("{p} declined"),
    }
}
