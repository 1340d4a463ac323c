#![deny(unsafe_code)]
//! CLI binary for the fluid-engine.
//!
//! Subcommands:
//! - `render` — run the solver headless for N ticks, write a PNG of the
//!   density field
//! - `schema` — print the configuration parameter schema

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use fluid_engine_core::FluidConfig;
use fluid_engine_runtime::{snapshot, Lifecycle};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "fluid-engine", about = "Interactive fluid simulation engine CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the simulation for N ticks and write a PNG snapshot.
    Render {
        /// Surface width in pixels.
        #[arg(short = 'W', long, default_value_t = 512)]
        width: u32,

        /// Surface height in pixels.
        #[arg(short = 'H', long, default_value_t = 512)]
        height: u32,

        /// Number of simulation ticks.
        #[arg(short, long, default_value_t = 300)]
        ticks: usize,

        /// PRNG seed for deterministic splats.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Extra ambient splats queued before the run (the startup burst
        /// is always seeded).
        #[arg(short, long, default_value_t = 0)]
        splats: usize,

        /// Output file path.
        #[arg(short, long, default_value = "density.png")]
        output: PathBuf,

        /// Solver parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// Print the configuration parameter schema.
    Schema,
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Schema => {
            let schema = FluidConfig::param_schema();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&schema)?);
            } else if let Some(entries) = schema.as_object() {
                println!("Parameters:");
                for (name, entry) in entries {
                    let description = entry["description"].as_str().unwrap_or("");
                    println!("  {name}: {description} (default {})", entry["default"]);
                }
            }
        }
        Command::Render {
            width,
            height,
            ticks,
            seed,
            splats,
            output,
            params,
        } => {
            let params: serde_json::Value = serde_json::from_str(&params)
                .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
            let config = FluidConfig::from_json(&params);

            let mut lifecycle = Lifecycle::new(config, seed)?;
            lifecycle.start()?;
            lifecycle.observe_size(f64::from(width), f64::from(height), 1.0)?;
            if lifecycle.sim().is_none() {
                return Err(CliError::Input(format!(
                    "surface {width}x{height} is too small to simulate"
                )));
            }
            if splats > 0 {
                lifecycle.injector_mut().queue_ambient(splats);
            }

            for i in 0..ticks {
                lifecycle.tick(i as f64 / 60.0)?;
            }

            let sim = lifecycle
                .sim()
                .ok_or_else(|| CliError::Input("simulation was disposed mid-run".into()))?;
            snapshot::write_png(sim.density().read(), &output)?;

            if cli.json {
                let info = serde_json::json!({
                    "width": width,
                    "height": height,
                    "grid_width": sim.width(),
                    "grid_height": sim.height(),
                    "ticks": ticks,
                    "seed": seed,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {}x{} grid ({ticks} ticks, seed {seed}) -> {}",
                    sim.width(),
                    sim.height(),
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
