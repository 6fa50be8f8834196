//! circuit-solver - Transient Circuit Simulator
//!
//! Simulates a netlist and prints per-element voltage/current series as
//! JSON.
//!
//! # Usage
//!
//! ```bash
//! circuit-solver circuit.net 0.02 > results.json
//! ```
//!
//! On failure `{"error": "<message>"}` is written to stderr and the exit
//! status is 1.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use circuit_solver::{
    dsl, error::Result, SimulatorConfig, TransientSimulator, DEFAULT_STEPS, DEFAULT_T_END,
};

/// Transient circuit simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the netlist file
    #[arg(value_name = "NETLIST")]
    netlist: PathBuf,

    /// Simulation end time in seconds
    #[arg(value_name = "T_END", default_value_t = DEFAULT_T_END)]
    t_end: f64,

    /// Number of time steps (dt = T_END / steps)
    #[arg(
        long,
        default_value_t = DEFAULT_STEPS as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    steps: u64,

    /// Maximum Newton-Raphson iterations per time step
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Convergence tolerance on the Newton step norm
    #[arg(long)]
    tolerance: Option<f64>,

    /// Fail when a time step does not converge
    #[arg(long)]
    strict: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

impl Args {
    fn config(&self) -> SimulatorConfig {
        let mut config = SimulatorConfig::new().with_strict_convergence(self.strict);
        if let Some(max_iterations) = self.max_iterations {
            config = config.with_max_iterations(max_iterations);
        }
        if let Some(tolerance) = self.tolerance {
            config = config.with_tolerance(tolerance);
        }
        config
    }

    fn dt(&self) -> f64 {
        self.t_end / self.steps as f64
    }
}

fn run(args: &Args) -> Result<String> {
    let ast = dsl::parse_file(&args.netlist)?;
    let circuit = dsl::build_circuit(&ast)?;
    let results = TransientSimulator::new(&circuit, args.config()).run(args.t_end, args.dt())?;
    results.to_json(args.pretty)
}

/// JSON error document written to stderr.
fn error_payload(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

/// Run the tool on `argv`: stdout text on success, stderr payload on failure.
///
/// `--help` and `--version` print and exit directly.
fn execute<I, T>(argv: I) -> std::result::Result<String, String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = match Args::try_parse_from(argv) {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => return Err(error_payload(e.to_string().trim())),
    };

    run(&args).map_err(|e| error_payload(&e.to_string()))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match execute(std::env::args_os()) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(payload) => {
            eprintln!("{}", payload);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn write_netlist(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "circuit-solver-{}-{}.net",
            std::process::id(),
            name
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    fn error_message(payload: &str) -> String {
        let value: serde_json::Value = serde_json::from_str(payload).unwrap();
        value["error"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["circuit-solver", "x.net"]).unwrap();
        assert_eq!(args.t_end, 0.01);
        assert_eq!(args.steps, 1000);
        assert_relative_eq!(args.dt(), 1e-5, max_relative = 1e-12);
        assert!(!args.config().strict_convergence);
    }

    #[test]
    fn test_divider_run_prints_results() {
        let path = write_netlist("divider", "V1 in 0 10\nR1 in mid 1k\nR2 mid 0 1k\n");
        let argv: [OsString; 2] = ["circuit-solver".into(), path.clone().into_os_string()];
        let json = execute(argv).unwrap();
        std::fs::remove_file(&path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let time = value["time"].as_array().unwrap();
        assert_eq!(time.len(), 1001);
        assert_relative_eq!(time[1000].as_f64().unwrap(), 0.01, max_relative = 1e-12);
        assert_relative_eq!(value["R2"]["v"][500].as_f64().unwrap(), 5.0, max_relative = 1e-9);
    }

    #[test]
    fn test_missing_netlist_is_an_error_payload() {
        let payload = execute(["circuit-solver", "/nonexistent/dir/circuit.net"]).unwrap_err();
        assert!(error_message(&payload).starts_with("Failed to read netlist file"));
    }

    #[test]
    fn test_bad_value_is_an_error_payload() {
        let path = write_netlist("bad-value", "V1 in 0 1\nR1 in 0 big\n");
        let argv: [OsString; 2] = ["circuit-solver".into(), path.clone().into_os_string()];
        let payload = execute(argv).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(
            error_message(&payload),
            "Parse error at line 2: Invalid value 'big' for component 'R1'"
        );
    }

    #[test]
    fn test_zero_steps_are_rejected() {
        let payload = execute(["circuit-solver", "x.net", "--steps", "0"]).unwrap_err();
        assert!(error_message(&payload).contains("--steps"));
    }
}
