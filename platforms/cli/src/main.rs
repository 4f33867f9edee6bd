use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use tmsim::types::DEFAULT_WINDOW_RADIUS;
use tmsim::{
    trace, IdFormat, Program, ProgramLoader, ProgramManager, SparseTape, TuringMachine,
    TuringMachineError, Verdict,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Machine document to run (.yaml, .yml or .json).
    /// Program content can also be piped via stdin.
    file: Option<PathBuf>,

    /// Run a built-in program by name instead of a file
    #[clap(short, long, conflicts_with = "file")]
    builtin: Option<String>,

    /// List the built-in programs and exit
    #[clap(short, long)]
    list: bool,

    /// Input to run; repeatable. Overrides the inputs declared by the document
    #[clap(short, long)]
    input: Vec<String>,

    /// Step budget for each run
    #[clap(short, long)]
    max_steps: Option<usize>,

    /// ID format: tuple or labeled
    #[clap(long)]
    id_format: Option<IdFormat>,

    /// Write one trace file per input, named `<base>_input<N>.txt`
    #[clap(long, value_name = "PATH")]
    ids_out: Option<PathBuf>,

    /// Print verdicts as JSON
    #[clap(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if cli.list {
        list_programs();
        return;
    }

    let program = match load_program(&cli) {
        Ok(program) => configure(program, &cli),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    };

    let inputs = if cli.input.is_empty() {
        program.inputs().to_vec()
    } else {
        cli.input.clone()
    };

    if inputs.is_empty() {
        eprintln!("No inputs to run. Pass one with --input or declare them in the document.");
        process::exit(1);
    }

    let mut reports = Vec::new();
    for (i, input) in inputs.iter().enumerate() {
        match run_input(&program, input) {
            Ok(verdict) => {
                if let Some(base) = &cli.ids_out {
                    if let Err(e) = export_trace(base, i + 1, &verdict) {
                        eprintln!("Error: {}", e);
                    }
                }

                if cli.json {
                    reports.push(serde_json::json!({
                        "input": input,
                        "outcome": verdict.outcome(),
                        "verdict": verdict,
                    }));
                } else {
                    print_verdict(input, &verdict);
                }
            }
            // A bad input only fails its own run
            Err(e) => {
                tracing::warn!(input, error = %e, "input skipped");
                if cli.json {
                    reports.push(serde_json::json!({ "input": input, "error": e.to_string() }));
                } else {
                    eprintln!("Input {:?}: {}", input, e);
                }
            }
        }
    }

    if cli.json {
        match serde_json::to_string_pretty(&reports) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error: {}", e),
        }
    }
}

/// Loads the program from a file, a built-in, or stdin, in that order.
fn load_program(cli: &Cli) -> Result<Program> {
    if let Some(path) = &cli.file {
        load_file(path)
    } else if let Some(name) = &cli.builtin {
        ProgramManager::get_program_by_name(name)
            .with_context(|| format!("Unknown built-in program '{}'", name))
    } else if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        ProgramLoader::load_program_from_string(&buffer).context("Invalid program on stdin")
    } else {
        bail!("No program given. Pass a FILE, use --builtin NAME, or pipe a document via stdin.")
    }
}

fn load_file(path: &Path) -> Result<Program> {
    if !path.exists() {
        bail!("File '{}' does not exist", path.display());
    }

    ProgramLoader::load_program(path)
        .with_context(|| format!("Failed to load program from '{}'", path.display()))
}

/// Applies the command line overrides.
fn configure(mut program: Program, cli: &Cli) -> Program {
    if let Some(max_steps) = cli.max_steps {
        program = program.with_max_steps(max_steps);
    }

    if let Some(format) = cli.id_format {
        let radius = program
            .recorder()
            .radius()
            .or((format == IdFormat::Tuple).then_some(DEFAULT_WINDOW_RADIUS));
        program = program.with_id_format(format, radius);
    }

    program
}

fn run_input(program: &Program, input: &str) -> Result<Verdict, TuringMachineError> {
    let mut machine = TuringMachine::<SparseTape>::new(program);
    machine.reset(input)?;
    Ok(machine.run_default())
}

/// Writes the trace of the input at `index` (1-based) next to `base`.
fn export_trace(base: &Path, index: usize, verdict: &Verdict) -> Result<PathBuf> {
    let path = trace::write_trace(base, index, verdict)?;
    tracing::info!(index, path = %path.display(), "trace exported");
    Ok(path)
}

fn print_verdict(input: &str, verdict: &Verdict) {
    println!("Input: {:?}", input);
    for id in &verdict.ids {
        println!("  {}", id);
    }
    println!("Result: {} after {} steps\n", verdict.outcome(), verdict.steps);
}

fn list_programs() {
    for index in 0..ProgramManager::get_program_count() {
        if let Ok(info) = ProgramManager::get_program_info(index) {
            println!(
                "{:>2}  {:<24} states: {:<3} rules: {:<3} inputs: {}{}",
                info.index,
                info.name,
                info.state_count,
                info.transition_count,
                info.input_count,
                if info.memory { "  [mem_cache]" } else { "" }
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("tmsim-cli").chain(args.iter().copied()))
    }

    #[test]
    fn test_builtin_with_overrides() {
        let cli = cli(&["--builtin", "unary increment", "-i", "11", "--max-steps", "1"]);
        let program = configure(load_program(&cli).unwrap(), &cli);

        assert_eq!(program.max_steps(), 1);
        let verdict = run_input(&program, &cli.input[0]).unwrap();
        assert!(verdict.step_limit_hit);
        assert!(!verdict.accepted);
    }

    #[test]
    fn test_id_format_override() {
        let cli = cli(&["--builtin", "Even number of a's", "--id-format", "tuple"]);
        let program = configure(load_program(&cli).unwrap(), &cli);

        assert_eq!(program.recorder().format(), IdFormat::Tuple);
        assert_eq!(program.recorder().radius(), Some(DEFAULT_WINDOW_RADIUS));
    }

    #[test]
    fn test_unknown_builtin() {
        let cli = cli(&["--builtin", "nope"]);
        assert!(load_program(&cli).is_err());
    }

    #[test]
    fn test_export_trace() {
        let dir = tempfile::tempdir().unwrap();
        let program = ProgramManager::get_program_by_name("Unary increment").unwrap();
        let verdict = run_input(&program, "11").unwrap();

        let path = export_trace(&dir.path().join("run.txt"), 2, &verdict).unwrap();
        assert_eq!(path, dir.path().join("run_input2.txt"));

        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().count(), verdict.ids.len() + 1);
        assert_eq!(content.lines().last(), Some("ACCEPTED"));

        let missing = dir.path().join("missing").join("run.txt");
        assert!(export_trace(&missing, 1, &verdict).is_err());
    }

    #[test]
    fn test_invalid_input_is_reported() {
        let program = ProgramManager::get_program_by_name("Unary increment").unwrap();
        let result = run_input(&program, "1x1");

        assert!(matches!(
            result,
            Err(TuringMachineError::InvalidInputSymbol { symbol: 'x', position: 1 })
        ));
    }
}
