mod cli;

use anyhow::Context;
use indexmap::IndexMap;
use state2hcl::state::State;
use std::io::{IsTerminal, Write};

/// Loaded when neither --input-file nor stdin provide a state
const DEFAULT_STATE_FILE: &str = "terraform.tfstate";

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("STATE2HCL_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = match cli.command {
        cli::Command::Generate(generate_cli) => generate(generate_cli),
        cli::Command::Dev(dev_cli) => dev(dev_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

pub fn generate(cli: cli::GenerateCommand) -> anyhow::Result<()> {
    let state = load(&cli.input)?;
    let mut stdout = std::io::stdout().lock();
    write_blocks(&state, cli.raw, cli.fail_fast, &mut stdout)
}

/// Writes one block per resource to `out`
///
/// Nothing is written unless every block could be formatted.
fn write_blocks(
    state: &State,
    raw_output: bool,
    fail_fast: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut blocks = Vec::new();
    let mut failed = 0;

    for generated in state2hcl::generate(state) {
        let raw = match generated.result {
            Ok(raw) => raw,
            Err(e) if fail_fast => return Err(e.into()),
            Err(e) => {
                let e = anyhow::Error::new(e);
                for error in e.chain() {
                    eprintln!("{error}")
                }
                failed += 1;
                continue;
            }
        };

        let text = if raw_output {
            raw
        } else {
            state2hcl::format::format(&raw).with_context(|| {
                format!(
                    "Block generated for `{}` is not valid hcl, use --raw to print it anyway\n{raw}",
                    generated.address
                )
            })?
        };
        blocks.push(text);
    }

    for (position, text) in blocks.iter().enumerate() {
        // one write per resource
        let mut chunk = String::with_capacity(text.len() + 1);
        if position > 0 {
            chunk.push('\n');
        }
        chunk.push_str(text);
        out.write_all(chunk.as_bytes())?;
    }

    out.flush()?;
    anyhow::ensure!(failed == 0, "{failed} resource(s) could not be generated");
    Ok(())
}

fn load(input: &cli::InputArgs) -> anyhow::Result<State> {
    if let Some(file_path) = &input.file {
        return State::load_file(file_path)
            .with_context(|| format!("Failed to load state from {}", file_path.display()));
    }

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        let default_path = std::path::Path::new(DEFAULT_STATE_FILE);
        anyhow::ensure!(
            default_path.is_file(),
            "No state provided on stdin and no {DEFAULT_STATE_FILE} in work directory"
        );
        return State::load_file(default_path)
            .with_context(|| format!("Failed to load state from {DEFAULT_STATE_FILE}"));
    }

    State::from_reader(stdin.lock()).context("Failed to load state from stdin")
}

fn output<T: serde::Serialize>(output: &cli::OutputArgs, value: &T) -> anyhow::Result<()> {
    match output.format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), value)?,
        cli::OutputFormat::Json => serde_json::to_writer_pretty(std::io::stdout(), value)?,
    };

    Ok(())
}

/// (state2hcl-)developer utilities
///
/// A quick way to expose internal structures for debugging purposes
pub fn dev(cli: cli::DevCommand) -> anyhow::Result<()> {
    use cli::DevSubCommand::*;

    let state = load(&cli.input)?;

    match cli.command {
        Tree => {
            let mut modules: IndexMap<&str, IndexMap<&str, state2hcl::node::Object>> =
                IndexMap::new();
            for (module, address, flat) in state.resources() {
                let tree = state2hcl::reconstruct::reconstruct(flat)
                    .with_context(|| format!("Unable to reconstruct `{address}`"))?;
                modules.entry(module).or_default().insert(address, tree);
            }
            output(&cli.output, &modules)
        }
        Flat => {
            let mut modules: IndexMap<&str, IndexMap<&str, &state2hcl::state::FlatAttributes>> =
                IndexMap::new();
            for (module, address, flat) in state.resources() {
                modules.entry(module).or_default().insert(address, flat);
            }
            output(&cli.output, &modules)
        }
    }
}
