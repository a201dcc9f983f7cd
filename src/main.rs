#[macro_use]
extern crate tracing;

use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;
use trellis::cli::{print_reply, Cli, Sub};
use trellis::state::State;
use trellis::tree::format_tree;
use trellis_config::{Config, ConfigPath};

fn main() -> ExitCode {
    let directives = env::var("RUST_LOG").unwrap_or_else(|_| "trellis=debug,info".to_owned());
    let env_filter = EnvFilter::builder().parse_lossy(directives);
    tracing_subscriber::fmt()
        .compact()
        .with_writer(io::stderr)
        .with_env_filter(env_filter)
        .init();

    let cli = Cli::parse();

    let _client = tracy_client::Client::start();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        }
    }
}

/// Returns `false` if any command failed.
fn run(cli: Cli) -> anyhow::Result<bool> {
    if let Some(Sub::Validate { config }) = cli.subcommand {
        let path = config_path(config)?;
        if let Err(err) = path.load() {
            eprintln!("{err:?}");
            return Ok(false);
        }
        info!("config is valid");
        return Ok(true);
    }

    let config = match config_path(cli.config)?.load() {
        Ok(config) => config,
        Err(err) => {
            warn!("{err:?}");
            warn!("using the default config");
            Config::default()
        }
    };

    let mut state = State::from_config(&config);
    let mut success = true;

    let run_line = |state: &mut State, line: &str| -> anyhow::Result<bool> {
        for reply in state.run(line) {
            print_reply(&reply, cli.json)?;
            if reply.is_err() {
                return Ok(false);
            }
        }
        Ok(true)
    };

    if cli.commands.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.context("error reading stdin")?;
            success &= run_line(&mut state, &line)?;
        }
    } else {
        for line in &cli.commands {
            success &= run_line(&mut state, line)?;
        }
    }

    let tree = state.tree.to_ipc();
    if cli.json {
        let text = serde_json::to_string(&tree).context("error formatting tree")?;
        println!("{text}");
    } else {
        println!("{}", format_tree(&tree));
    }

    Ok(success)
}

fn config_path(cli_path: Option<PathBuf>) -> anyhow::Result<ConfigPath> {
    if let Some(path) = cli_path.or_else(|| env::var_os("TRELLIS_CONFIG").map(PathBuf::from)) {
        return Ok(ConfigPath::Explicit(path));
    }

    let dirs = ProjectDirs::from("", "", "trellis").context("error retrieving home directory")?;
    Ok(ConfigPath::Regular {
        user_path: dirs.config_dir().join("config.kdl"),
        system_path: PathBuf::from("/etc/trellis/config.kdl"),
    })
}
