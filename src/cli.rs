use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use trellis_ipc::{Reply, Response};

use crate::tree::format_tree;
use crate::utils::version;

#[derive(Parser)]
#[command(author, version = version(), about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[command(subcommand_value_name = "SUBCOMMAND")]
#[command(subcommand_help_heading = "Subcommands")]
pub struct Cli {
    /// Path to config file (default: `$XDG_CONFIG_HOME/trellis/config.kdl`).
    ///
    /// This can also be set with the `TRELLIS_CONFIG` environment variable. If both are set, the
    /// command line argument takes precedence.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Format output as JSON.
    #[arg(short, long)]
    pub json: bool,
    /// Commands to run, for example `"open 800x600 mpv"` and `"fullscreen present"`.
    ///
    /// Each argument may hold several commands separated by `;`. When no commands are given,
    /// they are read from stdin, one line at a time.
    pub commands: Vec<String>,

    #[command(subcommand)]
    pub subcommand: Option<Sub>,
}

#[derive(Subcommand)]
pub enum Sub {
    /// Validate the config file.
    Validate {
        /// Path to config file (default: `$XDG_CONFIG_HOME/trellis/config.kdl`).
        ///
        /// This can also be set with the `TRELLIS_CONFIG` environment variable. If both are set,
        /// the command line argument takes precedence.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Prints the reply to one command.
///
/// Errors go to stderr. Plain successes print nothing unless `json` is set.
pub fn print_reply(reply: &Reply, json: bool) -> anyhow::Result<()> {
    if json {
        let text = serde_json::to_string(reply).context("error formatting reply")?;
        println!("{text}");
        return Ok(());
    }

    match reply {
        Ok(Response::Handled) => (),
        Ok(Response::Tree(tree)) => println!("{}", format_tree(tree)),
        Ok(Response::Outputs(outputs)) => {
            for output in outputs {
                println!(
                    "Output \"{}\": {}x{} logical, {}x{} physical, scale {}",
                    output.name,
                    output.width,
                    output.height,
                    output.physical_width,
                    output.physical_height,
                    output.scale,
                );
            }
        }
        Err(message) => eprintln!("Error: {message}"),
    }

    Ok(())
}
