//! Command processing state.
//!
//! Commands run one at a time to completion: [`State::execute`] takes `&mut self`, so no other
//! command can observe the tree halfway through one. Callers that accept commands from several
//! threads have to funnel them through a single owner of the `State`.

use trellis_config::Config;
use trellis_ipc::{Layout, Reply, Response};

use crate::commands::{
    fullscreen, present, release_saved_scales, restore_presented_scales, Command, CommandContext,
    CommandError,
};
use crate::tree::ContainerTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Put back the output scale once a presented container leaves fullscreen or closes.
    pub restore_scale: bool,
}

pub struct State {
    pub tree: ContainerTree,
    pub options: Options,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            restore_scale: true,
        }
    }
}

impl Options {
    pub fn from_config(config: &Config) -> Self {
        Self {
            restore_scale: config.present.restore_scale(),
        }
    }
}

impl State {
    pub fn new(tree: ContainerTree, options: Options) -> Self {
        Self { tree, options }
    }

    /// Builds the outputs and workspaces described by the config.
    pub fn from_config(config: &Config) -> Self {
        let _span = tracy_client::span!("State::from_config");

        let mut tree = ContainerTree::new();

        for output in &config.outputs.0 {
            if output.off {
                debug!("output {} is turned off in the config, skipping", output.name);
                continue;
            }

            let Some(mode) = output.mode else {
                warn!("output {} has no mode in the config, skipping", output.name);
                continue;
            };

            let scale = output.scale.map_or(1., |scale| scale.0);

            tree.add_output(
                output.name.clone(),
                (u32::from(mode.width), u32::from(mode.height)),
                scale,
            );
        }

        let first_output = tree.outputs().next().map(|(id, _)| id);

        for ws in &config.workspaces {
            let output = match &ws.open_on_output {
                Some(name) => {
                    let output = tree.find_output(name);
                    if output.is_none() {
                        warn!("workspace {}: no output named {name}", ws.name.0);
                    }
                    output.or(first_output)
                }
                None => first_output,
            };

            tree.add_workspace(
                ws.name.0.clone(),
                output,
                ws.layout.unwrap_or(Layout::Horizontal),
            );
        }

        if tree.workspaces().next().is_none() {
            tree.add_workspace(String::from("1"), first_output, Layout::Horizontal);
        }

        Self::new(tree, Options::from_config(config))
    }

    /// Runs a `;`-separated list of commands, stopping at the first failure.
    ///
    /// Returns one reply per command that ran.
    pub fn run(&mut self, line: &str) -> Vec<Reply> {
        let mut replies = Vec::new();

        for command in line.split(';') {
            if command.trim().is_empty() {
                continue;
            }

            let reply = Command::parse(command)
                .and_then(|command| self.execute(command))
                .map_err(|err| {
                    debug!("command {:?} failed: {err}", command.trim());
                    err.to_string()
                });

            let failed = reply.is_err();
            replies.push(reply);
            if failed {
                break;
            }
        }

        replies
    }

    pub fn execute(&mut self, command: Command) -> Result<Response, CommandError> {
        let _span = tracy_client::span!("State::execute");
        trace!("executing {command:?}");

        let tree = &mut self.tree;

        match command {
            Command::Fullscreen(tokens) => {
                let ctx = CommandContext::from_focus(tree)?;
                fullscreen::fullscreen(tree, &ctx, &tokens)?;
                restore_presented_scales(tree);
            }
            Command::FullscreenPresent(forwarded) => {
                let ctx = CommandContext::from_focus(tree)?;
                present::present(tree, &ctx, forwarded, self.options.restore_scale)?;
            }
            Command::Floating(switch) => {
                let ctx = CommandContext::from_focus(tree)?;
                let id = ctx.container.ok_or(CommandError::NoView)?;
                let enable = switch.resolve(tree.container(id).floating);
                tree.set_floating(id, enable);
                tree.arrange_root();
            }
            Command::Open(view) => {
                let ctx = CommandContext::from_focus(tree)?;
                tree.open_view(ctx.workspace, view);
                tree.arrange_root();
            }
            Command::Close => {
                let ctx = CommandContext::from_focus(tree)?;
                let id = ctx.container.ok_or(CommandError::NoView)?;
                let saved = tree.close_container(id);
                release_saved_scales(tree, saved);
                tree.arrange_root();
            }
            Command::FocusParent => {
                if !tree.focus_parent() {
                    return Err(CommandError::InvalidArgument(String::from(
                        "There is no parent to focus.",
                    )));
                }
            }
            Command::Workspace(name) => {
                let ws = match tree.find_workspace(&name) {
                    Some(ws) => ws,
                    None => {
                        let output = tree
                            .seat()
                            .focused_workspace()
                            .and_then(|ws| tree.workspace(ws).output)
                            .or_else(|| tree.outputs().next().map(|(id, _)| id));
                        tree.add_workspace(name, output, Layout::Horizontal)
                    }
                };
                tree.focus_workspace(ws);
            }
            Command::MoveToScratchpad => {
                let ctx = CommandContext::from_focus(tree)?;
                let id = ctx.container.ok_or(CommandError::NoView)?;
                tree.move_to_scratchpad(id);
                tree.arrange_root();
            }
            Command::OutputScale { output, scale } => {
                tree.set_output_scale(&output, &scale)
                    .map_err(CommandError::OutputScale)?;
                tree.arrange_root();
            }
            Command::GetTree => return Ok(Response::Tree(tree.to_ipc())),
            Command::GetOutputs => {
                let outputs = tree.outputs().map(|(id, _)| tree.output_to_ipc(id));
                return Ok(Response::Outputs(outputs.collect()));
            }
        }

        Ok(Response::Handled)
    }
}
