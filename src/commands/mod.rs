//! Text commands operating on the container tree.
//!
//! A command line is split on whitespace; the first token selects the command, ignoring case.
//! Parsing produces a typed [`Command`], which [`crate::state::State::execute`] runs against a
//! [`CommandContext`] describing what has focus.

use std::cmp::Reverse;
use std::fmt;

use crate::tree::{
    ContainerId, ContainerTree, Node, OutputScaleError, SavedScale, View, WorkspaceId,
};
use crate::utils::Switch;

pub mod fullscreen;
pub mod present;
#[cfg(test)]
mod tests;

pub use fullscreen::FullscreenRequest;

/// What a command operates on.
///
/// The dispatcher fills this in from the seat before each command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandContext {
    pub node: Node,
    pub workspace: WorkspaceId,
    pub container: Option<ContainerId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `fullscreen [enable|disable|toggle] [global]`
    ///
    /// Holds the raw argument tokens; they are interpreted when the command runs.
    Fullscreen(Vec<String>),
    /// `fullscreen present [enable|disable|toggle] [global]`
    ///
    /// The request is what "present" hands to the fullscreen toggle after changing the scale.
    FullscreenPresent(FullscreenRequest),
    /// `floating enable|disable|toggle`
    Floating(Switch),
    /// `open <W>x<H> [app-id]`
    Open(View),
    /// `close`
    Close,
    /// `focus parent`
    FocusParent,
    /// `workspace <name>`
    Workspace(String),
    /// `move scratchpad`
    MoveToScratchpad,
    /// `output <name> scale <value>`
    OutputScale { output: String, scale: String },
    /// `get_tree`
    GetTree,
    /// `get_outputs`
    GetOutputs,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// Malformed token count or shape.
    Usage {
        command: &'static str,
        message: String,
    },
    /// The output registry is empty.
    NoOutputs,
    /// Fullscreen was requested on a workspace without tiling children.
    EmptyWorkspace,
    /// The focused container has no view.
    NoView,
    /// The focused workspace is not on any output.
    NoOutput,
    /// The view has a zero or negative natural dimension.
    DegenerateSize { width: i32, height: i32 },
    /// Changing the output scale failed.
    OutputScale(OutputScaleError),
    UnknownCommand(String),
    /// Nothing has focus, so there is nothing to run the command on.
    NoFocus,
    InvalidArgument(String),
}

impl CommandContext {
    pub fn from_focus(tree: &ContainerTree) -> Result<Self, CommandError> {
        let seat = tree.seat();
        let workspace = seat.focused_workspace().ok_or(CommandError::NoFocus)?;
        let node = seat.focused_node().ok_or(CommandError::NoFocus)?;
        Ok(Self {
            node,
            workspace,
            container: seat.focused_container(),
        })
    }
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            return Err(CommandError::UnknownCommand(String::new()));
        };
        let args: Vec<&str> = tokens.collect();

        let name = name.to_ascii_lowercase();
        let command = match name.as_str() {
            "fullscreen" => match args.split_first() {
                Some((first, rest)) if first.eq_ignore_ascii_case("present") => {
                    Command::FullscreenPresent(FullscreenRequest::from_tokens(rest)?)
                }
                _ => Command::Fullscreen(args.iter().map(|s| s.to_string()).collect()),
            },
            "floating" => {
                let [arg] = args[..] else {
                    return Err(usage("floating", "expected enable, disable or toggle"));
                };
                let switch = Switch::parse(arg).ok_or_else(|| {
                    CommandError::InvalidArgument(format!("invalid floating argument: {arg}"))
                })?;
                Command::Floating(switch)
            }
            "open" => {
                let (size, app_id) = match args[..] {
                    [size] => (size, None),
                    [size, app_id] => (size, Some(app_id.to_owned())),
                    _ => return Err(usage("open", "expected <width>x<height> [app-id]")),
                };
                let (natural_width, natural_height) = parse_size(size)?;
                Command::Open(View {
                    app_id,
                    natural_width,
                    natural_height,
                })
            }
            "close" => {
                expect_no_args("close", &args)?;
                Command::Close
            }
            "focus" => match args[..] {
                [target] if target.eq_ignore_ascii_case("parent") => Command::FocusParent,
                _ => return Err(usage("focus", "expected parent")),
            },
            "workspace" => {
                if args.is_empty() {
                    return Err(usage("workspace", "expected a workspace name"));
                }
                Command::Workspace(args.join(" "))
            }
            "move" => match args[..] {
                [target] | ["to", target] if target.eq_ignore_ascii_case("scratchpad") => {
                    Command::MoveToScratchpad
                }
                _ => return Err(usage("move", "expected scratchpad")),
            },
            "output" => match args[..] {
                [output, property, scale] if property.eq_ignore_ascii_case("scale") => {
                    Command::OutputScale {
                        output: output.to_owned(),
                        scale: scale.to_owned(),
                    }
                }
                _ => return Err(usage("output", "expected <name> scale <value>")),
            },
            "get_tree" => {
                expect_no_args("get_tree", &args)?;
                Command::GetTree
            }
            "get_outputs" => {
                expect_no_args("get_outputs", &args)?;
                Command::GetOutputs
            }
            _ => return Err(CommandError::UnknownCommand(line.trim().to_owned())),
        };

        Ok(command)
    }
}

fn usage(command: &'static str, message: impl Into<String>) -> CommandError {
    CommandError::Usage {
        command,
        message: message.into(),
    }
}

fn expect_no_args(command: &'static str, args: &[&str]) -> Result<(), CommandError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(usage(
            command,
            format!("expected no arguments, got {}", args.len()),
        ))
    }
}

fn parse_size(s: &str) -> Result<(i32, i32), CommandError> {
    let invalid = || CommandError::InvalidArgument(format!("invalid size {s:?}, expected WxH"));
    let (w, h) = s.split_once(['x', 'X']).ok_or_else(invalid)?;
    let w = w.parse().map_err(|_| invalid())?;
    let h = h.parse().map_err(|_| invalid())?;
    Ok((w, h))
}

/// Releases the output scales saved by "present" on containers that are no longer shown
/// fullscreen.
pub(crate) fn restore_presented_scales(tree: &mut ContainerTree) {
    let mut released = Vec::new();
    for id in tree.containers_with_saved_scale() {
        if tree.nearest_fullscreen(id).is_none() {
            released.extend(tree.saved_scale_mut(id).take());
        }
    }

    release_saved_scales(tree, released);
}

/// Puts back saved output scales that no container holds anymore.
///
/// Saved scales on one output form a stack in present order. Releasing the newest one restores
/// the output; releasing an older one hands its value to the next newer container still holding
/// a saved scale on that output, which then restores it in turn.
pub(crate) fn release_saved_scales(tree: &mut ContainerTree, mut released: Vec<SavedScale>) {
    // Newest first, so that each one only sees containers that keep their saved scale.
    released.sort_by_key(|saved| Reverse(saved.serial));

    for saved in released {
        let newer = tree
            .containers_with_saved_scale()
            .into_iter()
            .filter_map(|id| Some((id, tree.container(id).saved_scale?)))
            .filter(|(_, s)| s.output == saved.output && s.serial > saved.serial)
            .min_by_key(|(_, s)| s.serial);

        match newer {
            Some((id, next)) => {
                debug!(
                    "handing saved scale {} over to container {}",
                    saved.scale,
                    tree.container(id).id
                );
                *tree.saved_scale_mut(id) = Some(SavedScale {
                    scale: saved.scale,
                    ..next
                });
            }
            None => {
                if !tree.restore_scale(saved) {
                    warn!("output of a presented container is gone, not restoring its scale");
                }
            }
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Usage { command, message } => {
                write!(f, "Invalid {command} command ({message})")
            }
            CommandError::NoOutputs => {
                f.write_str("Can't run this command while there's no outputs connected.")
            }
            CommandError::EmptyWorkspace => f.write_str("Can't fullscreen an empty workspace"),
            CommandError::NoView => f.write_str(
                "Can't run this command if there's no view connected to the container.",
            ),
            CommandError::NoOutput => f.write_str(
                "Can't run this command if no output is connected to the workspace.",
            ),
            CommandError::DegenerateSize { width, height } => write!(
                f,
                "Can't fit a view with natural size {width}x{height} into the output."
            ),
            CommandError::OutputScale(err) => write!(f, "Error changing output scale: {err}"),
            CommandError::UnknownCommand(line) => write!(f, "Unknown/invalid command '{line}'"),
            CommandError::NoFocus => f.write_str("Nothing is focused."),
            CommandError::InvalidArgument(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::OutputScale(err) => Some(err),
            _ => None,
        }
    }
}
