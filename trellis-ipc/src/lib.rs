//! Types for observing trellis command results and container tree state.
#![warn(missing_docs)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reply from trellis to a command.
///
/// Every command gets one reply.
///
/// * If the command failed, it will be a `Reply::Err` with a human-readable message.
/// * If the command does not need any particular response, it will be
///   `Reply::Ok(Response::Handled)`. Kind of like an `Ok(())`.
/// * Otherwise, it will be `Reply::Ok(response)` with one of the other [`Response`] variants.
pub type Reply = Result<Response, String>;

/// Successful response to a command.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Response {
    /// A command that does not need a response was handled successfully.
    Handled,
    /// Snapshot of the whole container tree.
    Tree(Tree),
    /// Information about the outputs, in registration order.
    Outputs(Vec<Output>),
}

/// Scope of exclusive display of a container.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FullscreenMode {
    /// Not fullscreen.
    #[default]
    None,
    /// Fullscreen on the container's own workspace.
    Workspace,
    /// Fullscreen across every output.
    Global,
}

/// Orientation in which a container or a workspace arranges its tiling children.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Children side by side.
    #[default]
    Horizontal,
    /// Children stacked on top of each other.
    Vertical,
}

/// Output in the tree.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Output {
    /// Name of the output.
    pub name: String,
    /// Width of the current mode in physical pixels.
    pub physical_width: u32,
    /// Height of the current mode in physical pixels.
    pub physical_height: u32,
    /// Width in logical pixels, after the current scale.
    pub width: u32,
    /// Height in logical pixels, after the current scale.
    pub height: u32,
    /// Current scale factor.
    pub scale: f64,
}

/// Workspace in the tree.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Workspace {
    /// Unique id of the workspace.
    pub id: u32,
    /// Name of the workspace.
    pub name: String,
    /// Name of the output that the workspace is on.
    ///
    /// Can be `None` if the workspace is not assigned to any output.
    pub output: Option<String>,
    /// Layout of the tiling children.
    pub layout: Layout,
    /// Whether the workspace is the focused one.
    pub is_focused: bool,
    /// Tiling containers, in order.
    pub tiling: Vec<Container>,
    /// Floating containers, in order.
    pub floating: Vec<Container>,
}

/// Container in the tree, with its children.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Container {
    /// Unique id of the container.
    pub id: u32,
    /// Fullscreen mode of the container.
    pub fullscreen_mode: FullscreenMode,
    /// Whether the container is floating.
    pub floating: bool,
    /// Whether the container is focused.
    pub is_focused: bool,
    /// Layout of the children.
    pub layout: Layout,
    /// View shown by the container, if any.
    pub view: Option<View>,
    /// Child containers, in order.
    pub children: Vec<Container>,
}

/// Client surface owned by a container.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Application ID, if set.
    pub app_id: Option<String>,
    /// Intrinsic width in pixels, before any scaling.
    pub natural_width: i32,
    /// Intrinsic height in pixels, before any scaling.
    pub natural_height: i32,
}

/// The whole tree.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Tree {
    /// Outputs, in registration order.
    pub outputs: Vec<Output>,
    /// Workspaces, in creation order.
    pub workspaces: Vec<Workspace>,
    /// Containers in the scratchpad.
    pub scratchpad: Vec<Container>,
}

impl fmt::Display for FullscreenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FullscreenMode::None => "none",
            FullscreenMode::Workspace => "workspace",
            FullscreenMode::Global => "global",
        })
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Layout::Horizontal => "horizontal",
            Layout::Vertical => "vertical",
        })
    }
}

impl FromStr for Layout {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("horizontal") || s.eq_ignore_ascii_case("splith") {
            Ok(Self::Horizontal)
        } else if s.eq_ignore_ascii_case("vertical") || s.eq_ignore_ascii_case("splitv") {
            Ok(Self::Vertical)
        } else {
            Err(r#"invalid layout, can be "horizontal" or "vertical""#)
        }
    }
}
