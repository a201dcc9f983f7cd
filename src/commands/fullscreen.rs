//! `fullscreen [enable|disable|toggle] [global]`

use trellis_ipc::{FullscreenMode, Layout};

use super::{usage, CommandContext, CommandError};
use crate::tree::{ContainerId, ContainerTree, Node};
use crate::utils::Switch;

/// Interpreted fullscreen arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FullscreenRequest {
    /// Explicit enable/disable/toggle; `None` toggles.
    pub switch: Option<Switch>,
    pub global: bool,
}

impl FullscreenRequest {
    /// Plain toggle, as if no arguments were given.
    pub const TOGGLE: Self = Self {
        switch: None,
        global: false,
    };

    /// Interprets at most two argument tokens.
    ///
    /// `global` may come first or second. A second token decides `global` on its own, so
    /// `fullscreen global enable` is not global. The first token is only read as a switch when it
    /// isn't `global`; unrecognized switches act like a toggle.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self, CommandError> {
        if tokens.len() > 2 {
            return Err(usage(
                "fullscreen",
                format!("expected at most 2 arguments, got {}", tokens.len()),
            ));
        }

        let is_global = |token: &S| token.as_ref().eq_ignore_ascii_case("global");

        let mut global = tokens.iter().any(is_global);
        let mut switch = None;

        if let Some(first) = tokens.first() {
            if !is_global(first) {
                switch = Switch::parse(first.as_ref());
                if switch.is_none() {
                    debug!("unrecognized fullscreen argument {:?}", first.as_ref());
                }
            }
        }

        if let Some(second) = tokens.get(1) {
            global = is_global(second);
        }

        Ok(Self { switch, global })
    }
}

/// Runs `fullscreen` with raw argument tokens.
pub fn fullscreen<S: AsRef<str>>(
    tree: &mut ContainerTree,
    ctx: &CommandContext,
    tokens: &[S],
) -> Result<Option<ContainerId>, CommandError> {
    let request = FullscreenRequest::from_tokens(tokens)?;
    apply(tree, ctx, request)
}

/// Computes and applies the fullscreen transition for the focus in `ctx`.
///
/// This is the entry point for composite commands, which pass an already interpreted request.
///
/// Returns the container whose mode was set. That is the nearest fullscreen ancestor of the
/// focused container if there is one, or a new container wrapping the workspace children when
/// fullscreening a focused workspace. It is `None` only when disabling on a focused workspace,
/// where there is nothing to change.
pub fn apply(
    tree: &mut ContainerTree,
    ctx: &CommandContext,
    request: FullscreenRequest,
) -> Result<Option<ContainerId>, CommandError> {
    let _span = tracy_client::span!("fullscreen::apply");

    if !tree.has_outputs() {
        return Err(CommandError::NoOutputs);
    }

    let is_workspace_node = matches!(ctx.node, Node::Workspace(_));
    if is_workspace_node && tree.workspace(ctx.workspace).tiling.is_empty() {
        return Err(CommandError::EmptyWorkspace);
    }

    let mut container = ctx.container;

    // In the scratchpad, operate on the topmost container.
    if let Some(id) = container {
        if tree.container(id).workspace.is_none() {
            container = Some(tree.topmost_ancestor(id));
        }
    }

    let mut is_fullscreen = false;
    if let Some(fs) = container.and_then(|id| tree.nearest_fullscreen(id)) {
        container = Some(fs);
        is_fullscreen = true;
    }

    let enable = match request.switch {
        Some(switch) => switch.resolve(is_fullscreen),
        None => !is_fullscreen,
    };

    if enable && is_workspace_node {
        // Wrap the workspace's children in a container so we can fullscreen it.
        let wrapper = tree.wrap_workspace_children(ctx.workspace);
        tree.set_workspace_layout(ctx.workspace, Layout::Horizontal);
        tree.set_focus(wrapper);
        container = Some(wrapper);
    }

    let mode = match (enable, request.global) {
        (false, _) => FullscreenMode::None,
        (true, true) => FullscreenMode::Global,
        (true, false) => FullscreenMode::Workspace,
    };

    match container {
        Some(id) => tree.set_fullscreen(id, mode),
        None => debug!("no container to take out of fullscreen"),
    }
    tree.arrange_root();

    Ok(container)
}
