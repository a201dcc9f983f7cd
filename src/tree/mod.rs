//! Container tree.
//!
//! The tree is an arena: containers, workspaces and outputs live in slot maps and refer to each
//! other by key. Every container holds its parent key, so upward walks are plain loops that stop
//! at a container without a parent.
//!
//! A container is placed in exactly one of:
//!
//! - the children of its parent container,
//! - the tiling or floating list of its workspace (top-level containers),
//! - the scratchpad (scratchpad roots, which have neither a parent nor a workspace).
//!
//! Descendants always share the workspace of their top-level container, and scratchpad
//! descendants have no workspace at all.
//!
//! The mutation primitives here are atomic with respect to the tree: each one leaves every
//! invariant checked by [`ContainerTree::verify_invariants`] intact.

use std::fmt;

use slotmap::{new_key_type, SlotMap};
use trellis_ipc::{FullscreenMode, Layout};

use crate::utils::id::IdCounter;
use crate::utils::scale::{parse_scale, to_logical, ScaleParseError};

mod dump;

pub use dump::format_tree;

new_key_type! {
    pub struct ContainerId;
    pub struct WorkspaceId;
    pub struct OutputId;
}

/// Client surface shown by a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub app_id: Option<String>,
    /// Intrinsic width in pixels, before any scaling.
    pub natural_width: i32,
    /// Intrinsic height in pixels, before any scaling.
    pub natural_height: i32,
}

/// Output scale to put back once a presented container stops being presented.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavedScale {
    pub output: OutputId,
    pub scale: f64,
    /// Order in which scales were saved; a later present on the same output has a higher serial.
    pub serial: u64,
}

#[derive(Debug)]
pub struct Container {
    /// Id shown in snapshots.
    pub id: u32,
    pub parent: Option<ContainerId>,
    pub workspace: Option<WorkspaceId>,
    pub fullscreen_mode: FullscreenMode,
    pub view: Option<View>,
    pub children: Vec<ContainerId>,
    pub layout: Layout,
    pub floating: bool,
    pub saved_scale: Option<SavedScale>,
}

#[derive(Debug)]
pub struct Workspace {
    /// Id shown in snapshots.
    pub id: u32,
    pub name: String,
    pub tiling: Vec<ContainerId>,
    pub floating: Vec<ContainerId>,
    /// Output the workspace is displayed on.
    pub output: Option<OutputId>,
    pub layout: Layout,
    /// Container in [`FullscreenMode::Workspace`] on this workspace.
    pub fullscreen: Option<ContainerId>,
}

#[derive(Debug)]
pub struct Output {
    pub name: String,
    /// Size of the current mode in physical pixels.
    pub physical_size: (u32, u32),
    pub scale: f64,
}

/// Node that has input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Workspace(WorkspaceId),
    Container(ContainerId),
}

#[derive(Debug, Default)]
pub struct Seat {
    workspace: Option<WorkspaceId>,
    container: Option<ContainerId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutputScaleError {
    UnknownOutput(String),
    InvalidScale(ScaleParseError),
}

#[derive(Debug, Default)]
pub struct ContainerTree {
    containers: SlotMap<ContainerId, Container>,
    workspaces: SlotMap<WorkspaceId, Workspace>,
    workspace_order: Vec<WorkspaceId>,
    outputs: SlotMap<OutputId, Output>,
    output_order: Vec<OutputId>,
    scratchpad: Vec<ContainerId>,
    /// Container in [`FullscreenMode::Global`].
    fullscreen_global: Option<ContainerId>,
    seat: Seat,
    container_ids: IdCounter,
    workspace_ids: IdCounter,
    arrange_serial: u64,
    saved_scale_serial: u64,
}

impl Output {
    /// Size in logical pixels, after the current scale.
    pub fn logical_size(&self) -> (u32, u32) {
        to_logical(self.physical_size, self.scale)
    }
}

impl Seat {
    pub fn focused_workspace(&self) -> Option<WorkspaceId> {
        self.workspace
    }

    pub fn focused_container(&self) -> Option<ContainerId> {
        self.container
    }

    pub fn focused_node(&self) -> Option<Node> {
        match (self.container, self.workspace) {
            (Some(container), _) => Some(Node::Container(container)),
            (None, Some(workspace)) => Some(Node::Workspace(workspace)),
            (None, None) => None,
        }
    }
}

impl ContainerTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_output(&mut self, name: String, physical_size: (u32, u32), scale: f64) -> OutputId {
        debug!(
            "adding output {name}: {}x{} at scale {scale}",
            physical_size.0, physical_size.1
        );
        let id = self.outputs.insert(Output {
            name,
            physical_size,
            scale,
        });
        self.output_order.push(id);
        id
    }

    /// Adds an empty workspace. The first workspace added receives focus.
    pub fn add_workspace(
        &mut self,
        name: String,
        output: Option<OutputId>,
        layout: Layout,
    ) -> WorkspaceId {
        debug!("adding workspace {name}");
        let ws = self.workspaces.insert(Workspace {
            id: self.workspace_ids.next(),
            name,
            tiling: Vec::new(),
            floating: Vec::new(),
            output,
            layout,
            fullscreen: None,
        });
        self.workspace_order.push(ws);

        if self.seat.workspace.is_none() {
            self.seat.workspace = Some(ws);
        }

        ws
    }

    pub fn has_outputs(&self) -> bool {
        !self.output_order.is_empty()
    }

    pub fn outputs(&self) -> impl Iterator<Item = (OutputId, &Output)> + '_ {
        self.output_order.iter().map(|&id| (id, &self.outputs[id]))
    }

    pub fn workspaces(&self) -> impl Iterator<Item = (WorkspaceId, &Workspace)> + '_ {
        self.workspace_order
            .iter()
            .map(|&id| (id, &self.workspaces[id]))
    }

    pub fn scratchpad(&self) -> &[ContainerId] {
        &self.scratchpad
    }

    pub fn output(&self, id: OutputId) -> &Output {
        &self.outputs[id]
    }

    pub fn workspace(&self, id: WorkspaceId) -> &Workspace {
        &self.workspaces[id]
    }

    pub fn container(&self, id: ContainerId) -> &Container {
        &self.containers[id]
    }

    pub fn contains(&self, id: ContainerId) -> bool {
        self.containers.contains_key(id)
    }

    pub fn find_output(&self, name: &str) -> Option<OutputId> {
        self.outputs()
            .find(|(_, output)| output.name.eq_ignore_ascii_case(name))
            .map(|(id, _)| id)
    }

    pub fn find_workspace(&self, name: &str) -> Option<WorkspaceId> {
        self.workspaces()
            .find(|(_, ws)| ws.name.eq_ignore_ascii_case(name))
            .map(|(id, _)| id)
    }

    pub fn seat(&self) -> &Seat {
        &self.seat
    }

    pub fn fullscreen_global(&self) -> Option<ContainerId> {
        self.fullscreen_global
    }

    /// Number of times a full re-arrangement was requested.
    pub fn arrange_serial(&self) -> u64 {
        self.arrange_serial
    }

    /// Iterates over a container and its ancestors, nearest first.
    pub fn ancestors(&self, id: ContainerId) -> impl Iterator<Item = ContainerId> + '_ {
        let mut next = Some(id);
        std::iter::from_fn(move || {
            let current = next?;
            next = self.containers[current].parent;
            Some(current)
        })
    }

    /// Returns the topmost ancestor of a container, following parent links to their end.
    pub fn topmost_ancestor(&self, id: ContainerId) -> ContainerId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Returns the nearest container, starting from `id` itself, that has a fullscreen mode.
    pub fn nearest_fullscreen(&self, id: ContainerId) -> Option<ContainerId> {
        self.ancestors(id)
            .find(|&c| self.containers[c].fullscreen_mode != FullscreenMode::None)
    }

    /// Returns a container and all its descendants, parents before children.
    pub fn subtree(&self, id: ContainerId) -> Vec<ContainerId> {
        let mut rv = vec![id];
        let mut idx = 0;
        while idx < rv.len() {
            rv.extend_from_slice(&self.containers[rv[idx]].children);
            idx += 1;
        }
        rv
    }

    /// Requests a full re-arrangement of the layout.
    pub fn arrange_root(&mut self) {
        self.arrange_serial += 1;
        trace!("arrange requested, serial {}", self.arrange_serial);
    }

    /// Maps a new view in a top-level tiling container on `ws` and focuses it.
    pub fn open_view(&mut self, ws: WorkspaceId, view: View) -> ContainerId {
        let id = self.insert_container(Some(view), self.workspaces[ws].layout);
        self.containers[id].workspace = Some(ws);
        self.workspaces[ws].tiling.push(id);
        self.set_focus(id);
        id
    }

    pub fn set_focus(&mut self, id: ContainerId) {
        self.seat.container = Some(id);
        if let Some(ws) = self.containers[id].workspace {
            self.seat.workspace = Some(ws);
        }
    }

    /// Focuses the workspace itself rather than any of its containers.
    pub fn focus_workspace_node(&mut self, ws: WorkspaceId) {
        self.seat.workspace = Some(ws);
        self.seat.container = None;
    }

    /// Switches to a workspace, focusing its last container if it has any.
    pub fn focus_workspace(&mut self, ws: WorkspaceId) {
        let workspace = &self.workspaces[ws];
        match workspace.tiling.last().or(workspace.floating.last()) {
            Some(&id) => self.set_focus(id),
            None => self.focus_workspace_node(ws),
        }
    }

    /// Moves focus from the focused container to its parent, or to its workspace when the
    /// container is top-level.
    ///
    /// Returns `false` if focus could not move up.
    pub fn focus_parent(&mut self) -> bool {
        let Some(id) = self.seat.container else {
            return false;
        };

        let container = &self.containers[id];
        match (container.parent, container.workspace) {
            (Some(parent), _) => {
                self.set_focus(parent);
                true
            }
            (None, Some(ws)) => {
                self.focus_workspace_node(ws);
                true
            }
            (None, None) => false,
        }
    }

    pub fn set_workspace_layout(&mut self, ws: WorkspaceId, layout: Layout) {
        self.workspaces[ws].layout = layout;
    }

    /// Wraps all tiling children of a workspace into a new container.
    ///
    /// The new container takes the workspace layout and becomes the only tiling child. The
    /// workspace fullscreen container, if any, is kept.
    pub fn wrap_workspace_children(&mut self, ws: WorkspaceId) -> ContainerId {
        let layout = self.workspaces[ws].layout;
        let middle = self.insert_container(None, layout);

        let children = std::mem::take(&mut self.workspaces[ws].tiling);
        for &child in &children {
            self.containers[child].parent = Some(middle);
        }

        let container = &mut self.containers[middle];
        container.children = children;
        container.workspace = Some(ws);
        self.workspaces[ws].tiling.push(middle);

        debug!(
            "wrapped {} children of workspace {} into container {}",
            self.containers[middle].children.len(),
            self.workspaces[ws].name,
            self.containers[middle].id
        );

        middle
    }

    /// Sets the fullscreen mode of a container.
    ///
    /// Making a container fullscreen displaces the global fullscreen container and, for
    /// [`FullscreenMode::Workspace`], the fullscreen container of the same workspace.
    pub fn set_fullscreen(&mut self, id: ContainerId, mode: FullscreenMode) {
        let current = self.containers[id].fullscreen_mode;
        if current == mode {
            return;
        }

        match mode {
            FullscreenMode::None => self.fullscreen_disable(id),
            FullscreenMode::Workspace => {
                if let Some(global) = self.fullscreen_global {
                    self.fullscreen_disable(global);
                }
                let ws = self.containers[id].workspace;
                if let Some(old) = ws.and_then(|ws| self.workspaces[ws].fullscreen) {
                    self.fullscreen_disable(old);
                }

                self.containers[id].fullscreen_mode = FullscreenMode::Workspace;
                if let Some(ws) = ws {
                    self.workspaces[ws].fullscreen = Some(id);
                }
            }
            FullscreenMode::Global => {
                if let Some(global) = self.fullscreen_global {
                    self.fullscreen_disable(global);
                }
                if self.containers[id].fullscreen_mode == FullscreenMode::Workspace {
                    self.fullscreen_disable(id);
                }

                self.containers[id].fullscreen_mode = FullscreenMode::Global;
                self.fullscreen_global = Some(id);
            }
        }

        debug!(
            "container {} fullscreen: {current} -> {mode}",
            self.containers[id].id
        );
    }

    fn fullscreen_disable(&mut self, id: ContainerId) {
        let container = &mut self.containers[id];
        match container.fullscreen_mode {
            FullscreenMode::None => (),
            FullscreenMode::Workspace => {
                if let Some(ws) = container.workspace {
                    let workspace = &mut self.workspaces[ws];
                    if workspace.fullscreen == Some(id) {
                        workspace.fullscreen = None;
                    }
                }
            }
            FullscreenMode::Global => {
                if self.fullscreen_global == Some(id) {
                    self.fullscreen_global = None;
                }
            }
        }
        self.containers[id].fullscreen_mode = FullscreenMode::None;
    }

    /// Moves a container between the tiling layout and the floating layer of its workspace.
    ///
    /// A nested container becomes a top-level floating container; a parent left without
    /// children and without a view is removed. Scratchpad containers only change the flag.
    pub fn set_floating(&mut self, id: ContainerId, enable: bool) {
        let container = &self.containers[id];
        if container.floating == enable {
            return;
        }

        let Some(ws) = container.workspace else {
            self.containers[id].floating = enable;
            return;
        };

        let old_parent = self.detach(id);

        let container = &mut self.containers[id];
        container.floating = enable;
        let workspace = &mut self.workspaces[ws];
        if enable {
            workspace.floating.push(id);
        } else {
            workspace.tiling.push(id);
        }

        if let Some(parent) = old_parent {
            self.reap_empty(parent);
        }

        debug!("container {} floating: {enable}", self.containers[id].id);
    }

    /// Moves a container, together with its descendants, into the scratchpad.
    ///
    /// Focus stays on the container.
    pub fn move_to_scratchpad(&mut self, id: ContainerId) {
        if self.scratchpad.contains(&id) {
            return;
        }

        let old_parent = self.detach(id);

        for c in self.subtree(id) {
            if let Some(ws) = self.containers[c].workspace.take() {
                let workspace = &mut self.workspaces[ws];
                if workspace.fullscreen == Some(c) {
                    workspace.fullscreen = None;
                }
            }
        }

        let container = &mut self.containers[id];
        container.floating = true;
        self.scratchpad.push(id);

        if let Some(parent) = old_parent {
            self.reap_empty(parent);
        }

        debug!(
            "moved container {} to the scratchpad",
            self.containers[id].id
        );
    }

    /// Removes a container and all its descendants.
    ///
    /// Returns the saved scales the removed containers held, so that the caller can put them
    /// back.
    pub fn close_container(&mut self, id: ContainerId) -> Vec<SavedScale> {
        let ws = self.containers[id].workspace;
        let old_parent = self.detach(id);

        let mut saved = Vec::new();
        let subtree = self.subtree(id);
        let lost_focus = self
            .seat
            .container
            .is_some_and(|focused| subtree.contains(&focused));

        for c in subtree {
            self.fullscreen_disable(c);
            let container = self.containers.remove(c).expect("subtree ids are valid");
            debug!("removed container {}", container.id);
            saved.extend(container.saved_scale);
        }

        if let Some(parent) = old_parent {
            saved.extend(self.reap_empty(parent));
        }

        if lost_focus || self.seat.container.is_some_and(|c| !self.contains(c)) {
            match ws.or(self.seat.workspace) {
                Some(ws) => self.focus_workspace(ws),
                None => self.seat.container = None,
            }
        }

        saved
    }

    /// Sets the scale of an output by name.
    pub fn set_output_scale(&mut self, name: &str, scale: &str) -> Result<(), OutputScaleError> {
        let id = self
            .find_output(name)
            .ok_or_else(|| OutputScaleError::UnknownOutput(name.to_owned()))?;
        let scale = parse_scale(scale).map_err(OutputScaleError::InvalidScale)?;
        self.apply_output_scale(id, scale);
        Ok(())
    }

    pub(crate) fn apply_output_scale(&mut self, id: OutputId, scale: f64) {
        let output = &mut self.outputs[id];
        debug!("output {} scale: {} -> {scale}", output.name, output.scale);
        output.scale = scale;
    }

    pub(crate) fn containers_with_saved_scale(&self) -> Vec<ContainerId> {
        self.containers
            .iter()
            .filter(|(_, c)| c.saved_scale.is_some())
            .map(|(id, _)| id)
            .collect()
    }

    pub(crate) fn saved_scale_mut(&mut self, id: ContainerId) -> &mut Option<SavedScale> {
        &mut self.containers[id].saved_scale
    }

    /// Stores the scale to put back once `id` stops being presented.
    ///
    /// Does nothing and returns `false` if the container already holds a saved scale.
    pub(crate) fn save_scale(&mut self, id: ContainerId, output: OutputId, scale: f64) -> bool {
        if self.containers[id].saved_scale.is_some() {
            return false;
        }

        self.saved_scale_serial += 1;
        self.containers[id].saved_scale = Some(SavedScale {
            output,
            scale,
            serial: self.saved_scale_serial,
        });
        true
    }

    /// Puts back a saved output scale.
    ///
    /// Returns `false` if the output is gone.
    pub fn restore_scale(&mut self, saved: SavedScale) -> bool {
        if !self.outputs.contains_key(saved.output) {
            return false;
        }

        self.apply_output_scale(saved.output, saved.scale);
        true
    }

    fn insert_container(&mut self, view: Option<View>, layout: Layout) -> ContainerId {
        let container = Container {
            id: self.container_ids.next(),
            parent: None,
            workspace: None,
            fullscreen_mode: FullscreenMode::None,
            view,
            children: Vec::new(),
            layout,
            floating: false,
            saved_scale: None,
        };
        self.containers.insert(container)
    }

    /// Unlinks a container from wherever it is placed, returning its old parent.
    ///
    /// The container keeps its workspace.
    fn detach(&mut self, id: ContainerId) -> Option<ContainerId> {
        let container = &mut self.containers[id];
        let parent = container.parent.take();
        let ws = container.workspace;

        if let Some(parent) = parent {
            self.containers[parent].children.retain(|&c| c != id);
        } else if let Some(ws) = ws {
            let workspace = &mut self.workspaces[ws];
            workspace.tiling.retain(|&c| c != id);
            workspace.floating.retain(|&c| c != id);
        } else {
            self.scratchpad.retain(|&c| c != id);
        }

        parent
    }

    /// Removes `id` and its ancestors for as long as they are left with neither children nor a
    /// view.
    fn reap_empty(&mut self, id: ContainerId) -> Vec<SavedScale> {
        let mut saved = Vec::new();
        let mut next = Some(id);
        while let Some(id) = next {
            let container = &self.containers[id];
            if !container.children.is_empty() || container.view.is_some() {
                break;
            }

            next = self.detach(id);
            self.fullscreen_disable(id);
            if self.seat.container == Some(id) {
                self.seat.container = None;
            }
            let container = self.containers.remove(id).expect("id is valid");
            debug!("reaped empty container {}", container.id);
            saved.extend(container.saved_scale);
        }
        saved
    }

    /// Checks the structural invariants of the tree, panicking on violation.
    #[cfg(test)]
    pub fn verify_invariants(&self) {
        use std::collections::HashMap;

        let mut placements: HashMap<ContainerId, usize> = HashMap::new();
        let mut place = |id: ContainerId| *placements.entry(id).or_default() += 1;

        for (ws_id, ws) in self.workspaces() {
            for &id in &ws.tiling {
                let container = &self.containers[id];
                assert!(!container.floating, "tiling container must not be floating");
                assert_eq!(container.parent, None, "top-level container has a parent");
                assert_eq!(container.workspace, Some(ws_id));
                place(id);
            }
            for &id in &ws.floating {
                let container = &self.containers[id];
                assert!(container.floating, "floating container must be floating");
                assert_eq!(container.parent, None, "top-level container has a parent");
                assert_eq!(container.workspace, Some(ws_id));
                place(id);
            }

            if let Some(fs) = ws.fullscreen {
                let container = &self.containers[fs];
                assert_eq!(container.fullscreen_mode, FullscreenMode::Workspace);
                assert_eq!(container.workspace, Some(ws_id));
            }

            if let Some(output) = ws.output {
                assert!(self.outputs.contains_key(output));
            }
        }

        for &id in &self.scratchpad {
            let container = &self.containers[id];
            assert_eq!(container.parent, None, "scratchpad root has a parent");
            assert_eq!(container.workspace, None, "scratchpad root has a workspace");
            place(id);
        }

        for (id, container) in &self.containers {
            for &child in &container.children {
                let child_container = &self.containers[child];
                assert_eq!(child_container.parent, Some(id), "child has a wrong parent");
                assert_eq!(
                    child_container.workspace, container.workspace,
                    "child must share the workspace of its parent"
                );
                place(child);
            }

            assert!(
                container.view.is_some() || !container.children.is_empty(),
                "container {} has neither a view nor children",
                container.id
            );

            match container.fullscreen_mode {
                FullscreenMode::None => (),
                FullscreenMode::Workspace => {
                    if let Some(ws) = container.workspace {
                        assert_eq!(self.workspaces[ws].fullscreen, Some(id));
                    }
                }
                FullscreenMode::Global => assert_eq!(self.fullscreen_global, Some(id)),
            }
        }

        for id in self.containers.keys() {
            assert_eq!(
                placements.get(&id).copied(),
                Some(1),
                "container {} must be placed exactly once",
                self.containers[id].id
            );
        }

        if let Some(global) = self.fullscreen_global {
            assert_eq!(
                self.containers[global].fullscreen_mode,
                FullscreenMode::Global
            );
        }

        if let Some(focused) = self.seat.container {
            assert!(self.contains(focused), "focused container must exist");
        }
        if let Some(ws) = self.seat.workspace {
            assert!(self.workspaces.contains_key(ws));
        }
    }
}

impl fmt::Display for OutputScaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputScaleError::UnknownOutput(name) => write!(f, "no output named {name}"),
            OutputScaleError::InvalidScale(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for OutputScaleError {}
