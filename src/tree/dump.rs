use std::fmt::Write as _;

use trellis_ipc as ipc;
use trellis_ipc::FullscreenMode;

use super::{ContainerId, ContainerTree, OutputId};

impl ContainerTree {
    /// Returns a snapshot of the whole tree.
    pub fn to_ipc(&self) -> ipc::Tree {
        ipc::Tree {
            outputs: self.outputs().map(|(id, _)| self.output_to_ipc(id)).collect(),
            workspaces: self
                .workspaces()
                .map(|(ws_id, ws)| ipc::Workspace {
                    id: ws.id,
                    name: ws.name.clone(),
                    output: ws.output.map(|o| self.output(o).name.clone()),
                    layout: ws.layout,
                    is_focused: self.seat().focused_workspace() == Some(ws_id),
                    tiling: ws.tiling.iter().map(|&c| self.container_to_ipc(c)).collect(),
                    floating: ws.floating.iter().map(|&c| self.container_to_ipc(c)).collect(),
                })
                .collect(),
            scratchpad: self
                .scratchpad()
                .iter()
                .map(|&c| self.container_to_ipc(c))
                .collect(),
        }
    }

    pub fn output_to_ipc(&self, id: OutputId) -> ipc::Output {
        let output = self.output(id);
        let (width, height) = output.logical_size();
        ipc::Output {
            name: output.name.clone(),
            physical_width: output.physical_size.0,
            physical_height: output.physical_size.1,
            width,
            height,
            scale: output.scale,
        }
    }

    fn container_to_ipc(&self, id: ContainerId) -> ipc::Container {
        let container = self.container(id);
        ipc::Container {
            id: container.id,
            fullscreen_mode: container.fullscreen_mode,
            floating: container.floating,
            is_focused: self.seat().focused_container() == Some(id),
            layout: container.layout,
            view: container.view.as_ref().map(|view| ipc::View {
                app_id: view.app_id.clone(),
                natural_width: view.natural_width,
                natural_height: view.natural_height,
            }),
            children: container
                .children
                .iter()
                .map(|&c| self.container_to_ipc(c))
                .collect(),
        }
    }

    /// Formats the tree for humans, one node per line.
    pub fn dump(&self) -> String {
        format_tree(&self.to_ipc())
    }
}

pub fn format_tree(tree: &ipc::Tree) -> String {
    let mut buf = String::new();

    for output in &tree.outputs {
        writeln!(
            buf,
            "output {} {}x{} scale {} (mode {}x{})",
            output.name,
            output.width,
            output.height,
            output.scale,
            output.physical_width,
            output.physical_height,
        )
        .unwrap();
    }

    for ws in &tree.workspaces {
        write!(buf, "workspace {} {}", ws.name, ws.layout).unwrap();
        if let Some(output) = &ws.output {
            write!(buf, " on {output}").unwrap();
        }
        if ws.is_focused {
            buf.push_str(" *");
        }
        buf.push('\n');

        for container in ws.tiling.iter().chain(&ws.floating) {
            format_container(&mut buf, container, 1);
        }
    }

    if !tree.scratchpad.is_empty() {
        buf.push_str("scratchpad\n");
        for container in &tree.scratchpad {
            format_container(&mut buf, container, 1);
        }
    }

    // Trailing newline makes snapshots awkward.
    buf.truncate(buf.trim_end().len());
    buf
}

fn format_container(buf: &mut String, container: &ipc::Container, depth: usize) {
    write!(buf, "{:indent$}#{}", "", container.id, indent = depth * 2).unwrap();

    match &container.view {
        Some(view) => {
            let app_id = view.app_id.as_deref().unwrap_or("-");
            write!(
                buf,
                " {app_id} {}x{}",
                view.natural_width, view.natural_height
            )
            .unwrap();
        }
        None => write!(buf, " {}", container.layout).unwrap(),
    }

    if container.fullscreen_mode != FullscreenMode::None {
        write!(buf, " fullscreen={}", container.fullscreen_mode).unwrap();
    }
    if container.floating {
        buf.push_str(" floating");
    }
    if container.is_focused {
        buf.push_str(" *");
    }
    buf.push('\n');

    for child in &container.children {
        format_container(buf, child, depth + 1);
    }
}
