use approx::assert_relative_eq;
use insta::assert_snapshot;
use trellis_config::Config;
use trellis_ipc::{FullscreenMode, Layout, Response};

use super::*;
use crate::state::{Options, State};
use crate::tree::OutputId;

fn state() -> State {
    State::from_config(&Config::default())
}

fn state_with_config(text: &str) -> State {
    let config = Config::parse("test.kdl", text)
        .map_err(miette::Report::new)
        .unwrap();
    State::from_config(&config)
}

#[track_caller]
fn ok(state: &mut State, line: &str) {
    for reply in state.run(line) {
        if let Err(err) = reply {
            panic!("{line:?} failed: {err}");
        }
    }
    state.tree.verify_invariants();
}

#[track_caller]
fn err(state: &mut State, line: &str) -> String {
    let replies = state.run(line);
    state.tree.verify_invariants();
    match replies.last() {
        Some(Err(err)) => err.clone(),
        other => panic!("{line:?} should have failed, got {other:?}"),
    }
}

fn focused(state: &State) -> ContainerId {
    state.tree.seat().focused_container().unwrap()
}

fn mode(state: &State, id: ContainerId) -> FullscreenMode {
    state.tree.container(id).fullscreen_mode
}

fn scale(state: &State) -> f64 {
    state.tree.outputs().next().unwrap().1.scale
}

fn saved_scale(state: &State, id: ContainerId) -> Option<(OutputId, f64)> {
    let saved = state.tree.container(id).saved_scale?;
    Some((saved.output, saved.scale))
}

fn focused_workspace(state: &State) -> WorkspaceId {
    state.tree.seat().focused_workspace().unwrap()
}

#[test]
fn toggle_sets_workspace_then_none() {
    let mut state = state();
    ok(&mut state, "open 800x600 a");
    let a = focused(&state);

    ok(&mut state, "fullscreen");
    assert_eq!(mode(&state, a), FullscreenMode::Workspace);
    assert_eq!(
        state.tree.workspace(focused_workspace(&state)).fullscreen,
        Some(a)
    );

    ok(&mut state, "fullscreen");
    assert_eq!(mode(&state, a), FullscreenMode::None);
}

#[test]
fn global_then_toggle_disables() {
    let mut state = state();
    ok(&mut state, "open 800x600 a");
    let a = focused(&state);

    ok(&mut state, "fullscreen global");
    assert_eq!(mode(&state, a), FullscreenMode::Global);
    assert_eq!(state.tree.fullscreen_global(), Some(a));

    ok(&mut state, "fullscreen");
    assert_eq!(mode(&state, a), FullscreenMode::None);
    assert_eq!(state.tree.fullscreen_global(), None);
}

#[test]
fn global_alone_while_fullscreen_disables() {
    let mut state = state();
    ok(&mut state, "open 800x600 a");
    let a = focused(&state);

    ok(&mut state, "fullscreen");
    assert_eq!(mode(&state, a), FullscreenMode::Workspace);

    // Does not switch the scope to global: the default is to toggle off.
    ok(&mut state, "fullscreen global");
    assert_eq!(mode(&state, a), FullscreenMode::None);
}

#[test]
fn explicit_enable_changes_scope() {
    let mut state = state();
    ok(&mut state, "open 800x600 a");
    let a = focused(&state);

    ok(&mut state, "fullscreen enable");
    assert_eq!(mode(&state, a), FullscreenMode::Workspace);

    ok(&mut state, "fullscreen enable global");
    assert_eq!(mode(&state, a), FullscreenMode::Global);

    ok(&mut state, "fullscreen enable");
    assert_eq!(mode(&state, a), FullscreenMode::Workspace);

    ok(&mut state, "fullscreen disable");
    assert_eq!(mode(&state, a), FullscreenMode::None);

    ok(&mut state, "fullscreen disable");
    assert_eq!(mode(&state, a), FullscreenMode::None);
}

#[test]
fn second_token_overwrites_global() {
    let mut state = state();
    ok(&mut state, "open 800x600 a");
    let a = focused(&state);

    // The second token isn't "global", so this isn't global, and the first token isn't read as a
    // switch, so this toggles.
    ok(&mut state, "fullscreen global enable");
    assert_eq!(mode(&state, a), FullscreenMode::Workspace);

    ok(&mut state, "fullscreen global enable");
    assert_eq!(mode(&state, a), FullscreenMode::None);

    ok(&mut state, "fullscreen toggle global");
    assert_eq!(mode(&state, a), FullscreenMode::Global);
}

#[test]
fn tokens_ignore_case() {
    for line in [
        "fullscreen enable global",
        "FULLSCREEN ENABLE GLOBAL",
        "Fullscreen Enable Global",
        "fullscreen yes Global",
        "fullscreen TOGGLE gLoBaL",
    ] {
        let mut state = state();
        ok(&mut state, "open 800x600 a");
        let a = focused(&state);

        ok(&mut state, line);
        assert_eq!(mode(&state, a), FullscreenMode::Global, "{line}");
    }

    let mut state = state();
    ok(&mut state, "open 800x600 a");
    let a = focused(&state);
    ok(&mut state, "fullscreen GLOBAL");
    assert_eq!(mode(&state, a), FullscreenMode::Global);
    ok(&mut state, "fullscreen DISABLE");
    assert_eq!(mode(&state, a), FullscreenMode::None);
}

#[test]
fn unrecognized_token_toggles() {
    let mut state = state();
    ok(&mut state, "open 800x600 a");
    let a = focused(&state);

    ok(&mut state, "fullscreen maybe");
    assert_eq!(mode(&state, a), FullscreenMode::Workspace);
    ok(&mut state, "fullscreen maybe");
    assert_eq!(mode(&state, a), FullscreenMode::None);
}

#[test]
fn request_from_tokens() {
    let request = |tokens: &[&str]| FullscreenRequest::from_tokens(tokens).unwrap();

    assert_eq!(request(&[]), FullscreenRequest::TOGGLE);
    assert_eq!(
        request(&["global"]),
        FullscreenRequest {
            switch: None,
            global: true,
        }
    );
    assert_eq!(
        request(&["off", "global"]),
        FullscreenRequest {
            switch: Some(Switch::Off),
            global: true,
        }
    );
    assert_eq!(
        request(&["global", "global"]),
        FullscreenRequest {
            switch: None,
            global: true,
        }
    );
    assert_eq!(
        request(&["on", "nope"]),
        FullscreenRequest {
            switch: Some(Switch::On),
            global: false,
        }
    );
}

#[test]
fn too_many_tokens() {
    let mut state = state();
    ok(&mut state, "open 800x600 a");
    let a = focused(&state);

    assert_snapshot!(
        err(&mut state, "fullscreen enable global now"),
        @"Invalid fullscreen command (expected at most 2 arguments, got 3)"
    );
    assert_snapshot!(
        err(&mut state, "fullscreen present enable global now"),
        @"Invalid fullscreen command (expected at most 2 arguments, got 3)"
    );
    assert_eq!(mode(&state, a), FullscreenMode::None);
}

#[test]
fn empty_workspace_cannot_fullscreen() {
    let mut state = state();
    let serial = state.tree.arrange_serial();

    assert_snapshot!(err(&mut state, "fullscreen"), @"Can't fullscreen an empty workspace");
    assert_snapshot!(
        err(&mut state, "fullscreen disable"),
        @"Can't fullscreen an empty workspace"
    );
    assert_eq!(state.tree.arrange_serial(), serial);
}

#[test]
fn workspace_focus_wraps_children() {
    let mut state = state_with_config(
        r#"
        output "HEADLESS-1" { mode "1920x1080"; }
        workspace "main" { layout "vertical"; }
        "#,
    );
    ok(&mut state, "open 800x600 a; open 640x480 b; focus parent");
    let ws = focused_workspace(&state);
    assert_eq!(state.tree.workspace(ws).layout, Layout::Vertical);

    ok(&mut state, "fullscreen global");

    let workspace = state.tree.workspace(ws);
    assert_eq!(workspace.layout, Layout::Horizontal);
    assert_eq!(workspace.tiling.len(), 1);
    let wrapper = workspace.tiling[0];
    assert_eq!(focused(&state), wrapper);
    assert_eq!(state.tree.fullscreen_global(), Some(wrapper));

    assert_snapshot!(state.tree.dump(), @r"
    output HEADLESS-1 1920x1080 scale 1 (mode 1920x1080)
    workspace main horizontal on HEADLESS-1 *
      #3 vertical fullscreen=global *
        #1 a 800x600
        #2 b 640x480
    ");
}

#[test]
fn workspace_focus_wraps_in_workspace_mode() {
    let mut state = state();
    ok(&mut state, "open 800x600 a; focus parent; fullscreen");

    let ws = focused_workspace(&state);
    let wrapper = focused(&state);
    assert_eq!(state.tree.workspace(ws).tiling, vec![wrapper]);
    assert_eq!(mode(&state, wrapper), FullscreenMode::Workspace);
    assert_eq!(state.tree.workspace(ws).fullscreen, Some(wrapper));
}

#[test]
fn disable_on_workspace_focus_changes_nothing() {
    let mut state = state();
    ok(&mut state, "open 800x600 a; focus parent");
    let ws = focused_workspace(&state);
    let tiling = state.tree.workspace(ws).tiling.clone();
    let serial = state.tree.arrange_serial();

    ok(&mut state, "fullscreen disable");

    assert_eq!(state.tree.workspace(ws).tiling, tiling);
    assert_eq!(state.tree.seat().focused_node(), Some(Node::Workspace(ws)));
    assert_eq!(state.tree.arrange_serial(), serial + 1);
}

#[test]
fn nearest_fullscreen_ancestor_is_used() {
    let mut state = state();
    ok(&mut state, "open 800x600 a; open 640x480 b; focus parent; fullscreen");
    let wrapper = focused(&state);
    let a = state.tree.container(wrapper).children[0];

    state.tree.set_focus(a);
    ok(&mut state, "fullscreen");

    assert_eq!(mode(&state, wrapper), FullscreenMode::None);
    assert_eq!(mode(&state, a), FullscreenMode::None);

    // Without a fullscreen ancestor, the child itself is used.
    ok(&mut state, "fullscreen");
    assert_eq!(mode(&state, a), FullscreenMode::Workspace);
    assert_eq!(mode(&state, wrapper), FullscreenMode::None);
}

#[test]
fn nearest_of_several_fullscreen_ancestors() {
    let mut state = state();
    ok(&mut state, "open 800x600 a");
    let a = focused(&state);
    let ws = focused_workspace(&state);
    let inner = state.tree.wrap_workspace_children(ws);
    let outer = state.tree.wrap_workspace_children(ws);
    state.tree.set_fullscreen(inner, FullscreenMode::Workspace);
    state.tree.set_fullscreen(outer, FullscreenMode::Global);
    state.tree.set_focus(a);

    ok(&mut state, "fullscreen disable");

    assert_eq!(mode(&state, inner), FullscreenMode::None);
    assert_eq!(mode(&state, outer), FullscreenMode::Global);
}

#[test]
fn scratchpad_uses_topmost_ancestor() {
    let mut state = state();
    ok(&mut state, "open 800x600 a; open 640x480 b");
    let ws = focused_workspace(&state);
    let wrapper = state.tree.wrap_workspace_children(ws);
    let a = state.tree.container(wrapper).children[0];
    state.tree.move_to_scratchpad(wrapper);
    state.tree.set_focus(a);

    ok(&mut state, "fullscreen");

    assert_eq!(mode(&state, wrapper), FullscreenMode::Workspace);
    assert_eq!(mode(&state, a), FullscreenMode::None);
    assert_eq!(state.tree.workspace(ws).fullscreen, None);
}

#[test]
fn scratchpad_command() {
    let mut state = state();
    ok(&mut state, "open 800x600 a; fullscreen; move scratchpad");
    let a = focused(&state);
    let ws = focused_workspace(&state);

    assert_eq!(state.tree.scratchpad(), &[a]);
    assert!(state.tree.workspace(ws).tiling.is_empty());
    assert_eq!(state.tree.workspace(ws).fullscreen, None);

    ok(&mut state, "fullscreen");
    assert_eq!(mode(&state, a), FullscreenMode::None);
}

#[test]
fn no_outputs() {
    let mut tree = ContainerTree::new();
    let ws = tree.add_workspace(String::from("1"), None, Layout::Horizontal);
    tree.open_view(
        ws,
        View {
            app_id: None,
            natural_width: 800,
            natural_height: 600,
        },
    );
    let mut state = State::new(tree, Options::default());

    assert_snapshot!(
        err(&mut state, "fullscreen"),
        @"Can't run this command while there's no outputs connected."
    );
    assert_snapshot!(
        err(&mut state, "fullscreen present"),
        @"Can't run this command if no output is connected to the workspace."
    );
    assert_eq!(mode(&state, focused(&state)), FullscreenMode::None);
}

#[test]
fn present_fits_natural_size() {
    let mut state = state();
    ok(&mut state, "open 800x600 mpv");
    let mpv = focused(&state);
    let serial = state.tree.arrange_serial();

    ok(&mut state, "fullscreen present");

    // 1920 / 800 = 2.4, 1080 / 600 = 1.8.
    assert_relative_eq!(scale(&state), 1.8);
    assert_eq!(mode(&state, mpv), FullscreenMode::Workspace);
    assert!(state.tree.container(mpv).floating);
    assert!(state.tree.arrange_serial() > serial);

    assert_snapshot!(state.tree.dump(), @r"
    output HEADLESS-1 1067x600 scale 1.8 (mode 1920x1080)
    workspace 1 horizontal on HEADLESS-1 *
      #1 mpv 800x600 fullscreen=workspace floating *
    ");
}

#[test]
fn present_forwards_tokens() {
    let mut state = state();
    ok(&mut state, "open 1280x400 a");
    let a = focused(&state);

    ok(&mut state, "fullscreen present enable global");
    assert_eq!(mode(&state, a), FullscreenMode::Global);
    assert_relative_eq!(scale(&state), 1.5);

    // Stays fullscreen, still floating.
    ok(&mut state, "fullscreen PRESENT enable");
    assert_eq!(mode(&state, a), FullscreenMode::Workspace);
    assert!(state.tree.container(a).floating);
}

#[test]
fn present_degenerate_size_changes_nothing() {
    let mut state = state();
    ok(&mut state, "open 0x600 a");
    let a = focused(&state);
    let serial = state.tree.arrange_serial();

    assert_snapshot!(
        err(&mut state, "fullscreen present"),
        @"Can't fit a view with natural size 0x600 into the output."
    );

    assert_eq!(scale(&state), 1.);
    assert_eq!(mode(&state, a), FullscreenMode::None);
    assert!(!state.tree.container(a).floating);
    assert_eq!(state.tree.container(a).saved_scale, None);
    assert_eq!(state.tree.arrange_serial(), serial);

    ok(&mut state, "open 800x-1 b");
    assert_snapshot!(
        err(&mut state, "fullscreen present"),
        @"Can't fit a view with natural size 800x-1 into the output."
    );
}

#[test]
fn present_scale_failure_propagates() {
    let mut state = state();
    ok(&mut state, "open 100x100 tiny");
    let tiny = focused(&state);

    // 1080 / 100 = 10.8 is above the largest scale.
    assert_snapshot!(
        err(&mut state, "fullscreen present"),
        @"Error changing output scale: scale 10.8 must be above 0 and at most 10"
    );

    assert_eq!(scale(&state), 1.);
    assert_eq!(mode(&state, tiny), FullscreenMode::None);
    assert!(!state.tree.container(tiny).floating);
}

#[test]
fn present_without_view() {
    let mut state = state();
    assert_snapshot!(
        err(&mut state, "fullscreen present"),
        @"Can't run this command if there's no view connected to the container."
    );

    ok(&mut state, "open 800x600 a; open 640x480 b; focus parent; fullscreen");
    let wrapper = focused(&state);
    assert_snapshot!(
        err(&mut state, "fullscreen present"),
        @"Can't run this command if there's no view connected to the container."
    );
    assert_eq!(mode(&state, wrapper), FullscreenMode::Workspace);
    assert_eq!(scale(&state), 1.);
}

#[test]
fn present_rolls_back_scale_when_fullscreen_fails() {
    let mut state = state();
    ok(&mut state, "open 800x600 a; floating enable");
    let a = focused(&state);
    let ws = focused_workspace(&state);

    // Workspace focus with only floating containers, but a container to present.
    let ctx = CommandContext {
        node: Node::Workspace(ws),
        workspace: ws,
        container: Some(a),
    };
    let res = present::present(&mut state.tree, &ctx, FullscreenRequest::TOGGLE, true);

    assert_eq!(res, Err(CommandError::EmptyWorkspace));
    assert_eq!(scale(&state), 1.);
    assert_eq!(state.tree.container(a).saved_scale, None);
    state.tree.verify_invariants();
}

#[test]
fn present_twice_restores_scale() {
    let mut state = state();
    ok(&mut state, "open 800x600 mpv");
    let mpv = focused(&state);
    let output = state.tree.outputs().next().unwrap().0;

    ok(&mut state, "fullscreen present");
    assert_relative_eq!(scale(&state), 1.8);
    assert_eq!(saved_scale(&state, mpv), Some((output, 1.)));

    ok(&mut state, "fullscreen present");
    assert_eq!(scale(&state), 1.);
    assert_eq!(mode(&state, mpv), FullscreenMode::None);
    assert!(state.tree.container(mpv).floating);
    assert_eq!(state.tree.container(mpv).saved_scale, None);
}

#[test]
fn leaving_fullscreen_restores_scale() {
    let mut state = state();
    ok(&mut state, "open 800x600 mpv; fullscreen present");
    assert_relative_eq!(scale(&state), 1.8);

    ok(&mut state, "fullscreen");
    assert_eq!(scale(&state), 1.);
}

#[test]
fn closing_presented_container_restores_scale() {
    let mut state = state();
    ok(&mut state, "open 800x600 mpv; fullscreen present");
    assert_relative_eq!(scale(&state), 1.8);

    ok(&mut state, "close");
    assert_eq!(scale(&state), 1.);
}

#[test]
fn displaced_presented_container_restores_scale() {
    let mut state = state();
    ok(&mut state, "open 800x600 mpv");
    let mpv = focused(&state);
    ok(&mut state, "fullscreen present; open 640x480 b; fullscreen");

    assert_eq!(mode(&state, mpv), FullscreenMode::None);
    assert_eq!(scale(&state), 1.);
}

#[test]
fn present_second_container_keeps_its_scale() {
    let mut state = state();
    ok(&mut state, "open 800x600 a; fullscreen present");
    let a = focused(&state);
    let output = state.tree.outputs().next().unwrap().0;
    ok(&mut state, "open 640x480 b; fullscreen present");
    let b = focused(&state);

    // 1920x1080 at 1.8 is 1066x600 logical, so b fits at 1.25.
    assert_relative_eq!(scale(&state), 1.25);
    assert_eq!(mode(&state, a), FullscreenMode::None);
    assert_eq!(mode(&state, b), FullscreenMode::Workspace);
    assert_eq!(saved_scale(&state, a), None);
    assert_eq!(saved_scale(&state, b), Some((output, 1.)));

    ok(&mut state, "fullscreen");
    assert_eq!(mode(&state, b), FullscreenMode::None);
    assert_eq!(scale(&state), 1.);
}

#[test]
fn presents_on_two_workspaces_unwind_in_order() {
    let mut state = state();
    ok(&mut state, "open 800x600 a; fullscreen present");
    let a = focused(&state);
    ok(&mut state, "workspace two; open 640x480 b; fullscreen present");
    assert_relative_eq!(scale(&state), 1.25);
    assert_eq!(mode(&state, a), FullscreenMode::Workspace);

    ok(&mut state, "fullscreen");
    assert_relative_eq!(scale(&state), 1.8);

    ok(&mut state, "workspace 1");
    assert_eq!(focused(&state), a);
    ok(&mut state, "fullscreen");
    assert_eq!(scale(&state), 1.);
}

#[test]
fn closing_older_presented_container_hands_over_scale() {
    let mut state = state();
    ok(&mut state, "open 800x600 a; fullscreen present");
    let a = focused(&state);
    ok(&mut state, "workspace two; open 640x480 b; fullscreen present");

    ok(&mut state, "workspace 1");
    assert_eq!(focused(&state), a);
    ok(&mut state, "close");
    assert_relative_eq!(scale(&state), 1.25);

    ok(&mut state, "workspace two; fullscreen");
    assert_eq!(scale(&state), 1.);
}

#[test]
fn presenting_on_another_output_releases_first_scale() {
    let mut state = state_with_config(
        r#"
        output "HEADLESS-1" { mode "1920x1080"; }
        output "HEADLESS-2" { mode "1920x1080"; }
        workspace "1" { open-on-output "HEADLESS-1"; }
        workspace "2" { open-on-output "HEADLESS-2"; }
        "#,
    );
    let first = state.tree.find_output("HEADLESS-1").unwrap();
    let second = state.tree.find_output("HEADLESS-2").unwrap();

    ok(&mut state, "open 800x600 a; fullscreen present; move scratchpad");
    let a = state.tree.scratchpad()[0];
    assert_relative_eq!(state.tree.output(first).scale, 1.8);

    ok(&mut state, "workspace 2");
    state.tree.set_focus(a);
    ok(&mut state, "fullscreen present");

    assert_eq!(mode(&state, a), FullscreenMode::None);
    assert_eq!(state.tree.container(a).saved_scale, None);
    assert_eq!(state.tree.output(first).scale, 1.);
    assert_eq!(state.tree.output(second).scale, 1.);
}

#[test]
fn repeated_present_keeps_oldest_scale() {
    let mut state = state();
    ok(&mut state, "output headless-1 scale 1.5; open 800x600 mpv");
    let mpv = focused(&state);
    let output = state.tree.outputs().next().unwrap().0;

    ok(&mut state, "fullscreen present; fullscreen present enable");
    assert_eq!(mode(&state, mpv), FullscreenMode::Workspace);
    assert_eq!(saved_scale(&state, mpv), Some((output, 1.5)));

    ok(&mut state, "fullscreen disable");
    assert_eq!(scale(&state), 1.5);
}

#[test]
fn restore_scale_can_be_disabled() {
    let mut state = state_with_config(
        r#"
        output "HEADLESS-1" { mode "1920x1080"; }
        present { restore-scale false; }
        "#,
    );
    ok(&mut state, "open 800x600 mpv; fullscreen present");
    let mpv = focused(&state);
    assert_eq!(state.tree.container(mpv).saved_scale, None);

    ok(&mut state, "fullscreen");
    assert_relative_eq!(scale(&state), 1.8);

    ok(&mut state, "close");
    assert_relative_eq!(scale(&state), 1.8);
}

#[test]
fn batch_stops_at_first_failure() {
    let mut state = state();
    let replies = state.run("open 800x600 a; bogus; close");

    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0], Ok(Response::Handled));
    assert_eq!(
        replies[1],
        Err(String::from("Unknown/invalid command 'bogus'"))
    );
    assert_eq!(state.tree.workspace(focused_workspace(&state)).tiling.len(), 1);

    assert!(state.run(" ; ;").is_empty());
}

#[test]
fn floating_command() {
    let mut state = state();
    ok(&mut state, "open 800x600 a");
    let a = focused(&state);

    ok(&mut state, "floating toggle");
    assert!(state.tree.container(a).floating);
    ok(&mut state, "floating enable");
    assert!(state.tree.container(a).floating);
    ok(&mut state, "floating off");
    assert!(!state.tree.container(a).floating);
}

#[test]
fn workspace_command() {
    let mut state = state();
    ok(&mut state, "open 800x600 a; workspace two");
    let two = focused_workspace(&state);
    assert_eq!(state.tree.workspace(two).name, "two");
    assert_eq!(state.tree.seat().focused_node(), Some(Node::Workspace(two)));
    assert_eq!(
        state.tree.workspace(two).output,
        state.tree.find_output("HEADLESS-1")
    );

    ok(&mut state, "workspace 1");
    assert_eq!(state.tree.workspace(focused_workspace(&state)).name, "1");
    assert!(state.tree.seat().focused_container().is_some());
}

#[test]
fn workspace_names_ignore_case() {
    let mut state = state_with_config(
        r#"
        output "HEADLESS-1" { mode "1920x1080"; }
        workspace "main"
        "#,
    );
    let main = focused_workspace(&state);
    let count = state.tree.workspaces().count();

    ok(&mut state, "workspace two; workspace MAIN");
    assert_eq!(focused_workspace(&state), main);
    assert_eq!(state.tree.workspaces().count(), count + 1);
    assert_eq!(state.tree.find_workspace("TWO"), state.tree.find_workspace("two"));
}

#[test]
fn focus_parent_command() {
    let mut state = state();
    assert_snapshot!(err(&mut state, "focus parent"), @"There is no parent to focus.");

    ok(&mut state, "open 800x600 a; focus parent");
    assert_eq!(
        state.tree.seat().focused_node(),
        Some(Node::Workspace(focused_workspace(&state)))
    );
}

#[test]
fn output_scale_command() {
    let mut state = state();
    ok(&mut state, "output HEADLESS-1 scale 2");
    assert_eq!(scale(&state), 2.);

    assert_snapshot!(
        err(&mut state, "output DP-1 scale 2"),
        @"Error changing output scale: no output named DP-1"
    );
    assert_snapshot!(
        err(&mut state, "output HEADLESS-1 scale two"),
        @r#"Error changing output scale: error parsing scale "two""#
    );
}

#[test]
fn get_outputs() {
    let mut state = state();
    ok(&mut state, "output HEADLESS-1 scale 2");

    let Ok(Response::Outputs(outputs)) = state.execute(Command::GetOutputs) else {
        panic!("expected outputs");
    };
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].name, "HEADLESS-1");
    assert_eq!((outputs[0].width, outputs[0].height), (960, 540));
    assert_eq!(
        (outputs[0].physical_width, outputs[0].physical_height),
        (1920, 1080)
    );
}

#[test]
fn get_tree() {
    let mut state = state();
    ok(&mut state, "open 800x600 a; fullscreen global");

    let Ok(Response::Tree(tree)) = state.execute(Command::GetTree) else {
        panic!("expected tree");
    };
    let container = &tree.workspaces[0].tiling[0];
    assert_eq!(container.fullscreen_mode, FullscreenMode::Global);
    assert!(container.is_focused);
    assert_eq!(tree.outputs[0].scale, 1.);
}

#[test]
fn parse_commands() {
    assert_eq!(
        Command::parse("fullscreen enable global"),
        Ok(Command::Fullscreen(vec![
            String::from("enable"),
            String::from("global")
        ]))
    );
    assert_eq!(
        Command::parse("fullscreen present"),
        Ok(Command::FullscreenPresent(FullscreenRequest::TOGGLE))
    );
    assert_eq!(
        Command::parse("open 800X600 mpv"),
        Ok(Command::Open(View {
            app_id: Some(String::from("mpv")),
            natural_width: 800,
            natural_height: 600,
        }))
    );
    assert_eq!(
        Command::parse("  move  to scratchpad "),
        Ok(Command::MoveToScratchpad)
    );
    assert_eq!(
        Command::parse("output eDP-1 scale 1.25"),
        Ok(Command::OutputScale {
            output: String::from("eDP-1"),
            scale: String::from("1.25"),
        })
    );
    assert_eq!(
        Command::parse("workspace my stuff"),
        Ok(Command::Workspace(String::from("my stuff")))
    );
    assert_eq!(Command::parse("GET_TREE"), Ok(Command::GetTree));

    assert!(matches!(
        Command::parse("open 800"),
        Err(CommandError::InvalidArgument(_))
    ));
    assert!(matches!(
        Command::parse("floating maybe"),
        Err(CommandError::InvalidArgument(_))
    ));
    assert!(matches!(
        Command::parse("close now"),
        Err(CommandError::Usage { command: "close", .. })
    ));
    assert!(matches!(
        Command::parse("focus left"),
        Err(CommandError::Usage { command: "focus", .. })
    ));
}

#[test]
fn state_from_config() {
    let state = state_with_config(
        r#"
        output "DP-1" { off; mode "2560x1440"; }
        output "DP-2" { scale 2; }
        output "eDP-1" { mode "2560x1600"; scale 2; }
        workspace "web" { open-on-output "DP-3"; }
        workspace "chat" { layout "splitv"; }
        present { restore-scale false; }
        "#,
    );

    assert_eq!(state.options, Options { restore_scale: false });
    assert_snapshot!(state.tree.dump(), @r"
    output eDP-1 1280x800 scale 2 (mode 2560x1600)
    workspace web horizontal on eDP-1 *
    workspace chat vertical on eDP-1
    ");
}

#[test]
fn state_from_config_without_workspaces() {
    let state = state_with_config(r#"output "HEADLESS-1" { mode "800x600"; }"#);
    assert_eq!(state.options, Options::default());
    assert_snapshot!(state.tree.dump(), @r"
    output HEADLESS-1 800x600 scale 1 (mode 800x600)
    workspace 1 horizontal on HEADLESS-1 *
    ");
}
