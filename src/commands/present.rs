//! `fullscreen present`
//!
//! Scales the output so that the focused view fills it at its natural size, then toggles
//! fullscreen and floats the container.

use super::fullscreen::{self, FullscreenRequest};
use super::{release_saved_scales, restore_presented_scales, CommandContext, CommandError};
use crate::tree::ContainerTree;
use crate::utils::scale::{contain_fit_scale, format_scale};

/// Runs "present" for the focus in `ctx`.
///
/// `forwarded` is handed to the fullscreen toggle unchanged. Nothing is modified unless all
/// preconditions hold. A failed scale change fails the command before fullscreen is touched.
///
/// With `restore_scale`, the output scale from before the first present is kept on the container
/// and put back once it leaves fullscreen. Presenting another container on the same output takes
/// over that scale when the earlier one is displaced.
pub fn present(
    tree: &mut ContainerTree,
    ctx: &CommandContext,
    forwarded: FullscreenRequest,
    restore_scale: bool,
) -> Result<(), CommandError> {
    let _span = tracy_client::span!("present");

    let id = ctx.container.ok_or(CommandError::NoView)?;
    let view = tree.container(id).view.as_ref().ok_or(CommandError::NoView)?;
    let (natural_width, natural_height) = (view.natural_width, view.natural_height);

    let output_id = tree
        .workspace(ctx.workspace)
        .output
        .ok_or(CommandError::NoOutput)?;
    let output = tree.output(output_id);
    let output_size = output.logical_size();
    let previous_scale = output.scale;
    let output_name = output.name.clone();

    let scale = contain_fit_scale(output_size, (natural_width, natural_height)).ok_or(
        CommandError::DegenerateSize {
            width: natural_width,
            height: natural_height,
        },
    )?;
    debug!(
        "presenting {natural_width}x{natural_height} on {output_name} ({}x{}): scale {scale}",
        output_size.0, output_size.1
    );

    tree.set_output_scale(&output_name, &format_scale(scale))
        .map_err(|err| {
            warn!("error changing scale of {output_name}: {err}");
            CommandError::OutputScale(err)
        })?;

    // A container holds a saved scale for one output at a time.
    let moved_from = tree
        .container(id)
        .saved_scale
        .filter(|saved| restore_scale && saved.output != output_id);
    if moved_from.is_some() {
        *tree.saved_scale_mut(id) = None;
    }
    let saved_here = restore_scale && tree.save_scale(id, output_id, previous_scale);

    if let Err(err) = fullscreen::apply(tree, ctx, forwarded) {
        // Keep the command atomic: undo the scale change.
        tree.apply_output_scale(output_id, previous_scale);
        if saved_here {
            *tree.saved_scale_mut(id) = moved_from;
        }
        return Err(err);
    }

    release_saved_scales(tree, moved_from.into_iter().collect());
    restore_presented_scales(tree);

    tree.set_floating(id, true);

    Ok(())
}
