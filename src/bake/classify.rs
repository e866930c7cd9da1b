//! Choosing between the host bake path and the extended one.

use crate::config::LoadContext;
use crate::resolver::{ModelGraph, NodeId, BLOCK_ENTITY_MARKER};

/// Which builder a JSON model is baked with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BakePath {
    /// The host's unmodified bake.
    Vanilla,
    /// The extension payload's model construction.
    Extended,
}

/// Classify a JSON model by inspecting its payload, faces and the load flags.
///
/// Block-entity models always bake through the host. A model stays on the
/// host path only when vanilla loading is off, no derivation rules exist,
/// its payload hierarchy is empty (a missing payload counts as empty) and
/// none of its faces carry extension data.
pub fn select_bake_path(graph: &ModelGraph, node: NodeId, context: &LoadContext) -> BakePath {
    if graph.root_is(node, BLOCK_ENTITY_MARKER) {
        return BakePath::Vanilla;
    }

    let Some(model) = graph.json(node) else {
        return BakePath::Vanilla;
    };

    let plain = !context.config.load_vanilla_models
        && context.derived.is_empty()
        && model
            .extension
            .as_ref()
            .map_or(true, |extension| extension.hierarchy_is_empty(graph));
    if !plain {
        return BakePath::Extended;
    }

    let has_face_data = graph
        .elements(node)
        .iter()
        .flat_map(|element| element.faces.values())
        .any(|face| !face.extension.is_empty());

    if has_face_data {
        BakePath::Extended
    } else {
        BakePath::Vanilla
    }
}
