use std::collections::BTreeSet;

use crate::{
    choreography::engine::Step, foundation::error::NeurosceneResult, graph::model::GraphModel,
    layout::engine::CoordinateMap,
};

/// Identity of one ephemeral overlay element.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct OverlayId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OverlayKind {
    Caption,
    Formula,
    Label,
}

/// A per-section decorative element: a caption, a formula, a label.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Overlay {
    pub id: OverlayId,
    pub kind: OverlayKind,
    pub text: String,
}

/// Boundary to the rendering collaborator.
///
/// Implementations own all drawing: element creation, the synchronous
/// play-one-step-and-report operation, and fades for overlay teardown. A
/// returned error means the operation did not complete.
pub trait Stage {
    fn show_graph(&mut self, model: &GraphModel, coords: &CoordinateMap) -> NeurosceneResult<()>;
    fn play_step(&mut self, step: &Step) -> NeurosceneResult<()>;
    fn show_overlay(&mut self, overlay: &Overlay) -> NeurosceneResult<()>;
    fn fade_overlay(&mut self, id: OverlayId) -> NeurosceneResult<()>;
    fn remove_graph(&mut self) -> NeurosceneResult<()>;
}

/// What a [`RecordingStage`] saw, in call order.
#[derive(Clone, Debug, PartialEq)]
pub enum StageEvent {
    GraphShown { nodes: usize, edges: usize },
    StepPlayed(Step),
    OverlayShown(Overlay),
    OverlayFaded(OverlayId),
    GraphRemoved,
}

/// A stage that draws nothing and logs every call. Doubles as the test
/// backend and as a dry-run target for inspecting a lesson's operations.
#[derive(Debug, Default)]
pub struct RecordingStage {
    events: Vec<StageEvent>,
    visible_overlays: BTreeSet<OverlayId>,
    graph_visible: bool,
}

impl RecordingStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[StageEvent] {
        &self.events
    }

    /// Overlays currently in the renderable set.
    pub fn visible_overlays(&self) -> &BTreeSet<OverlayId> {
        &self.visible_overlays
    }

    pub fn graph_visible(&self) -> bool {
        self.graph_visible
    }
}

impl Stage for RecordingStage {
    fn show_graph(&mut self, model: &GraphModel, coords: &CoordinateMap) -> NeurosceneResult<()> {
        debug_assert_eq!(coords.len(), model.nodes().count());
        self.events.push(StageEvent::GraphShown {
            nodes: coords.len(),
            edges: model.edge_count(),
        });
        self.graph_visible = true;
        Ok(())
    }

    fn play_step(&mut self, step: &Step) -> NeurosceneResult<()> {
        self.events.push(StageEvent::StepPlayed(step.clone()));
        Ok(())
    }

    fn show_overlay(&mut self, overlay: &Overlay) -> NeurosceneResult<()> {
        self.visible_overlays.insert(overlay.id);
        self.events.push(StageEvent::OverlayShown(overlay.clone()));
        Ok(())
    }

    fn fade_overlay(&mut self, id: OverlayId) -> NeurosceneResult<()> {
        self.visible_overlays.remove(&id);
        self.events.push(StageEvent::OverlayFaded(id));
        Ok(())
    }

    fn remove_graph(&mut self) -> NeurosceneResult<()> {
        self.graph_visible = false;
        self.events.push(StageEvent::GraphRemoved);
        Ok(())
    }
}
