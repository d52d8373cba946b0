//! Neuroscene builds neuron-style diagram animations: deterministic layered
//! graph layout plus multi-phase highlight choreography (forward data flow,
//! backward error flow, reset), decoupled from any rendering technology.
//!
//! # Pipeline overview
//!
//! 1. **Build**: `GraphModel::build(layer_sizes)` creates layers, nodes, and
//!    the complete bipartite edge groups between adjacent layers
//! 2. **Layout**: `layout(model, spacing) -> CoordinateMap` is pure and fits
//!    into any viewport with a uniform affine
//! 3. **Choreograph**: `ChoreographyEngine::run_*` computes causally ordered
//!    [`Timeline`]s of atomic [`Step`]s
//! 4. **Play**: a [`Stage`] implementation draws each step and reports
//!    completion; [`SceneComposer`] sequences lesson sections around the
//!    persistent graph
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: topology, layout, and step ordering are
//!   pure functions of their inputs; the illustrative numbers shown beside
//!   steps come from an explicitly seeded source and never affect structure.
//! - **No drawing in the core**: all rendering happens behind the [`Stage`]
//!   trait; timelines are computed, never executed, by the engine.
#![forbid(unsafe_code)]

mod choreography;
mod foundation;
mod graph;
mod layout;
mod scene;

pub use choreography::engine::{
    ChoreographyEngine, Step, StepAnnotation, StepTargets, Timeline,
};
pub use choreography::playback::play_timeline;
pub use choreography::values::IllustrativeValues;
pub use foundation::core::{
    Affine, EdgeGroupId, EdgeState, LayerRole, NodeId, NodeState, Point, Rect, Vec2,
};
pub use foundation::error::{NeurosceneError, NeurosceneResult};
pub use graph::model::{EdgeGroup, GraphModel, Layer, Node};
pub use layout::engine::{CoordinateMap, Spacing, layout};
pub use scene::composer::{SceneComposer, SectionContext};
pub use scene::stage::{Overlay, OverlayId, OverlayKind, RecordingStage, Stage, StageEvent};
