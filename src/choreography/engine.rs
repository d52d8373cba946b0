use crate::{
    choreography::values::IllustrativeValues,
    foundation::core::{EdgeGroupId, EdgeState, LayerRole, NodeId, NodeState},
    foundation::error::{NeurosceneError, NeurosceneResult},
    graph::model::GraphModel,
};

/// Targets of one atomic state change: a set of nodes or a set of edge
/// groups, never both. Everything in the set transitions together.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum StepTargets {
    Nodes { ids: Vec<NodeId>, state: NodeState },
    EdgeGroups { ids: Vec<EdgeGroupId>, state: EdgeState },
}

/// Cosmetic numbers shown next to a step. Display only: playback and
/// ordering ignore it entirely.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StepAnnotation {
    pub label: String,
    pub values: Vec<f64>,
}

impl StepAnnotation {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

/// One atomic, simultaneous visual-state change.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Step {
    pub targets: StepTargets,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<StepAnnotation>,
}

impl Step {
    pub fn nodes(ids: Vec<NodeId>, state: NodeState) -> Self {
        Self {
            targets: StepTargets::Nodes { ids, state },
            annotation: None,
        }
    }

    pub fn edge_groups(ids: Vec<EdgeGroupId>, state: EdgeState) -> Self {
        Self {
            targets: StepTargets::EdgeGroups { ids, state },
            annotation: None,
        }
    }

    pub fn with_annotation(mut self, annotation: StepAnnotation) -> Self {
        self.annotation = Some(annotation);
        self
    }

    /// Layer index a node step addresses, if this is a node step.
    /// Every node step this engine emits targets exactly one layer.
    pub fn node_layer(&self) -> Option<usize> {
        match &self.targets {
            StepTargets::Nodes { ids, .. } => ids.first().map(|id| id.layer),
            StepTargets::EdgeGroups { .. } => None,
        }
    }
}

/// An ordered sequence of steps for one choreography run. Steps execute
/// strictly in order; a timeline is consumed once and discarded.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    steps: Vec<Step>,
}

impl Timeline {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}

/// Turns a qualitative intent (forward pass, backward pass, reset) into a
/// causally ordered [`Timeline`], independent of any rendering technology.
///
/// The engine never executes steps and never mutates the model; it only
/// computes them. The injected [`IllustrativeValues`] feeds annotations
/// only.
#[derive(Clone, Debug)]
pub struct ChoreographyEngine {
    values: IllustrativeValues,
}

impl ChoreographyEngine {
    pub fn new(values: IllustrativeValues) -> Self {
        Self { values }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(IllustrativeValues::seeded(seed))
    }

    /// Forward pass: activate layers in increasing index order, each
    /// preceded by its incoming edge group lighting up as data flow. The
    /// final layer gets the distinguished `Output` state.
    #[tracing::instrument(skip(self, model))]
    pub fn run_forward(&mut self, model: &GraphModel) -> Timeline {
        let layers = model.layers();
        let mut steps = Vec::with_capacity(2 * layers.len() - 1);

        let first = &layers[0];
        steps.push(
            Step::nodes(first.node_ids().collect(), NodeState::Active).with_annotation(
                StepAnnotation::new("input", self.values.activations(first.len())),
            ),
        );

        for layer in &layers[1..] {
            steps.push(Step::edge_groups(
                vec![EdgeGroupId(layer.index - 1)],
                EdgeState::Flow,
            ));
            let (state, label) = if layer.role == LayerRole::Output {
                (NodeState::Output, "output")
            } else {
                (NodeState::Active, "activations")
            };
            steps.push(
                Step::nodes(layer.node_ids().collect(), state).with_annotation(StepAnnotation::new(
                    label,
                    self.values.activations(layer.len()),
                )),
            );
        }
        Timeline::new(steps)
    }

    /// Backward pass: mark error state in decreasing index order starting at
    /// the output layer, each transition preceded by the connecting edge
    /// group lighting up as gradient flow, ending at layer 0.
    #[tracing::instrument(skip(self, model))]
    pub fn run_backward(&mut self, model: &GraphModel) -> Timeline {
        let layers = model.layers();
        let mut steps = Vec::with_capacity(2 * layers.len() - 1);

        let last = &layers[layers.len() - 1];
        steps.push(
            Step::nodes(last.node_ids().collect(), NodeState::Error)
                .with_annotation(StepAnnotation::new("loss", vec![self.values.loss()])),
        );

        for i in (1..layers.len()).rev() {
            steps.push(Step::edge_groups(vec![EdgeGroupId(i - 1)], EdgeState::Gradient));
            let layer = &layers[i - 1];
            steps.push(
                Step::nodes(layer.node_ids().collect(), NodeState::Error).with_annotation(
                    StepAnnotation::new("deltas", self.values.errors(layer.len())),
                ),
            );
        }
        Timeline::new(steps)
    }

    /// Return every node and edge group to `Default` in two batched steps.
    pub fn reset(&self, model: &GraphModel) -> Timeline {
        Timeline::new(vec![
            Step::nodes(model.node_ids().collect(), NodeState::Default),
            Step::edge_groups(
                model.edge_groups().iter().map(|g| g.id).collect(),
                EdgeState::Default,
            ),
        ])
    }

    /// Highlight one node and the edge group feeding into it, the way the
    /// architecture walkthrough singles out a neuron and its incoming
    /// connections. Input-layer nodes have no incoming group and get only
    /// the node highlight.
    pub fn highlight_fan_in(
        &self,
        model: &GraphModel,
        node: NodeId,
    ) -> NeurosceneResult<Timeline> {
        if model.node(node).is_none() {
            return Err(NeurosceneError::scene(format!(
                "cannot highlight unknown node {node}"
            )));
        }

        let mut steps = vec![Step::nodes(vec![node], NodeState::Highlighted)];
        if node.layer > 0 {
            steps.push(Step::edge_groups(
                vec![EdgeGroupId(node.layer - 1)],
                EdgeState::Highlighted,
            ));
        }
        Ok(Timeline::new(steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer_order(timeline: &Timeline) -> Vec<usize> {
        timeline.steps().iter().filter_map(Step::node_layer).collect()
    }

    #[test]
    fn forward_emits_layers_in_increasing_order() {
        let model = GraphModel::build(&[3, 5, 4, 2]).unwrap();
        let mut engine = ChoreographyEngine::seeded(1);
        let timeline = engine.run_forward(&model);

        assert_eq!(layer_order(&timeline), vec![0, 1, 2, 3]);

        let edge_steps = timeline
            .steps()
            .iter()
            .filter(|s| matches!(s.targets, StepTargets::EdgeGroups { .. }))
            .count();
        assert_eq!(edge_steps, 3);
        assert_eq!(timeline.len(), 7);
    }

    #[test]
    fn forward_marks_final_layer_as_output() {
        let model = GraphModel::build(&[2, 3, 2]).unwrap();
        let mut engine = ChoreographyEngine::seeded(1);
        let timeline = engine.run_forward(&model);

        let last_node_step = timeline
            .steps()
            .iter()
            .rev()
            .find(|s| matches!(s.targets, StepTargets::Nodes { .. }))
            .unwrap();
        match &last_node_step.targets {
            StepTargets::Nodes { state, .. } => assert_eq!(*state, NodeState::Output),
            _ => unreachable!(),
        }

        // Earlier layers are plain Active.
        match &timeline.steps()[0].targets {
            StepTargets::Nodes { state, .. } => assert_eq!(*state, NodeState::Active),
            _ => unreachable!(),
        }
    }

    #[test]
    fn forward_edge_step_precedes_its_target_layer() {
        let model = GraphModel::build(&[2, 2, 2]).unwrap();
        let mut engine = ChoreographyEngine::seeded(1);
        let steps = engine.run_forward(&model).into_steps();

        for (idx, step) in steps.iter().enumerate() {
            if let StepTargets::EdgeGroups { ids, state } = &step.targets {
                assert_eq!(*state, EdgeState::Flow);
                assert_eq!(ids.len(), 1);
                // The very next step activates the group's target layer.
                assert_eq!(steps[idx + 1].node_layer(), Some(ids[0].target_layer()));
            }
        }
    }

    #[test]
    fn backward_emits_layers_in_decreasing_order_to_zero() {
        let model = GraphModel::build(&[3, 5, 4, 2]).unwrap();
        let mut engine = ChoreographyEngine::seeded(1);
        let timeline = engine.run_backward(&model);

        assert_eq!(layer_order(&timeline), vec![3, 2, 1, 0]);

        for step in timeline.steps() {
            match &step.targets {
                StepTargets::Nodes { state, .. } => assert_eq!(*state, NodeState::Error),
                StepTargets::EdgeGroups { state, .. } => assert_eq!(*state, EdgeState::Gradient),
            }
        }
    }

    #[test]
    fn reset_returns_everything_to_default() {
        let mut model = GraphModel::build(&[3, 4, 2]).unwrap();
        let mut engine = ChoreographyEngine::seeded(1);

        for step in engine.run_forward(&model).into_steps() {
            model.apply_step(&step).unwrap();
        }
        for step in engine.run_backward(&model).into_steps() {
            model.apply_step(&step).unwrap();
        }
        assert!(!model.is_all_default());

        let reset = engine.reset(&model);
        assert_eq!(reset.len(), 2);
        for step in reset.into_steps() {
            model.apply_step(&step).unwrap();
        }
        assert!(model.is_all_default());
    }

    #[test]
    fn annotations_do_not_change_structure() {
        let model = GraphModel::build(&[2, 3, 2]).unwrap();
        let mut a = ChoreographyEngine::seeded(11);
        let mut b = ChoreographyEngine::seeded(99);

        let ta = a.run_forward(&model);
        let tb = b.run_forward(&model);

        // Different seeds: identical targets, possibly different numbers.
        let targets = |t: &Timeline| {
            t.steps().iter().map(|s| s.targets.clone()).collect::<Vec<_>>()
        };
        assert_eq!(targets(&ta), targets(&tb));
    }

    #[test]
    fn same_seed_reproduces_annotations() {
        let model = GraphModel::build(&[2, 2]).unwrap();
        let ta = ChoreographyEngine::seeded(5).run_forward(&model);
        let tb = ChoreographyEngine::seeded(5).run_forward(&model);
        assert_eq!(ta, tb);
    }

    #[test]
    fn fan_in_highlights_node_and_incoming_group() {
        let model = GraphModel::build(&[3, 5, 4, 2]).unwrap();
        let engine = ChoreographyEngine::seeded(1);
        let target = NodeId::new(2, 1);
        let steps = engine.highlight_fan_in(&model, target).unwrap().into_steps();

        assert_eq!(steps.len(), 2);
        match &steps[0].targets {
            StepTargets::Nodes { ids, state } => {
                assert_eq!(ids.as_slice(), &[target]);
                assert_eq!(*state, NodeState::Highlighted);
            }
            _ => unreachable!(),
        }
        match &steps[1].targets {
            StepTargets::EdgeGroups { ids, state } => {
                assert_eq!(ids.as_slice(), &[EdgeGroupId(1)]);
                assert_eq!(*state, EdgeState::Highlighted);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn fan_in_on_input_node_has_no_edge_step() {
        let model = GraphModel::build(&[3, 2]).unwrap();
        let engine = ChoreographyEngine::seeded(1);
        let steps = engine
            .highlight_fan_in(&model, NodeId::new(0, 0))
            .unwrap()
            .into_steps();
        assert_eq!(steps.len(), 1);
    }

    #[test]
    fn fan_in_rejects_unknown_node() {
        let model = GraphModel::build(&[3, 2]).unwrap();
        let engine = ChoreographyEngine::seeded(1);
        assert!(engine.highlight_fan_in(&model, NodeId::new(5, 5)).is_err());
    }

    #[test]
    fn timeline_json_roundtrip() {
        let model = GraphModel::build(&[2, 2]).unwrap();
        let timeline = ChoreographyEngine::seeded(3).run_forward(&model);
        let s = serde_json::to_string(&timeline).unwrap();
        let de: Timeline = serde_json::from_str(&s).unwrap();
        assert_eq!(de, timeline);
    }
}
