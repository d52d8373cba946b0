use crate::{
    choreography::engine::{Step, StepTargets},
    foundation::core::{EdgeGroupId, EdgeState, LayerRole, NodeId, NodeState},
    foundation::error::{NeurosceneError, NeurosceneResult},
};

/// An ordered group of nodes at one depth of the diagram.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Layer {
    pub index: usize,
    pub role: LayerRole,
    pub nodes: Vec<Node>,
}

impl Layer {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().map(|n| n.id)
    }
}

/// A single visual unit belonging to exactly one layer.
///
/// The role is stamped at build time so mass state changes never have to
/// infer it from position.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub role: LayerRole,
    pub state: NodeState,
}

/// The complete bipartite connection set between two adjacent layers.
///
/// Edges are ordered source-major: all pairs for source node 0 first, then
/// source node 1, and so on. Choreography relies on this order being stable.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct EdgeGroup {
    pub id: EdgeGroupId,
    pub edges: Vec<(NodeId, NodeId)>,
    pub state: EdgeState,
}

impl EdgeGroup {
    /// Edges whose target is the given node, in source order.
    pub fn incoming(&self, target: NodeId) -> impl Iterator<Item = &(NodeId, NodeId)> {
        self.edges.iter().filter(move |(_, dst)| *dst == target)
    }
}

/// Layered diagram topology plus per-element visual state.
///
/// Topology is immutable after [`GraphModel::build`]; the only mutation is
/// visual state, and only through [`GraphModel::apply_step`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GraphModel {
    layers: Vec<Layer>,
    edge_groups: Vec<EdgeGroup>,
}

impl GraphModel {
    /// Build a model from ordered layer sizes.
    ///
    /// Requires at least two layers and at least one node per layer; anything
    /// else is an `InvalidTopology` error and no partial model is returned.
    #[tracing::instrument]
    pub fn build(layer_sizes: &[usize]) -> NeurosceneResult<Self> {
        if layer_sizes.len() < 2 {
            return Err(NeurosceneError::invalid_topology(format!(
                "need at least 2 layers, got {}",
                layer_sizes.len()
            )));
        }
        if let Some(pos) = layer_sizes.iter().position(|&s| s == 0) {
            return Err(NeurosceneError::invalid_topology(format!(
                "layer {pos} has size 0, every layer needs at least one node"
            )));
        }

        let last = layer_sizes.len() - 1;
        let mut layers = Vec::with_capacity(layer_sizes.len());
        for (i, &size) in layer_sizes.iter().enumerate() {
            let role = if i == 0 {
                LayerRole::Input
            } else if i == last {
                LayerRole::Output
            } else {
                LayerRole::Hidden
            };
            let nodes = (0..size)
                .map(|j| Node {
                    id: NodeId::new(i, j),
                    role,
                    state: NodeState::Default,
                })
                .collect();
            layers.push(Layer {
                index: i,
                role,
                nodes,
            });
        }

        let mut edge_groups = Vec::with_capacity(last);
        for p in 0..last {
            let mut edges = Vec::with_capacity(layer_sizes[p] * layer_sizes[p + 1]);
            for src in layers[p].node_ids() {
                for dst in layers[p + 1].node_ids() {
                    edges.push((src, dst));
                }
            }
            edge_groups.push(EdgeGroup {
                id: EdgeGroupId(p),
                edges,
                state: EdgeState::Default,
            });
        }

        Ok(Self {
            layers,
            edge_groups,
        })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.layers.get(id.layer).and_then(|l| l.nodes.get(id.index))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.layers.iter().flat_map(|l| l.nodes.iter())
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.layers.iter().flat_map(Layer::node_ids)
    }

    pub fn edge_groups(&self) -> &[EdgeGroup] {
        &self.edge_groups
    }

    pub fn edge_group(&self, id: EdgeGroupId) -> Option<&EdgeGroup> {
        self.edge_groups.get(id.0)
    }

    /// Total edge count across all groups.
    pub fn edge_count(&self) -> usize {
        self.edge_groups.iter().map(|g| g.edges.len()).sum()
    }

    /// Apply one step's state change. Unknown ids are errors: steps must
    /// reference elements of this model.
    pub fn apply_step(&mut self, step: &Step) -> NeurosceneResult<()> {
        match &step.targets {
            StepTargets::Nodes { ids, state } => {
                for id in ids {
                    let node = self
                        .layers
                        .get_mut(id.layer)
                        .and_then(|l| l.nodes.get_mut(id.index))
                        .ok_or_else(|| {
                            NeurosceneError::scene(format!("step references unknown node {id}"))
                        })?;
                    node.state = *state;
                }
            }
            StepTargets::EdgeGroups { ids, state } => {
                for id in ids {
                    let group = self.edge_groups.get_mut(id.0).ok_or_else(|| {
                        NeurosceneError::scene(format!(
                            "step references unknown edge group {}",
                            id.0
                        ))
                    })?;
                    group.state = *state;
                }
            }
        }
        Ok(())
    }

    /// True when every node and edge group is back in its default state.
    pub fn is_all_default(&self) -> bool {
        self.nodes().all(|n| n.state == NodeState::Default)
            && self
                .edge_groups
                .iter()
                .all(|g| g.state == EdgeState::Default)
    }
}
