pub use kurbo::{Affine, Point, Rect, Vec2};

/// Stable node identity: owning layer index and position within that layer.
///
/// Ids are assigned once at build time and never change; choreography steps
/// reference nodes by id, never by collection position.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId {
    pub layer: usize,
    pub index: usize,
}

impl NodeId {
    pub fn new(layer: usize, index: usize) -> Self {
        Self { layer, index }
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}.{}", self.layer, self.index)
    }
}

/// Identity of the edge group connecting layer `p` to layer `p + 1`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct EdgeGroupId(pub usize);

impl EdgeGroupId {
    /// Index of the source layer of this group.
    pub fn source_layer(self) -> usize {
        self.0
    }

    /// Index of the target layer of this group.
    pub fn target_layer(self) -> usize {
        self.0 + 1
    }
}

/// Role of a layer, fixed at build time from its position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LayerRole {
    Input,
    Hidden,
    Output,
}

/// Visual state of a node. `Output` is the distinguished activation state
/// used for the final layer during a forward pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum NodeState {
    #[default]
    Default,
    Active,
    Output,
    Error,
    Highlighted,
}

/// Visual state of an edge group, applied uniformly to every edge in it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EdgeState {
    #[default]
    Default,
    Flow,
    Gradient,
    Highlighted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_orders_layer_major() {
        let a = NodeId::new(0, 3);
        let b = NodeId::new(1, 0);
        assert!(a < b);
        assert_eq!(a.to_string(), "n0.3");
    }

    #[test]
    fn edge_group_spans_adjacent_layers() {
        let g = EdgeGroupId(2);
        assert_eq!(g.source_layer(), 2);
        assert_eq!(g.target_layer(), 3);
    }
}
