use std::collections::BTreeMap;

use crate::{
    foundation::core::{Affine, NodeId, Point, Rect, Vec2},
    foundation::error::{NeurosceneError, NeurosceneResult},
    graph::model::GraphModel,
};

/// Gap configuration for the layered layout.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Spacing {
    /// Distance between adjacent layers along x.
    pub layer_gap: f64,
    /// Distance between adjacent nodes within a layer along y.
    pub node_gap: f64,
}

impl Spacing {
    pub fn new(layer_gap: f64, node_gap: f64) -> NeurosceneResult<Self> {
        let spacing = Self {
            layer_gap,
            node_gap,
        };
        spacing.validate()?;
        Ok(spacing)
    }

    pub fn validate(&self) -> NeurosceneResult<()> {
        if !(self.layer_gap > 0.0) {
            return Err(NeurosceneError::layout_spacing(format!(
                "layer_gap must be > 0, got {}",
                self.layer_gap
            )));
        }
        if !(self.node_gap > 0.0) {
            return Err(NeurosceneError::layout_spacing(format!(
                "node_gap must be > 0, got {}",
                self.node_gap
            )));
        }
        Ok(())
    }
}

/// Positions for every node of one model, derived data only.
///
/// Recomputing from the same topology and spacing reproduces the map
/// exactly. Edge endpoints are never stored; they are derived from node
/// positions via [`CoordinateMap::edge_anchors`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CoordinateMap {
    coords: BTreeMap<NodeId, Point>,
}

impl CoordinateMap {
    pub fn get(&self, id: NodeId) -> Option<Point> {
        self.coords.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Point)> + '_ {
        self.coords.iter().map(|(&id, &p)| (id, p))
    }

    /// Apply a uniform affine transform to every position. Relative spacing
    /// is preserved for any similarity transform (uniform scale + translate).
    pub fn transformed(&self, affine: Affine) -> Self {
        Self {
            coords: self
                .coords
                .iter()
                .map(|(&id, &p)| (id, affine * p))
                .collect(),
        }
    }

    /// Uniformly scale and center the whole diagram into `viewport`, keeping
    /// `margin` (a 0..1 shrink factor, e.g. 0.9) of the available space.
    pub fn fit_into(&self, viewport: Rect, margin: f64) -> Self {
        let bbox = self.bounding_box();
        if bbox.width() == 0.0 && bbox.height() == 0.0 {
            let shift = viewport.center() - bbox.center();
            return self.transformed(Affine::translate(shift));
        }

        let sx = if bbox.width() > 0.0 {
            viewport.width() / bbox.width()
        } else {
            f64::INFINITY
        };
        let sy = if bbox.height() > 0.0 {
            viewport.height() / bbox.height()
        } else {
            f64::INFINITY
        };
        let scale = sx.min(sy) * margin;

        // Scale about the diagram center, then move that center onto the
        // viewport center.
        let center = bbox.center();
        let affine = Affine::translate(viewport.center().to_vec2())
            * Affine::scale(scale)
            * Affine::translate(-center.to_vec2());
        self.transformed(affine)
    }

    /// Drawn endpoints for one edge: the source node's right-facing anchor
    /// and the target node's left-facing anchor.
    pub fn edge_anchors(
        &self,
        src: NodeId,
        dst: NodeId,
        node_radius: f64,
    ) -> NeurosceneResult<(Point, Point)> {
        let a = self.get(src).ok_or_else(|| {
            NeurosceneError::scene(format!("no coordinates for edge source {src}"))
        })?;
        let b = self.get(dst).ok_or_else(|| {
            NeurosceneError::scene(format!("no coordinates for edge target {dst}"))
        })?;
        Ok((a + Vec2::new(node_radius, 0.0), b - Vec2::new(node_radius, 0.0)))
    }

    pub fn bounding_box(&self) -> Rect {
        let mut points = self.coords.values();
        let Some(&first) = points.next() else {
            return Rect::ZERO;
        };
        let mut bbox = Rect::from_points(first, first);
        for &p in points {
            bbox = bbox.union_pt(p);
        }
        bbox
    }
}

/// Position every node of `model`: layer `i` at `x = i * layer_gap`, nodes
/// stacked along y at `node_gap` intervals, centered about y = 0.
///
/// Pure: no hidden counters, no timestamps; same inputs, same output.
#[tracing::instrument(skip(model))]
pub fn layout(model: &GraphModel, spacing: Spacing) -> NeurosceneResult<CoordinateMap> {
    spacing.validate()?;

    let mut coords = BTreeMap::new();
    for layer in model.layers() {
        let x = layer.index as f64 * spacing.layer_gap;
        let half_span = (layer.len() - 1) as f64 / 2.0;
        for (j, id) in layer.node_ids().enumerate() {
            let y = (j as f64 - half_span) * spacing.node_gap;
            coords.insert(id, Point::new(x, y));
        }
    }
    Ok(CoordinateMap { coords })
}
