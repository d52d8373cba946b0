use crate::{
    choreography::engine::Timeline,
    choreography::playback::play_timeline,
    foundation::error::{NeurosceneError, NeurosceneResult},
    graph::model::GraphModel,
    layout::engine::{CoordinateMap, Spacing, layout},
    scene::stage::{Overlay, OverlayId, OverlayKind, Stage},
};

/// Scoped handle for one lesson section's ephemeral overlays.
///
/// Only [`SceneComposer::end_section`] can consume it, so every overlay
/// registered against a section is faded out when the section ends, no
/// matter how the section's script exits.
#[derive(Debug)]
pub struct SectionContext {
    name: String,
    overlays: Vec<OverlayId>,
}

impl SectionContext {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn overlays(&self) -> &[OverlayId] {
        &self.overlays
    }
}

/// Lesson lifecycle manager: builds the graph once, shares it across
/// strictly sequential sections, and tears it down once at the end.
///
/// The graph's visual state persists across section boundaries; only the
/// section's own overlays are removed by [`SceneComposer::end_section`].
pub struct SceneComposer<S: Stage> {
    stage: S,
    model: GraphModel,
    coords: CoordinateMap,
    next_overlay: u64,
    open_section: Option<String>,
}

impl<S: Stage> SceneComposer<S> {
    /// Build the persistent graph, lay it out, and show it on the stage.
    #[tracing::instrument(skip(stage))]
    pub fn new(mut stage: S, layer_sizes: &[usize], spacing: Spacing) -> NeurosceneResult<Self> {
        let model = GraphModel::build(layer_sizes)?;
        let coords = layout(&model, spacing)?;
        stage.show_graph(&model, &coords)?;
        Ok(Self {
            stage,
            model,
            coords,
            next_overlay: 0,
            open_section: None,
        })
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn coordinates(&self) -> &CoordinateMap {
        &self.coords
    }

    /// Open a section. Sections are strictly sequential: opening one while
    /// another is open is an error.
    pub fn begin_section(&mut self, name: &str) -> NeurosceneResult<SectionContext> {
        if let Some(open) = &self.open_section {
            return Err(NeurosceneError::scene(format!(
                "cannot begin section '{name}' while '{open}' is open"
            )));
        }
        tracing::debug!(section = name, "begin section");
        self.open_section = Some(name.to_string());
        Ok(SectionContext {
            name: name.to_string(),
            overlays: Vec::new(),
        })
    }

    /// Show an overlay and register it against the open section.
    pub fn add_overlay(
        &mut self,
        ctx: &mut SectionContext,
        kind: OverlayKind,
        text: impl Into<String>,
    ) -> NeurosceneResult<OverlayId> {
        self.check_open(&ctx.name)?;
        let id = OverlayId(self.next_overlay);
        self.next_overlay += 1;
        self.stage.show_overlay(&Overlay {
            id,
            kind,
            text: text.into(),
        })?;
        ctx.overlays.push(id);
        Ok(id)
    }

    /// Play a timeline against the shared model through the stage,
    /// fail-fast, committing each completed step's state to the model.
    pub fn play(&mut self, timeline: Timeline) -> NeurosceneResult<()> {
        let Self { stage, model, .. } = self;
        play_timeline(model, timeline, |step| stage.play_step(step))
    }

    /// Fade out every overlay the section registered. The graph and its
    /// current visual state persist to the next section.
    pub fn end_section(&mut self, ctx: SectionContext) -> NeurosceneResult<()> {
        self.check_open(&ctx.name)?;
        for id in &ctx.overlays {
            self.stage.fade_overlay(*id)?;
        }
        tracing::debug!(section = %ctx.name, overlays = ctx.overlays.len(), "end section");
        self.open_section = None;
        Ok(())
    }

    /// Remove the graph's rendered representation, ending the lesson. The
    /// stage is handed back for inspection or reuse.
    pub fn teardown_graph(mut self) -> NeurosceneResult<S> {
        if let Some(open) = &self.open_section {
            return Err(NeurosceneError::scene(format!(
                "cannot tear down the graph while section '{open}' is open"
            )));
        }
        self.stage.remove_graph()?;
        Ok(self.stage)
    }

    fn check_open(&self, name: &str) -> NeurosceneResult<()> {
        match &self.open_section {
            Some(open) if open == name => Ok(()),
            Some(open) => Err(NeurosceneError::scene(format!(
                "section '{name}' is not the open section ('{open}' is)"
            ))),
            None => Err(NeurosceneError::scene(format!(
                "section '{name}' is not open"
            ))),
        }
    }
}
