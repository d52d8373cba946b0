use crate::{
    choreography::engine::{Step, Timeline},
    foundation::error::{NeurosceneError, NeurosceneResult},
    graph::model::GraphModel,
};

/// Play a timeline against `model`, strictly in step order.
///
/// `play` hands each step to the rendering collaborator and reports whether
/// it completed. On success the step's state change is committed to the
/// model; on failure playback stops immediately with `PlaybackAborted`, the
/// failing step uncommitted and the rest of the timeline abandoned. No
/// retries here; retry policy belongs to the caller.
pub fn play_timeline<F>(
    model: &mut GraphModel,
    timeline: Timeline,
    mut play: F,
) -> NeurosceneResult<()>
where
    F: FnMut(&Step) -> NeurosceneResult<()>,
{
    for (index, step) in timeline.into_steps().into_iter().enumerate() {
        if let Err(err) = play(&step) {
            return Err(NeurosceneError::playback_aborted(index, err.to_string()));
        }
        model.apply_step(&step)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choreography::engine::ChoreographyEngine;
    use crate::foundation::core::{NodeId, NodeState};

    #[test]
    fn plays_all_steps_and_commits_state() {
        let mut model = GraphModel::build(&[2, 3]).unwrap();
        let timeline = ChoreographyEngine::seeded(1).run_forward(&model);
        let mut played = 0;
        play_timeline(&mut model, timeline, |_| {
            played += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(played, 3);
        assert_eq!(
            model.node(NodeId::new(1, 0)).unwrap().state,
            NodeState::Output
        );
    }

    #[test]
    fn abort_reports_step_index_and_skips_commit() {
        let mut model = GraphModel::build(&[2, 3]).unwrap();
        let timeline = ChoreographyEngine::seeded(1).run_forward(&model);

        let mut calls = 0;
        let err = play_timeline(&mut model, timeline, |_| {
            calls += 1;
            if calls == 2 {
                Err(NeurosceneError::scene("stage lost the element"))
            } else {
                Ok(())
            }
        })
        .unwrap_err();

        match err {
            NeurosceneError::PlaybackAborted { step_index, .. } => assert_eq!(step_index, 1),
            other => panic!("unexpected error: {other}"),
        }
        // Step 0 committed, failing step 1 and everything after it did not.
        assert_eq!(calls, 2);
        assert_eq!(
            model.node(NodeId::new(0, 0)).unwrap().state,
            NodeState::Active
        );
        assert_eq!(
            model.node(NodeId::new(1, 0)).unwrap().state,
            NodeState::Default
        );
    }
}
