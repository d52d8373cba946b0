pub type NeurosceneResult<T> = Result<T, NeurosceneError>;

#[derive(thiserror::Error, Debug)]
pub enum NeurosceneError {
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error("layout spacing error: {0}")]
    LayoutSpacing(String),

    #[error("playback aborted at step {step_index}: {reason}")]
    PlaybackAborted { step_index: usize, reason: String },

    #[error("scene error: {0}")]
    Scene(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NeurosceneError {
    pub fn invalid_topology(msg: impl Into<String>) -> Self {
        Self::InvalidTopology(msg.into())
    }

    pub fn layout_spacing(msg: impl Into<String>) -> Self {
        Self::LayoutSpacing(msg.into())
    }

    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene(msg.into())
    }

    pub fn playback_aborted(step_index: usize, reason: impl Into<String>) -> Self {
        Self::PlaybackAborted {
            step_index,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            NeurosceneError::invalid_topology("x")
                .to_string()
                .contains("invalid topology:")
        );
        assert!(
            NeurosceneError::layout_spacing("x")
                .to_string()
                .contains("layout spacing error:")
        );
        assert!(
            NeurosceneError::scene("x")
                .to_string()
                .contains("scene error:")
        );
    }

    #[test]
    fn playback_aborted_reports_step_index() {
        let err = NeurosceneError::playback_aborted(3, "stage refused");
        let s = err.to_string();
        assert!(s.contains("step 3"));
        assert!(s.contains("stage refused"));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = NeurosceneError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
