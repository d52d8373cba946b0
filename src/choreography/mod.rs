pub mod engine;
pub mod playback;
pub mod values;
