pub mod composer;
pub mod stage;
