pub mod classifier;
pub mod windows;
