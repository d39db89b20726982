pub mod alerts;
pub mod detector;
pub mod prospect;
pub mod scoring;
