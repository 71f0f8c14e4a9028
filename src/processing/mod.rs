pub mod align;
pub mod binning;
pub mod boxplot;
pub mod downsampling;
pub mod metrics;
pub mod statistics;
