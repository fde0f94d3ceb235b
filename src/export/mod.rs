pub mod heatmap;
pub mod json;
