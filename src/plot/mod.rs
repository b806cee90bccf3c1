/// Raster plots encoded as PNG.
///
/// Renderers are pure functions over already-loaded tables or
/// already-computed statistics; none of them touch the dataset store.

pub mod canvas;
pub mod cluster;
pub mod histogram;
