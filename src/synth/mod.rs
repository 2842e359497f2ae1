//! Buffer-to-buffer synthesis: transforms, band separation and the
//! wave-shaper curve.

pub mod distortion;
pub mod separate;
pub mod transform;
