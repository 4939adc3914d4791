//! Mesh export

#[cfg(feature = "stl-io")]
mod stl;
