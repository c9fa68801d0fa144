//! Scene Adapter: the narrow contract between the engine and whatever draws
//! and hit-tests volumes.
//!
//! # Invariants
//! - The adapter never mutates engine state; it only mirrors it via `sync`.
//! - `intersect` reflects the volume set as of the most recent `sync`.
//! - Hit-testing uses logical centers; animation poses are cosmetic.

mod adapter;
mod camera;
mod cpu;
mod renderer;

pub use adapter::SceneAdapter;
pub use camera::Camera;
pub use cpu::CpuSceneAdapter;
pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "splitcube-render v0.1.0"
}
