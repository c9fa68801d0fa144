use splitcube_kernel::VolumeSet;

use crate::camera::Camera;

/// Anything that turns the active volume set into output.
///
/// Renderers read volumes and never mutate them; the engine owns the truth.
pub trait Renderer {
    type Output;

    fn render(&self, volumes: &VolumeSet, camera: &Camera) -> Self::Output;
}

/// Human-readable dump of the volume set, for the CLI and for logs.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Stop listing individual volumes after this many lines.
    pub max_lines: Option<usize>,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_lines(max_lines: usize) -> Self {
        Self {
            max_lines: Some(max_lines),
        }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, volumes: &VolumeSet, camera: &Camera) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== Volumes: {} ===\n", volumes.len()));

        let histogram = volumes
            .generation_histogram()
            .iter()
            .enumerate()
            .map(|(g, n)| format!("g{g}={n}"))
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&format!("Generations: {histogram}\n"));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.target.x,
            camera.target.y,
            camera.target.z,
            camera.fov.to_degrees()
        ));

        let limit = self.max_lines.unwrap_or(usize::MAX);
        for v in volumes.iter().take(limit) {
            let c = v.rendered_center();
            out.push_str(&format!(
                "  [{}] gen={} size={:.3} pos=({:.2}, {:.2}, {:.2}) hue={:.3}\n",
                v.id, v.generation, v.size, c.x, c.y, c.z, v.hue
            ));
        }
        if volumes.len() > limit {
            out.push_str(&format!("  ... {} more\n", volumes.len() - limit));
        }

        out
    }
}
