use splitcube_common::{Ray, VolumeId};
use splitcube_kernel::{Volume, VolumePose};

/// Capabilities the engine needs from a scene backend.
///
/// Implementors own the camera and the visual representation of volumes.
/// They receive incremental changes and answer ray queries; they hold no
/// subdivision logic.
pub trait SceneAdapter {
    /// Nearest registered volume hit by `ray`, if any.
    fn intersect(&self, ray: &Ray) -> Option<VolumeId>;

    /// Register `added` and drop `removed`.
    fn sync(&mut self, added: &[Volume], removed: &[VolumeId]);

    /// Convert a pointer position in screen pixels into a world-space ray.
    fn project_pointer(&self, screen_x: f32, screen_y: f32) -> Ray;

    /// Receive the poses produced by an animation tick.
    fn apply_poses(&mut self, _poses: &[VolumePose]) {}
}
