// abstract scene the generators write into
// backends: SceneBuffer (in memory) and BevyScene (ecs entities)

use std::fmt::Debug;

use bevy::prelude::*;

use super::error::SceneError;

/// Primitive creation, grouping and transforms, the only host operations the
/// generators rely on. Boxes and planes are created centered on their local
/// origin, so callers translate them into place afterwards.
pub trait Scene {
    type Handle: Copy + Debug + PartialEq;

    fn create_box(&mut self, width: f32, depth: f32, height: f32, name: &str) -> Result<Self::Handle, SceneError>;

    fn create_plane(&mut self, width: f32, depth: f32) -> Result<Self::Handle, SceneError>;

    fn group_under(&mut self, child: Self::Handle, parent: Self::Handle) -> Result<(), SceneError>;

    fn translate(&mut self, handle: Self::Handle, position: Vec3) -> Result<(), SceneError>;

    fn create_empty_group(&mut self, name: &str) -> Result<Self::Handle, SceneError>;

    fn select_all(&mut self);

    fn delete_selected(&mut self);
}

/// Removes everything currently in the scene.
pub fn clear_scene<S: Scene + ?Sized>(scene: &mut S) {
    scene.select_all();
    scene.delete_selected();
}

// shared by both backends
pub(crate) fn check_box_dimensions(name: &str, width: f32, depth: f32, height: f32) -> Result<(), SceneError> {
    let valid = [width, depth, height].iter().all(|v| v.is_finite() && *v > 0.0);
    if valid {
        Ok(())
    } else {
        Err(SceneError::InvalidDimensions { name: name.to_string(), width, depth, height })
    }
}

// planes may be zero sized, an empty city still gets its (degenerate) ground
pub(crate) fn check_plane_dimensions(width: f32, depth: f32) -> Result<(), SceneError> {
    let valid = [width, depth].iter().all(|v| v.is_finite() && *v >= 0.0);
    if valid {
        Ok(())
    } else {
        Err(SceneError::InvalidDimensions { name: "plane".to_string(), width, depth, height: 0.0 })
    }
}
