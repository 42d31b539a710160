use bevy::prelude::*;
use rand::Rng;

use super::Coordinate2D;
use super::building::BuildingPlacer;
use super::error::{GenerationError, OnSceneError};
use super::scene::Scene;

/// A grid of buildings growing from `origin` towards negative x and z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockSpec {
    pub origin: Coordinate2D,
    pub width_count: u32,
    pub depth_count: u32,
    pub building_padding: f32,
}

impl BlockSpec {
    pub fn building_count(&self) -> u32 {
        self.width_count * self.depth_count
    }

    pub fn cell_position(&self, ix: u32, iz: u32) -> Coordinate2D {
        Vec2::new(
            self.building_padding * (self.origin.x - ix as f32),
            self.building_padding * (self.origin.y - iz as f32),
        )
    }

    /// Most positive building position, `None` for an empty block.
    pub fn near_corner(&self) -> Option<Coordinate2D> {
        (self.building_count() > 0).then(|| self.cell_position(0, 0))
    }

    /// Most negative building position, `None` for an empty block.
    pub fn far_corner(&self) -> Option<Coordinate2D> {
        (self.building_count() > 0).then(|| self.cell_position(self.width_count - 1, self.depth_count - 1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockOutcome {
    /// first id not consumed by this block
    pub next_id: u32,
    pub skipped: u32,
}

/// Places one building per cell, x-major. Every cell consumes an id, skipped
/// cells included, so `next_id == start_id + building_count`.
pub fn generate_block<S, R>(
    scene: &mut S,
    rng: &mut R,
    placer: &BuildingPlacer<S::Handle>,
    spec: &BlockSpec,
    start_id: u32,
    on_error: OnSceneError,
) -> Result<BlockOutcome, GenerationError>
where
    S: Scene + ?Sized,
    R: Rng + ?Sized,
{
    let mut id = start_id;
    let mut skipped = 0;

    for ix in 0..spec.width_count {
        for iz in 0..spec.depth_count {
            match placer.place(scene, rng, id, spec.cell_position(ix, iz)) {
                Ok(_) => {}
                Err(err @ GenerationError::SceneWrite { .. }) if on_error == OnSceneError::Skip => {
                    warn!("Skipping cell ({ix}, {iz}): {err}");
                    skipped += 1;
                }
                Err(err) => return Err(err),
            }
            id += 1;
        }
    }

    Ok(BlockOutcome { next_id: id, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::city::CityConfig;
    use crate::systems::city::buffer::SceneBuffer;
    use crate::systems::city::building::BuildingSampler;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn placer(scene: &mut SceneBuffer) -> BuildingPlacer<crate::systems::city::buffer::ObjectId> {
        let root = scene.create_empty_group("city").unwrap();
        BuildingPlacer::new(BuildingSampler::new(&CityConfig::default().building).unwrap(), root)
    }

    #[test]
    fn corners_follow_padding() {
        let block = BlockSpec { origin: Vec2::new(10.0, 5.0), width_count: 3, depth_count: 2, building_padding: 2.0 };
        assert_eq!(block.near_corner(), Some(Vec2::new(20.0, 10.0)));
        assert_eq!(block.far_corner(), Some(Vec2::new(16.0, 8.0)));

        let empty = BlockSpec { width_count: 0, ..block };
        assert_eq!(empty.far_corner(), None);
    }

    #[test]
    fn returns_next_free_id() {
        let mut scene = SceneBuffer::default();
        let placer = placer(&mut scene);
        let mut rng = StdRng::seed_from_u64(11);
        let block = BlockSpec { origin: Vec2::ZERO, width_count: 3, depth_count: 4, building_padding: 1.2 };

        let outcome = generate_block(&mut scene, &mut rng, &placer, &block, 7, OnSceneError::Abort).unwrap();

        assert_eq!(outcome, BlockOutcome { next_id: 19, skipped: 0 });
        assert_eq!(scene.boxes().count(), 12);
        assert!(scene.find("building_7").is_some());
        assert!(scene.find("building_18").is_some());
        assert!(scene.find("building_19").is_none());
    }

    #[test]
    fn walks_x_major_towards_negative_axes() {
        let mut scene = SceneBuffer::default();
        let placer = placer(&mut scene);
        let mut rng = StdRng::seed_from_u64(5);
        let block = BlockSpec { origin: Vec2::new(1.0, 1.0), width_count: 2, depth_count: 2, building_padding: 1.0 };

        generate_block(&mut scene, &mut rng, &placer, &block, 0, OnSceneError::Abort).unwrap();

        let positions: Vec<(f32, f32)> = scene.boxes().map(|b| (b.translation.x, b.translation.z)).collect();
        assert_eq!(positions, vec![(1.0, 1.0), (1.0, 0.0), (0.0, 1.0), (0.0, 0.0)]);
    }
}
