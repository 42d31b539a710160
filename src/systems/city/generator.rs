use bevy::prelude::*;
use rand::Rng;
use rand_distr::Distribution;

use crate::config::CITY_ROOT_NAME;
use super::block::{BlockSpec, generate_block};
use super::building::{BuildingPlacer, BuildingSampler};
use super::error::GenerationError;
use super::scene::Scene;
use super::{CityConfig, Coordinate2D};

/// Running min/max of every ground position the city loop reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CityExtentBounds {
    min: Coordinate2D,
    max: Coordinate2D,
}

impl CityExtentBounds {
    pub fn new(origin: Coordinate2D) -> Self {
        Self { min: origin, max: origin }
    }

    pub fn include(&mut self, point: Coordinate2D) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn include_block(&mut self, block: &BlockSpec) {
        for corner in [block.near_corner(), block.far_corner()].into_iter().flatten() {
            self.include(corner);
        }
    }

    pub fn ground(&self) -> GroundPlane {
        GroundPlane { near: self.max, far: self.min }
    }
}

/// Ground rectangle between its most positive and most negative corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPlane {
    pub near: Coordinate2D,
    pub far: Coordinate2D,
}

impl GroundPlane {
    pub fn width(&self) -> f32 {
        (self.near.x - self.far.x).abs()
    }

    pub fn depth(&self) -> f32 {
        (self.near.y - self.far.y).abs()
    }

    pub fn center(&self) -> Coordinate2D {
        (self.near + self.far) / 2.0
    }
}

/// What a run produced, independent of the scene backend.
#[derive(Debug, Clone, PartialEq)]
pub struct CityLayout {
    pub blocks: Vec<BlockSpec>,
    pub ground: GroundPlane,
    pub buildings: u32,
    pub skipped: u32,
    pub next_id: u32,
}

#[derive(Debug, Clone)]
pub struct CityReport<H> {
    pub root: H,
    pub ground: H,
    pub layout: CityLayout,
}

/// Generates the full city into `scene`: the root group, every block column
/// by column and finally the ground plane covering all of it.
pub fn generate_city<S, R>(scene: &mut S, rng: &mut R, config: &CityConfig) -> Result<CityReport<S::Handle>, GenerationError>
where
    S: Scene + ?Sized,
    R: Rng + ?Sized,
{
    // nothing touches the scene until the config is known to be sane
    config.validate()?;
    let block_width = config.block_width.uniform("block width")?;
    let block_depth = config.block_depth.uniform("block depth")?;
    let sampler = BuildingSampler::new(&config.building)?;

    info!(
        "Generating city: {}x{} blocks from ({}, {})",
        config.block_grid_width, config.block_grid_depth, config.origin.x, config.origin.y
    );

    let root = scene
        .create_empty_group(CITY_ROOT_NAME)
        .map_err(|source| GenerationError::Scene { stage: "city root group", source })?;
    let placer = BuildingPlacer::new(sampler, root);

    let street = config.street_padding;
    let mut current = config.origin;
    let mut bounds = CityExtentBounds::new(config.origin);
    let mut blocks = Vec::with_capacity((config.block_grid_width * config.block_grid_depth) as usize);
    let mut id = 0;
    let mut skipped = 0;

    for _ in 0..config.block_grid_width {
        let width = block_width.sample(rng);

        for _ in 0..config.block_grid_depth {
            let depth = block_depth.sample(rng);
            let block = BlockSpec {
                origin: current,
                width_count: width,
                depth_count: depth,
                building_padding: config.building_padding,
            };

            let outcome = generate_block(scene, rng, &placer, &block, id, config.on_scene_error)?;
            id = outcome.next_id;
            skipped += outcome.skipped;

            bounds.include_block(&block);
            bounds.include(Vec2::new(
                current.x - (width as f32 + street),
                current.y - (depth as f32 + street),
            ));
            current.y -= depth as f32 + street;
            blocks.push(block);
        }

        current.x -= width as f32 + street;
        current.y = config.origin.y;
    }

    let ground = bounds.ground();
    debug!("Ground from ({}, {}) to ({}, {})", ground.near.x, ground.near.y, ground.far.x, ground.far.y);
    let ground_handle = create_ground(scene, root, &ground)
        .map_err(|source| GenerationError::Scene { stage: "ground plane", source })?;

    let layout = CityLayout {
        blocks,
        ground,
        buildings: id - skipped,
        skipped,
        next_id: id,
    };
    info!(
        "City generated: {} buildings in {} blocks, ground {:.1} x {:.1}",
        layout.buildings,
        layout.blocks.len(),
        ground.width(),
        ground.depth()
    );
    if skipped > 0 {
        warn!("{skipped} buildings were rejected by the scene and skipped");
    }

    Ok(CityReport { root, ground: ground_handle, layout })
}

fn create_ground<S: Scene + ?Sized>(scene: &mut S, root: S::Handle, ground: &GroundPlane) -> Result<S::Handle, super::error::SceneError> {
    let plane = scene.create_plane(ground.width(), ground.depth())?;
    scene.group_under(plane, root)?;
    let center = ground.center();
    scene.translate(plane, Vec3::new(center.x, 0.0, center.y))?;
    Ok(plane)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::city::SizeRange;
    use crate::systems::city::buffer::{Primitive, SceneBuffer};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn bounds_start_at_origin() {
        let bounds = CityExtentBounds::new(Vec2::new(3.0, 4.0));
        let ground = bounds.ground();
        assert_eq!(ground.width(), 0.0);
        assert_eq!(ground.depth(), 0.0);
        assert_eq!(ground.center(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn ground_tracks_street_steps() {
        // fixed 1x1 blocks, no building scaling, street 2 -> each block steps 3
        let config = CityConfig {
            origin: Vec2::ZERO,
            block_grid_width: 2,
            block_grid_depth: 3,
            street_padding: 2.0,
            building_padding: 1.0,
            block_width: SizeRange::new(1, 2),
            block_depth: SizeRange::new(1, 2),
            ..default()
        };
        let mut scene = SceneBuffer::default();
        let mut rng = StdRng::seed_from_u64(1);

        let report = generate_city(&mut scene, &mut rng, &config).unwrap();

        assert_eq!(report.layout.ground.near, Vec2::ZERO);
        assert_eq!(report.layout.ground.far, Vec2::new(-6.0, -9.0));
        assert_eq!(report.layout.blocks.len(), 6);
        assert_eq!(report.layout.buildings, 6);

        let ground = scene.get(report.ground).unwrap();
        assert_eq!(ground.parent, Some(report.root));
        assert_eq!(ground.primitive, Primitive::Plane { width: 6.0, depth: 9.0 });
        assert_eq!(ground.translation, Vec3::new(-3.0, 0.0, -4.5));
    }

    #[test]
    fn block_origins_reset_each_column() {
        let config = CityConfig {
            origin: Vec2::new(10.0, 10.0),
            block_grid_width: 2,
            block_grid_depth: 2,
            block_width: SizeRange::new(3, 4),
            block_depth: SizeRange::new(3, 4),
            ..default()
        };
        let mut scene = SceneBuffer::default();
        let mut rng = StdRng::seed_from_u64(9);

        let layout = generate_city(&mut scene, &mut rng, &config).unwrap().layout;

        let origins: Vec<Vec2> = layout.blocks.iter().map(|b| b.origin).collect();
        assert_eq!(
            origins,
            vec![
                Vec2::new(10.0, 10.0),
                Vec2::new(10.0, 5.0),
                Vec2::new(5.0, 10.0),
                Vec2::new(5.0, 5.0),
            ]
        );
    }
}
