use bevy::prelude::*;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::config::{BUILDING_NAME_PREFIX, FALLOFF_EPSILON};
use super::error::{ConfigError, GenerationError, SceneError};
use super::scene::Scene;
use super::{Coordinate2D, SizeRange};

/// Size ranges and height falloff radius for single buildings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingParams {
    pub width: SizeRange,
    pub depth: SizeRange,
    pub height: SizeRange,
    pub near_radius: f32,
}

/// One building as it was handed to the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingSpec {
    pub id: u32,
    pub position: Coordinate2D,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    pub falloff: f32,
}

impl BuildingSpec {
    pub fn name(&self) -> String {
        format!("{BUILDING_NAME_PREFIX}{}", self.id)
    }

    // boxes are centered on their origin, lift by half height to sit on y = 0
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.position.x, self.height / 2.0, self.position.y)
    }
}

/// Distance from the city center, never zero.
pub fn distance_from_origin(position: Coordinate2D) -> f32 {
    position.length() + FALLOFF_EPSILON
}

/// Height multiplier in (0, 1]. Anything within `radius` of the origin keeps
/// its full height, beyond that height shrinks with 1 / distance.
pub fn falloff(distance: f32, radius: f32) -> f32 {
    (radius / distance).min(1.0)
}

/// Validated distributions for building dimensions.
#[derive(Debug, Clone)]
pub struct BuildingSampler {
    width: Uniform<u32>,
    depth: Uniform<u32>,
    height: Uniform<u32>,
    near_radius: f32,
}

impl BuildingSampler {
    pub fn new(params: &BuildingParams) -> Result<Self, ConfigError> {
        if !(params.near_radius.is_finite() && params.near_radius > 0.0) {
            return Err(ConfigError::NonPositive { name: "near radius", value: params.near_radius });
        }

        Ok(Self {
            width: params.width.uniform("building width")?,
            depth: params.depth.uniform("building depth")?,
            height: params.height.uniform("building height")?,
            near_radius: params.near_radius,
        })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, id: u32, position: Coordinate2D) -> BuildingSpec {
        let falloff = falloff(distance_from_origin(position), self.near_radius);

        // draw order: height, width, depth
        let height = self.height.sample(rng) as f32 * falloff;
        let width = self.width.sample(rng) as f32;
        let depth = self.depth.sample(rng) as f32;

        BuildingSpec { id, position, width, depth, height, falloff }
    }
}

/// Emits buildings as boxes parented under the city root.
#[derive(Debug, Clone)]
pub struct BuildingPlacer<H> {
    sampler: BuildingSampler,
    root: H,
}

impl<H: Copy> BuildingPlacer<H> {
    pub fn new(sampler: BuildingSampler, root: H) -> Self {
        Self { sampler, root }
    }

    pub fn root(&self) -> H {
        self.root
    }

    pub fn place<S, R>(&self, scene: &mut S, rng: &mut R, id: u32, position: Coordinate2D) -> Result<BuildingSpec, GenerationError>
    where
        S: Scene<Handle = H> + ?Sized,
        R: Rng + ?Sized,
    {
        let spec = self.sampler.sample(rng, id, position);

        match emit(scene, self.root, &spec) {
            Ok(()) => Ok(spec),
            Err(source) => Err(GenerationError::SceneWrite { spec, source }),
        }
    }
}

fn emit<S: Scene + ?Sized>(scene: &mut S, root: S::Handle, spec: &BuildingSpec) -> Result<(), SceneError> {
    let handle = scene.create_box(spec.width, spec.depth, spec.height, &spec.name())?;
    scene.group_under(handle, root)?;
    scene.translate(handle, spec.translation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::city::buffer::{Primitive, SceneBuffer};
    use crate::systems::city::CityConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn params() -> BuildingParams {
        CityConfig::default().building
    }

    #[test]
    fn origin_gets_full_falloff() {
        let distance = distance_from_origin(Vec2::ZERO);
        assert!(distance > 0.0);
        assert_eq!(falloff(distance, 5.0), 1.0);
    }

    #[test]
    fn falloff_shrinks_with_distance() {
        let near = falloff(distance_from_origin(Vec2::new(3.0, 0.0)), 5.0);
        let far = falloff(distance_from_origin(Vec2::new(30.0, -40.0)), 5.0);
        assert_eq!(near, 1.0);
        assert!(far > 0.0 && far < 0.11);
    }

    #[test]
    fn draws_stay_inside_configured_ranges() {
        let sampler = BuildingSampler::new(&params()).unwrap();
        let p = params();
        let mut rng = StdRng::seed_from_u64(42);

        for id in 0..500 {
            let position = Vec2::new(rng.random_range(-60.0..60.0), rng.random_range(-60.0..60.0));
            let spec = sampler.sample(&mut rng, id, position);

            assert!(p.width.contains(spec.width as u32));
            assert!(p.depth.contains(spec.depth as u32));
            assert!(spec.height > 0.0);
            assert!(spec.height < p.height.max as f32);
            assert!(spec.falloff > 0.0 && spec.falloff <= 1.0);
        }
    }

    #[test]
    fn empty_height_range_is_rejected() {
        let mut p = params();
        p.height = SizeRange::new(8, 8);
        let err = BuildingSampler::new(&p).unwrap_err();
        assert_eq!(err, ConfigError::EmptyRange { name: "building height", min: 8, max: 8 });
    }

    #[test]
    fn zero_radius_is_rejected() {
        let mut p = params();
        p.near_radius = 0.0;
        assert!(matches!(BuildingSampler::new(&p), Err(ConfigError::NonPositive { .. })));
    }

    #[test]
    fn placed_box_sits_on_the_ground_under_root() {
        let mut scene = SceneBuffer::default();
        let root = scene.create_empty_group("city").unwrap();
        let placer = BuildingPlacer::new(BuildingSampler::new(&params()).unwrap(), root);
        let mut rng = StdRng::seed_from_u64(3);

        let spec = placer.place(&mut scene, &mut rng, 17, Vec2::new(2.0, -1.0)).unwrap();

        let id = scene.find("building_17").unwrap();
        let object = scene.get(id).unwrap();
        assert_eq!(object.parent, Some(root));
        assert_eq!(object.translation, Vec3::new(2.0, spec.height / 2.0, -1.0));
        assert_eq!(
            object.primitive,
            Primitive::Box { width: spec.width, depth: spec.depth, height: spec.height }
        );
    }
}
