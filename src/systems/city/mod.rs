// this is the entry point for the city generation plugin
use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::Uniform;

use crate::config::*;
use crate::systems::ui::GizmosVisible;

pub mod bevy_scene;
pub mod block;
pub mod buffer;
pub mod building;
pub mod error;
pub mod generator;
pub mod scene;

use bevy_scene::{BevyScene, CityObject};
use building::BuildingParams;
use error::{ConfigError, OnSceneError};
use generator::{CityLayout, generate_city};
use scene::clear_scene;

// ground-plane position, y carries world z
pub type Coordinate2D = Vec2;

// resources
#[derive(Resource)]
pub struct Seed(pub u64);

/// Outcome of the last run, shown in the side panel.
#[derive(Resource, Default)]
pub struct CityStats {
    pub layout: Option<CityLayout>,
    pub last_error: Option<String>,
}

// Event for regeneration
#[derive(Event)]
pub struct RegenerateEvent {
    pub seed: u64,
}

// Event for wiping the city
#[derive(Event)]
pub struct ClearEvent;

/// Half-open integer range, `min` inclusive and `max` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeRange {
    pub min: u32,
    pub max: u32,
}

impl SizeRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..self.max).contains(&value)
    }

    pub fn is_empty(&self) -> bool {
        self.min >= self.max
    }

    pub fn uniform(&self, name: &'static str) -> Result<Uniform<u32>, ConfigError> {
        Uniform::new(self.min, self.max).map_err(|_| ConfigError::EmptyRange { name, min: self.min, max: self.max })
    }
}

// city generation parameters
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct CityConfig {
    pub street_padding: f32,
    pub origin: Coordinate2D,
    pub block_grid_width: u32,
    pub block_grid_depth: u32,
    pub building_padding: f32,
    // block size in buildings
    pub block_width: SizeRange,
    pub block_depth: SizeRange,
    pub building: BuildingParams,
    pub on_scene_error: OnSceneError,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            street_padding: STREET_PADDING,
            origin: Vec2::new(CITY_ORIGIN_X, CITY_ORIGIN_Z),
            block_grid_width: CITY_GRID_WIDTH,
            block_grid_depth: CITY_GRID_DEPTH,
            building_padding: BUILDING_PADDING,
            block_width: SizeRange::new(CITY_BLOCK_MIN_WIDTH, CITY_BLOCK_MAX_WIDTH),
            block_depth: SizeRange::new(CITY_BLOCK_MIN_DEPTH, CITY_BLOCK_MAX_DEPTH),
            building: BuildingParams {
                width: SizeRange::new(BUILDING_MIN_WIDTH, BUILDING_MAX_WIDTH),
                depth: SizeRange::new(BUILDING_MIN_DEPTH, BUILDING_MAX_DEPTH),
                height: SizeRange::new(BUILDING_MIN_HEIGHT, BUILDING_MAX_HEIGHT),
                near_radius: NEAR_RADIUS,
            },
            on_scene_error: OnSceneError::default(),
        }
    }
}

impl CityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.building_padding.is_finite() && self.building_padding > 0.0) {
            return Err(ConfigError::NonPositive { name: "building padding", value: self.building_padding });
        }
        // zero street padding is fine, blocks just touch
        if !(self.street_padding.is_finite() && self.street_padding >= 0.0) {
            return Err(ConfigError::Negative { name: "street padding", value: self.street_padding });
        }
        if !(self.building.near_radius.is_finite() && self.building.near_radius > 0.0) {
            return Err(ConfigError::NonPositive { name: "near radius", value: self.building.near_radius });
        }

        let ranges = [
            ("block width", self.block_width),
            ("block depth", self.block_depth),
            ("building width", self.building.width),
            ("building depth", self.building.depth),
            ("building height", self.building.height),
        ];
        for (name, range) in ranges {
            if range.is_empty() {
                return Err(ConfigError::EmptyRange { name, min: range.min, max: range.max });
            }
        }

        // a zero sized draw would become a flat box
        for &(name, range) in &ranges[2..] {
            if range.min == 0 {
                return Err(ConfigError::NonPositive { name, value: 0.0 });
            }
        }

        Ok(())
    }
}

// main plugin for generation
pub struct CityGenerationPlugin;

impl Plugin for CityGenerationPlugin {
    fn build(&self, app: &mut App) {
        app
            .insert_resource(Seed(INITIAL_SEED))
            .insert_resource(CityConfig::default())
            .init_resource::<CityStats>()

            .add_event::<RegenerateEvent>()
            .add_event::<ClearEvent>()

            // clear + generate once on start, same as any later regeneration
            .add_systems(Startup, request_initial_city)
            .add_systems(Update, (handle_regeneration, handle_clear, debug_gizmos));
    }
}

fn request_initial_city(
    seed: Res<Seed>,
    mut regen_events: EventWriter<RegenerateEvent>,
) {
    regen_events.write(RegenerateEvent { seed: seed.0 });
}

pub fn handle_regeneration(
    mut commands: Commands,
    mut events: EventReader<RegenerateEvent>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut seed: ResMut<Seed>,
    config: Res<CityConfig>,
    mut stats: ResMut<CityStats>,
    query: Query<Entity, With<CityObject>>,
) {
    // several requests in one frame collapse into the last one
    let Some(requested) = events.read().last().map(|event| event.seed) else {
        return;
    };
    seed.0 = requested;

    let mut scene = BevyScene::new(&mut commands, &mut meshes, &mut materials, query.iter());
    clear_scene(&mut scene);

    let mut rng = StdRng::seed_from_u64(requested);
    match generate_city(&mut scene, &mut rng, &config) {
        Ok(report) => {
            stats.layout = Some(report.layout);
            stats.last_error = None;
        }
        Err(err) => {
            error!("City generation with seed {requested} failed: {err}");
            // drop the half-built city instead of leaving a broken hierarchy
            clear_scene(&mut scene);
            stats.layout = None;
            stats.last_error = Some(err.to_string());
        }
    }
}

pub fn handle_clear(
    mut commands: Commands,
    mut events: EventReader<ClearEvent>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut stats: ResMut<CityStats>,
    query: Query<Entity, With<CityObject>>,
) {
    if events.read().count() == 0 {
        return;
    }

    let mut scene = BevyScene::new(&mut commands, &mut meshes, &mut materials, query.iter());
    clear_scene(&mut scene);
    info!("City cleared");

    stats.layout = None;
    stats.last_error = None;
}

// block footprints and ground extent, drawn slightly above the ground
fn debug_gizmos(
    mut gizmos: Gizmos,
    stats: Res<CityStats>,
    gizmos_visible: Option<Res<GizmosVisible>>,
) {
    if !gizmos_visible.is_some_and(|visible| visible.0) {
        return;
    }
    let Some(layout) = &stats.layout else {
        return;
    };

    for block in &layout.blocks {
        let (Some(near), Some(far)) = (block.near_corner(), block.far_corner()) else {
            continue;
        };
        // building positions are cell centers, pad out by half a cell
        let half = Vec2::splat(block.building_padding * 0.5);
        outline(&mut gizmos, near + half, far - half, 0.02, Color::srgba(0.24, 0.55, 0.31, 0.9));
    }

    outline(&mut gizmos, layout.ground.near, layout.ground.far, 0.01, Color::srgba(0.71, 0.24, 0.24, 0.7));
}

fn outline(gizmos: &mut Gizmos, near: Vec2, far: Vec2, y: f32, color: Color) {
    let corners = [
        Vec3::new(near.x, y, near.y),
        Vec3::new(far.x, y, near.y),
        Vec3::new(far.x, y, far.y),
        Vec3::new(near.x, y, far.y),
    ];
    for i in 0..corners.len() {
        gizmos.line(corners[i], corners[(i + 1) % corners.len()], color);
    }
}
