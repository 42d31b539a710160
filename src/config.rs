// Configuration file, 1 unit = 1 scene unit (roughly one meter)
// This controls the initial generation parameter settings

// All size ranges are half-open: min inclusive, max exclusive

pub const INITIAL_SEED: u64 = 1512086461918454205;

// Building footprint (integer draws)
pub const BUILDING_MIN_WIDTH: u32 = 1;
pub const BUILDING_MAX_WIDTH: u32 = 4;
pub const BUILDING_MIN_DEPTH: u32 = 1;
pub const BUILDING_MAX_DEPTH: u32 = 4;

// Building height before distance falloff is applied
pub const BUILDING_MIN_HEIGHT: u32 = 5;
pub const BUILDING_MAX_HEIGHT: u32 = 20;

// Block size, counted in buildings
pub const CITY_BLOCK_MIN_WIDTH: u32 = 3;
pub const CITY_BLOCK_MAX_WIDTH: u32 = 5;
pub const CITY_BLOCK_MIN_DEPTH: u32 = 3;
pub const CITY_BLOCK_MAX_DEPTH: u32 = 4;

// City layout
pub const STREET_PADDING: f32 = 2.0;       // gap between consecutive blocks
pub const BUILDING_PADDING: f32 = 1.2;     // spacing factor between buildings in a block
pub const CITY_ORIGIN_X: f32 = 30.0;
pub const CITY_ORIGIN_Z: f32 = 30.0;
pub const CITY_GRID_WIDTH: u32 = 10;       // blocks along x
pub const CITY_GRID_DEPTH: u32 = 10;       // blocks along z

// Height falloff
pub const NEAR_RADIUS: f32 = 5.0;          // full height potential inside this radius
pub const FALLOFF_EPSILON: f32 = 0.01;     // keeps the origin away from a zero distance

// Scene naming
pub const CITY_ROOT_NAME: &str = "city";
pub const GROUND_NAME: &str = "ground";
pub const BUILDING_NAME_PREFIX: &str = "building_";
