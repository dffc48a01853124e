pub const G: f64 = 6.67259e-11; // Gravitational constant (m³/kg/s²)

// Math
pub const PI: f64 = std::f64::consts::PI;
pub const TWO_PI: f64 = 2.0 * PI;

// Scenario defaults
pub const DEFAULT_NUMBER_OF_PLANETS: usize = 2;
pub const DEFAULT_WORLD_SIZE: f64 = 22_400.0; // world units per side
pub const DEFAULT_GRID_UNIT: f64 = 16.0; // spacing between terrain vertices
pub const DEFAULT_RESPAWN_TIME_LIMIT_MS: f64 = 4000.0;
pub const DEFAULT_STAR_MASS: f64 = 1.963e15;
pub const DEFAULT_STAR_DENSITY: f64 = 0.0000125;
pub const BASE_PLANET_DENSITY: f64 = 0.00000921; // divided by the system scale factor
pub const DEFAULT_LOWER_ORBITAL_RADII_SCALE: f64 = 8.0;
pub const DEFAULT_LOWER_PLANETARY_MASS_SCALE: f64 = 0.01;
pub const DEFAULT_UPPER_PLANETARY_MASS_SCALE: f64 = 0.25;
pub const DEFAULT_TERRAIN_SUB_COUNT: u32 = 300;
pub const DEFAULT_TERRAIN_SCALE_FACTOR: f64 = 256.0;
pub const DEFAULT_TIME_SCALE_FACTOR: f64 = 1000.0;

// Craft defaults
pub const DEFAULT_CRAFT_MAX_ACCELERATION: f64 = 50.0;
pub const DEFAULT_CRAFT_MAX_ANGULAR_VELOCITY: f64 = 0.15; // rad/s per turn impulse
pub const DEFAULT_CRAFT_ANGULAR_DAMPING: f64 = 0.03; // 1/s
pub const DEFAULT_CRAFT_SPAWN_DIVISOR: f64 = 2.1; // spawn at world_size_x / 2.1
