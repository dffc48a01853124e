//! Scenario configuration: every tunable constant of a run, with the defaults of
//! the stock scenario and the values derived from them.

use super::craft::CraftTuning;
use super::scenario_errors::ScenarioError;
use crate::constants::*;
use crate::physics::dynamics::VerticalForce;
use crate::physics::gravity::SurfaceClamp;
use crate::physics::orbital::{PlanetParams, RadiusScaling};
use nalgebra as na;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Height-map sampling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub sub_count: u32,        // grid cells per LOD tier
    pub scale_factor: f64,     // height = -(force * scale_factor)
    pub force_floor: f64,      // lower clamp on sampled magnitude
    pub force_ceiling: f64,    // upper clamp on sampled magnitude
    pub lod_threshold: u8,     // vertices above this tier are skipped
    pub refresh_interval: u32, // ticks between refreshes, 0 = never
    pub low_color: [f32; 4],
    pub high_color: [f32; 4],
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            sub_count: DEFAULT_TERRAIN_SUB_COUNT,
            scale_factor: DEFAULT_TERRAIN_SCALE_FACTOR,
            force_floor: 1.0e-4,
            force_ceiling: 2.0,
            lod_threshold: 0,
            refresh_interval: 15,
            low_color: [0.0, 0.0, 0.2, 1.0],
            high_color: [1.0, 0.9, 0.4, 1.0],
        }
    }
}

impl TerrainConfig {
    /// Horizontal width of one LOD tier ring.
    pub fn tier_span(&self, grid_unit: f64) -> f64 {
        self.sub_count as f64 * grid_unit
    }
}

/// Immutable input snapshot for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub number_of_planets: usize,
    pub world_size_x: f64,
    pub world_size_z: f64,
    pub grid_unit: f64,
    pub respawn_time_limit_ms: f64,
    pub star_mass: f64,
    pub star_density: f64,
    pub system_scale_factor: f64,
    pub lower_orbital_radii_scale: f64,
    pub upper_orbital_radii_scale: Option<f64>, // derived from world size when unset
    pub lower_planetary_mass_scale: f64,
    pub upper_planetary_mass_scale: f64,
    pub radius_scaling: RadiusScaling,
    pub time_scale_factor: f64,
    pub gravitational_constant: f64,
    pub surface_clamp: SurfaceClamp,
    pub vertical_force: VerticalForce,
    pub initial_craft_position: Option<[f64; 3]>,
    pub initial_star_position: Option<[f64; 3]>,
    pub wrap_world_edges: bool,
    pub seed: Option<u64>,
    pub craft: CraftTuning,
    pub terrain: TerrainConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            number_of_planets: DEFAULT_NUMBER_OF_PLANETS,
            world_size_x: DEFAULT_WORLD_SIZE,
            world_size_z: DEFAULT_WORLD_SIZE,
            grid_unit: DEFAULT_GRID_UNIT,
            respawn_time_limit_ms: DEFAULT_RESPAWN_TIME_LIMIT_MS,
            star_mass: DEFAULT_STAR_MASS,
            star_density: DEFAULT_STAR_DENSITY,
            system_scale_factor: 1.0,
            lower_orbital_radii_scale: DEFAULT_LOWER_ORBITAL_RADII_SCALE,
            upper_orbital_radii_scale: None,
            lower_planetary_mass_scale: DEFAULT_LOWER_PLANETARY_MASS_SCALE,
            upper_planetary_mass_scale: DEFAULT_UPPER_PLANETARY_MASS_SCALE,
            radius_scaling: RadiusScaling::default(),
            time_scale_factor: DEFAULT_TIME_SCALE_FACTOR,
            gravitational_constant: G,
            surface_clamp: SurfaceClamp::default(),
            vertical_force: VerticalForce::default(),
            initial_craft_position: None,
            initial_star_position: None,
            wrap_world_edges: true,
            seed: None,
            craft: CraftTuning::default(),
            terrain: TerrainConfig::default(),
        }
    }
}

/// Values computed once from a [`ScenarioConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedScenario {
    pub star_radius: f64,
    pub planet_density: f64,
    pub upper_orbital_radii_scale: f64,
    pub initial_craft_position: na::Vector3<f64>,
    pub initial_star_position: na::Vector3<f64>,
    pub world_hypotenuse: f64,
}

fn require(condition: bool, name: &'static str, reason: &str) -> Result<(), ScenarioError> {
    if condition {
        Ok(())
    } else {
        Err(ScenarioError::invalid(name, reason))
    }
}

impl ScenarioConfig {
    /// Parses a RON document and validates it. Missing fields take defaults.
    pub fn from_ron_str(source: &str) -> Result<Self, ScenarioError> {
        let config: ScenarioConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        require(self.world_size_x > 0.0, "world_size_x", "must be positive")?;
        require(self.world_size_z > 0.0, "world_size_z", "must be positive")?;
        require(self.grid_unit > 0.0, "grid_unit", "must be positive")?;
        require(self.star_mass > 0.0, "star_mass", "must be positive")?;
        require(self.star_density > 0.0, "star_density", "must be positive")?;
        require(self.system_scale_factor > 0.0, "system_scale_factor", "must be positive")?;
        require(self.time_scale_factor > 0.0, "time_scale_factor", "must be positive")?;
        require(
            self.gravitational_constant > 0.0,
            "gravitational_constant",
            "must be positive",
        )?;
        require(
            self.respawn_time_limit_ms >= 0.0,
            "respawn_time_limit_ms",
            "must not be negative",
        )?;
        require(
            self.lower_planetary_mass_scale > 0.0,
            "lower_planetary_mass_scale",
            "must be positive",
        )?;
        require(
            self.lower_planetary_mass_scale <= self.upper_planetary_mass_scale,
            "upper_planetary_mass_scale",
            "must not be below the lower scale",
        )?;
        require(
            self.lower_orbital_radii_scale >= 0.0,
            "lower_orbital_radii_scale",
            "must not be negative",
        )?;
        if let Some(upper) = self.upper_orbital_radii_scale {
            require(
                self.lower_orbital_radii_scale <= upper,
                "upper_orbital_radii_scale",
                "must not be below the lower scale",
            )?;
        }
        require(
            self.craft.max_acceleration >= 0.0,
            "craft.max_acceleration",
            "must not be negative",
        )?;
        require(
            self.craft.max_angular_velocity >= 0.0,
            "craft.max_angular_velocity",
            "must not be negative",
        )?;
        require(
            self.craft.angular_damping >= 0.0,
            "craft.angular_damping",
            "must not be negative",
        )?;
        require(
            self.craft.collision_radius >= 0.0,
            "craft.collision_radius",
            "must not be negative",
        )?;
        require(
            self.terrain.scale_factor >= 0.0,
            "terrain.scale_factor",
            "must not be negative",
        )?;
        require(
            self.terrain.force_floor > 0.0,
            "terrain.force_floor",
            "must be positive",
        )?;
        require(
            self.terrain.force_floor <= self.terrain.force_ceiling,
            "terrain.force_ceiling",
            "must not be below the force floor",
        )?;
        require(self.terrain.sub_count > 0, "terrain.sub_count", "must be positive")?;

        let derived = self.derived();
        if self.lower_orbital_radii_scale > derived.upper_orbital_radii_scale {
            warn!(
                lower = self.lower_orbital_radii_scale,
                upper = derived.upper_orbital_radii_scale,
                "orbital radii range is empty, planets will sit on the lower bound"
            );
        }
        Ok(())
    }

    pub fn derived(&self) -> DerivedScenario {
        let star_radius = (self.star_density / self.system_scale_factor) * self.star_mass.sqrt();
        let planet_density = BASE_PLANET_DENSITY / self.system_scale_factor;
        let upper_orbital_radii_scale = self
            .upper_orbital_radii_scale
            .unwrap_or_else(|| 0.5 * (self.world_size_x / star_radius).floor());

        let initial_craft_position = self
            .initial_craft_position
            .map(|p| na::Vector3::new(p[0], p[1], p[2]))
            .unwrap_or_else(|| {
                na::Vector3::new(self.world_size_x / DEFAULT_CRAFT_SPAWN_DIVISOR, 0.0, 0.0)
            });
        let initial_star_position = self
            .initial_star_position
            .map(|p| na::Vector3::new(p[0], p[1], p[2]))
            .unwrap_or_else(|| na::Vector3::new(0.0, -star_radius, 0.0));

        DerivedScenario {
            star_radius,
            planet_density,
            upper_orbital_radii_scale,
            initial_craft_position,
            initial_star_position,
            world_hypotenuse: self.world_size_x.hypot(self.world_size_z),
        }
    }

    pub fn planet_params(&self, derived: &DerivedScenario) -> PlanetParams {
        PlanetParams {
            lower_mass_scale: self.lower_planetary_mass_scale,
            upper_mass_scale: self.upper_planetary_mass_scale,
            lower_orbital_radii_scale: self.lower_orbital_radii_scale,
            upper_orbital_radii_scale: derived.upper_orbital_radii_scale,
            planet_density: derived.planet_density,
            radius_scaling: self.radius_scaling,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_case::test_case;

    #[test]
    fn defaults_are_valid() {
        assert!(ScenarioConfig::default().validate().is_ok());
    }

    #[test]
    fn derived_defaults() {
        let config = ScenarioConfig::default();
        let derived = config.derived();

        let star_radius = 0.0000125 * 1.963e15_f64.sqrt();
        assert_relative_eq!(derived.star_radius, star_radius);
        assert_relative_eq!(derived.planet_density, 0.00000921);
        assert_relative_eq!(
            derived.upper_orbital_radii_scale,
            0.5 * (22_400.0 / star_radius).floor()
        );
        assert_eq!(
            derived.initial_craft_position,
            na::Vector3::new(22_400.0 / 2.1, 0.0, 0.0)
        );
        assert_eq!(derived.initial_star_position, na::Vector3::new(0.0, -star_radius, 0.0));
        assert_relative_eq!(derived.world_hypotenuse, 22_400.0 * 2.0_f64.sqrt());
    }

    #[test]
    fn overrides_win_over_derived_values() {
        let config = ScenarioConfig {
            upper_orbital_radii_scale: Some(12.0),
            initial_craft_position: Some([1.0, 2.0, 3.0]),
            initial_star_position: Some([0.0, 0.0, 0.0]),
            ..Default::default()
        };
        let derived = config.derived();

        assert_eq!(derived.upper_orbital_radii_scale, 12.0);
        assert_eq!(derived.initial_craft_position, na::Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(derived.initial_star_position, na::Vector3::zeros());
    }

    #[test]
    fn parses_partial_ron() {
        let source = r#"(
            number_of_planets: 0,
            star_mass: 1e15,
            time_scale_factor: 1.0,
            surface_clamp: Zero,
            vertical_force: Full,
            initial_craft_position: Some((1000.0, 0.0, 0.0)),
            seed: Some(9),
            craft: (max_acceleration: 10.0),
            terrain: (lod_threshold: 4),
        )"#;

        let config = ScenarioConfig::from_ron_str(source).unwrap();

        assert_eq!(config.number_of_planets, 0);
        assert_eq!(config.star_mass, 1e15);
        assert_eq!(config.surface_clamp, SurfaceClamp::Zero);
        assert_eq!(config.vertical_force, VerticalForce::Full);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.craft.max_acceleration, 10.0);
        assert_eq!(config.craft.max_angular_velocity, DEFAULT_CRAFT_MAX_ANGULAR_VELOCITY);
        assert_eq!(config.terrain.lod_threshold, 4);
        assert_eq!(config.world_size_x, DEFAULT_WORLD_SIZE);
    }

    #[test]
    fn malformed_ron_is_a_parse_error() {
        let err = ScenarioConfig::from_ron_str("(star_mass: )").unwrap_err();
        assert!(matches!(err, ScenarioError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ScenarioConfig::load("does/not/exist.ron").unwrap_err();
        assert!(matches!(err, ScenarioError::Io(_)));
    }

    #[test_case(ScenarioConfig { star_mass: -1.0, ..Default::default() }, "star_mass"; "negative star mass")]
    #[test_case(ScenarioConfig { grid_unit: 0.0, ..Default::default() }, "grid_unit"; "zero grid unit")]
    #[test_case(ScenarioConfig { time_scale_factor: 0.0, ..Default::default() }, "time_scale_factor"; "zero time scale")]
    #[test_case(
        ScenarioConfig { lower_planetary_mass_scale: 0.5, upper_planetary_mass_scale: 0.1, ..Default::default() },
        "upper_planetary_mass_scale";
        "inverted mass range"
    )]
    #[test_case(
        ScenarioConfig { upper_orbital_radii_scale: Some(2.0), ..Default::default() },
        "upper_orbital_radii_scale";
        "inverted orbital range"
    )]
    #[test_case(
        ScenarioConfig { terrain: TerrainConfig { force_floor: 5.0, force_ceiling: 1.0, ..Default::default() }, ..Default::default() },
        "terrain.force_ceiling";
        "inverted force clamp"
    )]
    #[test_case(
        ScenarioConfig { terrain: TerrainConfig { force_floor: 0.0, ..Default::default() }, ..Default::default() },
        "terrain.force_floor";
        "zero force floor"
    )]
    #[test_case(
        ScenarioConfig { respawn_time_limit_ms: -1.0, ..Default::default() },
        "respawn_time_limit_ms";
        "negative respawn delay"
    )]
    fn rejects_invalid_parameters(config: ScenarioConfig, field: &str) {
        match config.validate() {
            Err(ScenarioError::InvalidParameter { name, .. }) => assert_eq!(name, field),
            other => panic!("expected invalid parameter, got {:?}", other),
        }
    }
}
