use super::input::{InputIntent, TurnDirection};
use super::respawn::RespawnTimer;
use super::telemetry::{SimulationEvent, Telemetry};
use crate::config::{DerivedScenario, ScenarioConfig, ScenarioError};
use crate::fsm::{RunState, SimulationFsm};
use crate::models::craft::Craft;
use crate::models::gravity_source::GravitySource;
use crate::physics::collision::first_collision;
use crate::physics::dynamics::field_force_on_craft;
use crate::physics::energy::{calculate_angular_momentum, calculate_specific_energy};
use crate::physics::gravity::GravityField;
use crate::physics::orbital::generate_planet;
use crate::terrain::TerrainHeightSampler;
use hifitime::Duration;
use nalgebra as na;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

/// Owns the whole game state and advances it one fixed tick at a time.
///
/// Per running tick: orbits advance, the craft's net force is rebuilt from the
/// field plus thrust, the craft integrates, world edges wrap, collisions are
/// checked, a pending respawn counts down, and the terrain is periodically
/// resampled. A paused simulation ignores everything except the pause toggle.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: ScenarioConfig,
    derived: DerivedScenario,
    field: GravityField,
    craft: Craft,
    terrain: TerrainHeightSampler,
    fsm: SimulationFsm,
    respawn: RespawnTimer,
    tick: u64,
    elapsed: Duration,
}

impl Simulation {
    /// Builds the stock scene: one star plus `number_of_planets` generated planets.
    pub fn from_config(config: ScenarioConfig) -> Result<Self, ScenarioError> {
        config.validate()?;
        let derived = config.derived();

        let mut field = GravityField::new(config.gravitational_constant, config.surface_clamp);
        let star = GravitySource::star(
            config.star_mass,
            derived.star_radius,
            derived.initial_star_position,
        );
        let star_id = field.add_source(star.clone());

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let params = config.planet_params(&derived);
        for _ in 0..config.number_of_planets {
            let planet = generate_planet(
                &mut rng,
                star_id,
                &star,
                &params,
                config.gravitational_constant,
            );
            field.add_source(planet);
        }

        info!(
            star_mass = config.star_mass,
            star_radius = derived.star_radius,
            planets = config.number_of_planets,
            seed = ?config.seed,
            "scenario built"
        );

        let craft = Craft::new(
            config.craft,
            derived.initial_craft_position,
            config.craft.initial_heading,
        );
        Self::new(config, field, craft)
    }

    /// Wraps an explicitly assembled field and craft.
    pub fn new(
        config: ScenarioConfig,
        field: GravityField,
        craft: Craft,
    ) -> Result<Self, ScenarioError> {
        config.validate()?;
        let derived = config.derived();
        let terrain = TerrainHeightSampler::new(
            config.world_size_x,
            config.world_size_z,
            config.grid_unit,
            &config.terrain,
        );
        let respawn = RespawnTimer::from_milliseconds(config.respawn_time_limit_ms);

        Ok(Self {
            config,
            derived,
            field,
            craft,
            terrain,
            fsm: SimulationFsm::new(),
            respawn,
            tick: 0,
            elapsed: Duration::ZERO,
        })
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    pub fn derived(&self) -> &DerivedScenario {
        &self.derived
    }

    pub fn field(&self) -> &GravityField {
        &self.field
    }

    pub fn craft(&self) -> &Craft {
        &self.craft
    }

    pub fn craft_mut(&mut self) -> &mut Craft {
        &mut self.craft
    }

    pub fn terrain(&self) -> &TerrainHeightSampler {
        &self.terrain
    }

    pub fn terrain_mut(&mut self) -> &mut TerrainHeightSampler {
        &mut self.terrain
    }

    pub fn run_state(&self) -> RunState {
        self.fsm.get_current_state()
    }

    pub fn is_running(&self) -> bool {
        self.fsm.is_running()
    }

    pub fn respawn_pending(&self) -> bool {
        self.respawn.is_pending()
    }

    /// Running ticks taken so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated time spent running.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn toggle_pause(&mut self) -> RunState {
        self.fsm.toggle(self.elapsed.to_seconds())
    }

    pub fn resume(&mut self) -> bool {
        self.fsm
            .transition_to(RunState::Running, self.elapsed.to_seconds())
    }

    pub fn pause(&mut self) -> bool {
        self.fsm
            .transition_to(RunState::Paused, self.elapsed.to_seconds())
    }

    /// Puts the craft back on its spawn point and drops any pending respawn.
    pub fn reset_craft(&mut self) {
        self.respawn.cancel();
        self.craft.respawn();
    }

    /// Advances one fixed tick of `dt` seconds.
    pub fn step(&mut self, dt: f64, intent: &InputIntent) -> Vec<SimulationEvent> {
        let mut events = Vec::new();

        if intent.toggle_pause {
            let state = self.toggle_pause();
            events.push(SimulationEvent::RunStateChanged(state));
        }
        if !self.fsm.is_running() {
            return events;
        }

        self.tick += 1;
        self.elapsed = self.elapsed + Duration::from_seconds(dt);

        // 1. planets move first so this tick's forces see their new positions
        self.field.advance_orbits(dt);

        // 2. rebuild the net force from scratch
        self.craft.ge_force = na::Vector3::zeros();

        if self.craft.is_alive() {
            self.apply_input(intent);

            // 3. field force
            let field_force =
                field_force_on_craft(&self.field, &self.craft.position(), self.config.vertical_force);
            self.craft.ge_force += field_force;

            // 4. thrust
            if let Some(thrust) = self.craft.take_thrust() {
                self.craft.ge_force += thrust;
            }

            // 5/6. velocity and position
            self.craft.integrate(dt, self.config.time_scale_factor);

            if self.config.wrap_world_edges {
                self.wrap_craft_position();
            }

            // 7. collisions
            if let Some(event) = self.check_collisions() {
                events.push(event);
            }
        } else if self.respawn.advance(dt) {
            self.craft.respawn();
            info!(tick = self.tick, position = ?self.craft.position(), "craft respawned");
            events.push(SimulationEvent::CraftRespawned {
                position: self.craft.position(),
            });
        }

        let interval = self.config.terrain.refresh_interval as u64;
        if interval > 0 && self.tick % interval == 0 {
            self.refresh_terrain();
        }

        events
    }

    fn apply_input(&mut self, intent: &InputIntent) {
        if intent.turn_direction != TurnDirection::None {
            self.craft.turn(intent.turn_direction.signum());
        }
        if intent.thrust_requested {
            self.craft.fire_thrusters();
        }
    }

    fn wrap_craft_position(&mut self) {
        let half_x = self.config.world_size_x / 2.0;
        let half_z = self.config.world_size_z / 2.0;
        let position = &mut self.craft.state.position;

        if position.x > half_x {
            position.x -= self.config.world_size_x;
        } else if position.x < -half_x {
            position.x += self.config.world_size_x;
        }
        if position.z > half_z {
            position.z -= self.config.world_size_z;
        } else if position.z < -half_z {
            position.z += self.config.world_size_z;
        }
    }

    fn check_collisions(&mut self) -> Option<SimulationEvent> {
        let position = self.craft.position();
        let id = first_collision(
            &self.field,
            &position,
            self.craft.tuning.collision_radius,
            self.config.vertical_force,
        )?;
        let kind = self.field.source(id)?.kind;

        if !self.craft.kill() {
            return None;
        }
        self.respawn.start();
        info!(tick = self.tick, source = %kind, position = ?position, "craft destroyed");

        Some(SimulationEvent::CraftDestroyed {
            source: id,
            kind,
            position,
        })
    }

    /// Re-buckets LOD tiers around the craft and resamples the height map.
    pub fn refresh_terrain(&mut self) -> usize {
        let tier_span = self.config.terrain.tier_span(self.config.grid_unit);
        self.terrain
            .assign_lod_tiers(&self.craft.position(), tier_span);
        let updated = self.terrain.refresh(&self.field);
        debug!(tick = self.tick, updated, "terrain refreshed");
        updated
    }

    /// Specific mechanical energy of the craft in the current field.
    pub fn specific_energy(&self) -> f64 {
        calculate_specific_energy(&self.field, &self.craft.position(), &self.craft.velocity())
    }

    /// Specific angular momentum of the craft about the first star, if any.
    pub fn angular_momentum(&self) -> Option<na::Vector3<f64>> {
        self.field.stars().next().map(|star| {
            calculate_angular_momentum(star, &self.craft.position(), &self.craft.velocity())
        })
    }

    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            tick: self.tick,
            elapsed: self.elapsed,
            position: self.craft.position(),
            velocity: self.craft.velocity(),
            ge_force: self.craft.ge_force,
            heading: self.craft.heading(),
            is_alive: self.craft.is_alive(),
            run_state: self.run_state(),
            specific_energy: self.specific_energy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CraftTuning;
    use crate::constants::G;
    use crate::models::gravity_source::{SourceId, SourceKind};
    use crate::physics::dynamics::VerticalForce;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use test_case::test_case;

    fn small_config() -> ScenarioConfig {
        let mut config = ScenarioConfig {
            number_of_planets: 0,
            world_size_x: 4000.0,
            world_size_z: 4000.0,
            grid_unit: 500.0,
            seed: Some(11),
            ..Default::default()
        };
        config.terrain.refresh_interval = 0;
        config
    }

    fn lone_star(config: &ScenarioConfig, mass: f64, radius: f64) -> GravityField {
        let mut field = GravityField::new(config.gravitational_constant, config.surface_clamp);
        field.add_source(GravitySource::star(mass, radius, na::Vector3::zeros()));
        field
    }

    fn craft_at(position: na::Vector3<f64>) -> Craft {
        Craft::new(CraftTuning::default(), position, 0.0)
    }

    #[test_case(1000.0, -6.67259e-5; "dilated by the stock time scale")]
    #[test_case(1.0, -6.67259e-2; "undilated")]
    fn single_tick_against_a_lone_star(time_scale_factor: f64, expected_vx: f64) {
        let config = ScenarioConfig {
            time_scale_factor,
            ..small_config()
        };
        let field = lone_star(&config, 1e15, 10.0);
        let mut sim = Simulation::new(config, field, craft_at(na::Vector3::new(1000.0, 0.0, 0.0)))
            .unwrap();
        sim.resume();

        sim.step(1.0, &InputIntent::idle());

        let craft = sim.craft();
        assert_relative_eq!(craft.velocity().x, expected_vx, max_relative = 1e-9);
        assert_eq!(craft.velocity().y, 0.0);
        assert_eq!(craft.velocity().z, 0.0);
        assert_eq!(craft.position(), na::Vector3::new(1000.0, 0.0, 0.0));
        assert_relative_eq!(craft.ge_force.x, -G * 1e15 / 1e6, max_relative = 1e-9);
    }

    #[test]
    fn paused_ticks_change_nothing() {
        let mut sim = Simulation::from_config(ScenarioConfig {
            number_of_planets: 3,
            ..small_config()
        })
        .unwrap();
        let angles: Vec<f64> = sim
            .field()
            .planets()
            .map(|p| p.orbit.as_ref().unwrap().current_angle())
            .collect();
        let position = sim.craft().position();

        for _ in 0..50 {
            let events = sim.step(0.1, &InputIntent::thrust().with_turn(TurnDirection::Right));
            assert!(events.is_empty());
        }

        let after: Vec<f64> = sim
            .field()
            .planets()
            .map(|p| p.orbit.as_ref().unwrap().current_angle())
            .collect();
        assert_eq!(angles, after);
        assert_eq!(sim.craft().position(), position);
        assert_eq!(sim.craft().velocity(), na::Vector3::zeros());
        assert!(!sim.craft().thrusters_firing());
        assert_eq!(sim.craft().angular_velocity(), 0.0);
        assert_eq!(sim.tick(), 0);
    }

    #[test]
    fn toggle_intent_starts_and_stops_the_loop() {
        let mut sim = Simulation::from_config(small_config()).unwrap();
        assert_eq!(sim.run_state(), RunState::Paused);

        let events = sim.step(0.5, &InputIntent::toggle_pause());
        assert_eq!(events, vec![SimulationEvent::RunStateChanged(RunState::Running)]);
        assert_eq!(sim.tick(), 1);

        sim.step(0.5, &InputIntent::toggle_pause());
        assert_eq!(sim.run_state(), RunState::Paused);
        assert_eq!(sim.tick(), 1);
        assert_relative_eq!(sim.elapsed().to_seconds(), 0.5);
    }

    #[test]
    fn collision_kills_then_respawns_at_spawn() {
        let config = ScenarioConfig {
            respawn_time_limit_ms: 4000.0,
            ..small_config()
        };
        let field = lone_star(&config, 1e15, 100.0);
        let spawn = na::Vector3::new(50.0, 0.0, 0.0);
        let mut sim = Simulation::new(config, field, craft_at(spawn)).unwrap();
        sim.resume();

        let events = sim.step(0.5, &InputIntent::idle());
        assert!(matches!(
            events.as_slice(),
            [SimulationEvent::CraftDestroyed { kind: SourceKind::Star, .. }]
        ));
        assert!(!sim.craft().is_alive());
        assert_eq!(sim.craft().velocity(), na::Vector3::zeros());
        assert!(sim.respawn_pending());

        // move the craft away so the respawn is observable
        sim.craft_mut().state.position = na::Vector3::new(-1500.0, 0.0, 1500.0);

        for _ in 0..7 {
            let events = sim.step(0.5, &InputIntent::thrust());
            assert!(events.is_empty());
            assert!(!sim.craft().is_alive());
            assert_eq!(sim.craft().velocity(), na::Vector3::zeros());
        }

        let events = sim.step(0.5, &InputIntent::idle());
        assert_eq!(events, vec![SimulationEvent::CraftRespawned { position: spawn }]);
        assert!(sim.craft().is_alive());
        assert_eq!(sim.craft().position(), spawn);
        assert_eq!(sim.craft().ge_force, na::Vector3::zeros());
        assert!(!sim.respawn_pending());
    }

    #[test]
    fn dead_craft_does_not_die_twice() {
        let config = small_config();
        let field = lone_star(&config, 1e15, 100.0);
        let mut sim = Simulation::new(config, field, craft_at(na::Vector3::zeros())).unwrap();
        sim.resume();

        let first = sim.step(0.1, &InputIntent::idle());
        let second = sim.step(0.1, &InputIntent::idle());

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }

    #[test]
    fn reset_cancels_pending_respawn() {
        let config = small_config();
        let field = lone_star(&config, 1e15, 100.0);
        let spawn = na::Vector3::new(1500.0, 0.0, 0.0);
        let mut sim = Simulation::new(config, field, craft_at(spawn)).unwrap();
        sim.resume();
        sim.craft_mut().state.position = na::Vector3::zeros();

        sim.step(0.1, &InputIntent::idle());
        assert!(sim.respawn_pending());

        sim.reset_craft();
        assert!(!sim.respawn_pending());
        assert!(sim.craft().is_alive());
        assert_eq!(sim.craft().position(), spawn);
    }

    #[test]
    fn generated_bodies_can_be_hit_from_the_play_plane() {
        let config = ScenarioConfig {
            number_of_planets: 2,
            wrap_world_edges: false,
            seed: Some(3),
            ..small_config()
        };
        let mut sim = Simulation::from_config(config).unwrap();
        sim.resume();

        let targets: Vec<(SourceId, SourceKind, na::Vector3<f64>)> = sim
            .field()
            .sources()
            .iter()
            .enumerate()
            .map(|(idx, source)| (SourceId(idx), source.kind, source.position))
            .collect();
        assert_eq!(targets.len(), 3);
        // every generated body sits below the plane the craft flies in
        assert!(targets.iter().all(|(_, _, position)| position.y < 0.0));

        for (id, kind, position) in targets {
            let mut run = sim.clone();
            run.craft_mut().state.position = na::Vector3::new(position.x, 0.0, position.z);

            let events = run.step(1.0 / 60.0, &InputIntent::idle());

            assert!(!run.craft().is_alive());
            match events.as_slice() {
                [SimulationEvent::CraftDestroyed { source, kind: hit, .. }] => {
                    assert_eq!(*source, id);
                    assert_eq!(*hit, kind);
                }
                other => panic!("expected a single destruction, got {:?}", other),
            }
        }
    }

    #[test]
    fn net_force_is_the_sum_over_sources() {
        let config = ScenarioConfig {
            vertical_force: VerticalForce::Full,
            ..small_config()
        };
        let mut field = GravityField::new(config.gravitational_constant, config.surface_clamp);
        field.add_source(GravitySource::star(1e15, 10.0, na::Vector3::new(-800.0, 0.0, 0.0)));
        field.add_source(GravitySource::star(4e14, 10.0, na::Vector3::new(0.0, 300.0, 900.0)));
        let position = na::Vector3::new(200.0, 0.0, 100.0);
        let expected = field.compute_force_at(&field.sources()[0], &position, 1.0)
            + field.compute_force_at(&field.sources()[1], &position, 1.0);

        let mut sim = Simulation::new(config, field, craft_at(position)).unwrap();
        sim.resume();
        sim.step(1.0 / 60.0, &InputIntent::idle());

        assert_relative_eq!(sim.craft().ge_force, expected, max_relative = 1e-12);
    }

    #[test]
    fn planar_policy_drops_vertical_pull() {
        let config = small_config();
        let mut field = GravityField::new(config.gravitational_constant, config.surface_clamp);
        field.add_source(GravitySource::star(1e15, 10.0, na::Vector3::new(0.0, -500.0, 0.0)));
        let mut sim =
            Simulation::new(config, field, craft_at(na::Vector3::new(500.0, 0.0, 0.0))).unwrap();
        sim.resume();

        sim.step(1.0, &InputIntent::idle());

        assert_eq!(sim.craft().ge_force.y, 0.0);
        assert!(sim.craft().ge_force.x < 0.0);
    }

    #[test]
    fn thrust_is_added_along_heading_and_consumed() {
        let config = ScenarioConfig {
            time_scale_factor: 1.0,
            ..small_config()
        };
        let field = GravityField::new(config.gravitational_constant, config.surface_clamp);
        let mut sim = Simulation::new(config, field, craft_at(na::Vector3::zeros())).unwrap();
        sim.resume();

        sim.step(0.1, &InputIntent::thrust());
        let max = sim.craft().tuning.max_acceleration;
        assert_abs_diff_eq!(sim.craft().ge_force, na::Vector3::new(0.0, 0.0, max), epsilon = 1e-12);
        assert_abs_diff_eq!(sim.craft().velocity().z, max * 0.1, epsilon = 1e-12);

        sim.step(0.1, &InputIntent::idle());
        assert_eq!(sim.craft().ge_force, na::Vector3::zeros());
        assert_abs_diff_eq!(sim.craft().velocity().z, max * 0.1, epsilon = 1e-12);
    }

    #[test]
    fn craft_wraps_across_world_edges() {
        let config = ScenarioConfig {
            time_scale_factor: 1.0,
            ..small_config()
        };
        let field = GravityField::new(config.gravitational_constant, config.surface_clamp);
        let mut craft = craft_at(na::Vector3::new(1990.0, 0.0, 0.0));
        craft.state.velocity = na::Vector3::new(20.0, 0.0, 0.0);
        let mut sim = Simulation::new(config, field, craft).unwrap();
        sim.resume();

        sim.step(1.0, &InputIntent::idle());

        assert_abs_diff_eq!(sim.craft().position().x, -1990.0, epsilon = 1e-9);
    }

    #[test]
    fn terrain_refresh_follows_interval() {
        let mut config = small_config();
        config.terrain.refresh_interval = 2;
        config.number_of_planets = 1;
        let mut sim = Simulation::from_config(config).unwrap();
        sim.resume();

        sim.step(0.1, &InputIntent::idle());
        assert_eq!(sim.terrain().max_magnitude(), 0.0);

        sim.step(0.1, &InputIntent::idle());
        assert!(sim.terrain().max_magnitude() > 0.0);
        assert!(sim.terrain().heights().chunks(3).any(|v| v[1] < 0.0));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ScenarioConfig {
            grid_unit: 0.0,
            ..small_config()
        };
        assert!(Simulation::from_config(config).is_err());
    }

    #[test]
    fn telemetry_reports_current_state() {
        let mut sim = Simulation::from_config(small_config()).unwrap();
        sim.resume();
        sim.step(0.25, &InputIntent::idle());

        let telemetry = sim.telemetry();
        assert_eq!(telemetry.tick, 1);
        assert_relative_eq!(telemetry.elapsed.to_seconds(), 0.25);
        assert_eq!(telemetry.position, sim.craft().position());
        assert_eq!(telemetry.run_state, RunState::Running);
        assert!(telemetry.is_alive);
        assert!(telemetry.specific_energy < 0.0);
        assert!(sim.angular_momentum().is_some());
    }
}
