//! Small fixed-step simulations: a box of tumbling bodies and a set of
//! scripted mechanisms (dominoes, pendulums, hanging chains, a bouncing
//! ball) under adjustable gravity and wind.

use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{construct, floor, hsl};
use crate::error::VistaError;
use crate::panel::{PanelSpec, ParameterPanel};
use crate::registry::{RegistryBuilder, SampleEntry};
use crate::sample::{FrameInput, Sample};
use crate::scene::{hex_color, Geometry, Light, Material, Scene, SceneObject};
use crate::surface::{CameraSetup, Projection, SurfaceConfig};

const SOURCE: &str = include_str!("physics.rs");

pub(super) fn register(builder: &mut RegistryBuilder) -> Result<(), VistaError> {
    let _ = builder
        .register(
            "physics",
            SampleEntry::new("basic-physics", construct::<BasicPhysics>)
                .titled("Basic Physics")
                .described("Rigid bodies falling into a walled box.")
                .own_surface()
                .with_source(SOURCE),
        )?
        .register(
            "physics",
            SampleEntry::new("advanced-physics", construct::<AdvancedPhysics>)
                .titled("Advanced Physics")
                .described("Dominoes, pendulums, chains and wind.")
                .own_surface()
                .with_source(SOURCE),
        )?;
    Ok(())
}

/// Simulation step in seconds.
const STEP: f32 = 1.0 / 60.0;
/// Frames longer than this many steps are slowed down instead of stalling.
const MAX_SUBSTEPS: u32 = 5;
const GROUND: f32 = -5.0;
const WALL: f32 = 10.0;
const BODY_RADIUS: f32 = 0.5;
/// Below this speed a grounded body is considered at rest.
const REST_SPEED: f32 = 0.05;

/// Converts variable frame times into whole simulation steps.
#[derive(Debug, Default)]
struct Stepper {
    accumulator: f32,
}

impl Stepper {
    fn steps(&mut self, delta: f32) -> u32 {
        self.accumulator += delta.max(0.0);
        let n = (self.accumulator / STEP) as u32;
        if n > MAX_SUBSTEPS {
            self.accumulator = 0.0;
            return MAX_SUBSTEPS;
        }
        self.accumulator -= n as f32 * STEP;
        n
    }
}

/// Both simulations are framed from further out than the shared surface.
fn wide_surface(defaults: &SurfaceConfig) -> SurfaceConfig {
    SurfaceConfig {
        camera: CameraSetup {
            position: Vec3::new(15.0, 10.0, 15.0),
            target: Vec3::ZERO,
            projection: Projection::perspective(50.0),
        },
        ..defaults.clone()
    }
}

// ── basic-physics ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
enum ObjectKind {
    Boxes,
    Spheres,
    #[default]
    Mixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "World", inline)]
#[serde(default)]
struct WorldSettings {
    /// Vertical acceleration in m/s².
    #[schemars(range(min = -20.0, max = 0.0), extend("step" = 0.1))]
    gravity: f32,
    /// Contact solver passes per step.
    #[schemars(range(min = 1, max = 100), extend("step" = 1))]
    iterations: u32,
    /// Solver stops early once every overlap is below this depth.
    #[schemars(range(min = 0.0001, max = 0.01), extend("step" = 0.0001))]
    tolerance: f32,
    #[schemars(range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    friction: f32,
    #[schemars(range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    restitution: f32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            gravity: -9.82,
            iterations: 50,
            tolerance: 0.001,
            friction: 0.4,
            restitution: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Objects", inline)]
#[serde(default)]
struct ObjectSettings {
    #[schemars(range(min = 1, max = 30), extend("step" = 1))]
    count: u32,
    kind: ObjectKind,
}

impl Default for ObjectSettings {
    fn default() -> Self {
        Self {
            count: 10,
            kind: ObjectKind::Mixed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
struct BasicPhysicsParams {
    world: WorldSettings,
    objects: ObjectSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Box,
    Sphere,
}

/// Bodies collide as spheres of [`BODY_RADIUS`]; boxes only differ in how
/// they are drawn.
#[derive(Debug, Clone)]
struct Body {
    shape: Shape,
    position: Vec3,
    velocity: Vec3,
    orientation: Quat,
    spin: Vec3,
    color: Vec3,
}

impl Body {
    fn grounded(&self) -> bool {
        self.position.y - BODY_RADIUS <= GROUND + 1e-3
    }
}

fn spawn(settings: &ObjectSettings) -> Vec<Body> {
    let mut rng = StdRng::seed_from_u64(0xb0d1e5);
    let count = settings.count.max(1);
    (0..count)
        .map(|i| {
            let shape = match settings.kind {
                ObjectKind::Boxes => Shape::Box,
                ObjectKind::Spheres => Shape::Sphere,
                ObjectKind::Mixed if i % 2 == 0 => Shape::Box,
                ObjectKind::Mixed => Shape::Sphere,
            };
            Body {
                shape,
                position: Vec3::new(
                    rng.random_range(-5.0..5.0),
                    5.0 + i as f32 * 1.5,
                    rng.random_range(-5.0..5.0),
                ),
                velocity: Vec3::ZERO,
                orientation: Quat::from_euler(
                    EulerRot::XYZ,
                    rng.random_range(0.0..std::f32::consts::TAU),
                    rng.random_range(0.0..std::f32::consts::TAU),
                    0.0,
                ),
                spin: Vec3::new(
                    rng.random_range(-2.0..2.0),
                    rng.random_range(-2.0..2.0),
                    rng.random_range(-2.0..2.0),
                ),
                color: hsl(i as f32 * 360.0 / count as f32, 0.7, 0.5),
            }
        })
        .collect()
}

/// Separate overlapping pairs and exchange their normal velocity. Returns
/// the deepest overlap seen in the last pass.
fn resolve_contacts(bodies: &mut [Body], world: &WorldSettings) -> f32 {
    let mut deepest = 0.0;
    for _ in 0..world.iterations.max(1) {
        deepest = 0.0_f32;
        for i in 0..bodies.len() {
            let (head, tail) = bodies.split_at_mut(i + 1);
            let a = &mut head[i];
            for b in tail.iter_mut() {
                let offset = b.position - a.position;
                let distance = offset.length();
                let depth = 2.0 * BODY_RADIUS - distance;
                if depth <= 0.0 {
                    continue;
                }
                let normal = if distance > 1e-6 {
                    offset / distance
                } else {
                    Vec3::Y
                };
                a.position -= normal * depth * 0.5;
                b.position += normal * depth * 0.5;
                let approach = (b.velocity - a.velocity).dot(normal);
                if approach < 0.0 {
                    let impulse = -(1.0 + world.restitution) * approach * 0.5;
                    a.velocity -= normal * impulse;
                    b.velocity += normal * impulse;
                }
                deepest = deepest.max(depth);
            }
        }
        if deepest < world.tolerance {
            break;
        }
    }
    deepest
}

/// Keep a body above the ground and inside the walls.
fn confine(body: &mut Body, world: &WorldSettings) {
    let floor_y = GROUND + BODY_RADIUS;
    if body.position.y < floor_y {
        body.position.y = floor_y;
        if body.velocity.y < 0.0 {
            body.velocity.y = -body.velocity.y * world.restitution;
            if body.velocity.y < REST_SPEED {
                body.velocity.y = 0.0;
            }
        }
        let keep = 1.0 - world.friction * 0.1;
        body.velocity.x *= keep;
        body.velocity.z *= keep;
        body.spin *= keep;
    }
    let limit = WALL - BODY_RADIUS;
    for axis in [0, 2] {
        if body.position[axis].abs() > limit {
            body.position[axis] = body.position[axis].clamp(-limit, limit);
            body.velocity[axis] = -body.velocity[axis] * world.restitution;
        }
    }
}

fn step_bodies(bodies: &mut [Body], world: &WorldSettings) {
    for body in bodies.iter_mut() {
        body.velocity.y += world.gravity * STEP;
        body.position += body.velocity * STEP;
        let angle = body.spin.length() * STEP;
        if angle > 0.0 {
            body.orientation =
                (Quat::from_axis_angle(body.spin.normalize(), angle) * body.orientation).normalize();
        }
    }
    let _ = resolve_contacts(bodies, world);
    for body in bodies.iter_mut() {
        confine(body, world);
    }
}

#[derive(Debug, Default)]
struct BasicPhysics {
    bodies: Vec<Body>,
    spawned: Option<ObjectSettings>,
    stepper: Stepper,
}

impl Sample for BasicPhysics {
    fn parameters(&self) -> PanelSpec {
        PanelSpec::of::<BasicPhysicsParams>()
    }

    fn surface_config(&self, defaults: &SurfaceConfig) -> SurfaceConfig {
        wide_surface(defaults)
    }

    fn update(&mut self, frame: &FrameInput, panel: &ParameterPanel, scene: &mut Scene) {
        let BasicPhysicsParams { world, objects } = panel.read();
        if self.spawned.as_ref() != Some(&objects) {
            log::debug!("dropping {} {:?}", objects.count, objects.kind);
            self.bodies = spawn(&objects);
            self.spawned = Some(objects);
        }
        for _ in 0..self.stepper.steps(frame.delta) {
            step_bodies(&mut self.bodies, &world);
        }

        scene.light(Light::ambient(0.4));
        scene.light(Light::directional(Vec3::new(10.0, 20.0, 5.0), 1.0));
        for body in &self.bodies {
            let geometry = match body.shape {
                Shape::Box => Geometry::cube(2.0 * BODY_RADIUS),
                Shape::Sphere => Geometry::sphere(BODY_RADIUS),
            };
            scene.add(
                SceneObject::new(geometry)
                    .with_transform(Mat4::from_rotation_translation(
                        body.orientation,
                        body.position,
                    ))
                    .with_material(Material::color(body.color)),
            );
        }
        scene.add(floor(2.0 * WALL, GROUND, Material::color(hex_color("#444444"))));
        let wall = Material {
            opacity: 0.2,
            ..Material::color(hex_color("#8888ff"))
        };
        for (position, rotation) in [
            (Vec3::new(WALL, 0.0, 0.0), Vec3::new(0.0, -std::f32::consts::FRAC_PI_2, 0.0)),
            (Vec3::new(-WALL, 0.0, 0.0), Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0)),
            (Vec3::new(0.0, 0.0, WALL), Vec3::new(0.0, std::f32::consts::PI, 0.0)),
            (Vec3::new(0.0, 0.0, -WALL), Vec3::ZERO),
        ] {
            scene.add(
                SceneObject::new(Geometry::plane(2.0 * WALL, 2.0 * -GROUND))
                    .placed(position, rotation, 1.0)
                    .with_material(wall),
            );
        }
    }
}

// ── advanced-physics ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
enum Simulation {
    Domino,
    Pendulum,
    Chain,
    Interactive,
    #[default]
    All,
}

impl Simulation {
    fn shows(self, other: Self) -> bool {
        self == Self::All || self == other
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Simulation", inline)]
#[serde(default)]
struct SimulationSettings {
    simulation: Simulation,
    #[schemars(range(min = -20.0, max = 0.0), extend("step" = 0.1))]
    gravity: f32,
    /// Horizontal force along +X.
    #[schemars(range(min = -10.0, max = 10.0), extend("step" = 0.1))]
    wind: f32,
    #[schemars(range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    friction: f32,
    #[schemars(range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    restitution: f32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            simulation: Simulation::All,
            gravity: -9.82,
            wind: 0.0,
            friction: 0.4,
            restitution: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
struct AdvancedPhysicsParams {
    simulation: SimulationSettings,
}

const DOMINO_COUNT: usize = 15;
const DOMINO_SPACING: f32 = 1.5;
const DOMINO_HEIGHT: f32 = 2.0;
const DOMINO_THICKNESS: f32 = 0.2;
/// Seconds the last domino lies still before the row is stood back up.
const DOMINO_RESET_DELAY: f32 = 3.0;

/// Dominoes pivot about their front bottom edge. A toppling domino hands
/// its angular velocity to the next one when its top edge reaches it.
#[derive(Debug)]
struct DominoRow {
    angles: Vec<f32>,
    rates: Vec<f32>,
    idle: f32,
}

impl Default for DominoRow {
    fn default() -> Self {
        let mut rates = vec![0.0; DOMINO_COUNT];
        rates[0] = 0.5;
        Self {
            angles: vec![0.0; DOMINO_COUNT],
            rates,
            idle: 0.0,
        }
    }
}

impl DominoRow {
    /// Tilt at which a domino's top touches its neighbour.
    fn contact_angle() -> f32 {
        ((DOMINO_SPACING - DOMINO_THICKNESS) / DOMINO_HEIGHT).asin()
    }

    fn step(&mut self, settings: &SimulationSettings) {
        let g = -settings.gravity;
        let last = DOMINO_COUNT - 1;
        let contact = Self::contact_angle();
        for i in 0..DOMINO_COUNT {
            let limit = if i == last {
                std::f32::consts::FRAC_PI_2
            } else {
                contact
            };
            if self.angles[i] <= 0.0 && self.rates[i] <= 0.0 {
                continue;
            }
            let torque = 1.5 * g / DOMINO_HEIGHT * self.angles[i].sin()
                + settings.wind * 0.1 * self.angles[i].cos();
            self.rates[i] += torque * STEP;
            self.angles[i] += self.rates[i] * STEP;
            if self.angles[i] >= limit {
                self.angles[i] = limit;
                if i < last && self.rates[i] > 0.0 {
                    let handed = self.rates[i] * (1.0 - settings.friction * 0.5);
                    self.rates[i + 1] = self.rates[i + 1].max(handed);
                }
                self.rates[i] = 0.0;
            }
            self.angles[i] = self.angles[i].max(0.0);
        }
        if self.angles[last] >= std::f32::consts::FRAC_PI_2 {
            self.idle += STEP;
            if self.idle >= DOMINO_RESET_DELAY {
                *self = Self::default();
            }
        }
    }

    fn draw(&self, scene: &mut Scene) {
        for (i, angle) in self.angles.iter().enumerate() {
            let pivot = Vec3::new(
                i as f32 * DOMINO_SPACING - 10.0 + DOMINO_THICKNESS * 0.5,
                GROUND,
                0.0,
            );
            let rotation = Quat::from_rotation_z(-angle);
            let centre = pivot
                + rotation * Vec3::new(-DOMINO_THICKNESS * 0.5, DOMINO_HEIGHT * 0.5, 0.0);
            scene.add(
                SceneObject::new(Geometry::Box {
                    width: DOMINO_THICKNESS,
                    height: DOMINO_HEIGHT,
                    depth: 1.0,
                })
                .with_transform(Mat4::from_rotation_translation(rotation, centre))
                .with_material(Material::color(hsl(i as f32 * 24.0, 0.7, 0.5))),
            );
        }
    }
}

const PENDULUM_LENGTH: f32 = 3.0;
const PENDULUM_ANCHORS: [Vec3; 3] = [
    Vec3::new(-5.0, 5.0, -5.0),
    Vec3::new(5.0, 5.0, -5.0),
    Vec3::new(0.0, 5.0, -5.0),
];

#[derive(Debug)]
struct Pendulums {
    angles: [f32; 3],
    rates: [f32; 3],
}

impl Default for Pendulums {
    fn default() -> Self {
        Self {
            angles: [0.5, 1.0, 1.5],
            rates: [0.0; 3],
        }
    }
}

impl Pendulums {
    fn step(&mut self, settings: &SimulationSettings) {
        let g = -settings.gravity;
        for (angle, rate) in self.angles.iter_mut().zip(&mut self.rates) {
            let accel = -g / PENDULUM_LENGTH * angle.sin()
                + settings.wind / PENDULUM_LENGTH * angle.cos()
                - settings.friction * 0.2 * *rate;
            *rate += accel * STEP;
            *angle += *rate * STEP;
        }
    }

    fn bobs(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        PENDULUM_ANCHORS.iter().zip(self.angles).map(|(&anchor, angle)| {
            (
                anchor,
                anchor + Vec3::new(angle.sin(), -angle.cos(), 0.0) * PENDULUM_LENGTH,
            )
        })
    }

    fn draw(&self, scene: &mut Scene) {
        for (anchor, bob) in self.bobs() {
            let rod = bob - anchor;
            scene.add(
                SceneObject::new(Geometry::Cylinder {
                    radius_top: 0.03,
                    radius_bottom: 0.03,
                    height: PENDULUM_LENGTH,
                    radial_segments: 8,
                })
                .with_transform(Mat4::from_rotation_translation(
                    Quat::from_rotation_arc(Vec3::Y, rod.normalize()),
                    anchor + rod * 0.5,
                ))
                .with_material(Material::color(hex_color("#aaaaaa"))),
            );
            scene.add(
                SceneObject::new(Geometry::sphere(0.4))
                    .at(bob)
                    .with_material(Material {
                        metalness: 0.6,
                        roughness: 0.3,
                        ..Material::color(hex_color("#ffaa00"))
                    }),
            );
        }
    }
}

const CHAIN_LINKS: usize = 10;
const LINK_SPACING: f32 = 0.3;
const CHAIN_ANCHORS: [Vec3; 2] = [Vec3::new(-8.0, 8.0, 5.0), Vec3::new(8.0, 8.0, 5.0)];

/// Verlet rope: each link keeps its previous position instead of a
/// velocity, and distance constraints are relaxed a few times per step.
#[derive(Debug)]
struct Chain {
    anchor: Vec3,
    links: Vec<Vec3>,
    previous: Vec<Vec3>,
}

impl Chain {
    fn new(anchor: Vec3) -> Self {
        // Start swung out sideways so the chain has something to do.
        let links: Vec<_> = (0..CHAIN_LINKS)
            .map(|i| anchor + Vec3::new(i as f32 * LINK_SPACING, 0.0, 0.0))
            .collect();
        Self {
            anchor,
            previous: links.clone(),
            links,
        }
    }

    fn step(&mut self, settings: &SimulationSettings) {
        let force = Vec3::new(settings.wind, settings.gravity, 0.0);
        let damping = 1.0 - settings.friction * 0.02;
        for (link, previous) in self.links.iter_mut().zip(&mut self.previous).skip(1) {
            let current = *link;
            *link += (current - *previous) * damping + force * STEP * STEP;
            *previous = current;
        }
        for _ in 0..8 {
            self.links[0] = self.anchor;
            for i in 1..CHAIN_LINKS {
                let offset = self.links[i] - self.links[i - 1];
                let length = offset.length();
                if length < 1e-6 {
                    continue;
                }
                let correction = offset * ((length - LINK_SPACING) / length);
                if i == 1 {
                    self.links[i] -= correction;
                } else {
                    self.links[i - 1] += correction * 0.5;
                    self.links[i] -= correction * 0.5;
                }
            }
        }
        self.links[0] = self.anchor;
    }

    fn draw(&self, scene: &mut Scene) {
        for (i, &link) in self.links.iter().enumerate() {
            let color = if i == 0 { "#666666" } else { "#cccccc" };
            scene.add(
                SceneObject::new(Geometry::Torus {
                    radius: 0.12,
                    tube: 0.04,
                    radial_segments: 8,
                    tubular_segments: 16,
                })
                .placed(
                    link,
                    Vec3::new(0.0, (i % 2) as f32 * std::f32::consts::FRAC_PI_2, 0.0),
                    1.0,
                )
                .with_material(Material {
                    metalness: 0.9,
                    roughness: 0.3,
                    ..Material::color(hex_color(color))
                }),
            );
        }
    }
}

const BALL_START: Vec3 = Vec3::new(0.0, 5.0, 0.0);
const BALL_MASS: f32 = 2.0;

/// A heavy ball that gets kicked back up whenever it settles.
#[derive(Debug)]
struct Ball {
    body: Body,
    rng: StdRng,
    kicks: u32,
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            body: Body {
                shape: Shape::Sphere,
                position: BALL_START,
                velocity: Vec3::ZERO,
                orientation: Quat::IDENTITY,
                spin: Vec3::ZERO,
                color: hex_color("#ff4444"),
            },
            rng: StdRng::seed_from_u64(0xba11),
            kicks: 0,
        }
    }
}

impl Ball {
    fn step(&mut self, settings: &SimulationSettings) {
        let world = WorldSettings {
            gravity: settings.gravity,
            friction: settings.friction,
            restitution: settings.restitution,
            ..WorldSettings::default()
        };
        let body = &mut self.body;
        body.velocity.x += settings.wind / BALL_MASS * STEP;
        step_bodies(std::slice::from_mut(body), &world);
        if body.grounded() && body.velocity.length() < REST_SPEED * 10.0 {
            let impulse = Vec3::new(
                self.rng.random_range(-3.0..3.0),
                self.rng.random_range(12.0..18.0),
                self.rng.random_range(-3.0..3.0),
            );
            body.velocity += impulse / BALL_MASS;
            body.spin = Vec3::new(impulse.z, 0.0, -impulse.x);
            self.kicks += 1;
        }
    }

    fn draw(&self, scene: &mut Scene) {
        scene.add(
            SceneObject::new(Geometry::sphere(BODY_RADIUS))
                .with_transform(Mat4::from_rotation_translation(
                    self.body.orientation,
                    self.body.position,
                ))
                .with_material(Material {
                    roughness: 0.3,
                    ..Material::color(self.body.color)
                }),
        );
    }
}

#[derive(Debug)]
struct AdvancedPhysics {
    dominoes: DominoRow,
    pendulums: Pendulums,
    chains: Vec<Chain>,
    ball: Ball,
    stepper: Stepper,
}

impl Default for AdvancedPhysics {
    fn default() -> Self {
        Self {
            dominoes: DominoRow::default(),
            pendulums: Pendulums::default(),
            chains: CHAIN_ANCHORS.into_iter().map(Chain::new).collect(),
            ball: Ball::default(),
            stepper: Stepper::default(),
        }
    }
}

impl Sample for AdvancedPhysics {
    fn parameters(&self) -> PanelSpec {
        PanelSpec::of::<AdvancedPhysicsParams>()
    }

    fn surface_config(&self, defaults: &SurfaceConfig) -> SurfaceConfig {
        wide_surface(defaults)
    }

    fn update(&mut self, frame: &FrameInput, panel: &ParameterPanel, scene: &mut Scene) {
        let AdvancedPhysicsParams { simulation } = panel.read();
        let active = simulation.simulation;
        for _ in 0..self.stepper.steps(frame.delta) {
            if active.shows(Simulation::Domino) {
                self.dominoes.step(&simulation);
            }
            if active.shows(Simulation::Pendulum) {
                self.pendulums.step(&simulation);
            }
            if active.shows(Simulation::Chain) {
                for chain in &mut self.chains {
                    chain.step(&simulation);
                }
            }
            if active.shows(Simulation::Interactive) {
                self.ball.step(&simulation);
            }
        }

        scene.light(Light::ambient(0.4));
        scene.light(Light::directional(Vec3::new(10.0, 20.0, 5.0), 1.0));
        if active.shows(Simulation::Domino) {
            self.dominoes.draw(scene);
        }
        if active.shows(Simulation::Pendulum) {
            self.pendulums.draw(scene);
        }
        if active.shows(Simulation::Chain) {
            for chain in &self.chains {
                chain.draw(scene);
            }
        }
        if active.shows(Simulation::Interactive) {
            self.ball.draw(scene);
        }
        scene.add(floor(40.0, GROUND, Material::color(hex_color("#444444"))));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn run(sample: &mut dyn Sample, panel: &ParameterPanel, frames: u32) -> Scene {
        let mut scene = Scene::new();
        let mut frame = FrameInput::default();
        for _ in 0..frames {
            frame = frame.advance(STEP);
            scene.clear();
            sample.update(&frame, panel, &mut scene);
        }
        scene
    }

    #[test]
    fn stepper_caps_long_frames() {
        let mut stepper = Stepper::default();
        assert_eq!(stepper.steps(STEP * 2.5), 2);
        assert_eq!(stepper.steps(10.0), MAX_SUBSTEPS);
    }

    #[test]
    fn bodies_settle_inside_the_box() {
        let world = WorldSettings::default();
        let mut bodies = spawn(&ObjectSettings::default());
        for _ in 0..1200 {
            step_bodies(&mut bodies, &world);
        }
        for body in &bodies {
            assert!(body.position.y >= GROUND + BODY_RADIUS - 1e-3);
            assert!(body.position.x.abs() <= WALL && body.position.z.abs() <= WALL);
            assert!(body.velocity.y.abs() < 1.0);
        }
    }

    #[test]
    fn contact_solver_separates_overlaps() {
        let world = WorldSettings::default();
        let mut bodies = spawn(&ObjectSettings {
            count: 2,
            kind: ObjectKind::Spheres,
        });
        bodies[1].position = bodies[0].position + Vec3::X * 0.2;
        let deepest = resolve_contacts(&mut bodies, &world);
        assert!(deepest < world.tolerance);
        assert!(bodies[0].position.distance(bodies[1].position) >= 2.0 * BODY_RADIUS - 1e-3);
    }

    #[test]
    fn object_settings_respawn_bodies() {
        let mut sample = BasicPhysics::default();
        let mut panel = ParameterPanel::new(sample.parameters());
        let walls = 4;
        assert_eq!(run(&mut sample, &panel, 1).objects.len(), 10 + 1 + walls);
        panel.set("objects", "count", json!(3)).unwrap();
        panel.set("objects", "kind", json!("spheres")).unwrap();
        let scene = run(&mut sample, &panel, 1);
        assert_eq!(scene.objects.len(), 3 + 1 + walls);
        assert!(sample.bodies.iter().all(|b| b.shape == Shape::Sphere));
    }

    #[test]
    fn dominoes_topple_in_order() {
        let settings = SimulationSettings::default();
        let mut row = DominoRow::default();
        for _ in 0..120 {
            row.step(&settings);
        }
        assert!(row.angles[0] > 0.5);
        let fallen = row.angles.iter().take_while(|&&a| a > 0.0).count();
        assert!(row.angles[fallen..].iter().all(|&a| a == 0.0));
        assert!(fallen > 1);
    }

    #[test]
    fn pendulum_swings_symmetrically_without_friction() {
        let settings = SimulationSettings {
            friction: 0.0,
            ..SimulationSettings::default()
        };
        let mut pendulums = Pendulums::default();
        let mut lowest = f32::MAX;
        for _ in 0..600 {
            pendulums.step(&settings);
            lowest = lowest.min(pendulums.angles[0]);
        }
        assert!(lowest < -0.45);
        for (anchor, bob) in pendulums.bobs() {
            assert!((anchor.distance(bob) - PENDULUM_LENGTH).abs() < 1e-4);
        }
    }

    #[test]
    fn chain_hangs_from_its_anchor() {
        let settings = SimulationSettings::default();
        let mut chain = Chain::new(CHAIN_ANCHORS[0]);
        for _ in 0..600 {
            chain.step(&settings);
        }
        assert_eq!(chain.links[0], CHAIN_ANCHORS[0]);
        let bottom = chain.links[CHAIN_LINKS - 1];
        assert!(bottom.y < CHAIN_ANCHORS[0].y - 1.0);
        for pair in chain.links.windows(2) {
            assert!((pair[0].distance(pair[1]) - LINK_SPACING).abs() < 0.05);
        }
    }

    #[test]
    fn wind_pushes_the_chain() {
        let calm = SimulationSettings::default();
        let windy = SimulationSettings {
            wind: 10.0,
            ..calm.clone()
        };
        let mut a = Chain::new(Vec3::ZERO);
        let mut b = Chain::new(Vec3::ZERO);
        for _ in 0..600 {
            a.step(&calm);
            b.step(&windy);
        }
        assert!(b.links[CHAIN_LINKS - 1].x > a.links[CHAIN_LINKS - 1].x + 0.5);
    }

    #[test]
    fn ball_is_kicked_when_it_settles() {
        let settings = SimulationSettings::default();
        let mut ball = Ball::default();
        for _ in 0..1800 {
            ball.step(&settings);
        }
        assert!(ball.kicks > 0);
        assert!(ball.body.position.y >= GROUND + BODY_RADIUS - 1e-3);
    }

    #[test]
    fn simulation_choice_filters_objects() {
        let mut sample = AdvancedPhysics::default();
        let mut panel = ParameterPanel::new(sample.parameters());
        panel
            .set("simulation", "simulation", json!("pendulum"))
            .unwrap();
        let scene = run(&mut sample, &panel, 2);
        // two objects per pendulum plus the floor
        assert_eq!(scene.objects.len(), 3 * 2 + 1);
    }
}
