//! Scene controller: builds the solar system once and advances it every frame.

use engine_core::{Billboard, Body, Name, Orbit, Spin, Transform};
use glam::{Vec2, Vec3};
use hecs::{Entity, World};
use physics::{PickRay, PickingWorld};
use procgen::LabelAtlas;
use rand::Rng;
use renderer::{BodyInstance, Camera, LabelInstance, LightUniform, SceneGeometry};
use std::f64::consts::TAU;

use crate::catalog::{hex_to_linear, planet_color, PlanetSpec};
use crate::speed::SpeedControl;

/// Height of the orbital plane, the orbit rings and the sun.
pub const ORBIT_HEIGHT: f32 = 20.0;
pub const CAMERA_POSITION: Vec3 = Vec3::new(125.0, 80.0, 100.0);

const SUN_RADIUS: f32 = 7.0;
const SUN_COLOR: u32 = 0xffff00;
const ORBIT_RING_COLOR: u32 = 0x444444;
const AMBIENT_COLOR: u32 = 0x404040;
const POINT_LIGHT_INTENSITY: f32 = 2.0;
const POINT_LIGHT_RANGE: f32 = 500.0;

/// World size of a planet label.
const LABEL_SIZE: Vec2 = Vec2::new(16.0, 4.0);
/// Gap between the top of a planet and its label.
const LABEL_GAP: f32 = 3.0;
/// Self-rotation rates are drawn from this range, radians per frame.
const SPIN_RATE_MIN: f32 = 0.01;
const SPIN_RATE_MAX: f32 = 0.03;

/// Owns every scene entity plus the camera and the picking colliders.
///
/// Planet `i` (in catalog order) always pairs with label `i` and pick index `i`.
pub struct SolarScene {
    world: World,
    planets: Vec<Entity>,
    labels: Vec<Entity>,
    sun: Entity,
    camera: Camera,
    picking: PickingWorld,
    stars: Vec<Vec3>,
    rings: Vec<Vec<Vec3>>,
    label_atlas: LabelAtlas,
    hovered: Option<usize>,
}

impl SolarScene {
    /// Build the scene for a surface of `width` x `height` pixels.
    pub fn new<R: Rng + ?Sized>(specs: &[PlanetSpec], star_count: usize, rng: &mut R, width: u32, height: u32) -> Self {
        let mut camera = Camera::new(CAMERA_POSITION);
        camera.look_at(Vec3::ZERO);
        camera.set_aspect(width, height);

        let stars = procgen::generate_starfield(rng, star_count, procgen::STARFIELD_EXTENT);

        let mut world = World::new();
        let sun = world.spawn((
            Name("Sun".to_string()),
            Transform::from_position_scale(Vec3::new(0.0, ORBIT_HEIGHT, 0.0), SUN_RADIUS),
            Body {
                radius: SUN_RADIUS,
                color: hex_to_linear(SUN_COLOR),
                emissive: true,
            },
        ));

        let mut picking = PickingWorld::new();
        let mut planets = Vec::with_capacity(specs.len());
        let mut labels = Vec::with_capacity(specs.len());
        let mut rings = Vec::with_capacity(specs.len());

        for (slot, spec) in specs.iter().enumerate() {
            rings.push(procgen::orbit_ring(spec.distance, ORBIT_HEIGHT, procgen::ORBIT_RING_SEGMENTS));

            let orbit = Orbit::new(spec.distance, rng.gen_range(0.0..TAU), ORBIT_HEIGHT);
            let position = orbit.position();
            let index = picking.add_sphere(position, spec.size);
            debug_assert_eq!(index, slot);

            planets.push(world.spawn((
                Name(spec.name.clone()),
                orbit,
                Spin::new(rng.gen_range(SPIN_RATE_MIN..SPIN_RATE_MAX)),
                Transform::from_position_scale(position, spec.size),
                Body {
                    radius: spec.size,
                    color: planet_color(&spec.name),
                    emissive: false,
                },
            )));

            let mut label = Billboard::new(LABEL_SIZE, slot);
            label.position = label_position(position, spec.size);
            labels.push(world.spawn((label,)));
        }

        let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
        let label_atlas = LabelAtlas::build(&names);

        log::info!(
            "Scene built: {} planets, {} stars, camera aspect {:.3}",
            planets.len(),
            stars.len(),
            camera.aspect
        );

        Self {
            world,
            planets,
            labels,
            sun,
            camera,
            picking,
            stars,
            rings,
            label_atlas,
            hovered: None,
        }
    }

    /// Advance one frame: move planets with the live speeds, re-anchor labels,
    /// then show the label of the planet under the pointer (if any).
    pub fn update(&mut self, speeds: &SpeedControl, pointer_ndc: Option<Vec2>) {
        for (index, &planet) in self.planets.iter().enumerate() {
            let Ok((name, orbit, spin, transform)) = self
                .world
                .query_one_mut::<(&Name, &mut Orbit, &mut Spin, &mut Transform)>(planet)
            else {
                continue;
            };
            orbit.advance(speeds.live(name.as_str()));
            spin.advance();
            transform.position = orbit.position();
            transform.set_yaw(spin.angle);
            self.picking.set_position(index, transform.position);
        }

        for (&planet, &label) in self.planets.iter().zip(&self.labels) {
            let Some((position, radius)) = self.anchor(planet) else {
                continue;
            };
            if let Ok(billboard) = self.world.query_one_mut::<&mut Billboard>(label) {
                billboard.position = label_position(position, radius);
                billboard.visible = false;
            }
        }

        self.hovered = pointer_ndc.and_then(|ndc| self.pick(ndc));
        if let Some(&label) = self.hovered.and_then(|i| self.labels.get(i)) {
            if let Ok(billboard) = self.world.query_one_mut::<&mut Billboard>(label) {
                billboard.visible = true;
            }
        }
    }

    /// Index of the nearest planet under `ndc`.
    fn pick(&mut self, ndc: Vec2) -> Option<usize> {
        let (origin, direction) = self.camera.ray_through_ndc(ndc);
        let far = self.camera.far;
        self.picking
            .pick(PickRay::new(origin, direction), far)
            .map(|hit| hit.index)
    }

    fn anchor(&self, planet: Entity) -> Option<(Vec3, f32)> {
        let transform = self.world.get::<&Transform>(planet).ok()?;
        let body = self.world.get::<&Body>(planet).ok()?;
        Some((transform.position, body.radius))
    }

    /// Track a new surface size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Index of the planet whose label is showing.
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn planet_count(&self) -> usize {
        self.planets.len()
    }

    pub fn orbit(&self, index: usize) -> Option<Orbit> {
        let planet = *self.planets.get(index)?;
        self.world.get::<&Orbit>(planet).ok().map(|o| *o)
    }

    pub fn planet_position(&self, index: usize) -> Option<Vec3> {
        let planet = *self.planets.get(index)?;
        self.world.get::<&Transform>(planet).ok().map(|t| t.position)
    }

    pub fn label(&self, index: usize) -> Option<Billboard> {
        let label = *self.labels.get(index)?;
        self.world.get::<&Billboard>(label).ok().map(|b| *b)
    }

    /// Indices of labels currently shown.
    pub fn visible_labels(&self) -> Vec<usize> {
        (0..self.labels.len())
            .filter(|&i| self.label(i).is_some_and(|b| b.visible))
            .collect()
    }

    /// Sun first, then planets in catalog order.
    pub fn body_instances(&self) -> Vec<BodyInstance> {
        std::iter::once(self.sun)
            .chain(self.planets.iter().copied())
            .filter_map(|entity| {
                let transform = self.world.get::<&Transform>(entity).ok()?;
                let body = self.world.get::<&Body>(entity).ok()?;
                Some(BodyInstance::new(
                    transform.to_matrix().to_cols_array_2d(),
                    body.color,
                    body.emissive,
                ))
            })
            .collect()
    }

    /// Visible labels only.
    pub fn label_instances(&self) -> Vec<LabelInstance> {
        let mut query = self.world.query::<&Billboard>();
        query
            .iter()
            .filter(|(_, b)| b.visible)
            .map(|(_, b)| {
                LabelInstance::new(
                    b.position.to_array(),
                    b.size.to_array(),
                    self.label_atlas.uv_rect(b.atlas_slot),
                )
            })
            .collect()
    }

    pub fn lights(&self) -> LightUniform {
        LightUniform::new(
            hex_to_linear(AMBIENT_COLOR),
            Vec3::ZERO,
            [1.0; 3],
            POINT_LIGHT_INTENSITY,
            POINT_LIGHT_RANGE,
        )
    }

    /// Static geometry for the renderer.
    pub fn geometry(&self) -> SceneGeometry<'_> {
        let ring = hex_to_linear(ORBIT_RING_COLOR);
        SceneGeometry {
            stars: &self.stars,
            star_color: [1.0; 4],
            rings: &self.rings,
            ring_color: [ring[0], ring[1], ring[2], 1.0],
            label_atlas: &self.label_atlas.image,
        }
    }
}

fn label_position(planet: Vec3, radius: f32) -> Vec3 {
    planet + Vec3::new(0.0, radius + LABEL_GAP, 0.0)
}
