use nalgebra::Vector3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rtradar::scene::{Aabb, ObjectId, Plane, Primitive, Scene, SceneObject, Sphere};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallConfig {
    pub point: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    pub center: [f32; 3],
    pub radius: f32,
    #[serde(default)]
    pub velocity: [f32; 3],
}

/// Layout of the synthetic scene the sensor drives through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Height of the ground plane; `None` leaves the scene without ground.
    pub ground_height: Option<f32>,
    pub walls: Vec<WallConfig>,
    pub targets: Vec<TargetConfig>,
    /// Number of randomly placed static boxes.
    pub clutter: usize,
    /// Clutter is scattered over `[10, extent] x [-extent/2, extent/2]` ahead of the origin.
    pub clutter_extent: f32,
    /// Radius of the sensor body, the surface self-returns strike.
    pub sensor_radius: f32,
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            ground_height: Some(-1.5),
            walls: vec![WallConfig {
                point: [90.0, 0.0, 0.0],
                normal: [-1.0, 0.0, 0.0],
            }],
            targets: vec![
                TargetConfig {
                    center: [40.0, 2.0, 0.0],
                    radius: 1.5,
                    velocity: [-10.0, 0.0, 0.0],
                },
                TargetConfig {
                    center: [25.0, -6.0, 0.0],
                    radius: 1.0,
                    velocity: [0.0, 3.0, 0.0],
                },
            ],
            clutter: 6,
            clutter_extent: 80.0,
            sensor_radius: 0.5,
            seed: 0,
        }
    }
}

/// Builds the scene; the sensor body moves with the trajectory velocity.
pub fn build_scene(
    config: &SceneConfig,
    sensor_id: ObjectId,
    sensor_position: Vector3<f32>,
    sensor_velocity: Vector3<f32>,
) -> Scene {
    let scene = Scene::new();
    scene.insert(SceneObject::moving(
        sensor_id,
        Primitive::Sphere(Sphere {
            center: sensor_position,
            radius: config.sensor_radius,
        }),
        sensor_velocity,
    ));

    let mut next_id = sensor_id.0 + 1;
    let mut allocate = || {
        let id = ObjectId(next_id);
        next_id += 1;
        id
    };

    if let Some(height) = config.ground_height {
        scene.insert(SceneObject::fixed(
            allocate(),
            Primitive::Plane(Plane {
                point: Vector3::new(0.0, 0.0, height),
                normal: Vector3::z(),
            }),
        ));
    }

    for wall in &config.walls {
        scene.insert(SceneObject::fixed(
            allocate(),
            Primitive::Plane(Plane {
                point: Vector3::from(wall.point),
                normal: Vector3::from(wall.normal),
            }),
        ));
    }

    for target in &config.targets {
        scene.insert(SceneObject::moving(
            allocate(),
            Primitive::Sphere(Sphere {
                center: Vector3::from(target.center),
                radius: target.radius,
            }),
            Vector3::from(target.velocity),
        ));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let extent = config.clutter_extent.max(10.0);
    let floor = config.ground_height.unwrap_or(0.0);
    for _ in 0..config.clutter {
        let x = rng.gen_range(10.0..=extent);
        let y = rng.gen_range(-extent / 2.0..=extent / 2.0);
        let half = Vector3::new(
            rng.gen_range(0.5..2.0),
            rng.gen_range(0.5..2.0),
            rng.gen_range(0.5..3.0),
        );
        let base = Vector3::new(x, y, floor + half.z);
        scene.insert(SceneObject::fixed(
            allocate(),
            Primitive::Box(Aabb {
                min: base - half,
                max: base + half,
            }),
        ));
    }

    scene
}
