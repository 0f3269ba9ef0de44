use crate::math::{reflect, safe_normal};
use crate::prelude::RadarConfig;
use crate::processing::features::FeatureExtractor;
use crate::processing::ray::RayDescriptor;
use crate::scene::{ObjectId, RayCastGateway};
use nalgebra::Vector3;

/// Smallest offset, in scene units, applied along a reflected ray to leave the surface it bounced off.
pub const BOUNCE_EPSILON: f32 = 1e-4;
/// Lift floor in units of `f32` spacing at the hit coordinates.
const BOUNCE_ULPS: f32 = 64.0;

/// Bounce offset at `point`, large enough to clear `f32` rounding at its magnitude.
pub fn bounce_offset(point: &Vector3<f32>) -> f32 {
    BOUNCE_EPSILON.max(point.amax() * BOUNCE_ULPS * f32::EPSILON)
}

/// Per-ray computation fault. The ray is dropped, the tick carries on.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceFault {
    #[error("ray direction has no usable length")]
    DegenerateDirection,
    #[error("sensor pose is not finite")]
    NonFinitePose,
    #[error("hit geometry produced no usable feature")]
    DegenerateFeature,
}

/// Elliptical field-of-view cone used to turn ray parameters into beam directions.
#[derive(Debug, Clone, Copy)]
pub struct FieldOfView {
    max_rx: f32,
    max_ry: f32,
    range: f32,
}

impl FieldOfView {
    pub fn new(horizontal_fov_deg: f32, vertical_fov_deg: f32, range: f32) -> Self {
        Self {
            max_rx: (horizontal_fov_deg * 0.5).to_radians().tan() * range,
            max_ry: (vertical_fov_deg * 0.5).to_radians().tan() * range,
            range,
        }
    }

    /// Unnormalized beam direction in the sensor frame, `+X` along the boresight.
    pub fn local_beam(&self, radius_fraction: f32, angle: f32) -> Vector3<f32> {
        let (sin, cos) = angle.sin_cos();
        Vector3::new(
            1.0,
            self.max_rx * radius_fraction * cos / self.range,
            self.max_ry * radius_fraction * sin / self.range,
        )
    }
}

/// Follows a ray through at most `max_bounces` reflections within the sensor range.
#[derive(Debug, Clone, Copy)]
pub struct MultiBounceTracer {
    fov: FieldOfView,
    max_bounces: u32,
    range: f32,
    sensor: ObjectId,
    features: FeatureExtractor,
}

impl MultiBounceTracer {
    pub fn new(config: &RadarConfig, sensor: ObjectId, features: FeatureExtractor) -> Self {
        let range = config.range_units();
        Self {
            fov: FieldOfView::new(config.horizontal_fov_deg, config.vertical_fov_deg, range),
            max_bounces: config.max_bounces,
            range,
            sensor,
            features,
        }
    }

    /// Traces `ray` and stores the outcome in its trace fields.
    pub fn trace(&self, gateway: &dyn RayCastGateway, ray: &mut RayDescriptor) {
        if let Err(fault) = self.follow(gateway, ray) {
            ray.discard(fault);
        }
    }

    fn follow(&self, gateway: &dyn RayCastGateway, ray: &mut RayDescriptor) -> Result<(), TraceFault> {
        let pose = self.features.pose();
        let mut origin = pose.position;
        if !origin.iter().all(|c| c.is_finite()) {
            return Err(TraceFault::NonFinitePose);
        }
        let beam = self.fov.local_beam(ray.radius_fraction, ray.angle);
        let mut direction =
            safe_normal(&pose.to_world(&beam)).ok_or(TraceFault::DegenerateDirection)?;

        let mut bounces = 0;
        let mut distance = 0.0;
        while bounces < self.max_bounces && distance < self.range {
            let Some(hit) = gateway.cast(&origin, &direction, self.range - distance) else {
                break;
            };
            distance += (hit.point - origin).norm();

            let (azimuth, altitude) = self
                .features
                .azimuth_altitude(&hit.point)
                .ok_or(TraceFault::DegenerateFeature)?;
            let depth = self.features.depth(distance);

            if hit.object == self.sensor {
                ray.record_return(depth, azimuth, altitude);
                return Ok(());
            }

            let velocity = self
                .features
                .relative_velocity(&origin, &hit)
                .ok_or(TraceFault::DegenerateFeature)?;
            ray.record_bounce(depth, velocity, azimuth, altitude);

            let normal = safe_normal(&hit.normal).ok_or(TraceFault::DegenerateDirection)?;
            direction = reflect(&direction, &normal);
            origin = hit.point + direction * bounce_offset(&hit.point);
            bounces += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::SensorPose;
    use crate::processing::RaySampler;
    use crate::scene::{Plane, Primitive, RayHit, Scene, SceneAccess, SceneObject, Sphere};
    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SENSOR: ObjectId = ObjectId(0);

    fn config(range_m: f32, max_bounces: u32) -> RadarConfig {
        RadarConfig {
            range_m,
            max_bounces,
            ..Default::default()
        }
    }

    fn tracer(config: &RadarConfig, pose: SensorPose) -> MultiBounceTracer {
        MultiBounceTracer::new(config, SENSOR, FeatureExtractor::new(pose, 0.1, 1.0))
    }

    fn mirror(id: u64, point: [f32; 3], normal: [f32; 3]) -> SceneObject {
        SceneObject::fixed(
            ObjectId(id),
            Primitive::Plane(Plane {
                point: Vector3::from(point),
                normal: Vector3::from(normal),
            }),
        )
    }

    /// Three tilted mirrors: +X for 10 m, then +Y for 15 m, then +Z for 20 m, then back out along +X.
    fn mirror_corridor() -> Scene {
        Scene::from_objects(vec![
            mirror(1, [10.0, 0.0, 0.0], [-1.0, 1.0, 0.0]),
            mirror(2, [10.0, 15.0, 0.0], [0.0, -1.0, 1.0]),
            mirror(3, [10.0, 15.0, 20.0], [1.0, 0.0, -1.0]),
        ])
    }

    struct AlwaysSensor;

    impl RayCastGateway for AlwaysSensor {
        fn cast(&self, origin: &Vector3<f32>, direction: &Vector3<f32>, _: f32) -> Option<RayHit> {
            Some(RayHit {
                point: origin + direction * 4.0,
                normal: -direction,
                object: SENSOR,
                object_velocity: Vector3::new(3.0, 0.0, 0.0),
            })
        }
    }

    /// Endless corridor: every cast grazes a surface 1 unit ahead and carries straight on.
    struct Mirrors;

    impl RayCastGateway for Mirrors {
        fn cast(&self, origin: &Vector3<f32>, direction: &Vector3<f32>, max: f32) -> Option<RayHit> {
            (max >= 1.0).then(|| RayHit {
                point: origin + direction,
                normal: direction.cross(&Vector3::z()).normalize(),
                object: ObjectId(9),
                object_velocity: Vector3::zeros(),
            })
        }
    }

    #[test]
    fn boresight_ray_points_along_x() {
        let fov = FieldOfView::new(30.0, 20.0, 100.0);
        assert_relative_eq!(fov.local_beam(0.0, 1.3), Vector3::x());

        let edge = fov.local_beam(1.0, 0.0);
        assert_relative_eq!(edge.y, 15f32.to_radians().tan(), epsilon = 1e-6);
        assert_relative_eq!(edge.z, 0.0);
    }

    #[test]
    fn three_mirrors_give_cumulative_depths() {
        let config = config(50.0, 3);
        let tracer = tracer(&config, SensorPose::default());
        let mut ray = RayDescriptor::new(0.0, 0.0);

        mirror_corridor().with_read_access(|gateway| tracer.trace(gateway, &mut ray));

        assert!(ray.hit);
        assert!(!ray.returned_to_sensor);
        assert_eq!(ray.bounce_count(), 3);
        let depths: Vec<f32> = ray.detections().map(|d| d.depth).collect();
        assert_eq!(depths.len(), 3);
        for (depth, expected) in depths.iter().zip([10.0, 25.0, 45.0]) {
            assert_relative_eq!(*depth, expected, epsilon = 1e-2);
        }
    }

    #[test]
    fn echo_off_wall_then_return_keeps_trace_order() {
        let config = config(50.0, 3);
        let tracer = tracer(&config, SensorPose::default());
        let scene = Scene::from_objects(vec![
            SceneObject::fixed(
                SENSOR,
                Primitive::Sphere(Sphere {
                    center: Vector3::zeros(),
                    radius: 1.0,
                }),
            ),
            SceneObject::moving(
                ObjectId(1),
                Primitive::Plane(Plane {
                    point: Vector3::new(10.0, 0.0, 0.0),
                    normal: -Vector3::x(),
                }),
                Vector3::new(-2.0, 0.0, 0.0),
            ),
        ]);
        let mut ray = RayDescriptor::new(0.0, 0.0);

        scene.with_read_access(|gateway| tracer.trace(gateway, &mut ray));

        assert!(ray.hit);
        assert!(ray.returned_to_sensor);
        assert_eq!(ray.bounce_count(), 1);
        let detections: Vec<_> = ray.detections().collect();
        assert_eq!(detections.len(), 2);
        assert_relative_eq!(detections[0].depth, 10.0, epsilon = 1e-3);
        assert_relative_eq!(detections[0].velocity, 2.0, epsilon = 1e-4);
        assert_relative_eq!(detections[1].depth, 19.0, epsilon = 1e-3);
        assert_eq!(detections[1].velocity, 0.0);
        assert_relative_eq!(detections[1].azimuth, 0.0, epsilon = 1e-4);
        assert_relative_eq!(ray.total_distance, detections[1].depth);
    }

    #[test]
    fn centimetre_scene_wall_echoes_once_per_ray() {
        let config = RadarConfig {
            range_m: 100.0,
            max_bounces: 3,
            meters_per_unit: 0.01,
            ..Default::default()
        };
        let tracer = MultiBounceTracer::new(
            &config,
            SENSOR,
            FeatureExtractor::new(SensorPose::default(), 0.1, config.meters_per_unit),
        );
        let scene = Scene::from_objects(vec![mirror(1, [4_000.0, 0.0, 0.0], [-1.0, 0.3, 0.1])]);
        let mut rays = RaySampler::sample(&mut StdRng::seed_from_u64(17), 200);

        scene.with_read_access(|gateway| {
            for ray in rays.iter_mut() {
                tracer.trace(gateway, ray);
            }
        });

        for ray in &rays {
            assert_eq!(ray.fault, None);
            let depths: Vec<f32> = ray.detections().map(|d| d.depth).collect();
            assert_eq!(depths.len(), 1);
            assert!((36.0..46.0).contains(&depths[0]), "depth {}", depths[0]);
        }
    }

    #[test]
    fn bounce_offset_grows_with_coordinates() {
        assert_eq!(bounce_offset(&Vector3::new(1.0, -2.0, 0.5)), BOUNCE_EPSILON);
        let far = Vector3::new(-10_000.0, 0.0, 0.0);
        assert!(bounce_offset(&far) > 10_000.0 * f32::EPSILON * 8.0);
    }

    #[test]
    fn range_limits_the_path() {
        let config = config(30.0, 3);
        let tracer = tracer(&config, SensorPose::default());
        let mut ray = RayDescriptor::new(0.0, 0.0);

        mirror_corridor().with_read_access(|gateway| tracer.trace(gateway, &mut ray));

        let depths: Vec<f32> = ray.detections().map(|d| d.depth).collect();
        assert_eq!(depths.len(), 2);
        assert!(depths.iter().all(|&d| d <= 30.0 + 1e-3));
    }

    #[test]
    fn first_hit_on_sensor_is_a_single_zero_velocity_return() {
        let config = config(50.0, 3);
        let tracer = tracer(&config, SensorPose::default());
        let mut ray = RayDescriptor::new(0.3, 2.0);

        tracer.trace(&AlwaysSensor, &mut ray);

        let detections: Vec<_> = ray.detections().collect();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].velocity, 0.0);
        assert_relative_eq!(detections[0].depth, 4.0, epsilon = 1e-4);
        assert!(ray.returned_to_sensor);
        assert!(!ray.hit);
    }

    #[test]
    fn bounce_count_never_exceeds_limit() {
        for max_bounces in [0, 1, 3, 7] {
            let config = config(1_000.0, max_bounces);
            let tracer = tracer(&config, SensorPose::default());
            let mut ray = RayDescriptor::new(0.9, 4.0);
            tracer.trace(&Mirrors, &mut ray);
            assert_eq!(ray.bounce_count(), max_bounces as usize);
        }
    }

    #[test]
    fn empty_scene_yields_nothing() {
        let config = config(50.0, 3);
        let tracer = tracer(&config, SensorPose::default());
        let mut ray = RayDescriptor::new(0.5, 0.5);
        Scene::new().with_read_access(|gateway| tracer.trace(gateway, &mut ray));
        assert_eq!(ray.detections().count(), 0);
        assert!(ray.fault.is_none());
    }

    #[test]
    fn non_finite_pose_faults_only_that_ray() {
        let config = config(50.0, 3);
        let pose = SensorPose::stationary(
            Vector3::new(f32::NAN, 0.0, 0.0),
            UnitQuaternion::identity(),
        );
        let tracer = tracer(&config, pose);
        let mut ray = RayDescriptor::new(0.5, 0.5);
        tracer.trace(&Mirrors, &mut ray);
        assert_eq!(ray.fault, Some(TraceFault::NonFinitePose));
        assert_eq!(ray.detections().count(), 0);
    }
}
