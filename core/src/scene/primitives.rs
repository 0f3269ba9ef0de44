use nalgebra::Vector3;

/// Hits closer than this are treated as self-intersections and ignored.
pub const MIN_HIT_DISTANCE: f32 = 1e-6;
/// Self-intersection floor in units of `f32` spacing at the ray origin.
const MIN_HIT_ULPS: f32 = 4.0;
const PARALLEL_EPSILON: f32 = 1e-8;

/// Two-sided infinite plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Vector3<f32>,
    pub normal: Vector3<f32>,
}

/// Sphere, hit only from the outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vector3<f32>,
    pub radius: f32,
}

/// Axis-aligned box, hit only from the outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Plane(Plane),
    Sphere(Sphere),
    Box(Aabb),
}

impl Primitive {
    /// Distance along the unit `direction` to the first surface within `max_distance`,
    /// with the surface normal turned toward the incoming ray.
    pub fn intersect(
        &self,
        origin: &Vector3<f32>,
        direction: &Vector3<f32>,
        max_distance: f32,
    ) -> Option<(f32, Vector3<f32>)> {
        let (distance, normal) = match self {
            Primitive::Plane(plane) => plane.intersect(origin, direction)?,
            Primitive::Sphere(sphere) => sphere.intersect(origin, direction)?,
            Primitive::Box(aabb) => aabb.intersect(origin, direction)?,
        };
        let min_distance = MIN_HIT_DISTANCE.max(origin.amax() * MIN_HIT_ULPS * f32::EPSILON);
        if distance > min_distance && distance <= max_distance {
            Some((distance, normal))
        } else {
            None
        }
    }

    pub fn translate(&mut self, offset: &Vector3<f32>) {
        match self {
            Primitive::Plane(plane) => plane.point += offset,
            Primitive::Sphere(sphere) => sphere.center += offset,
            Primitive::Box(aabb) => {
                aabb.min += offset;
                aabb.max += offset;
            }
        }
    }
}

impl Plane {
    fn intersect(
        &self,
        origin: &Vector3<f32>,
        direction: &Vector3<f32>,
    ) -> Option<(f32, Vector3<f32>)> {
        let normal = self.normal.try_normalize(PARALLEL_EPSILON)?;
        let denom = normal.dot(direction);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        let distance = normal.dot(&(self.point - origin)) / denom;
        let facing = if denom > 0.0 { -normal } else { normal };
        Some((distance, facing))
    }
}

impl Sphere {
    fn intersect(
        &self,
        origin: &Vector3<f32>,
        direction: &Vector3<f32>,
    ) -> Option<(f32, Vector3<f32>)> {
        let offset = origin - self.center;
        let c = offset.norm_squared() - self.radius * self.radius;
        if c <= 0.0 {
            return None;
        }
        let b = offset.dot(direction);
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let distance = -b - discriminant.sqrt();
        let point = origin + direction * distance;
        Some((distance, (point - self.center) / self.radius))
    }
}

impl Aabb {
    fn contains(&self, point: &Vector3<f32>) -> bool {
        (0..3).all(|axis| point[axis] >= self.min[axis] && point[axis] <= self.max[axis])
    }

    fn intersect(
        &self,
        origin: &Vector3<f32>,
        direction: &Vector3<f32>,
    ) -> Option<(f32, Vector3<f32>)> {
        if self.contains(origin) {
            return None;
        }
        let mut enter = f32::NEG_INFINITY;
        let mut exit = f32::INFINITY;
        let mut enter_axis = None;
        for axis in 0..3 {
            if direction[axis].abs() < PARALLEL_EPSILON {
                if origin[axis] < self.min[axis] || origin[axis] > self.max[axis] {
                    return None;
                }
                continue;
            }
            let inverse = 1.0 / direction[axis];
            let near = (self.min[axis] - origin[axis]) * inverse;
            let far = (self.max[axis] - origin[axis]) * inverse;
            let (near, far) = if near > far { (far, near) } else { (near, far) };
            if near > enter {
                enter = near;
                enter_axis = Some(axis);
            }
            exit = exit.min(far);
        }
        let axis = enter_axis?;
        if enter > exit {
            return None;
        }
        let mut normal = Vector3::zeros();
        normal[axis] = -direction[axis].signum();
        Some((enter, normal))
    }
}
