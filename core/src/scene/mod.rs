//! Scene queries used by the tracer, plus an in-memory reference scene.
//!
//! The tracer never talks to geometry directly: it asks a [`SceneAccess`] for
//! scoped read access and issues nearest-hit queries through the
//! [`RayCastGateway`] it is handed. Any host engine can sit behind these two traits.

pub mod primitives;
pub mod world;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

pub use primitives::{Aabb, Plane, Primitive, Sphere};
pub use world::{Scene, SceneObject};

/// Opaque reference to an object in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

/// Nearest surface struck by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vector3<f32>,
    /// Surface normal facing the incoming ray.
    pub normal: Vector3<f32>,
    pub object: ObjectId,
    /// Velocity of the struck object in scene units per second.
    pub object_velocity: Vector3<f32>,
}

/// Nearest-hit ray queries. Implementations are queried concurrently by trace workers.
pub trait RayCastGateway: Sync {
    /// First hit along the unit `direction` from `origin`, no further than `max_distance`.
    fn cast(
        &self,
        origin: &Vector3<f32>,
        direction: &Vector3<f32>,
        max_distance: f32,
    ) -> Option<RayHit>;
}

/// Grants scoped read access to a scene.
///
/// The access is held for the whole of `f` and released on every exit path,
/// unwinding included. The scene must not be mutated while it is held.
pub trait SceneAccess {
    fn with_read_access<R>(&self, f: impl FnOnce(&dyn RayCastGateway) -> R) -> R;
}
