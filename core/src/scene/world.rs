use super::primitives::Primitive;
use super::{ObjectId, RayCastGateway, RayHit, SceneAccess};
use nalgebra::Vector3;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub shape: Primitive,
    /// Linear velocity in scene units per second.
    pub velocity: Vector3<f32>,
}

impl SceneObject {
    pub fn fixed(id: ObjectId, shape: Primitive) -> Self {
        Self {
            id,
            shape,
            velocity: Vector3::zeros(),
        }
    }

    pub fn moving(id: ObjectId, shape: Primitive, velocity: Vector3<f32>) -> Self {
        Self {
            id,
            shape,
            velocity,
        }
    }
}

/// In-memory scene behind a reader/writer lock.
///
/// Trace phases share the read lock; mutations take the write lock and must
/// happen between ticks.
#[derive(Debug, Default)]
pub struct Scene {
    objects: RwLock<Vec<SceneObject>>,
}

struct SceneView<'a> {
    objects: &'a [SceneObject],
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_objects(objects: Vec<SceneObject>) -> Self {
        Self {
            objects: RwLock::new(objects),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<SceneObject>> {
        self.objects.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<SceneObject>> {
        self.objects.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, object: SceneObject) {
        self.write().push(object);
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Updates the velocity of every object with `id`. Returns whether any matched.
    pub fn set_velocity(&self, id: ObjectId, velocity: Vector3<f32>) -> bool {
        let mut matched = false;
        for object in self.write().iter_mut().filter(|object| object.id == id) {
            object.velocity = velocity;
            matched = true;
        }
        matched
    }

    /// Moves every object with `id` by `offset`. Returns whether any matched.
    pub fn translate(&self, id: ObjectId, offset: &Vector3<f32>) -> bool {
        let mut matched = false;
        for object in self.write().iter_mut().filter(|object| object.id == id) {
            object.shape.translate(offset);
            matched = true;
        }
        matched
    }

    /// Integrates every object's velocity over `dt` seconds.
    pub fn advance(&self, dt: f32) {
        for object in self.write().iter_mut() {
            let offset = object.velocity * dt;
            object.shape.translate(&offset);
        }
    }
}

impl RayCastGateway for SceneView<'_> {
    fn cast(
        &self,
        origin: &Vector3<f32>,
        direction: &Vector3<f32>,
        max_distance: f32,
    ) -> Option<RayHit> {
        let mut nearest: Option<(f32, Vector3<f32>, &SceneObject)> = None;
        for object in self.objects {
            let limit = nearest.map_or(max_distance, |(distance, _, _)| distance);
            if let Some((distance, normal)) = object.shape.intersect(origin, direction, limit) {
                nearest = Some((distance, normal, object));
            }
        }
        nearest.map(|(distance, normal, object)| RayHit {
            point: origin + direction * distance,
            normal,
            object: object.id,
            object_velocity: object.velocity,
        })
    }
}

impl SceneAccess for Scene {
    fn with_read_access<R>(&self, f: impl FnOnce(&dyn RayCastGateway) -> R) -> R {
        let guard = self.read();
        let view = SceneView { objects: &guard };
        f(&view)
    }
}
