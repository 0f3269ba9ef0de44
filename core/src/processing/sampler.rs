use crate::processing::ray::RayDescriptor;
use rand::Rng;
use std::f32::consts::TAU;

/// Draws the per-tick batch of ray parameters from an injected random source.
pub struct RaySampler;

impl RaySampler {
    pub fn sample<R: Rng>(rng: &mut R, count: usize) -> Vec<RayDescriptor> {
        let mut rays = Vec::with_capacity(count);
        Self::sample_into(rng, count, &mut rays);
        rays
    }

    /// Refills `rays` with `count` fresh descriptors, reusing its allocation.
    pub fn sample_into<R: Rng>(rng: &mut R, count: usize, rays: &mut Vec<RayDescriptor>) {
        rays.clear();
        rays.extend((0..count).map(|_| {
            let radius_fraction = rng.gen_range(0.0..1.0);
            let angle = rng.gen_range(0.0..TAU);
            RayDescriptor::new(radius_fraction, angle)
        }));
    }
}
