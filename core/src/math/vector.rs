use nalgebra::Vector3;

/// Unit vector along `v`, or `None` when `v` is zero, subnormal or not finite.
pub fn safe_normal(v: &Vector3<f32>) -> Option<Vector3<f32>> {
    let norm_squared = v.norm_squared();
    if norm_squared.is_finite() && norm_squared >= f32::MIN_POSITIVE {
        Some(v / norm_squared.sqrt())
    } else {
        None
    }
}

/// Mirror `direction` about a surface with unit `normal`.
pub fn reflect(direction: &Vector3<f32>, normal: &Vector3<f32>) -> Vector3<f32> {
    direction - normal * (2.0 * direction.dot(normal))
}
