pub mod features;
pub mod ray;
pub mod sampler;
pub mod sensor;
pub mod tracer;

pub use features::FeatureExtractor;
pub use ray::RayDescriptor;
pub use sampler::RaySampler;
pub use sensor::RadarSensor;
pub use tracer::{FieldOfView, MultiBounceTracer, TraceFault};
