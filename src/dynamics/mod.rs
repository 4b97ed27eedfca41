mod body;
mod integrator;

pub use body::{Body, BodyRef, BodyType};
pub use integrator::integrate;
