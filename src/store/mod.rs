//! Generational storage for the world's bodies and colliders.

mod arena;
mod handle;

pub use arena::{Arena, Slot};
pub use handle::Handle;
