pub mod broad_phase;
mod collider;
mod events;
pub mod narrow_phase;

pub use broad_phase::{ColliderEntry, OctTree, OctreeConfig};
pub use collider::{Collider, ColliderPair, ColliderRef};
pub use events::{ContactKind, ContactListener, ContactTracker};
pub use narrow_phase::{Contact, ContactBody};
