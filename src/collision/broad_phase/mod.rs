mod octree;

pub use octree::{ColliderEntry, OctTree, OctreeConfig, MAX_SUPPORTED_DEPTH};
