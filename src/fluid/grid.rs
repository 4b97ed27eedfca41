use rustc_hash::FxHashMap;

use crate::dynamics::BodyRef;
use crate::math::{GridCell, Vec3};

/// Uniform hash grid used for SPH neighbour lookup.
///
/// Cells are cubes whose side equals the smoothing radius, so every
/// particle within the radius of a point lies in the 3x3x3 block of cells
/// around it.
#[derive(Debug, Clone)]
pub struct SpatialHashGrid {
    cell_size: f32,
    cells: FxHashMap<GridCell, Vec<BodyRef>>,
}

impl SpatialHashGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Empties every bucket and adopts a new cell size.
    ///
    /// Buckets that stayed empty for a whole step are dropped, the others
    /// keep their allocation for the next fill.
    pub fn rebuild(&mut self, cell_size: f32) {
        if cell_size != self.cell_size {
            self.cells.clear();
            self.cell_size = cell_size;
            return;
        }
        self.cells.retain(|_, bucket| !bucket.is_empty());
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
    }

    pub fn insert(&mut self, body: BodyRef, position: Vec3) {
        let cell = GridCell::of(position, self.cell_size);
        self.cells.entry(cell).or_default().push(body);
    }

    /// Writes into `out` every body stored in the 27 cells around `position`.
    ///
    /// The result is a superset of the bodies within one cell size;
    /// callers filter by distance.
    pub fn neighbors_into(&self, position: Vec3, out: &mut Vec<BodyRef>) {
        out.clear();
        let center = GridCell::of(position, self.cell_size);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if let Some(bucket) = self.cells.get(&center.offset(dx, dy, dz)) {
                        out.extend_from_slice(bucket);
                    }
                }
            }
        }
    }

    /// Number of bodies currently stored
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.values().all(Vec::is_empty)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}
