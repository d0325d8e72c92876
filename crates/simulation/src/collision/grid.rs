use std::collections::HashMap;

use super::collider::{Aabb, ColliderId};

/// Integer XZ cell coordinate.
pub type CellKey = (i32, i32);

/// Uniform XZ grid mapping cells to the colliders whose bounds overlap them.
///
/// Cells are stored sparsely, so colliders outside the nominal world extent
/// are still indexed (every collider lands in at least one cell).
#[derive(Debug, Clone)]
pub struct ColliderGrid {
    cell_size: f32,
    cells: HashMap<CellKey, Vec<ColliderId>>,
}

impl ColliderGrid {
    pub fn new(cell_size: f32) -> Self {
        assert!(
            cell_size > 0.0 && cell_size.is_finite(),
            "ColliderGrid: cell size must be positive, got {cell_size}"
        );
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn cell_key(&self, x: f32, z: f32) -> CellKey {
        (
            (x / self.cell_size).floor() as i32,
            (z / self.cell_size).floor() as i32,
        )
    }

    /// Inclusive cell range covered by an XZ rectangle.
    fn cell_range(&self, min_x: f32, min_z: f32, max_x: f32, max_z: f32) -> (CellKey, CellKey) {
        (self.cell_key(min_x, min_z), self.cell_key(max_x, max_z))
    }

    pub fn insert(&mut self, id: ColliderId, bounds: &Aabb) {
        let ((min_cx, min_cz), (max_cx, max_cz)) =
            self.cell_range(bounds.min.x, bounds.min.z, bounds.max.x, bounds.max.z);
        for cz in min_cz..=max_cz {
            for cx in min_cx..=max_cx {
                self.cells.entry((cx, cz)).or_default().push(id);
            }
        }
    }

    /// Colliders indexed in the single cell containing `(x, z)`.
    pub fn cell_at(&self, x: f32, z: f32) -> &[ColliderId] {
        self.cells
            .get(&self.cell_key(x, z))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Visit the collider lists of every cell overlapping the XZ rectangle.
    /// The same collider may be reported by several cells.
    pub fn for_each_in_rect(
        &self,
        min_x: f32,
        min_z: f32,
        max_x: f32,
        max_z: f32,
        mut visit: impl FnMut(&[ColliderId]) -> bool,
    ) {
        let ((min_cx, min_cz), (max_cx, max_cz)) = self.cell_range(min_x, min_z, max_x, max_z);
        for cz in min_cz..=max_cz {
            for cx in min_cx..=max_cx {
                if let Some(ids) = self.cells.get(&(cx, cz)) {
                    if !visit(ids) {
                        return;
                    }
                }
            }
        }
    }

    pub fn cells_containing(&self, id: ColliderId) -> Vec<CellKey> {
        let mut keys: Vec<CellKey> = self
            .cells
            .iter()
            .filter(|(_, ids)| ids.contains(&id))
            .map(|(k, _)| *k)
            .collect();
        keys.sort_unstable();
        keys
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[allow(dead_code)] // only exercised by unit tests
    pub fn entry_count(&self) -> usize {
        self.cells.values().map(|v| v.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Vec3;

    #[test]
    fn test_cell_key_floors_negative_coordinates() {
        let grid = ColliderGrid::new(20.0);
        assert_eq!(grid.cell_key(0.0, 0.0), (0, 0));
        assert_eq!(grid.cell_key(19.9, 39.9), (0, 1));
        assert_eq!(grid.cell_key(-0.1, -20.0), (-1, -1));
        assert_eq!(grid.cell_key(-20.1, 5.0), (-2, 0));
    }

    #[test]
    fn test_insert_spans_exactly_overlapping_cells() {
        let mut grid = ColliderGrid::new(20.0);
        let bounds = Aabb::new(Vec3::new(15.0, 0.0, -5.0), Vec3::new(45.0, 10.0, 5.0));
        grid.insert(ColliderId(0), &bounds);

        // X spans cells 0..=2, Z spans cells -1..=0
        let cells = grid.cells_containing(ColliderId(0));
        assert_eq!(
            cells,
            vec![(0, -1), (0, 0), (1, -1), (1, 0), (2, -1), (2, 0)]
        );
        assert_eq!(grid.entry_count(), 6);
    }

    #[test]
    fn test_small_collider_lands_in_one_cell() {
        let mut grid = ColliderGrid::new(20.0);
        let bounds = Aabb::new(Vec3::new(1.0, 0.0, 1.0), Vec3::new(2.0, 1.0, 2.0));
        grid.insert(ColliderId(3), &bounds);
        assert_eq!(grid.cells_containing(ColliderId(3)), vec![(0, 0)]);
        assert_eq!(grid.cell_at(10.0, 10.0), &[ColliderId(3)]);
        assert!(grid.cell_at(30.0, 10.0).is_empty());
    }

    #[test]
    fn test_rect_visit_stops_early() {
        let mut grid = ColliderGrid::new(10.0);
        for i in 0..4 {
            let x = i as f32 * 10.0 + 1.0;
            grid.insert(
                ColliderId(i),
                &Aabb::new(Vec3::new(x, 0.0, 1.0), Vec3::new(x + 1.0, 1.0, 2.0)),
            );
        }
        let mut visited = 0;
        grid.for_each_in_rect(0.0, 0.0, 39.0, 9.0, |_| {
            visited += 1;
            visited < 2
        });
        assert_eq!(visited, 2);
    }
}
