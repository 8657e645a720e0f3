/// Broad-phase collision support.
///
/// `SpatialIndex` buckets axis-aligned boxes into a uniform grid.  Shapes are
/// stored in a slot map and addressed by `ShapeHandle`; a side table maps each
/// `EntityId` to its handle so entities themselves stay plain data.

use std::collections::{HashMap, HashSet};

use slotmap::{new_key_type, SlotMap};

use crate::entities::EntityId;

new_key_type! {
    /// Handle to a shape registered in a `SpatialIndex`.
    pub struct ShapeHandle;
}

// ── Axis-aligned boxes ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Aabb {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Aabb { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Strict overlap on both axes.  Boxes that only share an edge do not
    /// intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

// ── Grid index ────────────────────────────────────────────────────────────────

type Cell = (i32, i32);

/// Upper bound on the preallocation for one box's cell list.
const MAX_CAPACITY_HINT: i64 = 64;

#[derive(Clone, Debug)]
struct Shape {
    owner: EntityId,
    bounds: Aabb,
}

#[derive(Clone, Debug)]
pub struct SpatialIndex {
    cell_size: f64,
    shapes: SlotMap<ShapeHandle, Shape>,
    by_entity: HashMap<EntityId, ShapeHandle>,
    cells: HashMap<Cell, Vec<ShapeHandle>>,
}

impl SpatialIndex {
    /// `cell_size` must be positive.
    pub fn new(cell_size: f64) -> Self {
        SpatialIndex {
            cell_size,
            shapes: SlotMap::with_key(),
            by_entity: HashMap::new(),
            cells: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.by_entity.contains_key(&id)
    }

    pub fn handle_of(&self, id: EntityId) -> Option<ShapeHandle> {
        self.by_entity.get(&id).copied()
    }

    pub fn bounds_of(&self, id: EntityId) -> Option<Aabb> {
        let handle = self.by_entity.get(&id)?;
        self.shapes.get(*handle).map(|s| s.bounds)
    }

    /// Register a shape for `id`.  Re-registering an id just moves its shape.
    pub fn insert(&mut self, id: EntityId, bounds: Aabb) -> ShapeHandle {
        if let Some(handle) = self.handle_of(id) {
            self.update(id, bounds);
            return handle;
        }
        let handle = self.shapes.insert(Shape { owner: id, bounds });
        for cell in self.cells_for(&bounds) {
            self.cells.entry(cell).or_default().push(handle);
        }
        self.by_entity.insert(id, handle);
        handle
    }

    /// Move the shape of `id`.  Returns `false` if `id` is not registered.
    pub fn update(&mut self, id: EntityId, bounds: Aabb) -> bool {
        let Some(handle) = self.handle_of(id) else {
            return false;
        };
        let old = match self.shapes.get_mut(handle) {
            Some(shape) => std::mem::replace(&mut shape.bounds, bounds),
            None => return false,
        };

        let old_cells = self.cells_for(&old);
        let new_cells = self.cells_for(&bounds);
        if old_cells != new_cells {
            self.unlink(handle, &old_cells);
            for cell in new_cells {
                self.cells.entry(cell).or_default().push(handle);
            }
        }
        true
    }

    /// Deregister the shape of `id`.  Returns `false` if it was not registered.
    pub fn remove(&mut self, id: EntityId) -> bool {
        let Some(handle) = self.by_entity.remove(&id) else {
            return false;
        };
        if let Some(shape) = self.shapes.remove(handle) {
            let cells = self.cells_for(&shape.bounds);
            self.unlink(handle, &cells);
        }
        true
    }

    /// Entities whose shapes share at least one grid cell with `bounds`.
    /// This is a superset of the actual overlaps; callers still run the
    /// exact box test.
    pub fn query(&self, bounds: &Aabb) -> HashSet<EntityId> {
        let mut found = HashSet::new();
        for cell in self.cells_for(bounds) {
            if let Some(handles) = self.cells.get(&cell) {
                found.extend(
                    handles
                        .iter()
                        .filter_map(|h| self.shapes.get(*h))
                        .map(|s| s.owner),
                );
            }
        }
        found
    }

    fn cell_coord(&self, v: f64) -> i32 {
        (v / self.cell_size).floor() as i32
    }

    fn cells_for(&self, bounds: &Aabb) -> Vec<Cell> {
        let (x0, x1) = (self.cell_coord(bounds.x), self.cell_coord(bounds.right()));
        let (y0, y1) = (self.cell_coord(bounds.y), self.cell_coord(bounds.bottom()));
        let across = (i64::from(x1) - i64::from(x0) + 1).max(1);
        let down = (i64::from(y1) - i64::from(y0) + 1).max(1);
        let hint = across.saturating_mul(down).min(MAX_CAPACITY_HINT);
        let mut cells = Vec::with_capacity(hint as usize);
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                cells.push((cx, cy));
            }
        }
        cells
    }

    fn unlink(&mut self, handle: ShapeHandle, cells: &[Cell]) {
        for cell in cells {
            if let Some(bucket) = self.cells.get_mut(cell) {
                bucket.retain(|h| *h != handle);
                if bucket.is_empty() {
                    self.cells.remove(cell);
                }
            }
        }
    }

    /// Number of non-empty grid buckets.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }
}
