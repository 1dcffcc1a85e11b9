//! # Cell index (neighbourhood global)
//!
//! A rectilinear spatial hash with an intrusive linked list per cell: each
//! particle id is both an index into a parallel `next: i32` vector (design
//! note (a) — predictable O(1) transit, a direct port of the
//! `partCellData[...].next` / `cells[id].list` pattern) and the payload a
//! cell's own head pointer refers to. `CELL` events keep the neighbour list
//! consistent as particles move: a particle "transits" when its streamed
//! position leaves the cell's *extended* domain (lattice cell plus the
//! overlap margin `λ`), at which point only the newly-entered shell of
//! cells needs a new-neighbour notification, not the whole `(2k+1)³` cube.

#[cfg(test)]
mod tests;

use crate::error::EdmdError;
use crate::liouvillean::Liouvillean;
use crate::observer::ObserverBus;
use crate::particle::{Particle, ParticleId};
use crate::vector::Vec3;

const MAX_CELLS_PER_AXIS: usize = 200;
const MIN_CELLS_PER_AXIS: usize = 3;

/// A single cell in the lattice.
#[derive(Debug, Clone)]
pub struct Cell {
    /// Integer lattice coordinate `(x, y, z)`.
    pub coords: [i32; 3],
    /// Position of the cell's lower corner in simulation coordinates.
    pub origin: Vec3,
    /// Head of the intrusive linked list of resident particle ids, or `-1`
    /// if the cell is empty.
    pub head: i32,
    /// Local object ids (walls, plates) whose extended domain overlaps this
    /// cell.
    pub locals: Vec<u32>,
}

/// Outcome of a `CELL` event's bookkeeping, returned to the caller so it can
/// re-predict and re-enqueue the particle's next `CELL` event (the cell
/// grid itself does not own the scheduler).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellTransit {
    /// Cell the particle resided in before the transit.
    pub old_cell: usize,
    /// Cell the particle resides in after the transit.
    pub new_cell: usize,
}

/// The spatial hash: a lattice of [`Cell`]s plus the intrusive per-particle
/// list pointers and current-cell lookup.
pub struct CellGrid {
    cell_count: [usize; 3],
    lattice_width: Vec3,
    cell_dimension: Vec3,
    lambda: f64,
    overlink: usize,
    box_lengths: Vec3,
    cells: Vec<Cell>,
    next: Vec<i32>,
    particle_cell: Vec<usize>,
}

fn wrap_coord(c: i32, count: usize) -> i32 {
    let n = count as i32;
    ((c % n) + n) % n
}

fn axis_of(v: Vec3, axis: usize) -> f64 {
    match axis {
        0 => v.x,
        1 => v.y,
        _ => v.z,
    }
}

impl CellGrid {
    /// Builds the lattice for interaction range `d_max`, with box side
    /// lengths `box_lengths`, overlap fraction `lambda ∈ [0,1]` and overlink
    /// `overlink ≥ 1`, then assigns every particle in `positions` to its
    /// cell.
    ///
    /// `N_i = floor(L_i / (d_max / overlink))`; a side with fewer than 3
    /// cells is a [`EdmdError::ConfigError`] (scenario 6 in the testable
    /// properties); a side with more than 200 is silently clamped, as in
    /// the source (`addCells`).
    pub fn initialise(
        positions: &[Vec3],
        d_max: f64,
        box_lengths: Vec3,
        lambda: f64,
        overlink: usize,
    ) -> Result<Self, EdmdError> {
        if !(0.0..=1.0).contains(&lambda) {
            return Err(EdmdError::ConfigError(format!(
                "Lambda out of bounds [0,1]: {lambda}"
            )));
        }
        if overlink < 1 {
            return Err(EdmdError::ConfigError(
                "OverLink must be >= 1".to_string(),
            ));
        }

        let max_cell_width = d_max / overlink as f64;
        let mut cell_count = [0usize; 3];
        for (axis, count) in cell_count.iter_mut().enumerate() {
            let length = axis_of(box_lengths, axis);
            let mut n = (length / max_cell_width).floor() as i64;
            if n < MIN_CELLS_PER_AXIS as i64 {
                return Err(EdmdError::ConfigError(format!(
                    "not enough cells on axis {axis}, need {MIN_CELLS_PER_AXIS}+, got {n}"
                )));
            }
            if n > MAX_CELLS_PER_AXIS as i64 {
                log::info!(
                    "cell count on axis {axis} was {n}, clamping to {MAX_CELLS_PER_AXIS}"
                );
                n = MAX_CELLS_PER_AXIS as i64;
            }
            *count = n as usize;
        }

        let lattice_width = Vec3::new(
            box_lengths.x / cell_count[0] as f64,
            box_lengths.y / cell_count[1] as f64,
            box_lengths.z / cell_count[2] as f64,
        );
        let cell_dimension = Vec3::new(
            lattice_width.x + (lattice_width.x - d_max) * lambda,
            lattice_width.y + (lattice_width.y - d_max) * lambda,
            lattice_width.z + (lattice_width.z - d_max) * lambda,
        );

        let n_cells = cell_count[0] * cell_count[1] * cell_count[2];
        let mut cells = Vec::with_capacity(n_cells);
        for id in 0..n_cells {
            let coords = coords_from_id(id, cell_count);
            let origin = Vec3::new(
                coords[0] as f64 * lattice_width.x - 0.5 * box_lengths.x,
                coords[1] as f64 * lattice_width.y - 0.5 * box_lengths.y,
                coords[2] as f64 * lattice_width.z - 0.5 * box_lengths.z,
            );
            cells.push(Cell {
                coords,
                origin,
                head: -1,
                locals: Vec::new(),
            });
        }

        let mut grid = CellGrid {
            cell_count,
            lattice_width,
            cell_dimension,
            lambda,
            overlink,
            box_lengths,
            cells,
            next: vec![-1; positions.len()],
            particle_cell: vec![0; positions.len()],
        };

        for (id, &pos) in positions.iter().enumerate() {
            let cell_id = grid.get_cell_id(pos);
            grid.add_to_cell(id as ParticleId, cell_id);
        }

        Ok(grid)
    }

    /// Rebuilds the lattice for a new `d_max` (e.g. after an interaction
    /// catalogue change makes `getMaxSupportedInteractionLength()` too
    /// small), re-seating every particle from `positions`.
    pub fn reinitialise(&mut self, positions: &[Vec3], d_max: f64) -> Result<(), EdmdError> {
        *self = CellGrid::initialise(positions, d_max, self.box_lengths, self.lambda, self.overlink)?;
        Ok(())
    }

    /// Box side lengths this grid was built for.
    pub fn box_lengths(&self) -> Vec3 {
        self.box_lengths
    }

    /// Number of cells along each axis.
    pub fn cell_count(&self) -> [usize; 3] {
        self.cell_count
    }

    /// Extended cell box dimensions `D_i`.
    pub fn cell_dimension(&self) -> Vec3 {
        self.cell_dimension
    }

    /// Row-major cell id for a position, with periodic wrap.
    pub fn get_cell_id(&self, pos: Vec3) -> usize {
        let coords = [
            ((pos.x + 0.5 * self.box_lengths.x) / self.lattice_width.x).floor() as i32,
            ((pos.y + 0.5 * self.box_lengths.y) / self.lattice_width.y).floor() as i32,
            ((pos.z + 0.5 * self.box_lengths.z) / self.lattice_width.z).floor() as i32,
        ];
        self.get_cell_id_wrapped(coords)
    }

    fn get_cell_id_wrapped(&self, coords: [i32; 3]) -> usize {
        let wrapped = [
            wrap_coord(coords[0], self.cell_count[0]),
            wrap_coord(coords[1], self.cell_count[1]),
            wrap_coord(coords[2], self.cell_count[2]),
        ];
        self.get_cell_id_prebounded(wrapped)
    }

    /// Row-major cell id from already-wrapped coordinates: `id = x + Nx*(y + Ny*z)`.
    pub fn get_cell_id_prebounded(&self, coords: [i32; 3]) -> usize {
        coords[0] as usize
            + self.cell_count[0] * (coords[1] as usize + self.cell_count[1] * coords[2] as usize)
    }

    /// Cell id of the resident cell currently stored for particle `p`.
    pub fn particle_cell(&self, p: ParticleId) -> usize {
        self.particle_cell[p as usize]
    }

    /// Inserts `p` at the head of cell `cell_id`'s intrusive list.
    pub fn add_to_cell(&mut self, p: ParticleId, cell_id: usize) {
        self.next[p as usize] = self.cells[cell_id].head;
        self.cells[cell_id].head = p as i32;
        self.particle_cell[p as usize] = cell_id;
    }

    /// Removes `p` from cell `cell_id`'s intrusive list.
    pub fn remove_from_cell(&mut self, p: ParticleId, cell_id: usize) {
        let mut cursor = self.cells[cell_id].head;
        if cursor == p as i32 {
            self.cells[cell_id].head = self.next[p as usize];
            return;
        }
        while cursor >= 0 {
            let next_id = self.next[cursor as usize];
            if next_id == p as i32 {
                self.next[cursor as usize] = self.next[p as usize];
                return;
            }
            cursor = next_id;
        }
    }

    /// `CELL` event time for `p`: `squareCellCollision2(p) - particleDelay(p)`,
    /// measured from the global time `t` (so the event fires at `t + dt`).
    pub fn get_event_time(&self, p: &Particle, liouvillean: &dyn Liouvillean, t: f64) -> f64 {
        let cell_id = self.particle_cell(p.id);
        let origin = self.cells[cell_id].origin;
        let exit_time = liouvillean.square_cell_collision_2(p, origin, self.cell_dimension, t);
        exit_time - liouvillean.particle_delay(p, t)
    }

    /// Executes `p`'s `CELL` event: determines the transit axis, moves `p`'s
    /// intrusive slot to its new resident cell, and fires `new-neighbour`,
    /// `new-local` and `cell-change` signals for exactly the shell of cells
    /// that newly enters `p`'s interaction neighbourhood.
    pub fn run_event(
        &mut self,
        p: &mut Particle,
        liouvillean: &dyn Liouvillean,
        t: f64,
        observers: &mut ObserverBus,
    ) -> CellTransit {
        liouvillean.update(p, t);

        let old_cell = self.particle_cell(p.id);
        let old_coords = self.cells[old_cell].coords;
        let axis = {
            let origin = self.cells[old_cell].origin;
            liouvillean.square_cell_collision_3(p, origin, self.cell_dimension, t)
        };
        let dir: i32 = if axis_of(p.velocity, axis) > 0.0 { 1 } else { -1 };

        let mut end_coords = old_coords;
        end_coords[axis] = wrap_coord(old_coords[axis] + dir, self.cell_count[axis]);
        let new_cell = self.get_cell_id_prebounded(end_coords);

        let mut shell_coords = old_coords;
        shell_coords[axis] = wrap_coord(
            old_coords[axis] + dir * (1 + self.overlink as i32),
            self.cell_count[axis],
        );

        let (d1, d2) = match axis {
            0 => (1usize, 2usize),
            1 => (2usize, 0usize),
            _ => (0usize, 1usize),
        };
        let k = self.overlink as i32;
        for o1 in -k..=k {
            for o2 in -k..=k {
                let mut coords = shell_coords;
                coords[d1] = wrap_coord(shell_coords[d1] + o1, self.cell_count[d1]);
                coords[d2] = wrap_coord(shell_coords[d2] + o2, self.cell_count[d2]);
                let nb = self.get_cell_id_prebounded(coords);
                let mut cursor = self.cells[nb].head;
                while cursor >= 0 {
                    if cursor != p.id as i32 {
                        observers.fire_new_neighbour(p.id, cursor as ParticleId);
                    }
                    cursor = self.next[cursor as usize];
                }
            }
        }

        for local_id in self.cells[new_cell].locals.clone() {
            observers.fire_new_local(p.id, local_id);
        }

        self.remove_from_cell(p.id, old_cell);
        self.add_to_cell(p.id, new_cell);

        observers.fire_cell_change(p.id, old_cell as u64);

        CellTransit { old_cell, new_cell }
    }

    /// Invokes `visit(q)` for every resident `q != p` in the `(2k+1)³` cube
    /// of cells centred on `p`'s cell, in deterministic z-outer, y-middle,
    /// x-inner, cell-list order.
    pub fn get_particle_neighbourhood(&self, p: ParticleId, mut visit: impl FnMut(ParticleId)) {
        let coords = self.cells[self.particle_cell(p)].coords;
        let k = self.overlink as i32;
        for oz in -k..=k {
            let z = wrap_coord(coords[2] + oz, self.cell_count[2]);
            for oy in -k..=k {
                let y = wrap_coord(coords[1] + oy, self.cell_count[1]);
                for ox in -k..=k {
                    let x = wrap_coord(coords[0] + ox, self.cell_count[0]);
                    let cell_id = self.get_cell_id_prebounded([x, y, z]);
                    let mut cursor = self.cells[cell_id].head;
                    while cursor >= 0 {
                        if cursor != p as i32 {
                            visit(cursor as ParticleId);
                        }
                        cursor = self.next[cursor as usize];
                    }
                }
            }
        }
    }

    /// Attaches local object `local_id` to every cell whose extended
    /// domain overlaps `[origin, origin + extent]`, per `addLocalEvents`.
    pub fn add_local(&mut self, local_id: u32, is_in_cell: impl Fn(Vec3, Vec3) -> bool) {
        for cell in self.cells.iter_mut() {
            if is_in_cell(cell.origin, self.cell_dimension) {
                cell.locals.push(local_id);
            }
        }
    }

    /// Largest interaction length this lattice can support without a
    /// rebuild: the narrowest extended-cell margin across axes.
    pub fn get_max_supported_interaction_length(&self) -> f64 {
        let widths = [self.lattice_width.x, self.lattice_width.y, self.lattice_width.z];
        let dims = [self.cell_dimension.x, self.cell_dimension.y, self.cell_dimension.z];
        let mut min_axis = 0;
        for axis in 1..3 {
            if dims[axis] < dims[min_axis] {
                min_axis = axis;
            }
        }
        widths[min_axis] + self.lambda * (widths[min_axis] - dims[min_axis])
    }

    /// Read-only access to a cell, for inspection/tests.
    pub fn cell(&self, id: usize) -> &Cell {
        &self.cells[id]
    }

    /// Number of cells in the lattice.
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }
}

fn coords_from_id(id: usize, cell_count: [usize; 3]) -> [i32; 3] {
    let mut i = id;
    let x = (i % cell_count[0]) as i32;
    i /= cell_count[0];
    let y = (i % cell_count[1]) as i32;
    i /= cell_count[1];
    let z = (i % cell_count[2]) as i32;
    [x, y, z]
}
