//! Flat-top, odd-q offset hex coordinate math: offset<->axial conversion,
//! neighbor tables, pixel<->hex conversion, and cluster-at-pixel lookup
//! for host hit-testing.
//!
//! Columns are the outer index; `col & 1` selects the neighbor-delta table
//! (even columns vs. odd columns are offset differently on screen).

/// A point in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

const SQRT_3: f32 = 1.732_050_8;

/// Neighbor deltas `(dcol, drow)` in clockwise order, for even and odd
/// columns. `neighbors(col,row)[(i+1) % 6]` is guaranteed mutually
/// adjacent to `neighbors(col,row)[i]` and to the center — this ordering
/// is part of the ABI and is relied on by triangle matching and cluster
/// rotation.
const EVEN_COL_DELTAS: [(i32, i32); 6] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (0, 1),
];

const ODD_COL_DELTAS: [(i32, i32); 6] = [
    (1, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
];

/// Axial coordinates for a hex cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Axial {
    pub q: i32,
    pub r: i32,
}

/// Convert offset (col, row) to axial (q, r) for odd-q offset layout.
pub fn offset_to_axial(col: i32, row: i32) -> Axial {
    let r = row - (col - (col & 1)) / 2;
    Axial { q: col, r }
}

/// Inverse of [`offset_to_axial`].
pub fn axial_to_offset(a: Axial) -> (i32, i32) {
    let col = a.q;
    let row = a.r + (a.q - (a.q & 1)) / 2;
    (col, row)
}

/// Pure coordinate math for the board grid. Carries no state of its own —
/// every operation is a function of its inputs.
pub struct HexGeometry {
    pub cols: usize,
    pub rows: usize,
}

impl HexGeometry {
    pub fn new(cols: usize, rows: usize) -> Self {
        HexGeometry { cols, rows }
    }

    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && (col as usize) < self.cols && (row as usize) < self.rows
    }

    /// The six neighbors of `(col,row)`, clockwise, honoring the fixed
    /// ordering from the ABI-level delta tables. Always returns 6 entries;
    /// entries that fall outside the board are `None`.
    pub fn neighbors(&self, col: i32, row: i32) -> [Option<(i32, i32)>; 6] {
        let deltas = if col & 1 == 0 {
            &EVEN_COL_DELTAS
        } else {
            &ODD_COL_DELTAS
        };
        let mut out = [None; 6];
        for (i, (dc, dr)) in deltas.iter().enumerate() {
            let (nc, nr) = (col + dc, row + dr);
            out[i] = if self.in_bounds(nc, nr) {
                Some((nc, nr))
            } else {
                None
            };
        }
        out
    }

    /// Raw neighbor deltas for `(col,row)`, ignoring bounds — used where a
    /// caller needs the coordinate even if it's off-board (e.g. to reject a
    /// candidate triangle).
    pub fn neighbor_coords(&self, col: i32, row: i32) -> [(i32, i32); 6] {
        let deltas = if col & 1 == 0 {
            &EVEN_COL_DELTAS
        } else {
            &ODD_COL_DELTAS
        };
        let mut out = [(0, 0); 6];
        for (i, (dc, dr)) in deltas.iter().enumerate() {
            out[i] = (col + dc, row + dr);
        }
        out
    }

    pub fn hex_to_pixel(&self, col: i32, row: i32, origin: Point, size: f32) -> Point {
        let x = origin.x + col as f32 * size * 1.5;
        let extra = if col & 1 != 0 { SQRT_3 / 2.0 * size } else { 0.0 };
        let y = origin.y + row as f32 * SQRT_3 * size + extra;
        Point { x, y }
    }

    /// Inverse of [`Self::hex_to_pixel`] via fractional axial rounding.
    /// Returns `None` if the nearest hex falls outside the board.
    pub fn pixel_to_hex(&self, p: Point, origin: Point, size: f32) -> Option<(i32, i32)> {
        let dx = p.x - origin.x;
        let dy = p.y - origin.y;
        let q = (2.0 / 3.0 * dx) / size;
        let r = (-1.0 / 3.0 * dx + SQRT_3 / 3.0 * dy) / size;
        let (rq, rr) = round_axial(q, r);
        let (col, row) = axial_to_offset(Axial { q: rq, r: rr });
        if self.in_bounds(col, row) {
            Some((col, row))
        } else {
            None
        }
    }

    /// Find the triangle-selection cluster under a pixel: compute the hex
    /// beneath it, then among the six triangles `(C, N_i, N_{i+1 mod 6})`
    /// pick the one whose centroid is nearest the pixel. Rejects any
    /// triangle with an out-of-bounds member.
    pub fn find_cluster_at_pixel(
        &self,
        p: Point,
        origin: Point,
        size: f32,
    ) -> Option<[(i32, i32); 3]> {
        let (col, row) = self.pixel_to_hex(p, origin, size)?;
        let ring = self.neighbor_coords(col, row);

        let mut best: Option<([(i32, i32); 3], f32)> = None;
        for i in 0..6 {
            let a = ring[i];
            let b = ring[(i + 1) % 6];
            if !self.in_bounds(a.0, a.1) || !self.in_bounds(b.0, b.1) {
                continue;
            }
            let pc = self.hex_to_pixel(col, row, origin, size);
            let pa = self.hex_to_pixel(a.0, a.1, origin, size);
            let pb = self.hex_to_pixel(b.0, b.1, origin, size);
            let centroid = Point {
                x: (pc.x + pa.x + pb.x) / 3.0,
                y: (pc.y + pa.y + pb.y) / 3.0,
            };
            let dist2 = (centroid.x - p.x).powi(2) + (centroid.y - p.y).powi(2);
            if best.map_or(true, |(_, best_dist)| dist2 < best_dist) {
                best = Some(([(col, row), a, b], dist2));
            }
        }
        best.map(|(tri, _)| tri)
    }
}

/// Round fractional axial (q, r) to the nearest integer hex, correcting
/// the coordinate with the largest rounding residual so q + r + s stays 0.
fn round_axial(q: f32, r: f32) -> (i32, i32) {
    let s = -q - r;
    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let dq = (rq - q).abs();
    let dr = (rr - r).abs();
    let ds = (rs - s).abs();

    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }
    (rq as i32, rr as i32)
}
