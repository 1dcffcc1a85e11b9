//! # Boundary conditions
//!
//! Periodic and Lees-Edwards (shearing) image wrap. Every boundary
//! condition provides the single `apply_bc` primitive: given a displacement
//! vector between two particles, fold it back into the minimum-image
//! convention for the primary box.

use crate::vector::Vec3;

/// A rectilinear simulation box, `[0, L_x) x [0, L_y) x [0, L_z)`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoxDimensions {
    /// Side lengths of the primary simulation box.
    pub lengths: Vec3,
}

impl BoxDimensions {
    /// A cubic box of side `l`.
    pub fn cubic(l: f64) -> Self {
        BoxDimensions {
            lengths: Vec3::new(l, l, l),
        }
    }
}

/// Boundary condition applied to relative-position vectors.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum BoundaryCondition {
    /// Plain periodic image wrap on all three axes.
    Periodic(BoxDimensions),
    /// Lees-Edwards shearing periodic boundary: crossing the y-boundary
    /// offsets x by the accumulated shear `delta_x = shear_rate * box_y * t`.
    LeesEdwards {
        /// Underlying box.
        dims: BoxDimensions,
        /// Shear rate `γ̇`.
        shear_rate: f64,
    },
}

impl BoundaryCondition {
    /// Folds a displacement vector `r = p - q` into the minimum-image
    /// convention for this boundary.
    ///
    /// `t` is the current global time, used only by `LeesEdwards` to apply
    /// the accumulated shear offset; `Periodic` ignores it.
    pub fn apply_bc(&self, r: Vec3, t: f64) -> Vec3 {
        match self {
            BoundaryCondition::Periodic(dims) => wrap_periodic(r, dims.lengths),
            BoundaryCondition::LeesEdwards { dims, shear_rate } => {
                wrap_lees_edwards(r, dims.lengths, *shear_rate, t)
            }
        }
    }

    /// The underlying box dimensions, regardless of variant.
    pub fn dims(&self) -> BoxDimensions {
        match self {
            BoundaryCondition::Periodic(dims) => *dims,
            BoundaryCondition::LeesEdwards { dims, .. } => *dims,
        }
    }
}

fn wrap_axis(component: f64, length: f64) -> f64 {
    let mut c = component;
    if c > 0.5 * length {
        c -= length;
    } else if c < -0.5 * length {
        c += length;
    }
    c
}

fn wrap_periodic(r: Vec3, lengths: Vec3) -> Vec3 {
    Vec3::new(
        wrap_axis(r.x, lengths.x),
        wrap_axis(r.y, lengths.y),
        wrap_axis(r.z, lengths.z),
    )
}

fn wrap_lees_edwards(r: Vec3, lengths: Vec3, shear_rate: f64, t: f64) -> Vec3 {
    let mut r = r;
    if r.y > 0.5 * lengths.y {
        r.y -= lengths.y;
        r.x -= shear_rate * lengths.y * t;
    } else if r.y < -0.5 * lengths.y {
        r.y += lengths.y;
        r.x += shear_rate * lengths.y * t;
    }
    r.x = wrap_axis(r.x, lengths.x);
    r.z = wrap_axis(r.z, lengths.z);
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periodic_wrap_folds_into_minimum_image() {
        let bc = BoundaryCondition::Periodic(BoxDimensions::cubic(10.0));
        let r = Vec3::new(7.0, -8.0, 2.0);
        let wrapped = bc.apply_bc(r, 0.0);
        assert_eq!(wrapped, Vec3::new(-3.0, 2.0, 2.0));
    }

    #[test]
    fn lees_edwards_applies_shear_offset_on_y_crossing() {
        let bc = BoundaryCondition::LeesEdwards {
            dims: BoxDimensions::cubic(10.0),
            shear_rate: 0.1,
        };
        let r = Vec3::new(0.0, 7.0, 0.0);
        let wrapped = bc.apply_bc(r, 2.0);
        // y wraps: 7 - 10 = -3; shear offset: x -= 0.1 * 10 * 2 = 2
        assert_eq!(wrapped.y, -3.0);
        assert_eq!(wrapped.x, -2.0);
    }
}
