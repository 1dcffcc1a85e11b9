//! # Binary particle encoding
//!
//! Per-particle layout, in id order: an 8-byte id, then [`NDIM`] little-endian
//! IEEE-754 doubles of velocity, then `NDIM` doubles of position. The whole
//! stream is base64-encoded with 80-column line breaks, matching
//! `liouvillean.cpp`'s `line_wrapping_output_filter(80)` and selected by the
//! `AttachedBinary = Y` document attribute.

use crate::error::EdmdError;
use crate::particle::{Particle, ParticleId};
use crate::vector::Vec3;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Spatial dimensionality of the stored position/velocity blocks.
pub const NDIM: usize = 3;

const RECORD_LEN: usize = 8 + NDIM * 8 + NDIM * 8;
const LINE_WIDTH: usize = 80;

/// Encodes `particles` (assumed already in id order) into the base64,
/// 80-column-wrapped binary block.
pub fn encode_particles(particles: &[Particle]) -> String {
    let mut buf = Vec::with_capacity(particles.len() * RECORD_LEN);
    for p in particles {
        buf.extend_from_slice(&(p.id as u64).to_le_bytes());
        for component in [p.velocity.x, p.velocity.y, p.velocity.z] {
            buf.extend_from_slice(&component.to_le_bytes());
        }
        for component in [p.position.x, p.position.y, p.position.z] {
            buf.extend_from_slice(&component.to_le_bytes());
        }
    }
    wrap_80(&STANDARD.encode(buf))
}

fn wrap_80(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len() + s.len() / LINE_WIDTH + 1);
    for chunk in bytes.chunks(LINE_WIDTH) {
        out.push_str(std::str::from_utf8(chunk).expect("base64 alphabet is ASCII"));
        out.push('\n');
    }
    out
}

/// Decodes a base64 (optionally 80-column-wrapped) binary particle block
/// back into a dense, id-ordered particle vector.
///
/// `species` is the species tag assigned to every decoded particle — the
/// binary layout carries no species field, matching the source's
/// single-species binary fast path.
pub fn decode_particles(encoded: &str, species: &str) -> Result<Vec<Particle>, EdmdError> {
    let stripped: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(stripped.as_bytes())
        .map_err(|e| EdmdError::ConfigError(format!("invalid base64 particle block: {e}")))?;

    if bytes.len() % RECORD_LEN != 0 {
        return Err(EdmdError::InvariantViolation(format!(
            "binary particle block length {} is not a multiple of the {RECORD_LEN}-byte record size",
            bytes.len()
        )));
    }

    let n = bytes.len() / RECORD_LEN;
    let mut particles = Vec::with_capacity(n);
    for (expected_id, record) in bytes.chunks(RECORD_LEN).enumerate() {
        let id = u64::from_le_bytes(record[0..8].try_into().unwrap());
        if id != expected_id as u64 {
            return Err(EdmdError::InvariantViolation(format!(
                "binary particle stream out of order: expected id {expected_id}, found {id}"
            )));
        }
        let read_f64 = |offset: usize| f64::from_le_bytes(record[offset..offset + 8].try_into().unwrap());
        let velocity = Vec3::new(read_f64(8), read_f64(16), read_f64(24));
        let position = Vec3::new(read_f64(32), read_f64(40), read_f64(48));

        let mut p = Particle::new(id as ParticleId);
        p.velocity = velocity;
        p.position = position;
        p.species = species.to_string();
        particles.push(p);
    }
    Ok(particles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: u32) -> Particle {
        let mut p = Particle::new(id);
        p.position = Vec3::new(id as f64, 1.0, 2.0);
        p.velocity = Vec3::new(0.5, -0.5, id as f64 * 0.1);
        p
    }

    #[test]
    fn roundtrip_preserves_id_order_and_values() {
        let particles: Vec<_> = (0..5).map(sample).collect();
        let encoded = encode_particles(&particles);
        let decoded = decode_particles(&encoded, "Default").unwrap();

        assert_eq!(decoded.len(), particles.len());
        for (original, roundtripped) in particles.iter().zip(decoded.iter()) {
            assert_eq!(original.id, roundtripped.id);
            assert_eq!(original.position, roundtripped.position);
            assert_eq!(original.velocity, roundtripped.velocity);
        }
    }

    #[test]
    fn output_is_wrapped_at_80_columns() {
        let particles: Vec<_> = (0..50).map(sample).collect();
        let encoded = encode_particles(&particles);
        for line in encoded.lines() {
            assert!(line.len() <= LINE_WIDTH);
        }
    }

    #[test]
    fn out_of_order_ids_are_an_invariant_violation() {
        let mut particles: Vec<_> = (0..3).map(sample).collect();
        particles.swap(0, 1);
        // Re-tag with the swapped (now out-of-order) ids, as a corrupt
        // upstream writer might produce.
        let raw = {
            let mut buf = Vec::new();
            for p in &particles {
                buf.extend_from_slice(&(p.id as u64).to_le_bytes());
                buf.extend_from_slice(&p.velocity.x.to_le_bytes());
                buf.extend_from_slice(&p.velocity.y.to_le_bytes());
                buf.extend_from_slice(&p.velocity.z.to_le_bytes());
                buf.extend_from_slice(&p.position.x.to_le_bytes());
                buf.extend_from_slice(&p.position.y.to_le_bytes());
                buf.extend_from_slice(&p.position.z.to_le_bytes());
            }
            buf
        };
        let encoded = wrap_80(&STANDARD.encode(raw));
        assert!(matches!(
            decode_particles(&encoded, "Default"),
            Err(EdmdError::InvariantViolation(_))
        ));
    }
}
