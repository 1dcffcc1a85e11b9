//! # Checkpoint persistence
//!
//! A running [`super::Simulation`] streams its state out through an MPSC
//! channel rather than blocking the event loop on disk IO, generalising the
//! source's `FrameCollector`/receiver-thread split: the loop sends owned
//! [`CheckpointFrame`]s and moves on immediately; a background thread
//! accumulates them and serialises the finished [`Checkpoint`] once the
//! channel closes. Two codecs are supported, as in `io::bin`/`io::json`:
//! `bincode` for compact restart files, `serde_json` for human-inspectable
//! dumps.

use crate::error::EdmdError;
use crate::particle::Particle;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

fn io_err(e: impl std::error::Error + Send + Sync + 'static) -> EdmdError {
    EdmdError::Io(Box::new(e))
}

/// A single snapshot of the particle population at one global time.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CheckpointFrame {
    /// Number of events executed before this frame was taken.
    pub step: u64,
    /// Global time this frame was taken at.
    pub time: f64,
    /// Particle population as of `time`.
    pub particles: Vec<Particle>,
}

/// A complete checkpoint: every frame collected for one tagged run, plus the
/// final state, mirroring the shape of a `SimulationResult`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Checkpoint {
    /// Identifier for this run, used in the on-disk filename.
    pub id: u64,
    /// Human-readable tag grouping related runs, used in the on-disk filename.
    pub tag: String,
    /// Every frame received before the channel closed, in arrival order.
    pub frames: Vec<CheckpointFrame>,
    /// The last frame's particle population, duplicated here so a reader
    /// doesn't need to walk `frames` to resume a run.
    pub final_state: Vec<Particle>,
}

impl super::Simulation {
    /// Captures the current state as a [`CheckpointFrame`].
    pub fn checkpoint_frame(&self) -> CheckpointFrame {
        CheckpointFrame {
            step: self.event_count,
            time: self.clock,
            particles: self.particles.clone(),
        }
    }
}

/// Spawns a background thread that accumulates [`CheckpointFrame`]s sent
/// over `rx` and writes the finished [`Checkpoint`] to `path` as bincode
/// once the sender side is dropped.
///
/// Returns the sender half for the event loop to push frames into, and the
/// join handle for the caller to wait on at shutdown.
pub fn spawn_checkpoint_writer(
    id: u64,
    tag: String,
    path: PathBuf,
) -> (Sender<CheckpointFrame>, thread::JoinHandle<Result<PathBuf, EdmdError>>) {
    let (tx, rx) = std::sync::mpsc::channel();
    let handle = thread::spawn(move || collect_and_write(id, tag, path, rx));
    (tx, handle)
}

fn collect_and_write(
    id: u64,
    tag: String,
    path: PathBuf,
    rx: Receiver<CheckpointFrame>,
) -> Result<PathBuf, EdmdError> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.recv() {
        frames.push(frame);
    }
    let final_state = frames.last().map(|f| f.particles.clone()).unwrap_or_default();
    let checkpoint = Checkpoint {
        id,
        tag,
        frames,
        final_state,
    };
    write_checkpoint_bincode(&checkpoint, &path)?;
    Ok(path)
}

/// The canonical on-disk filename for a tagged, numbered checkpoint:
/// `{tag}-{id}.bin` under `dir`.
pub fn checkpoint_path(dir: &Path, tag: &str, id: u64) -> PathBuf {
    dir.join(format!("{tag}-{id}.bin"))
}

/// Serialises `checkpoint` to `path` with `bincode`, creating parent
/// directories as needed.
pub fn write_checkpoint_bincode(checkpoint: &Checkpoint, path: &Path) -> Result<(), EdmdError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let bytes = bincode::serialize(checkpoint).map_err(io_err)?;
    fs::write(path, bytes).map_err(io_err)?;
    Ok(())
}

/// Deserialises a [`Checkpoint`] previously written by
/// [`write_checkpoint_bincode`].
pub fn read_checkpoint_bincode(path: &Path) -> Result<Checkpoint, EdmdError> {
    let bytes = fs::read(path).map_err(io_err)?;
    bincode::deserialize(&bytes).map_err(io_err)
}

/// Serialises `checkpoint` to `path` as pretty-printed JSON, for
/// human-inspectable dumps rather than restart files.
pub fn write_checkpoint_json(checkpoint: &Checkpoint, path: &Path) -> Result<(), EdmdError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(checkpoint).map_err(io_err)?;
    fs::write(path, json).map_err(io_err)?;
    Ok(())
}

/// Deserialises a [`Checkpoint`] previously written by
/// [`write_checkpoint_json`].
pub fn read_checkpoint_json(path: &Path) -> Result<Checkpoint, EdmdError> {
    let text = fs::read_to_string(path).map_err(io_err)?;
    serde_json::from_str(&text).map_err(io_err)
}

/// Lists `(tag, id)` pairs for every `{tag}-{id}.bin` checkpoint file found
/// directly under `dir`.
pub fn list_checkpoints(dir: &Path) -> Result<Vec<(String, u64)>, EdmdError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut found = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("bin") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(dash) = stem.rfind('-') else {
            continue;
        };
        let tag = stem[..dash].to_string();
        if let Ok(id) = stem[dash + 1..].parse::<u64>() {
            found.push((tag, id));
        }
    }
    found.sort();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vec3;

    fn sample_particle(id: u32) -> Particle {
        let mut p = Particle::new(id);
        p.position = Vec3::new(id as f64, 0.0, 0.0);
        p
    }

    #[test]
    fn bincode_roundtrip_preserves_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = checkpoint_path(dir.path(), "unit-test", 1);

        let checkpoint = Checkpoint {
            id: 1,
            tag: "unit-test".to_string(),
            frames: vec![CheckpointFrame {
                step: 0,
                time: 0.0,
                particles: vec![sample_particle(0), sample_particle(1)],
            }],
            final_state: vec![sample_particle(0), sample_particle(1)],
        };

        write_checkpoint_bincode(&checkpoint, &path).unwrap();
        let loaded = read_checkpoint_bincode(&path).unwrap();

        assert_eq!(loaded.id, 1);
        assert_eq!(loaded.frames.len(), 1);
        assert_eq!(loaded.frames[0].particles.len(), 2);
    }

    #[test]
    fn json_roundtrip_preserves_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unit-test-2.json");

        let checkpoint = Checkpoint {
            id: 2,
            tag: "unit-test".to_string(),
            frames: Vec::new(),
            final_state: vec![sample_particle(0)],
        };

        write_checkpoint_json(&checkpoint, &path).unwrap();
        let loaded = read_checkpoint_json(&path).unwrap();
        assert_eq!(loaded.id, 2);
        assert_eq!(loaded.final_state.len(), 1);
    }

    #[test]
    fn spawn_checkpoint_writer_collects_frames_until_channel_closes() {
        let dir = tempfile::tempdir().unwrap();
        let path = checkpoint_path(dir.path(), "stream-test", 7);

        let (tx, handle) = spawn_checkpoint_writer(7, "stream-test".to_string(), path.clone());
        for step in 0..3u64 {
            tx.send(CheckpointFrame {
                step,
                time: step as f64,
                particles: vec![sample_particle(0)],
            })
            .unwrap();
        }
        drop(tx);

        let written_path = handle.join().unwrap().unwrap();
        assert_eq!(written_path, path);

        let loaded = read_checkpoint_bincode(&path).unwrap();
        assert_eq!(loaded.frames.len(), 3);
        assert_eq!(loaded.final_state.len(), 1);
    }

    #[test]
    fn list_checkpoints_parses_tag_and_id_from_filenames() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoint = Checkpoint {
            id: 3,
            tag: "alpha".to_string(),
            frames: Vec::new(),
            final_state: Vec::new(),
        };
        write_checkpoint_bincode(&checkpoint, &checkpoint_path(dir.path(), "alpha", 3)).unwrap();
        write_checkpoint_bincode(&checkpoint, &checkpoint_path(dir.path(), "alpha", 4)).unwrap();

        let mut found = list_checkpoints(dir.path()).unwrap();
        found.sort();
        assert_eq!(found, vec![("alpha".to_string(), 3), ("alpha".to_string(), 4)]);
    }
}
