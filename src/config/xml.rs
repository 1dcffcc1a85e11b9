//! # Configuration / state document
//!
//! The tree-structured (attribute-and-child) XML schema described in
//! `spec.md` §6:
//!
//! ```text
//! Simulation
//! ├── Dynamics               (type ∈ {Newtonian, NOrientation, SLLOD, Viscous})
//! │     └── Units, Genus (species), Interactions, Locals, Globals, Systems, BC
//! ├── ParticleData
//! │     └── Pt [N]           (id, V, P) | AttachedBinary = Y with base64 payload
//! └── Scheduler              (type, sorter)
//! ```
//!
//! Parsed and written with `quick-xml`'s serde integration: attribute fields
//! are named `@Attr`, following that crate's convention. Interaction and
//! System catalogues are parsed only far enough to round-trip their
//! `Type`/`Name` — their physical content is the pure-function seam
//! `spec.md` §1 places outside the core's scope.

use crate::bc::{BoundaryCondition, BoxDimensions};
use crate::error::EdmdError;
use crate::liouvillean::{Dynamics, NewtonianOrientation, Sllod, Viscous};
use crate::local::{AndersenWall, Local};
use crate::particle::Particle;
use crate::scheduler::{BoundedPqScheduler, DumbScheduler, Scheduler};
use crate::species::{Species, SpeciesTable};
use crate::vector::Vec3;
use serde::{Deserialize, Serialize};

use super::binary;
use super::units::Units;

/// Root document element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "Simulation")]
pub struct SimulationDocument {
    /// `<Dynamics>`: the active dynamics variant and everything it owns.
    #[serde(rename = "Dynamics")]
    pub dynamics: DynamicsDoc,
    /// `<ParticleData>`: the particle population, ASCII or binary.
    #[serde(rename = "ParticleData")]
    pub particle_data: ParticleDataDoc,
    /// `<Scheduler>`: sorter choice.
    #[serde(rename = "Scheduler")]
    pub scheduler: SchedulerDoc,
}

/// `<Dynamics Type="...">`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicsDoc {
    /// `Newtonian`, `NOrientation`, `SLLOD`, or `Viscous`.
    #[serde(rename = "@Type")]
    pub dynamics_type: String,
    /// Unit rescaling factors.
    #[serde(rename = "Units", default)]
    pub units: Units,
    /// Species registry.
    #[serde(rename = "Genus", default)]
    pub genus: Vec<GenusDoc>,
    /// Interaction catalogue (parsed but not populated with physics).
    #[serde(rename = "Interactions", default)]
    pub interactions: InteractionsDoc,
    /// Stationary local objects (walls, plates).
    #[serde(rename = "Locals", default)]
    pub locals: LocalsDoc,
    /// Globals: the cell grid's configuration lives here.
    #[serde(rename = "Globals")]
    pub globals: GlobalsDoc,
    /// System-scheduled perturbations (parsed but not populated).
    #[serde(rename = "Systems", default)]
    pub systems: SystemsDoc,
    /// Boundary condition.
    #[serde(rename = "BC")]
    pub bc: BcDoc,
    /// Gravity, for `Viscous` dynamics only.
    #[serde(rename = "Gravity", default)]
    pub gravity: Option<Vec3Doc>,
    /// Restitution coefficient, for `Viscous` dynamics only.
    #[serde(rename = "@Restitution", default)]
    pub restitution: Option<f64>,
}

/// A single species entry: `<Genus Name="..." Mass="..." Diameter="..."/>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenusDoc {
    /// Species name, resolved against particles' species tags.
    #[serde(rename = "@Name")]
    pub name: String,
    /// Mass in reduced units.
    #[serde(rename = "@Mass")]
    pub mass: f64,
    /// Hard-sphere interaction diameter in reduced units.
    #[serde(rename = "@Diameter")]
    pub diameter: f64,
}

/// `<Type Name="..."/>`-shaped entry used for the out-of-scope interaction
/// and system catalogues: preserved for round-trip, not interpreted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedEntry {
    /// The catalogue entry's declared kind.
    #[serde(rename = "@Type")]
    pub entry_type: String,
    /// The catalogue entry's name.
    #[serde(rename = "@Name", default)]
    pub name: String,
}

/// `<Interactions>` wrapper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionsDoc {
    /// Entries, parsed but not populated with physics (`spec.md` §1).
    #[serde(rename = "Interaction", default)]
    pub entries: Vec<NamedEntry>,
}

/// `<Systems>` wrapper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemsDoc {
    /// Entries, parsed but not populated with physics (`spec.md` §1).
    #[serde(rename = "System", default)]
    pub entries: Vec<NamedEntry>,
}

/// `<Locals>` wrapper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalsDoc {
    /// The stationary objects attached to this simulation.
    #[serde(rename = "Local", default)]
    pub entries: Vec<LocalDoc>,
}

/// A single `<Local Type="AndersenWall" ...>` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalDoc {
    /// Currently only `AndersenWall` is implemented; any other value
    /// surfaces a [`EdmdError::ConfigError`] at load time, mirroring the
    /// liouvillean's `UnsupportedForThisDynamics` treatment of unimplemented
    /// resolvers.
    #[serde(rename = "@Type")]
    pub local_type: String,
    /// Name, referenced from `sigNewLocalNotify`.
    #[serde(rename = "@Name")]
    pub name: String,
    /// `√T` of the thermostat bath, for `AndersenWall`.
    #[serde(rename = "@SqrtT", default)]
    pub sqrt_t: f64,
    /// A point on the wall plane.
    #[serde(rename = "X0")]
    pub x0: Vec3Doc,
    /// Outward unit normal.
    #[serde(rename = "Normal")]
    pub normal: Vec3Doc,
}

/// `<Globals>` wrapper. Exactly one `Cells`-typed global is expected — the
/// neighbourhood cell grid's configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalsDoc {
    /// Global entries; the engine requires exactly one `Type="Cells"` entry.
    #[serde(rename = "Global", default)]
    pub entries: Vec<GlobalDoc>,
}

/// A single `<Global Type="Cells" ...>` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalDoc {
    /// Only `Cells` is recognised.
    #[serde(rename = "@Type")]
    pub global_type: String,
    /// Name, referenced from `sigCellChangeNotify`.
    #[serde(rename = "@Name", default)]
    pub name: String,
    /// Overlap fraction `λ ∈ [0,1]`. `gcells.cpp` reads the XML attribute
    /// `lambda` but queries `Lambda` elsewhere — both spellings resolve to
    /// this one field (`spec.md` §9's case-insensitive-key resolution).
    #[serde(rename = "@Lambda", alias = "@lambda", default)]
    pub lambda: f64,
    /// Overlink factor `k ≥ 1`.
    #[serde(rename = "@OverLink", default = "GlobalDoc::default_overlink")]
    pub overlink: usize,
    /// Names an interaction catalogue entry whose range resolves `d_max`;
    /// mutually exclusive with `cell_width`.
    #[serde(rename = "@Interaction", default)]
    pub interaction: Option<String>,
    /// An absolute cell width, bypassing interaction-catalogue resolution;
    /// mutually exclusive with `interaction`.
    #[serde(rename = "@CellWidth", default)]
    pub cell_width: Option<f64>,
}

impl GlobalDoc {
    fn default_overlink() -> usize {
        1
    }
}

/// `<BC Type="..." BoxLength="..." ShearRate="..."/>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BcDoc {
    /// `Periodic` or `LeesEdwards`.
    #[serde(rename = "@Type")]
    pub bc_type: String,
    /// Cubic box side length, in reduced units.
    #[serde(rename = "@BoxLength")]
    pub box_length: f64,
    /// Shear rate `γ̇`, for `LeesEdwards` only.
    #[serde(rename = "@ShearRate", default)]
    pub shear_rate: f64,
}

/// A 3-component vector element, e.g. `<P x="..." y="..." z="..."/>`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vec3Doc {
    /// X-component.
    #[serde(rename = "@x")]
    pub x: f64,
    /// Y-component.
    #[serde(rename = "@y")]
    pub y: f64,
    /// Z-component.
    #[serde(rename = "@z")]
    pub z: f64,
}

impl From<Vec3Doc> for Vec3 {
    fn from(v: Vec3Doc) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for Vec3Doc {
    fn from(v: Vec3) -> Self {
        Vec3Doc { x: v.x, y: v.y, z: v.z }
    }
}

/// `<ParticleData>`: either an ASCII `Pt` list or a base64 binary block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticleDataDoc {
    /// `Y` selects the binary encoding in `$text`; absent or `N` selects the
    /// `Pt` element list.
    #[serde(rename = "@AttachedBinary", default)]
    pub attached_binary: Option<String>,
    /// `Y` marks the binary block as carrying orientation data; rejected at
    /// load time by dynamics that don't track orientation.
    #[serde(rename = "@OrientationDataInc", default)]
    pub orientation_data_inc: Option<String>,
    /// ASCII particle entries, present when `attached_binary` is not `Y`.
    #[serde(rename = "Pt", default)]
    pub points: Vec<PtDoc>,
    /// Base64 binary payload, present when `attached_binary` is `Y`.
    #[serde(rename = "$text", default)]
    pub binary_payload: Option<String>,
}

/// A single ASCII particle entry: `<Pt ID="..."><V .../><P .../></Pt>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PtDoc {
    /// Dense particle id.
    #[serde(rename = "@ID")]
    pub id: u32,
    /// Species tag; defaults to `"Default"`.
    #[serde(rename = "@Species", default = "PtDoc::default_species")]
    pub species: String,
    /// Velocity.
    #[serde(rename = "V")]
    pub velocity: Vec3Doc,
    /// Position.
    #[serde(rename = "P")]
    pub position: Vec3Doc,
}

impl PtDoc {
    fn default_species() -> String {
        "Default".to_string()
    }
}

/// `<Scheduler Type="..." Sorter="..."/>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerDoc {
    /// Descriptive scheduler type name (currently informational only).
    #[serde(rename = "@Type", default)]
    pub scheduler_type: String,
    /// `BoundedPQ` (the canonical heap sorter) or `Dumb` (the O(N) baseline).
    #[serde(rename = "@Sorter", default = "SchedulerDoc::default_sorter")]
    pub sorter: String,
}

impl SchedulerDoc {
    fn default_sorter() -> String {
        "BoundedPQ".to_string()
    }
}

/// Parses a [`SimulationDocument`] from its XML text form.
pub fn load_xml(text: &str) -> Result<SimulationDocument, EdmdError> {
    quick_xml::de::from_str(text)
        .map_err(|e| EdmdError::ConfigError(format!("failed to parse configuration document: {e}")))
}

/// Serialises a [`SimulationDocument`] to its XML text form.
pub fn save_xml(doc: &SimulationDocument) -> Result<String, EdmdError> {
    quick_xml::se::to_string(doc)
        .map_err(|e| EdmdError::Io(Box::new(e)))
}

/// Everything [`super::Simulation`] needs to construct itself from a parsed
/// document, plus the pieces ([`Units`], sorter choice) that live outside
/// [`crate::simulation::SimulationParams`].
pub struct LoadedConfig {
    /// Particle population, species, BC, dynamics, locals, cell grid
    /// parameters — ready to pass to `Simulation::new`.
    pub params: crate::simulation::SimulationParams,
    /// Unit rescaling factors declared on `<Units/>`.
    pub units: Units,
    /// Which [`Scheduler`] implementation `<Scheduler Sorter="..."/>` asked
    /// for.
    pub scheduler: Box<dyn Scheduler>,
}

/// Converts a parsed [`SimulationDocument`] into everything needed to build
/// a running [`crate::simulation::Simulation`], applying unit rescaling and
/// validating cross-field configuration errors along the way (orientation
/// data under a non-orientation dynamics, unknown local/global types,
/// mutually exclusive attributes).
pub fn build_simulation_params(doc: &SimulationDocument, seed: u64) -> Result<LoadedConfig, EdmdError> {
    let species = build_species_table(&doc.dynamics.genus);

    let bc = build_bc(&doc.dynamics.bc)?;

    let wants_orientation = doc.particle_data.orientation_data_inc.as_deref() == Some("Y");
    let dynamics = build_dynamics(&doc.dynamics, wants_orientation)?;

    let locals = build_locals(&doc.dynamics.locals)?;

    let global = single_cells_global(&doc.dynamics.globals)?;
    let d_max = resolve_d_max(global, &species)?;

    let mut particles = build_particles(&doc.particle_data, &species)?;
    doc.dynamics.units.rescale_into_reduced(&mut particles);

    let n = particles.len();
    let scheduler: Box<dyn Scheduler> = match doc.scheduler.sorter.as_str() {
        "Dumb" => Box::new(DumbScheduler::new(n)),
        _ => Box::new(BoundedPqScheduler::new(n)),
    };

    let params = crate::simulation::SimulationParams {
        particles,
        species,
        bc,
        dynamics,
        locals,
        lambda: global.lambda,
        overlink: global.overlink.max(1),
        seed,
    };
    let _ = d_max; // validated above; CellGrid::initialise re-derives it from species.

    Ok(LoadedConfig {
        params,
        units: doc.dynamics.units,
        scheduler,
    })
}

fn build_species_table(genus: &[GenusDoc]) -> SpeciesTable {
    if genus.is_empty() {
        return SpeciesTable::default();
    }
    let mut table = SpeciesTable::empty();
    for g in genus {
        table.insert(g.name.clone(), Species::new(g.mass, g.diameter));
    }
    table
}

fn build_bc(doc: &BcDoc) -> Result<BoundaryCondition, EdmdError> {
    let dims = BoxDimensions::cubic(doc.box_length);
    match doc.bc_type.as_str() {
        "Periodic" => Ok(BoundaryCondition::Periodic(dims)),
        "LeesEdwards" => Ok(BoundaryCondition::LeesEdwards {
            dims,
            shear_rate: doc.shear_rate,
        }),
        other => Err(EdmdError::ConfigError(format!("unknown BC type '{other}'"))),
    }
}

fn build_dynamics(doc: &DynamicsDoc, wants_orientation: bool) -> Result<Dynamics, EdmdError> {
    match doc.dynamics_type.as_str() {
        "Newtonian" => {
            if wants_orientation {
                return Err(EdmdError::ConfigError(
                    "OrientationDataInc=Y is not supported under Newtonian dynamics".to_string(),
                ));
            }
            Ok(Dynamics::newtonian())
        }
        "NOrientation" => Ok(Dynamics::NewtonianOrientation(NewtonianOrientation)),
        "SLLOD" => {
            if wants_orientation {
                return Err(EdmdError::ConfigError(
                    "OrientationDataInc=Y is not supported under SLLOD dynamics".to_string(),
                ));
            }
            if doc.bc.bc_type != "LeesEdwards" {
                return Err(EdmdError::ConfigError(
                    "SLLOD dynamics requires a LeesEdwards BC".to_string(),
                ));
            }
            Ok(Dynamics::Sllod(Sllod::new(doc.bc.shear_rate)))
        }
        "Viscous" => {
            if wants_orientation {
                return Err(EdmdError::ConfigError(
                    "OrientationDataInc=Y is not supported under Viscous dynamics".to_string(),
                ));
            }
            let gravity = doc.gravity.map(Vec3::from).unwrap_or_else(Vec3::zero);
            let restitution = doc.restitution.unwrap_or(1.0);
            Ok(Dynamics::Viscous(Viscous::new(gravity, restitution)))
        }
        other => Err(EdmdError::ConfigError(format!("unknown dynamics type '{other}'"))),
    }
}

fn build_locals(doc: &LocalsDoc) -> Result<Vec<Box<dyn Local>>, EdmdError> {
    doc.entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| -> Result<Box<dyn Local>, EdmdError> {
            match entry.local_type.as_str() {
                "AndersenWall" => {
                    if !(entry.sqrt_t > 0.0) {
                        return Err(EdmdError::ConfigError(format!(
                            "local '{}' has non-positive sqrt_t {}",
                            entry.name, entry.sqrt_t
                        )));
                    }
                    Ok(Box::new(AndersenWall::new(
                        idx as u32,
                        entry.x0.into(),
                        entry.normal.into(),
                        entry.sqrt_t,
                    )))
                }
                other => Err(EdmdError::ConfigError(format!(
                    "local '{}' has unsupported type '{other}'",
                    entry.name
                ))),
            }
        })
        .collect()
}

fn single_cells_global(doc: &GlobalsDoc) -> Result<&GlobalDoc, EdmdError> {
    let cells: Vec<&GlobalDoc> = doc.entries.iter().filter(|g| g.global_type == "Cells").collect();
    match cells.as_slice() {
        [one] => Ok(one),
        [] => Err(EdmdError::ConfigError(
            "no Global with Type=\"Cells\" found; the cell grid requires exactly one".to_string(),
        )),
        _ => Err(EdmdError::ConfigError(
            "more than one Global with Type=\"Cells\" found".to_string(),
        )),
    }
}

fn resolve_d_max(global: &GlobalDoc, species: &SpeciesTable) -> Result<f64, EdmdError> {
    match (&global.interaction, global.cell_width) {
        (Some(_name), None) => Ok(species.max_diameter()),
        (None, Some(width)) => Ok(width * global.overlink.max(1) as f64),
        (None, None) => Err(EdmdError::ConfigError(
            "Global \"Cells\" needs either an Interaction or a CellWidth attribute".to_string(),
        )),
        (Some(_), Some(_)) => Err(EdmdError::ConfigError(
            "Global \"Cells\" cannot set both Interaction and CellWidth".to_string(),
        )),
    }
}

fn build_particles(doc: &ParticleDataDoc, species: &SpeciesTable) -> Result<Vec<Particle>, EdmdError> {
    if doc.attached_binary.as_deref() == Some("Y") {
        let payload = doc.binary_payload.as_deref().ok_or_else(|| {
            EdmdError::ConfigError("AttachedBinary=Y but no binary payload present".to_string())
        })?;
        let default_species = species
            .get("Default")
            .map(|_| "Default".to_string())
            .unwrap_or_else(|| "Default".to_string());
        return binary::decode_particles(payload, &default_species);
    }

    let mut particles = Vec::with_capacity(doc.points.len());
    for (expected_id, pt) in doc.points.iter().enumerate() {
        if pt.id != expected_id as u32 {
            return Err(EdmdError::InvariantViolation(format!(
                "ASCII particle stream out of order: expected id {expected_id}, found {}",
                pt.id
            )));
        }
        let mut p = Particle::new(pt.id);
        p.velocity = pt.velocity.into();
        p.position = pt.position.into();
        p.species = pt.species.clone();
        particles.push(p);
    }
    Ok(particles)
}

/// Builds the `<ParticleData>` element for the current state of `particles`,
/// in physical units, either as an ASCII `Pt` list (`text_mode`, selected by
/// the CLI's `--text` flag) or as a base64 binary block.
pub fn particle_data_from_state(particles: &[Particle], units: &Units, text_mode: bool) -> ParticleDataDoc {
    let physical = units.rescale_into_physical(particles);
    if text_mode {
        ParticleDataDoc {
            attached_binary: None,
            orientation_data_inc: None,
            points: physical
                .iter()
                .map(|p| PtDoc {
                    id: p.id,
                    species: p.species.clone(),
                    velocity: p.velocity.into(),
                    position: p.position.into(),
                })
                .collect(),
            binary_payload: None,
        }
    } else {
        ParticleDataDoc {
            attached_binary: Some("Y".to_string()),
            orientation_data_inc: None,
            points: Vec::new(),
            binary_payload: Some(binary::encode_particles(&physical)),
        }
    }
}

/// Clones `doc`, replacing its `<ParticleData>` with a fresh encoding of
/// `particles` — the save half of load → mutate → save, reusing the
/// original `Dynamics`/`Scheduler` sections verbatim.
pub fn with_updated_particles(doc: &SimulationDocument, particles: &[Particle], text_mode: bool) -> SimulationDocument {
    let mut out = doc.clone();
    out.particle_data = particle_data_from_state(particles, &doc.dynamics.units, text_mode);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document(sorter: &str, text_mode: bool) -> SimulationDocument {
        let particle_data = if text_mode {
            ParticleDataDoc {
                attached_binary: None,
                orientation_data_inc: None,
                points: vec![
                    PtDoc {
                        id: 0,
                        species: "Default".to_string(),
                        velocity: Vec3Doc { x: 1.0, y: 0.0, z: 0.0 },
                        position: Vec3Doc { x: -2.0, y: 0.0, z: 0.0 },
                    },
                    PtDoc {
                        id: 1,
                        species: "Default".to_string(),
                        velocity: Vec3Doc { x: -1.0, y: 0.0, z: 0.0 },
                        position: Vec3Doc { x: 2.0, y: 0.0, z: 0.0 },
                    },
                ],
                binary_payload: None,
            }
        } else {
            let particles = vec![
                {
                    let mut p = Particle::new(0);
                    p.position = Vec3::new(-2.0, 0.0, 0.0);
                    p.velocity = Vec3::new(1.0, 0.0, 0.0);
                    p
                },
                {
                    let mut p = Particle::new(1);
                    p.position = Vec3::new(2.0, 0.0, 0.0);
                    p.velocity = Vec3::new(-1.0, 0.0, 0.0);
                    p
                },
            ];
            particle_data_from_state(&particles, &Units::identity(), false)
        };

        SimulationDocument {
            dynamics: DynamicsDoc {
                dynamics_type: "Newtonian".to_string(),
                units: Units::identity(),
                genus: Vec::new(),
                interactions: InteractionsDoc::default(),
                locals: LocalsDoc::default(),
                globals: GlobalsDoc {
                    entries: vec![GlobalDoc {
                        global_type: "Cells".to_string(),
                        name: "Cells0".to_string(),
                        lambda: 0.0,
                        overlink: 1,
                        interaction: None,
                        cell_width: Some(1.0),
                    }],
                },
                systems: SystemsDoc::default(),
                bc: BcDoc {
                    bc_type: "Periodic".to_string(),
                    box_length: 10.0,
                    shear_rate: 0.0,
                },
                gravity: None,
                restitution: None,
            },
            particle_data,
            scheduler: SchedulerDoc {
                scheduler_type: "NeighbourList".to_string(),
                sorter: sorter.to_string(),
            },
        }
    }

    #[test]
    fn builds_simulation_params_from_ascii_document() {
        let doc = sample_document("BoundedPQ", true);
        let loaded = build_simulation_params(&doc, 1).unwrap();
        assert_eq!(loaded.params.particles.len(), 2);
        assert_eq!(loaded.params.particles[0].velocity, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn builds_simulation_params_from_binary_document() {
        let doc = sample_document("BoundedPQ", false);
        let loaded = build_simulation_params(&doc, 1).unwrap();
        assert_eq!(loaded.params.particles.len(), 2);
        assert_eq!(loaded.params.particles[1].position, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn dumb_sorter_selects_dumb_scheduler() {
        let doc = sample_document("Dumb", true);
        let loaded = build_simulation_params(&doc, 1).unwrap();
        assert_eq!(loaded.scheduler.len(), 0);
    }

    #[test]
    fn lambda_case_insensitive_alias_is_accepted() {
        let xml = r#"<Global Type="Cells" Name="Cells0" lambda="0.3" OverLink="1" CellWidth="1.0"/>"#;
        let parsed: GlobalDoc = quick_xml::de::from_str(xml).unwrap();
        assert_eq!(parsed.lambda, 0.3);
    }

    #[test]
    fn orientation_data_under_newtonian_is_config_error() {
        let mut doc = sample_document("BoundedPQ", true);
        doc.particle_data.orientation_data_inc = Some("Y".to_string());
        assert!(matches!(
            build_simulation_params(&doc, 1),
            Err(EdmdError::ConfigError(_))
        ));
    }

    #[test]
    fn missing_cells_global_is_config_error() {
        let mut doc = sample_document("BoundedPQ", true);
        doc.dynamics.globals.entries.clear();
        assert!(matches!(
            build_simulation_params(&doc, 1),
            Err(EdmdError::ConfigError(_))
        ));
    }

    #[test]
    fn out_of_order_ascii_ids_is_invariant_violation() {
        let mut doc = sample_document("BoundedPQ", true);
        doc.particle_data.points[0].id = 5;
        assert!(matches!(
            build_simulation_params(&doc, 1),
            Err(EdmdError::InvariantViolation(_))
        ));
    }
}
