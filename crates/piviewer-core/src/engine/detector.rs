use super::config::DetectionConfig;
use super::error::EngineError;
use super::rings::{RingView, partition_rings};
use crate::core::models::residue::ResidueLabel;
use crate::core::models::system::MolecularSystem;
use crate::core::utils::geometry;
use itertools::iproduct;
use nalgebra::{Point3, Vector3};
use std::fmt;
use tracing::{debug, info, warn};

/// Log target of the detector's step-by-step narration.
pub const NARRATION_TARGET: &str = "piviewer::narration";

/// Logs under [`NARRATION_TARGET`], at INFO when `$verbose` is set and at DEBUG otherwise.
macro_rules! narrate {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            info!(target: NARRATION_TARGET, $($arg)+)
        } else {
            debug!(target: NARRATION_TARGET, $($arg)+)
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackingKind {
    /// Ring planes within the parallel dihedral limit.
    Parallel,
    /// Ring planes beyond the T-shape dihedral limit.
    TShaped,
}

impl fmt::Display for StackingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Parallel => "parallel",
            Self::TShaped => "t-shaped",
        })
    }
}

/// A ligand/receptor aromatic ring pair that satisfies the stacking criterion.
#[derive(Debug, Clone, PartialEq)]
pub struct RingPair {
    /// Transient index of the ligand ring within this detection.
    pub ligand_ring: usize,
    /// Transient index of the receptor ring within this detection.
    pub receptor_ring: usize,
    /// Centroid distance in Angstroms.
    pub distance: f64,
    /// Inter-plane angle in degrees, folded into `[0, 90]`.
    pub angle: f64,
    pub kind: StackingKind,
    pub ligand_centroid: Point3<f64>,
    pub receptor_centroid: Point3<f64>,
    /// Residue owning the receptor ring, when it can be resolved.
    pub receptor_residue: Option<ResidueLabel>,
}

/// Ring counts gathered while detecting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RingStatistics {
    pub residues: usize,
    pub rings: usize,
    pub ligand_rings: usize,
    pub ligand_aromatic_rings: usize,
    pub receptor_rings: usize,
    pub receptor_aromatic_rings: usize,
    /// Aromatic rings left out of the scan because their plane is undefined.
    pub degenerate_rings: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectionReport {
    pub ligand: ResidueLabel,
    pub pairs: Vec<RingPair>,
    pub statistics: RingStatistics,
}

impl DetectionReport {
    /// Number of qualifying ring pairs.
    pub fn count(&self) -> usize {
        self.pairs.len()
    }
}

/// Applies the stacking criterion to a centroid distance and folded angle.
///
/// All comparisons are strict, so values exactly on a threshold never qualify.
pub fn classify(distance: f64, angle: f64, config: &DetectionConfig) -> Option<StackingKind> {
    if distance >= config.max_centroid_distance {
        return None;
    }
    if angle < config.max_parallel_dihedral {
        Some(StackingKind::Parallel)
    } else if angle > config.min_tshape_dihedral {
        Some(StackingKind::TShaped)
    } else {
        None
    }
}

struct AromaticRing {
    index: usize,
    center: Point3<f64>,
    normal: Vector3<f64>,
}

/// Keeps the aromatic rings among `indices` whose plane is defined.
fn aromatic_working_set<R: RingView>(
    rings: &[R],
    indices: &[usize],
    degenerate: &mut usize,
) -> Vec<AromaticRing> {
    indices
        .iter()
        .filter(|&&index| rings[index].is_aromatic())
        .filter_map(|&index| match rings[index].center_and_normal() {
            Some((center, normal)) => Some(AromaticRing {
                index,
                center,
                normal,
            }),
            None => {
                warn!(ring = index, "Aromatic ring has collinear atoms; no plane normal, ring skipped.");
                *degenerate += 1;
                None
            }
        })
        .collect()
}

/// Finds π–π stacking between the rings of a ligand residue and the rest of the structure.
///
/// The ligand is the first residue, in file order, whose name equals
/// `ligand_name` exactly. Rings are split into ligand rings (sharing at least
/// one atom with the ligand) and receptor rings; only aromatic rings of each
/// side are paired. Ring indices in the report are positions in `rings`.
///
/// # Errors
///
/// Returns [`EngineError::LigandNotFound`] if no residue is named `ligand_name`.
pub fn detect<R: RingView>(
    system: &MolecularSystem,
    rings: &[R],
    ligand_name: &str,
    config: &DetectionConfig,
) -> Result<DetectionReport, EngineError> {
    let verbose = config.verbose;
    narrate!(verbose, "A total of {} residues", system.residue_count());

    let Some(ligand_id) = system.find_first_residue_by_name(ligand_name) else {
        narrate!(verbose, "No ligand residue {} found, please confirm.", ligand_name);
        return Err(EngineError::LigandNotFound {
            name: ligand_name.to_string(),
        });
    };
    let ligand_label = system
        .residue_label(ligand_id)
        .ok_or_else(|| EngineError::LigandNotFound {
            name: ligand_name.to_string(),
        })?;
    let ligand_atoms = system
        .residue(ligand_id)
        .map(|residue| residue.atoms().to_vec())
        .unwrap_or_default();
    narrate!(verbose, "Ligand residue name is: {}", ligand_label.name);

    let partition = partition_rings(rings, &ligand_atoms);
    for &index in &partition.ligand {
        let state = if rings[index].is_aromatic() {
            "aromatic"
        } else {
            "saturated"
        };
        narrate!(verbose, "ligand ring_ID: {} {}", index, state);
    }

    let mut degenerate = 0;
    let ligand_aromatic = aromatic_working_set(rings, &partition.ligand, &mut degenerate);
    let receptor_aromatic = aromatic_working_set(rings, &partition.receptor, &mut degenerate);

    let statistics = RingStatistics {
        residues: system.residue_count(),
        rings: rings.len(),
        ligand_rings: partition.ligand.len(),
        ligand_aromatic_rings: partition
            .ligand
            .iter()
            .filter(|&&i| rings[i].is_aromatic())
            .count(),
        receptor_rings: partition.receptor.len(),
        receptor_aromatic_rings: partition
            .receptor
            .iter()
            .filter(|&&i| rings[i].is_aromatic())
            .count(),
        degenerate_rings: degenerate,
    };
    narrate!(
        verbose,
        "Receptor has {} rings, has {} aromatic rings.",
        statistics.receptor_rings,
        statistics.receptor_aromatic_rings
    );

    let mut pairs = Vec::new();
    for (ligand_ring, receptor_ring) in iproduct!(&ligand_aromatic, &receptor_aromatic) {
        let distance = (ligand_ring.center - receptor_ring.center).norm();
        let angle = geometry::folded_normal_angle(&ligand_ring.normal, &receptor_ring.normal);
        let Some(kind) = classify(distance, angle, config) else {
            continue;
        };

        narrate!(
            verbose,
            "Pi-Pi ring pairs: {:>3},{:>3}  Angle(deg.): {:5.2}  Distance(A): {:.2}",
            receptor_ring.index,
            ligand_ring.index,
            angle,
            distance
        );
        let receptor_residue = rings[receptor_ring.index]
            .representative_atom()
            .and_then(|atom_id| system.atom(atom_id))
            .and_then(|atom| system.residue_label(atom.residue_id));
        pairs.push(RingPair {
            ligand_ring: ligand_ring.index,
            receptor_ring: receptor_ring.index,
            distance,
            angle,
            kind,
            ligand_centroid: ligand_ring.center,
            receptor_centroid: receptor_ring.center,
            receptor_residue,
        });
    }
    narrate!(verbose, "Total Pi-Pi interactions: {}", pairs.len());

    Ok(DetectionReport {
        ligand: ligand_label,
        pairs,
        statistics,
    })
}
