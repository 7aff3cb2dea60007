use crate::core::io::format::{LoadedStructure, StructureFormat, read_structure};
use crate::core::io::report::PairRecord;
use crate::core::models::system::MolecularSystem;
use crate::core::perception::{self, PerceptionConfig, rings::Ring};
use crate::engine::config::{DetectionConfig, DetectionConfigBuilder};
use crate::engine::detector::{self, DetectionReport, RingPair};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Value returned by [`find_pi_pi`] when the ligand residue does not exist.
pub const LIGAND_NOT_FOUND: i64 = -1;

/// A loaded structure with its perceived rings, ready for detection.
#[derive(Debug, Clone)]
pub struct PreparedStructure {
    pub system: MolecularSystem,
    pub rings: Vec<Ring>,
    pub format: StructureFormat,
}

impl PreparedStructure {
    /// Runs the detector on this structure for one ligand name.
    pub fn detect(
        &self,
        ligand_name: &str,
        config: &DetectionConfig,
    ) -> Result<DetectionReport, EngineError> {
        detector::detect(&self.system, &self.rings, ligand_name, config)
    }
}

/// Loads a structure file and perceives its rings.
///
/// # Errors
///
/// Returns [`EngineError::StructureLoad`] if the file is missing, unreadable or malformed.
#[instrument(skip_all, name = "prepare_structure", fields(path = %path.display()))]
pub fn prepare(
    path: &Path,
    format: Option<StructureFormat>,
    perception_config: &PerceptionConfig,
    reporter: &ProgressReporter,
) -> Result<PreparedStructure, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Loading Structure",
    });
    let LoadedStructure {
        mut system,
        format,
        complete_connectivity,
    } = read_structure(path, format)?;
    info!(
        atoms = system.atom_count(),
        residues = system.residue_count(),
        %format,
        "Structure loaded."
    );
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Perceiving Rings",
    });
    let perceived = perception::perceive(&mut system, complete_connectivity, perception_config);
    debug!(
        perceived_bonds = perceived.perceived_bonds,
        total_bonds = system.bonds().len(),
        "Bond perception complete."
    );
    info!(
        rings = perceived.rings.len(),
        aromatic = perceived.rings.iter().filter(|r| r.is_aromatic()).count(),
        "Ring perception complete."
    );
    reporter.report(Progress::PhaseFinish);

    Ok(PreparedStructure {
        system,
        rings: perceived.rings,
        format,
    })
}

/// Detects π–π stacking for one ligand in one structure file.
///
/// # Arguments
///
/// * `path` - Structure file to analyse.
/// * `format` - Structure format; inferred from the extension when `None`.
/// * `ligand_name` - Exact, case-sensitive residue name of the ligand.
/// * `detection_config` - Stacking criterion and narration level.
/// * `perception_config` - Bond, ring and aromaticity perception parameters.
/// * `reporter` - Progress sink.
///
/// # Errors
///
/// Returns [`EngineError::StructureLoad`] if the structure cannot be read and
/// [`EngineError::LigandNotFound`] if no residue carries `ligand_name`.
#[instrument(skip_all, name = "detect_workflow", fields(ligand = ligand_name))]
pub fn run(
    path: &Path,
    format: Option<StructureFormat>,
    ligand_name: &str,
    detection_config: &DetectionConfig,
    perception_config: &PerceptionConfig,
    reporter: &ProgressReporter,
) -> Result<DetectionReport, EngineError> {
    let prepared = prepare(path, format, perception_config, reporter)?;

    reporter.report(Progress::PhaseStart {
        name: "Detecting Stacking",
    });
    let report = prepared.detect(ligand_name, detection_config);
    reporter.report(Progress::PhaseFinish);

    let report = report?;
    info!(
        pairs = report.count(),
        ligand = %report.ligand,
        "Detection complete."
    );
    Ok(report)
}

/// Counts π–π interactions between a ligand and its receptor, the classic way.
///
/// Returns the number of qualifying ring pairs, or [`LIGAND_NOT_FOUND`] (`-1`)
/// when no residue is named `ligand_name`. Failures to load the structure are
/// still reported as errors.
///
/// # Errors
///
/// Returns [`EngineError::Config`] for non-positive or non-finite thresholds and
/// [`EngineError::StructureLoad`] if the structure cannot be read.
pub fn find_pi_pi(
    path: &Path,
    ligand_name: &str,
    max_centroid_distance: f64,
    max_parallel_dihedral: f64,
    min_tshape_dihedral: f64,
    verbose: bool,
) -> Result<i64, EngineError> {
    let config = DetectionConfigBuilder::new()
        .max_centroid_distance(max_centroid_distance)
        .max_parallel_dihedral(max_parallel_dihedral)
        .min_tshape_dihedral(min_tshape_dihedral)
        .verbose(verbose)
        .build()?;
    legacy_count(run(
        path,
        None,
        ligand_name,
        &config,
        &PerceptionConfig::default(),
        &ProgressReporter::new(),
    ))
}

/// Collapses a tagged detection result into the integer convention of [`find_pi_pi`].
pub fn legacy_count(result: Result<DetectionReport, EngineError>) -> Result<i64, EngineError> {
    match result {
        Ok(report) => Ok(report.count() as i64),
        Err(EngineError::LigandNotFound { .. }) => Ok(LIGAND_NOT_FOUND),
        Err(e) => Err(e),
    }
}

impl From<&RingPair> for PairRecord {
    fn from(pair: &RingPair) -> Self {
        let residue = pair.receptor_residue.as_ref();
        Self {
            ligand_ring: pair.ligand_ring,
            receptor_ring: pair.receptor_ring,
            receptor_chain: residue.map_or(' ', |r| r.chain),
            receptor_residue_number: residue.map_or(0, |r| r.residue_number),
            receptor_insertion_code: residue.and_then(|r| r.insertion_code),
            receptor_residue_name: residue.map(|r| r.name.clone()).unwrap_or_default(),
            kind: pair.kind.to_string(),
            angle: pair.angle,
            distance: pair.distance,
            ligand_centroid_x: pair.ligand_centroid.x,
            ligand_centroid_y: pair.ligand_centroid.y,
            ligand_centroid_z: pair.ligand_centroid.z,
            receptor_centroid_x: pair.receptor_centroid.x,
            receptor_centroid_y: pair.receptor_centroid.y,
            receptor_centroid_z: pair.receptor_centroid.z,
        }
    }
}

/// Flattens a report into rows for [`crate::core::io::report::write_csv`].
pub fn pair_records(report: &DetectionReport) -> Vec<PairRecord> {
    report.pairs.iter().map(PairRecord::from).collect()
}
