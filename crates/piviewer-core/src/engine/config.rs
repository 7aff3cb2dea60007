use crate::core::io::format::StructureFormat;
use crate::core::perception::PerceptionConfig;
use std::path::PathBuf;
use thiserror::Error;

/// Placeholder in a batch file template that is replaced by the entry's code.
pub const CODE_PLACEHOLDER: &str = "{code}";

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Parameter '{parameter}' must be {requirement} (got {value})")]
    InvalidValue {
        parameter: &'static str,
        value: String,
        requirement: &'static str,
    },
}

fn positive(parameter: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            parameter,
            value: value.to_string(),
            requirement: "a finite positive number",
        })
    }
}

fn non_negative(parameter: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            parameter,
            value: value.to_string(),
            requirement: "a finite non-negative number",
        })
    }
}

/// Geometric criterion of a π–π interaction plus narration control.
///
/// A ligand/receptor ring pair qualifies when the centroid distance is strictly
/// below `max_centroid_distance` and the folded inter-plane angle is strictly
/// below `max_parallel_dihedral` (parallel stacking) or strictly above
/// `min_tshape_dihedral` (T-shaped stacking).
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionConfig {
    /// Maximal ring centroid distance in Angstroms.
    pub max_centroid_distance: f64,
    /// Angles in degrees below this are parallel stacking.
    pub max_parallel_dihedral: f64,
    /// Angles in degrees above this are T-shaped stacking.
    pub min_tshape_dihedral: f64,
    /// Promotes the detector's narration from DEBUG to INFO. Never affects results.
    pub verbose: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            max_centroid_distance: 5.0,
            max_parallel_dihedral: 25.0,
            min_tshape_dihedral: 80.0,
            verbose: false,
        }
    }
}

#[derive(Default)]
pub struct DetectionConfigBuilder {
    max_centroid_distance: Option<f64>,
    max_parallel_dihedral: Option<f64>,
    min_tshape_dihedral: Option<f64>,
    verbose: Option<bool>,
}

impl DetectionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_centroid_distance(mut self, distance: f64) -> Self {
        self.max_centroid_distance = Some(distance);
        self
    }
    pub fn max_parallel_dihedral(mut self, degrees: f64) -> Self {
        self.max_parallel_dihedral = Some(degrees);
        self
    }
    pub fn min_tshape_dihedral(mut self, degrees: f64) -> Self {
        self.min_tshape_dihedral = Some(degrees);
        self
    }
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Builds the configuration, filling unset values with the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if any threshold is not a finite positive number.
    pub fn build(self) -> Result<DetectionConfig, ConfigError> {
        let defaults = DetectionConfig::default();
        Ok(DetectionConfig {
            max_centroid_distance: positive(
                "max_centroid_distance",
                self.max_centroid_distance
                    .unwrap_or(defaults.max_centroid_distance),
            )?,
            max_parallel_dihedral: positive(
                "max_parallel_dihedral",
                self.max_parallel_dihedral
                    .unwrap_or(defaults.max_parallel_dihedral),
            )?,
            min_tshape_dihedral: positive(
                "min_tshape_dihedral",
                self.min_tshape_dihedral
                    .unwrap_or(defaults.min_tshape_dihedral),
            )?,
            verbose: self.verbose.unwrap_or(defaults.verbose),
        })
    }
}

#[derive(Default)]
pub struct PerceptionConfigBuilder {
    bond_tolerance: Option<f64>,
    max_ring_size: Option<usize>,
    planarity_tolerance: Option<f64>,
    max_aromatic_bond_length: Option<f64>,
}

impl PerceptionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bond_tolerance(mut self, tolerance: f64) -> Self {
        self.bond_tolerance = Some(tolerance);
        self
    }
    pub fn max_ring_size(mut self, size: usize) -> Self {
        self.max_ring_size = Some(size);
        self
    }
    pub fn planarity_tolerance(mut self, tolerance: f64) -> Self {
        self.planarity_tolerance = Some(tolerance);
        self
    }
    pub fn max_aromatic_bond_length(mut self, length: f64) -> Self {
        self.max_aromatic_bond_length = Some(length);
        self
    }

    pub fn build(self) -> Result<PerceptionConfig, ConfigError> {
        let defaults = PerceptionConfig::default();
        let max_ring_size = self.max_ring_size.unwrap_or(defaults.max_ring_size);
        if max_ring_size < 3 {
            return Err(ConfigError::InvalidValue {
                parameter: "max_ring_size",
                value: max_ring_size.to_string(),
                requirement: "at least 3",
            });
        }
        Ok(PerceptionConfig {
            bond_tolerance: non_negative(
                "bond_tolerance",
                self.bond_tolerance.unwrap_or(defaults.bond_tolerance),
            )?,
            max_ring_size,
            planarity_tolerance: positive(
                "planarity_tolerance",
                self.planarity_tolerance
                    .unwrap_or(defaults.planarity_tolerance),
            )?,
            max_aromatic_bond_length: positive(
                "max_aromatic_bond_length",
                self.max_aromatic_bond_length
                    .unwrap_or(defaults.max_aromatic_bond_length),
            )?,
        })
    }
}

/// Settings of the dataset-list batch driver.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    /// Directory holding the structure files.
    pub structure_dir: PathBuf,
    /// File name template; [`CODE_PLACEHOLDER`] is replaced by the entry code.
    pub file_template: String,
    /// Whether the entry code is lower-cased before substitution.
    pub lowercase_code: bool,
    /// Ligand names tried after the listed ones.
    pub fallback_ligands: Vec<String>,
    /// Structure format; inferred from the file extension when `None`.
    pub format: Option<StructureFormat>,
    pub detection: DetectionConfig,
    pub perception: PerceptionConfig,
}

impl BatchConfig {
    pub const DEFAULT_TEMPLATE: &'static str = "{code}_d1refined.pdb";
    pub const DEFAULT_FALLBACK: &'static str = "UNL";

    /// Path of the structure file belonging to `code`.
    pub fn structure_path(&self, code: &str) -> PathBuf {
        let code = if self.lowercase_code {
            code.to_lowercase()
        } else {
            code.to_string()
        };
        self.structure_dir
            .join(self.file_template.replace(CODE_PLACEHOLDER, &code))
    }
}

#[derive(Default)]
pub struct BatchConfigBuilder {
    structure_dir: Option<PathBuf>,
    file_template: Option<String>,
    lowercase_code: Option<bool>,
    fallback_ligands: Option<Vec<String>>,
    format: Option<StructureFormat>,
    detection: Option<DetectionConfig>,
    perception: Option<PerceptionConfig>,
}

impl BatchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn structure_dir(mut self, dir: PathBuf) -> Self {
        self.structure_dir = Some(dir);
        self
    }
    pub fn file_template(mut self, template: impl Into<String>) -> Self {
        self.file_template = Some(template.into());
        self
    }
    pub fn lowercase_code(mut self, lowercase: bool) -> Self {
        self.lowercase_code = Some(lowercase);
        self
    }
    pub fn fallback_ligands(mut self, names: Vec<String>) -> Self {
        self.fallback_ligands = Some(names);
        self
    }
    pub fn format(mut self, format: Option<StructureFormat>) -> Self {
        self.format = format;
        self
    }
    pub fn detection(mut self, config: DetectionConfig) -> Self {
        self.detection = Some(config);
        self
    }
    pub fn perception(mut self, config: PerceptionConfig) -> Self {
        self.perception = Some(config);
        self
    }

    pub fn build(self) -> Result<BatchConfig, ConfigError> {
        let file_template = self
            .file_template
            .unwrap_or_else(|| BatchConfig::DEFAULT_TEMPLATE.to_string());
        if !file_template.contains(CODE_PLACEHOLDER) {
            return Err(ConfigError::InvalidValue {
                parameter: "file_template",
                value: file_template,
                requirement: "a template containing '{code}'",
            });
        }
        Ok(BatchConfig {
            structure_dir: self
                .structure_dir
                .ok_or(ConfigError::MissingParameter("structure_dir"))?,
            file_template,
            lowercase_code: self.lowercase_code.unwrap_or(true),
            fallback_ligands: self
                .fallback_ligands
                .unwrap_or_else(|| vec![BatchConfig::DEFAULT_FALLBACK.to_string()]),
            format: self.format,
            detection: self.detection.unwrap_or_default(),
            perception: self.perception.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_builder_defaults_match_reference_criteria() {
        let config = DetectionConfigBuilder::new().build().unwrap();
        assert_eq!(config, DetectionConfig::default());
        assert_eq!(config.max_centroid_distance, 5.0);
        assert_eq!(config.max_parallel_dihedral, 25.0);
        assert_eq!(config.min_tshape_dihedral, 80.0);
        assert!(!config.verbose);
    }

    #[test]
    fn detection_builder_applies_overrides() {
        let config = DetectionConfigBuilder::new()
            .max_centroid_distance(4.5)
            .max_parallel_dihedral(30.0)
            .min_tshape_dihedral(60.0)
            .verbose(true)
            .build()
            .unwrap();
        assert_eq!(config.max_centroid_distance, 4.5);
        assert_eq!(config.max_parallel_dihedral, 30.0);
        assert_eq!(config.min_tshape_dihedral, 60.0);
        assert!(config.verbose);
    }

    #[test]
    fn detection_builder_rejects_non_positive_and_non_finite_values() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = DetectionConfigBuilder::new()
                .max_centroid_distance(bad)
                .build()
                .unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidValue {
                    parameter: "max_centroid_distance",
                    ..
                }
            ));
        }
        assert!(
            DetectionConfigBuilder::new()
                .min_tshape_dihedral(-80.0)
                .build()
                .is_err()
        );
    }

    #[test]
    fn perception_builder_validates_values() {
        assert_eq!(
            PerceptionConfigBuilder::new().build().unwrap(),
            PerceptionConfig::default()
        );
        assert!(
            PerceptionConfigBuilder::new()
                .bond_tolerance(0.0)
                .build()
                .is_ok()
        );
        assert!(
            PerceptionConfigBuilder::new()
                .bond_tolerance(-0.1)
                .build()
                .is_err()
        );
        assert!(PerceptionConfigBuilder::new().max_ring_size(2).build().is_err());
        assert!(
            PerceptionConfigBuilder::new()
                .planarity_tolerance(0.0)
                .build()
                .is_err()
        );
    }

    #[test]
    fn batch_builder_requires_structure_dir() {
        assert_eq!(
            BatchConfigBuilder::new().build().unwrap_err(),
            ConfigError::MissingParameter("structure_dir")
        );
    }

    #[test]
    fn batch_builder_rejects_template_without_placeholder() {
        let err = BatchConfigBuilder::new()
            .structure_dir(PathBuf::from("/data"))
            .file_template("complex.pdb")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                parameter: "file_template",
                ..
            }
        ));
    }

    #[test]
    fn batch_structure_path_lowercases_code_by_default() {
        let config = BatchConfigBuilder::new()
            .structure_dir(PathBuf::from("/data"))
            .build()
            .unwrap();
        assert_eq!(config.fallback_ligands, vec!["UNL".to_string()]);
        assert_eq!(
            config.structure_path("1ABC"),
            PathBuf::from("/data/1abc_d1refined.pdb")
        );

        let keep_case = BatchConfigBuilder::new()
            .structure_dir(PathBuf::from("/data"))
            .file_template("{code}.bgf")
            .lowercase_code(false)
            .build()
            .unwrap();
        assert_eq!(
            keep_case.structure_path("1ABC"),
            PathBuf::from("/data/1ABC.bgf")
        );
    }
}
