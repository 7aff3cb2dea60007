use crate::cli::{BatchArgs, DetectArgs};
use crate::error::{CliError, Result};
use piviewer::core::io::format::StructureFormat;
use piviewer::core::perception::PerceptionConfig;
use piviewer::engine::config as core_config;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialCriteriaConfig {
    max_distance: Option<f64>,
    max_parallel: Option<f64>,
    min_tshape: Option<f64>,
    verbose: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialPerceptionConfig {
    bond_tolerance: Option<f64>,
    max_ring_size: Option<usize>,
    planarity_tolerance: Option<f64>,
    max_aromatic_bond_length: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialBatchConfig {
    template: Option<String>,
    fallback: Option<Vec<String>>,
    lowercase_code: Option<bool>,
    format: Option<StructureFormat>,
}

/// Settings read from a TOML configuration file, every value optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    criteria: Option<PartialCriteriaConfig>,
    perception: Option<PartialPerceptionConfig>,
    batch: Option<PartialBatchConfig>,
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads the file when one is given, otherwise starts from an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_with_detect_args(
        mut self,
        args: &DetectArgs,
    ) -> Result<(core_config::DetectionConfig, PerceptionConfig)> {
        self.apply_set_values(&args.set_values)?;
        let detection = self.merge_detection(
            args.max_distance,
            args.max_parallel,
            args.min_tshape,
            true,
        )?;
        let perception = self.merge_perception()?;
        Ok((detection, perception))
    }

    pub fn merge_with_batch_args(mut self, args: &BatchArgs) -> Result<core_config::BatchConfig> {
        self.apply_set_values(&args.set_values)?;
        let detection = self.merge_detection(None, None, None, false)?;
        let perception = self.merge_perception()?;
        let batch_config = self.batch.take().unwrap_or_default();

        let mut builder = core_config::BatchConfigBuilder::new()
            .structure_dir(args.structure_dir.clone())
            .format(batch_config.format)
            .detection(detection)
            .perception(perception);

        if let Some(template) = args.template.clone().or(batch_config.template) {
            builder = builder.file_template(template);
        }
        if !args.fallback.is_empty() {
            builder = builder.fallback_ligands(args.fallback.clone());
        } else if let Some(fallback) = batch_config.fallback {
            builder = builder.fallback_ligands(fallback);
        }
        if args.keep_case {
            builder = builder.lowercase_code(false);
        } else if let Some(lowercase) = batch_config.lowercase_code {
            builder = builder.lowercase_code(lowercase);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn merge_detection(
        &mut self,
        max_distance: Option<f64>,
        max_parallel: Option<f64>,
        min_tshape: Option<f64>,
        default_verbose: bool,
    ) -> Result<core_config::DetectionConfig> {
        let criteria = self.criteria.take().unwrap_or_default();
        let mut builder = core_config::DetectionConfigBuilder::new()
            .verbose(criteria.verbose.unwrap_or(default_verbose));

        if let Some(distance) = max_distance.or(criteria.max_distance) {
            builder = builder.max_centroid_distance(distance);
        }
        if let Some(angle) = max_parallel.or(criteria.max_parallel) {
            builder = builder.max_parallel_dihedral(angle);
        }
        if let Some(angle) = min_tshape.or(criteria.min_tshape) {
            builder = builder.min_tshape_dihedral(angle);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn merge_perception(&mut self) -> Result<PerceptionConfig> {
        let partial = self.perception.take().unwrap_or_default();
        let mut builder = core_config::PerceptionConfigBuilder::new();

        if let Some(tolerance) = partial.bond_tolerance {
            builder = builder.bond_tolerance(tolerance);
        }
        if let Some(size) = partial.max_ring_size {
            builder = builder.max_ring_size(size);
        }
        if let Some(tolerance) = partial.planarity_tolerance {
            builder = builder.planarity_tolerance(tolerance);
        }
        if let Some(length) = partial.max_aromatic_bond_length {
            builder = builder.max_aromatic_bond_length(length);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let (key, value_str) = (key.trim(), value_str.trim());

            match key {
                "criteria.max-distance" => {
                    self.criteria().max_distance = Some(parse_value(key, value_str)?);
                }
                "criteria.max-parallel" => {
                    self.criteria().max_parallel = Some(parse_value(key, value_str)?);
                }
                "criteria.min-tshape" => {
                    self.criteria().min_tshape = Some(parse_value(key, value_str)?);
                }
                "criteria.verbose" => {
                    self.criteria().verbose = Some(parse_value(key, value_str)?);
                }
                "perception.bond-tolerance" => {
                    self.perception().bond_tolerance = Some(parse_value(key, value_str)?);
                }
                "perception.max-ring-size" => {
                    self.perception().max_ring_size = Some(parse_value(key, value_str)?);
                }
                "perception.planarity-tolerance" => {
                    self.perception().planarity_tolerance = Some(parse_value(key, value_str)?);
                }
                "perception.max-aromatic-bond-length" => {
                    self.perception().max_aromatic_bond_length =
                        Some(parse_value(key, value_str)?);
                }
                "batch.template" => {
                    self.batch().template = Some(value_str.to_string());
                }
                "batch.fallback" => {
                    self.batch().fallback = Some(
                        value_str
                            .split(',')
                            .map(str::trim)
                            .filter(|name| !name.is_empty())
                            .map(str::to_string)
                            .collect(),
                    );
                }
                "batch.lowercase-code" => {
                    self.batch().lowercase_code = Some(parse_value(key, value_str)?);
                }
                "batch.format" => {
                    self.batch().format = Some(parse_value(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }

    fn criteria(&mut self) -> &mut PartialCriteriaConfig {
        self.criteria.get_or_insert_with(Default::default)
    }

    fn perception(&mut self) -> &mut PartialPerceptionConfig {
        self.perception.get_or_insert_with(Default::default)
    }

    fn batch(&mut self) -> &mut PartialBatchConfig {
        self.batch.get_or_insert_with(Default::default)
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str) -> Result<T> {
    value_str.parse().map_err(|_| {
        CliError::Config(format!("Invalid value for {}: {}", key, value_str))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    fn write_config_file(dir: &TempDir, content: &str) -> PathBuf {
        let file_path = dir.path().join("piviewer.toml");
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn detect_args(extra: &[&str]) -> DetectArgs {
        let mut argv = vec!["piviewer", "detect", "-i", "in.pdb", "-l", "THA"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Detect(args) => args,
            _ => panic!("Expected 'detect' subcommand"),
        }
    }

    fn batch_args(extra: &[&str]) -> BatchArgs {
        let mut argv = vec!["piviewer", "batch", "-L", "list.txt", "-d", "pdbs"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Batch(args) => args,
            _ => panic!("Expected 'batch' subcommand"),
        }
    }

    #[test]
    fn empty_config_yields_defaults() {
        let (detection, perception) = PartialConfig::default()
            .merge_with_detect_args(&detect_args(&[]))
            .unwrap();
        assert_eq!(detection.max_centroid_distance, 5.0);
        assert_eq!(detection.max_parallel_dihedral, 25.0);
        assert_eq!(detection.min_tshape_dihedral, 80.0);
        assert!(detection.verbose);
        assert_eq!(perception, PerceptionConfig::default());
    }

    #[test]
    fn file_values_are_loaded() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            [criteria]
            max-distance = 4.5
            min-tshape = 75.0

            [perception]
            max-ring-size = 12
            "#,
        );
        let partial = PartialConfig::from_file(&path).unwrap();
        let (detection, perception) = partial.merge_with_detect_args(&detect_args(&[])).unwrap();
        assert_eq!(detection.max_centroid_distance, 4.5);
        assert_eq!(detection.min_tshape_dihedral, 75.0);
        assert_eq!(perception.max_ring_size, 12);
    }

    #[test]
    fn cli_beats_set_values_which_beat_the_file() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            [criteria]
            max-distance = 4.5
            max-parallel = 20.0
            "#,
        );
        let args = detect_args(&[
            "--max-distance",
            "6.0",
            "-S",
            "criteria.max-distance=5.5",
            "-S",
            "criteria.max-parallel=30",
        ]);
        let (detection, _) = PartialConfig::from_file(&path)
            .unwrap()
            .merge_with_detect_args(&args)
            .unwrap();
        assert_eq!(detection.max_centroid_distance, 6.0);
        assert_eq!(detection.max_parallel_dihedral, 30.0);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "[criteria]\nmax-dist = 4.5\n");
        assert!(matches!(
            PartialConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));

        let err = PartialConfig::default()
            .merge_with_detect_args(&detect_args(&["-S", "criteria.radius=3"]))
            .unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn invalid_values_are_reported_as_config_errors() {
        for set in ["criteria.max-distance=abc", "criteria.max-distance=-1", "nokey"] {
            let err = PartialConfig::default()
                .merge_with_detect_args(&detect_args(&["-S", set]))
                .unwrap_err();
            assert!(matches!(err, CliError::Config(_)), "{set}");
        }
    }

    #[test]
    fn batch_merges_file_and_cli() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            [batch]
            template = "{code}.bgf"
            fallback = ["LIG"]
            lowercase-code = true
            format = "bgf"
            "#,
        );
        let config = PartialConfig::from_file(&path)
            .unwrap()
            .merge_with_batch_args(&batch_args(&["--keep-case"]))
            .unwrap();
        assert_eq!(config.file_template, "{code}.bgf");
        assert_eq!(config.fallback_ligands, vec!["LIG"]);
        assert!(!config.lowercase_code);
        assert_eq!(config.format, Some(StructureFormat::Bgf));
        assert!(!config.detection.verbose);
        assert_eq!(config.structure_path("1ACJ"), PathBuf::from("pdbs/1ACJ.bgf"));

        let config = PartialConfig::default()
            .merge_with_batch_args(&batch_args(&["--fallback", "UNK", "--template", "{code}.pdb"]))
            .unwrap();
        assert_eq!(config.fallback_ligands, vec!["UNK"]);
        assert_eq!(config.structure_path("1ACJ"), PathBuf::from("pdbs/1acj.pdb"));
    }

    #[test]
    fn batch_template_without_placeholder_is_rejected() {
        let err = PartialConfig::default()
            .merge_with_batch_args(&batch_args(&["--template", "complex.pdb"]))
            .unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
