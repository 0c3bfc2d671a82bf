use crate::matrix;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    fs::File,
    io::Error,
    os::unix::fs::MetadataExt,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, error, warn};

/// sweep used when no configuration file is given
pub const EMBEDDED_SWEEP: &str = include_str!("../sweep.yaml");

/// base of the unique key/field names generated by the population command
const NAME_BASE: u64 = 62;

// check if a file is executable
pub fn check_executable(path: &Path) -> Result<bool, ConfigErrors> {
    if !path.is_file() {
        Err(ConfigErrors::FileNotFound(path.to_path_buf()))
    } else {
        match File::open(path).map(|file| file.metadata()) {
            Ok(Ok(metadata)) => Ok((metadata.mode() & 0o111) != 0),
            Ok(Err(e)) | Err(e) => Err(ConfigErrors::MetadataNotFound(e)),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigErrors {
    #[error("Failed to read configuration file {path:?}: {source}")]
    ReadConfig { path: PathBuf, source: Error },
    #[error("Failed to parse configuration: {0}")]
    ParseConfig(#[from] serde_yaml::Error),
    #[error("File not found: {0:?}")]
    FileNotFound(PathBuf),
    #[error("Metadata not found")]
    MetadataNotFound(#[source] Error),
    #[error("Configuration failed preflight checks")]
    PreflightFailed,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SweepConfig {
    // how to reach the population command, every field has a default
    #[serde(default)]
    pub command: CommandConfig,
    // test groups in declaration order
    pub groups: Vec<TestGroup>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CommandConfig {
    #[serde(default = "default_exec")]
    pub exec: PathBuf,
    #[serde(default = "default_subcommand")]
    pub subcommand: String,
    #[serde(default)]
    pub metrics_stream: MetricsStream,
}

/// Command settings given on the command line, each one replaces the configured value
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandOverrides {
    pub exec: Option<PathBuf>,
    pub subcommand: Option<String>,
    pub metrics_stream: Option<MetricsStream>,
}

impl CommandConfig {
    pub fn apply(&mut self, overrides: CommandOverrides) {
        if let Some(exec) = overrides.exec {
            self.exec = exec;
        }
        if let Some(subcommand) = overrides.subcommand {
            self.subcommand = subcommand;
        }
        if let Some(metrics_stream) = overrides.metrics_stream {
            self.metrics_stream = metrics_stream;
        }
    }
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            exec: default_exec(),
            subcommand: default_subcommand(),
            metrics_stream: MetricsStream::default(),
        }
    }
}

/// Which captured stream of the population command carries the memory report
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MetricsStream {
    #[default]
    Stderr,
    Stdout,
    /// each stream is parsed on its own, stderr wins on conflicts
    Both,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum StructureType {
    String,
    Hash,
    List,
    Set,
    Zset,
}

impl StructureType {
    /// field_count and field_size are only meaningful for hashes
    pub fn uses_fields(self) -> bool {
        matches!(self, Self::Hash)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Hash => "hash",
            Self::List => "list",
            Self::Set => "set",
            Self::Zset => "zset",
        }
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TestGroup {
    #[serde(rename = "type")]
    pub structure: StructureType,
    pub name: Option<String>,
    pub key_counts: Option<Vec<u64>>,
    pub key_sizes: Option<Vec<u64>>,
    pub field_counts: Option<Vec<u64>>,
    pub field_sizes: Option<Vec<u64>>,
    pub value_sizes: Option<Vec<u64>>,
}

impl TestGroup {
    /// name used in logs and batch output, falls back to `<position>-<type>`
    pub fn label(&self, position: usize) -> String {
        match self.name {
            Some(ref name) => name.clone(),
            None => format!("{position}-{}", self.structure),
        }
    }

    /// all explicitly given candidate lists with their yaml names
    fn dimensions(&self) -> [(&'static str, Option<&Vec<u64>>); 5] {
        [
            ("key_counts", self.key_counts.as_ref()),
            ("key_sizes", self.key_sizes.as_ref()),
            ("field_counts", self.field_counts.as_ref()),
            ("field_sizes", self.field_sizes.as_ref()),
            ("value_sizes", self.value_sizes.as_ref()),
        ]
    }
}

impl SweepConfig {
    /// parse a sweep from yaml
    pub fn from_yaml(source: &str) -> Result<Self, ConfigErrors> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// read and parse a sweep from a file
    pub fn load(path: &Path) -> Result<Self, ConfigErrors> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigErrors::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = ?path, "Read sweep configuration");

        Self::from_yaml(&source)
    }

    /// the sweep compiled into the binary
    pub fn embedded() -> Result<Self, ConfigErrors> {
        Self::from_yaml(EMBEDDED_SWEEP)
    }

    /// Validate the whole configuration, logging every problem before failing
    pub fn preflight_checks(&self) -> Result<(), ConfigErrors> {
        // attempt to catch all errors instead of piece-by-piece to make debugging easier for users
        let mut contains_error = false;

        if self.groups.is_empty() {
            error!("No test group was defined, unable to build a parameter matrix");
            contains_error = true;
        }

        for (position, group) in self.groups.iter().enumerate() {
            let label = group.label(position);

            for (dimension, values) in group.dimensions() {
                if values.is_some_and(|values| values.is_empty()) {
                    error!("groups.{label}.{dimension} is empty, omit it to use the default instead");
                    contains_error = true;
                }
            }

            let key_sizes = matrix::candidates(&group.key_sizes, matrix::DEFAULT_KEY_SIZE);
            for key_count in matrix::candidates(&group.key_counts, matrix::DEFAULT_KEY_COUNT) {
                for key_size in key_sizes.iter() {
                    if !is_length_sufficient(key_count, *key_size) {
                        warn!("groups.{label}: key_size {key_size} cannot give {key_count} keys unique names");
                    }
                }
            }

            if group.structure.uses_fields() {
                let field_sizes =
                    matrix::candidates(&group.field_sizes, matrix::DEFAULT_FIELD_SIZE);
                for field_count in
                    matrix::candidates(&group.field_counts, matrix::DEFAULT_FIELD_COUNT)
                {
                    for field_size in field_sizes.iter() {
                        if !is_length_sufficient(field_count, *field_size) {
                            warn!("groups.{label}: field_size {field_size} cannot give {field_count} fields unique names");
                        }
                    }
                }
            } else if group.field_counts.is_some() || group.field_sizes.is_some() {
                warn!(
                    "groups.{label} sets field parameters but {} does not use them, they will be omitted",
                    group.structure
                );
            }
        }

        // bare command names are resolved through PATH by the OS, only check explicit paths
        let exec = &self.command.exec;
        if exec.components().count() > 1 {
            match check_executable(exec) {
                Ok(true) => {}
                Ok(false) => {
                    error!(
                        "command.exec {} is not executable",
                        exec.to_string_lossy()
                    );
                    contains_error = true;
                }
                Err(e) => {
                    error!(
                        "Failed to determine if command.exec ({}) is an executable: {e}",
                        exec.to_string_lossy()
                    );
                    contains_error = true;
                }
            }
        }

        if contains_error {
            Err(ConfigErrors::PreflightFailed)
        } else {
            Ok(())
        }
    }
}

/// smallest name length for which `count` distinct base62 names exist
pub fn min_length_for_uniqueness(count: u64) -> u32 {
    let mut length = 1;
    let mut capacity = NAME_BASE;

    while count >= capacity {
        length += 1;
        capacity = match capacity.checked_mul(NAME_BASE) {
            Some(capacity) => capacity,
            None => break,
        };
    }

    length
}

/// no names are generated for a count of zero, so any length will do
pub fn is_length_sufficient(count: u64, length: u64) -> bool {
    count == 0 || length >= u64::from(min_length_for_uniqueness(count))
}

fn default_exec() -> PathBuf {
    PathBuf::from("./resp-cost")
}

fn default_subcommand() -> String {
    "populate".to_owned()
}

#[cfg(test)]
mod config_test;
