use base::error::CavfError;
use meas::{CavityDesc, CavityProfile, Element, RtvfParams, ViewFactors};
use serde::Serialize;
use std::{
    fmt::{Display, Formatter},
    path::{Path, PathBuf},
};

/// De/Serialisation error.
#[derive(Debug)]
pub enum SerialisationError {
    TomlDe(toml::de::Error),
    Yaml(serde_yaml::Error),
    UnknownFormat(String),
}

impl Display for SerialisationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TomlDe(err) => write!(f, "Toml deserialisation error: {}", err),
            Self::Yaml(err) => write!(f, "Yaml error: {}", err),
            Self::UnknownFormat(ext) => write!(f, "Unknown file format '{}'", ext),
        }
    }
}

impl std::error::Error for SerialisationError {}

impl From<toml::de::Error> for SerialisationError {
    fn from(err: toml::de::Error) -> Self { Self::TomlDe(err) }
}

impl From<serde_yaml::Error> for SerialisationError {
    fn from(err: serde_yaml::Error) -> Self { Self::Yaml(err) }
}

/// Loads a cavity description from a YAML (`.yaml`, `.yml`) or TOML
/// (`.toml`) file.
pub fn load_desc(path: &Path) -> Result<CavityDesc, CavfError> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        CavfError::from_io_error(
            err,
            format!("Failed to read cavity description: {}", path.display()),
        )
    })?;
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_desc(&content, &ext).map_err(|err| {
        CavfError::new(
            format!("Failed to parse cavity description: {}", path.display()),
            Some(Box::new(err)),
        )
    })
}

fn parse_desc(content: &str, ext: &str) -> Result<CavityDesc, SerialisationError> {
    match ext {
        "yaml" | "yml" => Ok(serde_yaml::from_str(content)?),
        "toml" => Ok(toml::from_str(content)?),
        other => Err(SerialisationError::UnknownFormat(other.to_string())),
    }
}

/// Everything written to the output file of an estimation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Report<'a> {
    pub profile: &'a CavityProfile,
    pub params: &'a RtvfParams,
    pub elements: &'a [Element],
    pub results: &'a ViewFactors,
}

/// Writes the report as YAML.
pub fn write_report(report: &Report, path: &Path) -> Result<(), CavfError> {
    let yaml = serde_yaml::to_string(report).map_err(|err| {
        CavfError::new(
            "Failed to serialise the view factors",
            Some(Box::new(SerialisationError::Yaml(err))),
        )
    })?;
    std::fs::write(path, yaml).map_err(|err| {
        CavfError::from_io_error(err, format!("Failed to write results: {}", path.display()))
    })
}

/// Returns the output file of an estimation: the one given on the command
/// line, otherwise a file named after the input (or the launch time) in the
/// input's directory.
pub fn output_path(output: Option<PathBuf>, input: Option<&Path>) -> PathBuf {
    if let Some(output) = output {
        return output;
    }
    match input {
        Some(input) => {
            let stem = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("cavity");
            input.with_file_name(format!("{}.vf.yaml", stem))
        },
        None => PathBuf::from(format!(
            "cavf_{}.vf.yaml",
            base::utils::iso_timestamp_short(chrono::Local::now())
        )),
    }
}
