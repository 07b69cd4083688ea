// src/config.rs

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::load::encoding::{SOURCE_ENCODING, UPLOAD_ENCODING};
use crate::load::STDIN;
use crate::report::{ALL_TOURS, DEFAULT_BINS};

/// Settings for one dashboard run. Every field may be omitted from the
/// YAML file; command-line values win over file values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// `-` reads an upload from standard input.
    pub csv_path: PathBuf,
    /// Unset means windows-1252 for a file and utf-8 for standard input.
    pub encoding: Option<String>,
    pub tour: String,
    pub parquet_out: Option<PathBuf>,
    pub histogram_bins: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("taylor_Train.csv"),
            encoding: None,
            tour: ALL_TOURS.to_string(),
            parquet_out: None,
            histogram_bins: DEFAULT_BINS,
        }
    }
}

/// Values given on the command line; `None` keeps the file/default value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub csv_path: Option<PathBuf>,
    pub encoding: Option<String>,
    pub tour: Option<String>,
    pub parquet_out: Option<PathBuf>,
    pub histogram_bins: Option<usize>,
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(yaml).context("parsing YAML config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml_str(&yaml).with_context(|| format!("in config {}", path.display()))
    }

    pub fn reads_stdin(&self) -> bool {
        self.csv_path == Path::new(STDIN)
    }

    /// The configured encoding label, or the default for the input kind.
    pub fn encoding_label(&self) -> &str {
        match &self.encoding {
            Some(e) => e,
            None if self.reads_stdin() => UPLOAD_ENCODING,
            None => SOURCE_ENCODING,
        }
    }

    pub fn apply(mut self, o: Overrides) -> Result<Self> {
        if let Some(p) = o.csv_path {
            self.csv_path = p;
        }
        if o.encoding.is_some() {
            self.encoding = o.encoding;
        }
        if let Some(t) = o.tour {
            self.tour = t;
        }
        if o.parquet_out.is_some() {
            self.parquet_out = o.parquet_out;
        }
        if let Some(b) = o.histogram_bins {
            self.histogram_bins = b;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.histogram_bins == 0 {
            bail!("histogram_bins must be at least 1");
        }
        if self.encoding.as_deref().is_some_and(|e| e.trim().is_empty()) {
            bail!("encoding must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_file_gives_defaults() -> Result<()> {
        let cfg = Config::from_yaml_str("{}")?;
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.encoding_label(), "windows-1252");
        assert_eq!(cfg.tour, "All");
        assert_eq!(cfg.histogram_bins, 20);
        Ok(())
    }

    #[test]
    fn file_values_then_overrides() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "csv_path: data/tours.csv")?;
        writeln!(tmp, "tour: The Eras Tour")?;
        writeln!(tmp, "histogram_bins: 10")?;

        let cfg = Config::load(tmp.path())?;
        assert_eq!(cfg.csv_path, PathBuf::from("data/tours.csv"));
        assert_eq!(cfg.tour, "The Eras Tour");

        let cfg = cfg.apply(Overrides {
            tour: Some("Red".into()),
            parquet_out: Some("clean.parquet".into()),
            ..Default::default()
        })?;
        assert_eq!(cfg.tour, "Red");
        assert_eq!(cfg.histogram_bins, 10);
        assert_eq!(cfg.csv_path, PathBuf::from("data/tours.csv"));
        assert_eq!(cfg.parquet_out, Some(PathBuf::from("clean.parquet")));
        Ok(())
    }

    #[test]
    fn stdin_defaults_to_utf8() -> Result<()> {
        let cfg = Config::default().apply(Overrides {
            csv_path: Some("-".into()),
            ..Default::default()
        })?;
        assert!(cfg.reads_stdin());
        assert_eq!(cfg.encoding_label(), "utf-8");

        let cfg = cfg.apply(Overrides {
            encoding: Some("1252".into()),
            ..Default::default()
        })?;
        assert_eq!(cfg.encoding_label(), "1252");
        Ok(())
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Config::from_yaml_str("histogram_bins: 0").is_err());
        assert!(Config::from_yaml_str("fill_value: 3").is_err());
        assert!(Config::default()
            .apply(Overrides {
                encoding: Some(" ".into()),
                ..Default::default()
            })
            .is_err());
    }
}
