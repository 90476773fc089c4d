use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use crate::schema::{TableSchema, ALL_TABLES};

/// Directory name checked relative to the working directory
const LOCAL_DIR: &str = "data";

/// Location of the four CSV files
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Resolve the data directory: explicit path, then `./data`, then the
    /// platform data directory.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        let root = match explicit {
            Some(dir) => dir,
            None => {
                let local = PathBuf::from(LOCAL_DIR);
                if local.is_dir() {
                    local
                } else {
                    let proj_dirs = ProjectDirs::from("", "", "dmc-db")
                        .context("Could not determine data directory")?;
                    proj_dirs.data_dir().to_path_buf()
                }
            }
        };

        if !root.is_dir() {
            bail!("Data directory {:?} does not exist", root);
        }

        Ok(Self { root })
    }

    /// Use `root` as is, without checking it exists
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the CSV file backing a table
    pub fn table_path(&self, schema: &TableSchema) -> PathBuf {
        self.root.join(schema.source_file)
    }

    /// Source files that are not present
    pub fn missing_files(&self) -> Vec<&'static str> {
        ALL_TABLES
            .iter()
            .filter(|t| !self.table_path(t).is_file())
            .map(|t| t.source_file)
            .collect()
    }
}
