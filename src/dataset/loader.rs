use anyhow::{bail, Context, Result};
use once_cell::sync::OnceCell;
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::data_dir::DataDir;
use crate::parser::{parse_entities, parse_missions, Boss, Character, Entity, MissionTable, Weapon};
use crate::schema::{TableSchema, BOSSES, CHARACTERS, MISSIONS, WEAPONS};

/// The four tables, immutable once loaded
pub struct Dataset {
    pub characters: Vec<Character>,
    pub weapons: Vec<Weapon>,
    pub bosses: Vec<Boss>,
    pub missions: MissionTable,
}

impl Dataset {
    /// Read all four tables from `dir`
    pub fn load(dir: &DataDir) -> Result<Self> {
        let missing = dir.missing_files();
        if !missing.is_empty() {
            bail!(
                "Data directory {:?} is missing: {}",
                dir.root(),
                missing.join(", ")
            );
        }

        let start = Instant::now();
        let dataset = Self {
            characters: load_entities(dir, &CHARACTERS)?,
            weapons: load_entities(dir, &WEAPONS)?,
            bosses: load_entities(dir, &BOSSES)?,
            missions: parse_missions(open(dir, &MISSIONS)?, &MISSIONS)?,
        };

        info!(
            characters = dataset.characters.len(),
            weapons = dataset.weapons.len(),
            bosses = dataset.bosses.len(),
            missions = dataset.missions.rows.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "loaded dataset from {:?}",
            dir.root()
        );

        Ok(dataset)
    }
}

fn open(dir: &DataDir, schema: &TableSchema) -> Result<BufReader<File>> {
    let path = dir.table_path(schema);
    let file = File::open(&path).with_context(|| format!("Failed to open: {:?}", path))?;
    Ok(BufReader::new(file))
}

fn load_entities<E: Entity>(dir: &DataDir, schema: &TableSchema) -> Result<Vec<E>> {
    let rows = parse_entities(open(dir, schema)?, schema)?;
    debug!(table = schema.name, rows = rows.len(), "parsed table");
    Ok(rows)
}

/// Loads the dataset on first access and hands out the same shared handle afterwards.
///
/// Concurrent first callers block on a single load; a failed load is not
/// remembered, so the next caller tries again.
pub struct DatasetLoader {
    dir: DataDir,
    cell: OnceCell<Arc<Dataset>>,
}

impl DatasetLoader {
    pub fn new(dir: DataDir) -> Self {
        Self {
            dir,
            cell: OnceCell::new(),
        }
    }

    pub fn get(&self) -> Result<Arc<Dataset>> {
        self.cell
            .get_or_try_init(|| Dataset::load(&self.dir).map(Arc::new))
            .cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}
