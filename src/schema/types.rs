use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::RoutingError;

/// Fields rendered specially on the detail page rather than in the metadata columns
pub const IDENTITY_COLUMNS: &[&str] = &["id", "name", "description", "image_url"];

/// Column data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Text,
    /// Absolute image URL
    Url,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColumnType::Integer => "integer",
            ColumnType::Text => "text",
            ColumnType::Url => "url",
        })
    }
}

/// Column definition
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub name: &'static str,
    pub col_type: ColumnType,
    pub nullable: bool,
}

impl Column {
    /// Create an optional (nullable) column
    pub const fn new(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: true,
        }
    }

    /// Create a required (non-nullable) column
    pub const fn required(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: false,
        }
    }
}

/// A discrete-valued column offered as a multi-select filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Facet {
    pub label: &'static str,
    pub column: &'static str,
}

impl Facet {
    pub const fn new(label: &'static str, column: &'static str) -> Self {
        Self { label, column }
    }

    /// Does `key` name this facet, by label or by column?
    pub fn matches(&self, key: &str) -> bool {
        self.label.eq_ignore_ascii_case(key) || self.column.eq_ignore_ascii_case(key)
    }
}

/// Table schema definition
#[derive(Debug, Clone, Serialize)]
pub struct TableSchema {
    pub name: &'static str,
    pub tab_label: &'static str,
    pub source_file: &'static str,
    /// Known columns in display order. Missions may carry more columns than listed here.
    pub columns: &'static [Column],
    pub search_columns: &'static [&'static str],
    pub facets: &'static [Facet],
    /// Entity type for tables that support detail navigation
    pub entity: Option<EntityType>,
}

impl TableSchema {
    pub fn required_columns(&self) -> impl Iterator<Item = &'static str> {
        self.columns.iter().filter(|c| !c.nullable).map(|c| c.name)
    }

    /// Columns shown in the detail metadata section, in schema order
    pub fn meta_columns(&self) -> impl Iterator<Item = &'static Column> {
        self.columns
            .iter()
            .filter(|c| !IDENTITY_COLUMNS.contains(&c.name))
    }

    pub fn facet(&self, key: &str) -> Option<&'static Facet> {
        self.facets.iter().find(|f| f.matches(key))
    }
}

/// The tables that support detail navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Character,
    Weapon,
    Boss,
}

impl EntityType {
    pub const ALL: [EntityType; 3] = [EntityType::Character, EntityType::Weapon, EntityType::Boss];

    /// Value of the `type` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Character => "character",
            EntityType::Weapon => "weapon",
            EntityType::Boss => "boss",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "character" => Ok(EntityType::Character),
            "weapon" => Ok(EntityType::Weapon),
            "boss" => Ok(EntityType::Boss),
            other => Err(RoutingError::UnknownType(other.to_string())),
        }
    }
}

/// The four list tabs, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Characters,
    Weapons,
    Bosses,
    Missions,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Characters, Tab::Weapons, Tab::Bosses, Tab::Missions];

    pub fn schema(&self) -> &'static TableSchema {
        match self {
            Tab::Characters => &super::tables::CHARACTERS,
            Tab::Weapons => &super::tables::WEAPONS,
            Tab::Bosses => &super::tables::BOSSES,
            Tab::Missions => &super::tables::MISSIONS,
        }
    }

    pub fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn prev(&self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.schema().tab_label)
    }
}

impl From<EntityType> for Tab {
    fn from(kind: EntityType) -> Self {
        match kind {
            EntityType::Character => Tab::Characters,
            EntityType::Weapon => Tab::Weapons,
            EntityType::Boss => Tab::Bosses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_type_parse() {
        assert_eq!("boss".parse::<EntityType>().unwrap(), EntityType::Boss);
        assert_eq!(
            "mission".parse::<EntityType>().unwrap_err(),
            RoutingError::UnknownType("mission".to_string())
        );
        // Query values are matched exactly
        assert!("Character".parse::<EntityType>().is_err());
    }

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::Characters.next(), Tab::Weapons);
        assert_eq!(Tab::Missions.next(), Tab::Characters);
        assert_eq!(Tab::Characters.prev(), Tab::Missions);
    }

    #[test]
    fn test_facet_matches_label_or_column() {
        let facet = Facet::new("Wielder", "wielder");
        assert!(facet.matches("WIELDER"));
        assert!(facet.matches("wielder"));
        assert!(!facet.matches("game"));
    }
}
