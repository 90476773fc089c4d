//! Table schema definitions for the four reference tables

use super::types::*;

pub static CHARACTERS: TableSchema = TableSchema {
    name: "characters",
    tab_label: "Characters",
    source_file: "characters.csv",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::new("game", ColumnType::Text),
        Column::new("affiliation", ColumnType::Text),
        Column::new("style", ColumnType::Text),
        Column::new("description", ColumnType::Text),
        Column::new("image_url", ColumnType::Url),
    ],
    search_columns: &["name", "game", "affiliation", "style"],
    facets: &[
        Facet::new("Game", "game"),
        Facet::new("Affiliation", "affiliation"),
    ],
    entity: Some(EntityType::Character),
};

pub static WEAPONS: TableSchema = TableSchema {
    name: "weapons",
    tab_label: "Weapons",
    source_file: "weapons.csv",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::new("type", ColumnType::Text),
        Column::new("wielder", ColumnType::Text),
        Column::new("game", ColumnType::Text),
        Column::new("style", ColumnType::Text),
        Column::new("description", ColumnType::Text),
        Column::new("image_url", ColumnType::Url),
    ],
    search_columns: &["name", "type", "wielder", "game", "style"],
    facets: &[
        Facet::new("Game", "game"),
        Facet::new("Type", "type"),
        Facet::new("Wielder", "wielder"),
    ],
    entity: Some(EntityType::Weapon),
};

pub static BOSSES: TableSchema = TableSchema {
    name: "bosses",
    tab_label: "Bosses",
    source_file: "bosses.csv",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::new("title", ColumnType::Text),
        Column::new("game", ColumnType::Text),
        Column::new("description", ColumnType::Text),
        Column::new("image_url", ColumnType::Url),
    ],
    search_columns: &["name", "title", "game", "description"],
    facets: &[Facet::new("Game", "game")],
    entity: Some(EntityType::Boss),
};

/// Missions carry arbitrary extra columns; only the ones below are known up front.
pub static MISSIONS: TableSchema = TableSchema {
    name: "missions",
    tab_label: "Missions",
    source_file: "missions.csv",
    columns: &[
        Column::new("game", ColumnType::Text),
        Column::new("mission", ColumnType::Text),
        Column::new("objective", ColumnType::Text),
        Column::new("notes", ColumnType::Text),
    ],
    search_columns: &["game", "mission", "objective", "notes"],
    facets: &[Facet::new("Game", "game")],
    entity: None,
};

/// All tables in tab order
pub static ALL_TABLES: &[&TableSchema] = &[&CHARACTERS, &WEAPONS, &BOSSES, &MISSIONS];

/// Get a table schema by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().find(|t| t.name == name).copied()
}

/// Get all table names
pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_and_facet_columns_are_declared() {
        for table in ALL_TABLES {
            let declared: Vec<&str> = table.columns.iter().map(|c| c.name).collect();
            for col in table.search_columns {
                assert!(declared.contains(col), "{}: search column {}", table.name, col);
            }
            for facet in table.facets {
                assert!(declared.contains(&facet.column), "{}: facet {}", table.name, facet.column);
            }
        }
    }

    #[test]
    fn test_entity_tables_require_id_and_name() {
        for table in ALL_TABLES.iter().filter(|t| t.entity.is_some()) {
            let required: Vec<&str> = table.required_columns().collect();
            assert_eq!(required, vec!["id", "name"], "{}", table.name);
        }
        assert!(MISSIONS.entity.is_none());
    }

    #[test]
    fn test_meta_columns_skip_identity_fields() {
        let meta: Vec<&str> = CHARACTERS.meta_columns().map(|c| c.name).collect();
        assert_eq!(meta, vec!["game", "affiliation", "style"]);

        let meta: Vec<&str> = WEAPONS.meta_columns().map(|c| c.name).collect();
        assert_eq!(meta, vec!["type", "wielder", "game", "style"]);
    }

    #[test]
    fn test_get_table() {
        assert_eq!(get_table("bosses").map(|t| t.tab_label), Some("Bosses"));
        assert!(get_table("quests").is_none());
        assert_eq!(table_names(), vec!["characters", "weapons", "bosses", "missions"]);
    }
}
