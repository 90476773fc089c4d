use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashSet;
use std::io::Read;
use std::sync::Arc;
use tracing::warn;

use super::record::{Entity, Mission, SourceColumns};
use crate::schema::TableSchema;

fn reader<R: Read>(source: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(source)
}

/// Fail if any required column of `schema` is missing from the header
fn check_required(headers: &StringRecord, schema: &TableSchema) -> Result<()> {
    let missing: Vec<&str> = schema
        .required_columns()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();

    if !missing.is_empty() {
        bail!(
            "{} is missing required column(s): {}",
            schema.source_file,
            missing.join(", ")
        );
    }
    Ok(())
}

/// Parse an entity table. Duplicate ids are kept in file order and reported.
/// Cells are taken verbatim; only header names are trimmed.
pub fn parse_entities<E: Entity, R: Read>(source: R, schema: &TableSchema) -> Result<Vec<E>> {
    let mut rdr = reader(source);
    let headers = rdr
        .headers()
        .with_context(|| format!("Failed to read header of {}", schema.source_file))?
        .clone();
    check_required(&headers, schema)?;

    let header: Arc<[String]> = headers.iter().map(str::to_string).collect();
    let untyped: Vec<usize> = (0..header.len())
        .filter(|&i| !schema.columns.iter().any(|c| c.name == header[i]))
        .collect();

    let mut rows = Vec::new();
    let mut seen = HashSet::new();

    for (row_idx, result) in rdr.records().enumerate() {
        // +2 for 1-indexed and header row
        let row_num = row_idx + 2;
        let record = result
            .with_context(|| format!("Failed to read row {} of {}", row_num, schema.source_file))?;
        let mut row: E = record
            .deserialize(Some(&headers))
            .with_context(|| format!("Failed to parse row {} of {}", row_num, schema.source_file))?;

        let extra = untyped
            .iter()
            .filter_map(|&i| record.get(i).map(|v| (header[i].clone(), v.to_string())))
            .collect();
        row.set_source(SourceColumns::new(Arc::clone(&header), extra));

        if !seen.insert(row.id()) {
            warn!(
                table = schema.name,
                id = row.id(),
                row = row_num,
                "duplicate id; detail lookups return the first match"
            );
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Missions keep whatever columns the file declares
pub struct MissionTable {
    pub columns: Arc<[String]>,
    pub rows: Vec<Mission>,
}

pub fn parse_missions<R: Read>(source: R, schema: &TableSchema) -> Result<MissionTable> {
    let mut rdr = reader(source);
    let headers = rdr
        .headers()
        .with_context(|| format!("Failed to read header of {}", schema.source_file))?
        .clone();
    check_required(&headers, schema)?;

    for col in schema.columns {
        if !headers.iter().any(|h| h == col.name) {
            warn!(table = schema.name, column = col.name, "column absent from file");
        }
    }

    let columns: Arc<[String]> = headers.iter().map(str::to_string).collect();
    let mut rows = Vec::new();

    for (row_idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| {
            format!("Failed to parse row {} of {}", row_idx + 2, schema.source_file)
        })?;
        let values = record
            .iter()
            .take(columns.len())
            .map(|v| Some(v.to_string()).filter(|v| !v.is_empty()))
            .collect();
        rows.push(Mission::new(Arc::clone(&columns), values));
    }

    Ok(MissionTable { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Character, Entity, Record};
    use crate::schema::{CHARACTERS, MISSIONS};

    #[test]
    fn test_parse_characters() {
        let csv = "id,name,game,affiliation,style,description,image_url\n\
                   1,Dante,DMC5,Devil May Cry,Trickster,,\n\
                   2,Vergil ,DMC5,,,,\n";
        let rows: Vec<Character> = parse_entities(csv.as_bytes(), &CHARACTERS).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].style.as_deref(), Some("Trickster"));
        assert_eq!(rows[0].description, None);
        assert_eq!(rows[1].name, "Vergil ");
        assert_eq!(rows[1].affiliation, None);
    }

    #[test]
    fn test_parse_keeps_cell_whitespace() {
        let csv = " id , name ,game\n1,Dante, DMC5\n";
        let rows: Vec<Character> = parse_entities(csv.as_bytes(), &CHARACTERS).unwrap();
        assert_eq!(rows[0].name, "Dante");
        assert_eq!(rows[0].game.as_deref(), Some(" DMC5"));

        let table = parse_missions("game , mission\n DMC3,M1 \n".as_bytes(), &MISSIONS).unwrap();
        assert_eq!(&*table.columns, ["game", "mission"]);
        assert_eq!(table.rows[0].value("game").as_deref(), Some(" DMC3"));
        assert_eq!(table.rows[0].value("mission").as_deref(), Some("M1 "));
    }

    #[test]
    fn test_parse_characters_keeps_file_columns() {
        let csv = "id,name,weapon,game\n1,Dante,Rebellion,DMC5\n2,Vergil\n";
        let rows: Vec<Character> = parse_entities(csv.as_bytes(), &CHARACTERS).unwrap();
        let header: Vec<&str> = rows[0]
            .source()
            .header()
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(header, vec!["id", "name", "weapon", "game"]);
        assert_eq!(rows[0].value("weapon").as_deref(), Some("Rebellion"));
        assert_eq!(rows[0].game.as_deref(), Some("DMC5"));
        assert_eq!(rows[1].value("weapon"), None);
    }

    #[test]
    fn test_parse_characters_missing_optional_columns() {
        let csv = "id,name\n7,Nero\n";
        let rows: Vec<Character> = parse_entities(csv.as_bytes(), &CHARACTERS).unwrap();
        assert_eq!(rows[0].id, 7);
        assert_eq!(rows[0].game, None);
    }

    #[test]
    fn test_parse_characters_missing_required_column() {
        let csv = "name,game\nDante,DMC5\n";
        let err = parse_entities::<Character, _>(csv.as_bytes(), &CHARACTERS).unwrap_err();
        assert!(err.to_string().contains("missing required column(s): id"));
    }

    #[test]
    fn test_parse_characters_keeps_duplicates_in_order() {
        let csv = "id,name\n1,Dante\n1,Tony Redgrave\n";
        let rows: Vec<Character> = parse_entities(csv.as_bytes(), &CHARACTERS).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Dante");
    }

    #[test]
    fn test_parse_missions_extra_columns() {
        let csv = "game,mission,objective,notes,rank\n\
                   DMC3,M1,Defeat the demons,,S\n\
                   DMC3,M2\n";
        let table = parse_missions(csv.as_bytes(), &MISSIONS).unwrap();
        assert_eq!(table.columns.len(), 5);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].value("rank").as_deref(), Some("S"));
        assert_eq!(table.rows[0].value("notes"), None);
        assert_eq!(table.rows[1].value("objective"), None);
        assert_eq!(table.rows[1].values().len(), 5);
    }
}
