//! Search and facet filtering shared by every tab
//!
//! Filtering is a left-to-right reduction: the search narrows the table,
//! then each facet computes its options from the current rows before
//! applying its own selection.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::parser::Record;
use crate::schema::{Facet, TableSchema};

/// Selected values per facet column. A missing or empty entry selects nothing.
pub type Selections = BTreeMap<String, Vec<String>>;

/// User input for one tab
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    pub search: String,
    pub selections: Selections,
}

impl ListQuery {
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            selections: Selections::new(),
        }
    }

    /// Add `value` to the selection of `column`
    pub fn select(mut self, column: &str, value: impl Into<String>) -> Self {
        self.selections
            .entry(column.to_string())
            .or_default()
            .push(value.into());
        self
    }

    pub fn selected(&self, column: &str) -> &[String] {
        self.selections.get(column).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_selected(&self, column: &str, value: &str) -> bool {
        self.selected(column).iter().any(|v| v == value)
    }

    /// Select `value` if it is not selected, otherwise deselect it
    pub fn toggle(&mut self, column: &str, value: &str) {
        let values = self.selections.entry(column.to_string()).or_default();
        match values.iter().position(|v| v == value) {
            Some(idx) => {
                values.remove(idx);
            }
            None => values.push(value.to_string()),
        }
        if values.is_empty() {
            self.selections.remove(column);
        }
    }
}

/// A facet as presented to the user after filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetState {
    pub label: &'static str,
    pub column: &'static str,
    /// Sorted, distinct, non-empty values available at this stage
    pub options: Vec<String>,
    pub selected: Vec<String>,
}

/// Surviving rows in source order, plus the facet states that produced them
#[derive(Debug)]
pub struct Filtered<'a, R> {
    pub rows: Vec<&'a R>,
    pub facets: Vec<FacetState>,
}

/// Does any of `columns` contain `needle` (already lower-cased)?
pub fn matches_search<R: Record>(row: &R, columns: &[&str], needle: &str) -> bool {
    columns.iter().any(|col| {
        row.value(col)
            .map(|v| v.to_lowercase().contains(needle))
            .unwrap_or(false)
    })
}

/// Sorted distinct non-empty values of `column`
pub fn facet_options<R: Record>(rows: &[&R], column: &str) -> Vec<String> {
    rows.iter()
        .filter_map(|r| r.value(column))
        .filter(|v| !v.is_empty())
        .map(|v| v.into_owned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Filter `table` by a search string and a chain of facets
pub fn filter<'a, R: Record>(
    table: &'a [R],
    search: &str,
    search_columns: &[&str],
    facets: &[Facet],
    selections: &Selections,
) -> Filtered<'a, R> {
    let mut rows: Vec<&R> = table.iter().collect();

    if !search.is_empty() {
        let needle = search.to_lowercase();
        rows.retain(|r| matches_search(*r, search_columns, &needle));
    }

    let mut states = Vec::with_capacity(facets.len());
    for facet in facets {
        let options = facet_options(&rows, facet.column);
        let selected = selections.get(facet.column).cloned().unwrap_or_default();

        if !selected.is_empty() {
            rows.retain(|r| {
                r.value(facet.column)
                    .map(|v| selected.iter().any(|s| *s == *v))
                    .unwrap_or(false)
            });
        }

        states.push(FacetState {
            label: facet.label,
            column: facet.column,
            options,
            selected,
        });
    }

    Filtered { rows, facets: states }
}

/// Filter a table with the search columns and facets declared by its schema
pub fn filter_table<'a, R: Record>(
    table: &'a [R],
    schema: &TableSchema,
    query: &ListQuery,
) -> Filtered<'a, R> {
    let filtered = filter(
        table,
        &query.search,
        schema.search_columns,
        schema.facets,
        &query.selections,
    );
    debug!(
        table = schema.name,
        search = %query.search,
        total = table.len(),
        kept = filtered.rows.len(),
        "filtered table"
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Character;
    use crate::schema::CHARACTERS;

    fn character(id: i64, name: &str, game: &str, affiliation: &str) -> Character {
        Character {
            id,
            name: name.into(),
            game: Some(game.into()).filter(|g: &String| !g.is_empty()),
            affiliation: Some(affiliation.into()).filter(|a: &String| !a.is_empty()),
            style: None,
            description: None,
            image_url: None,
            ..Default::default()
        }
    }

    fn brothers() -> Vec<Character> {
        vec![
            character(1, "Dante", "DMC5", "Freelance"),
            character(2, "Vergil", "DMC5", "Sons of Sparda"),
        ]
    }

    fn ids(rows: &[&Character]) -> Vec<i64> {
        rows.iter().map(|r| r.id).collect()
    }

    const SEARCH: &[&str] = &["name", "game", "affiliation", "style"];
    const GAME: Facet = Facet::new("Game", "game");

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let table = brothers();
        let out = filter(&table, "vergil", SEARCH, &[], &Selections::new());
        assert_eq!(ids(&out.rows), vec![2]);

        let out = filter(&table, "SPAR", SEARCH, &[], &Selections::new());
        assert_eq!(ids(&out.rows), vec![2]);

        let out = filter(&table, "dmc", SEARCH, &[], &Selections::new());
        assert_eq!(ids(&out.rows), vec![1, 2]);
    }

    #[test]
    fn test_search_only_looks_at_search_columns() {
        let mut table = brothers();
        table[0].description = Some("Vergil's twin".into());
        let out = filter(&table, "vergil", SEARCH, &[], &Selections::new());
        assert_eq!(ids(&out.rows), vec![2]);
    }

    #[test]
    fn test_absent_values_never_match() {
        let table = vec![character(1, "Trish", "", "")];
        // A missing value is not stringified into something searchable
        for needle in ["none", "nan", "null"] {
            let out = filter(&table, needle, SEARCH, &[], &Selections::new());
            assert!(out.rows.is_empty(), "{needle}");
        }
    }

    #[test]
    fn test_facet_selection() {
        let table = brothers();
        let q = ListQuery::new("").select("game", "DMC5");
        let out = filter_table(&table, &CHARACTERS, &q);
        assert_eq!(ids(&out.rows), vec![1, 2]);

        let q = ListQuery::new("").select("game", "DMC3");
        let out = filter_table(&table, &CHARACTERS, &q);
        assert!(out.rows.is_empty());
        assert_eq!(out.facets[0].options, vec!["DMC5"]);
        assert_eq!(out.facets[0].selected, vec!["DMC3"]);
    }

    #[test]
    fn test_facet_options_follow_search() {
        let table = vec![
            character(1, "Dante", "DMC3", "Devil May Cry"),
            character(2, "Lady", "DMC3", "Devil May Cry"),
            character(3, "Nero", "DMC4", "Order of the Sword"),
            character(4, "Dante", "DMC4", "Devil May Cry"),
        ];
        let out = filter(&table, "dante", SEARCH, &[GAME], &Selections::new());
        assert_eq!(out.facets[0].options, vec!["DMC3", "DMC4"]);

        let out = filter(&table, "order", SEARCH, &[GAME], &Selections::new());
        assert_eq!(out.facets[0].options, vec!["DMC4"]);
    }

    #[test]
    fn test_facets_reduce_left_to_right() {
        let table = vec![
            character(1, "Dante", "DMC3", "Devil May Cry"),
            character(2, "Arkham", "DMC3", "Order of the Sword"),
            character(3, "Nero", "DMC4", "Order of the Sword"),
        ];
        let facets = [GAME, Facet::new("Affiliation", "affiliation")];
        let mut sel = Selections::new();
        sel.insert("game".into(), vec!["DMC4".into()]);

        let out = filter(&table, "", SEARCH, &facets, &sel);
        // Game options come from the whole table
        assert_eq!(out.facets[0].options, vec!["DMC3", "DMC4"]);
        // Affiliation options only from what the game facet left
        assert_eq!(out.facets[1].options, vec!["Order of the Sword"]);
        assert_eq!(ids(&out.rows), vec![3]);
    }

    #[test]
    fn test_facet_options_sorted_distinct_non_empty() {
        let table = vec![
            character(1, "A", "DMC5", ""),
            character(2, "B", "DMC1", ""),
            character(3, "C", "DMC5", ""),
            character(4, "D", "", ""),
        ];
        let rows: Vec<&Character> = table.iter().collect();
        assert_eq!(facet_options(&rows, "game"), vec!["DMC1", "DMC5"]);
        assert!(facet_options(&rows, "affiliation").is_empty());
    }

    #[test]
    fn test_list_query_toggle() {
        let mut q = ListQuery::default();
        q.toggle("game", "DMC5");
        q.toggle("game", "DMC3");
        assert_eq!(q.selected("game"), ["DMC5", "DMC3"]);
        q.toggle("game", "DMC5");
        assert!(q.is_selected("game", "DMC3"));
        assert!(!q.is_selected("game", "DMC5"));
        q.toggle("game", "DMC3");
        assert!(q.selections.is_empty());
    }
}
