//! List view composition: filtered rows turned into cards or a table

use serde::Serialize;

use crate::dataset::Dataset;
use crate::filter::{filter_table, FacetState, Filtered, ListQuery};
use crate::parser::{Boss, Character, Entity, Mission, Record, Weapon};
use crate::router::detail_link;
use crate::schema::{EntityType, Tab, MISSIONS};

/// One summary card linking to a detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub kind: EntityType,
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub image_url: Option<String>,
    /// Query string of the detail page, e.g. `?type=boss&id=3`
    pub link: String,
}

/// Missions as a raw table, columns in file order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "lowercase")]
pub enum ListBody {
    Cards(Vec<Card>),
    Table(TableView),
}

impl ListBody {
    pub fn len(&self) -> usize {
        match self {
            ListBody::Cards(cards) => cards.len(),
            ListBody::Table(table) => table.rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything one tab shows for a given query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabView {
    pub tab: Tab,
    pub search: String,
    pub facets: Vec<FacetState>,
    /// Row count before filtering
    pub total: usize,
    pub body: ListBody,
}

fn card<E: Entity>(row: &E, title: String, subtitle: String) -> Card {
    Card {
        kind: E::KIND,
        id: row.id(),
        title,
        subtitle,
        body: row.text("description"),
        image_url: row.value("image_url").map(|v| v.into_owned()),
        link: detail_link(E::KIND, row.id()),
    }
}

fn character_card(row: &Character) -> Card {
    let subtitle = format!("{} • {}", row.text("affiliation"), row.text("game"));
    card(row, row.name.clone(), subtitle)
}

fn weapon_card(row: &Weapon) -> Card {
    let subtitle = format!("{} • {}", row.text("type"), row.text("game"));
    card(row, row.name.clone(), subtitle)
}

fn boss_card(row: &Boss) -> Card {
    let title = format!("{} — {}", row.name, row.text("title"));
    card(row, title, row.text("game"))
}

fn cards<E: Entity>(
    rows: &[E],
    tab: Tab,
    query: &ListQuery,
    to_card: fn(&E) -> Card,
) -> TabView {
    let Filtered { rows: kept, facets } = filter_table(rows, tab.schema(), query);
    TabView {
        tab,
        search: query.search.clone(),
        facets,
        total: rows.len(),
        body: ListBody::Cards(kept.into_iter().map(to_card).collect()),
    }
}

/// Missions surviving `query`, in file order
pub fn filtered_missions<'a>(dataset: &'a Dataset, query: &ListQuery) -> Filtered<'a, Mission> {
    filter_table(&dataset.missions.rows, &MISSIONS, query)
}

/// Compose the view of `tab` under `query`
pub fn compose(dataset: &Dataset, tab: Tab, query: &ListQuery) -> TabView {
    match tab {
        Tab::Characters => cards(&dataset.characters, tab, query, character_card),
        Tab::Weapons => cards(&dataset.weapons, tab, query, weapon_card),
        Tab::Bosses => cards(&dataset.bosses, tab, query, boss_card),
        Tab::Missions => {
            let Filtered { rows, facets } = filtered_missions(dataset, query);
            let table = TableView {
                columns: dataset.missions.columns.to_vec(),
                rows: rows
                    .into_iter()
                    .map(|m| {
                        m.values()
                            .iter()
                            .map(|v| v.clone().unwrap_or_default())
                            .collect()
                    })
                    .collect(),
            };
            TabView {
                tab,
                search: query.search.clone(),
                facets,
                total: dataset.missions.rows.len(),
                body: ListBody::Table(table),
            }
        }
    }
}
