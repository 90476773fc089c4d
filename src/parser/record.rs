use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;

use crate::schema::EntityType;

/// Typed column access over a loaded row
///
/// Every implementation enumerates its columns explicitly. Absent and empty
/// values are both reported as `None`.
pub trait Record {
    fn value(&self, column: &str) -> Option<Cow<'_, str>>;

    /// Value for display; missing values render as empty text
    fn text(&self, column: &str) -> String {
        self.value(column).map(Cow::into_owned).unwrap_or_default()
    }
}

/// A row from one of the tables that support detail navigation
pub trait Entity: Record + DeserializeOwned {
    const KIND: EntityType;

    fn id(&self) -> i64;
    fn name(&self) -> &str;
    fn source(&self) -> &SourceColumns;
    fn set_source(&mut self, source: SourceColumns);
}

fn text(value: &Option<String>) -> Option<Cow<'_, str>> {
    value
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(Cow::Borrowed)
}

fn required(value: &str) -> Option<Cow<'_, str>> {
    Some(value).filter(|s| !s.is_empty()).map(Cow::Borrowed)
}

/// The header a row was read with, and its values for columns the typed
/// fields do not cover. Rows built in code have no header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceColumns {
    header: Option<Arc<[String]>>,
    extra: Vec<(String, String)>,
}

impl SourceColumns {
    pub fn new(header: Arc<[String]>, extra: Vec<(String, String)>) -> Self {
        Self {
            header: Some(header),
            extra,
        }
    }

    /// File columns in header order
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    fn value(&self, column: &str) -> Option<Cow<'_, str>> {
        self.extra
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
            .map(Cow::Borrowed)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Character {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default)]
    pub affiliation: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(skip)]
    pub source: SourceColumns,
}

impl Record for Character {
    fn value(&self, column: &str) -> Option<Cow<'_, str>> {
        match column {
            "id" => Some(Cow::Owned(self.id.to_string())),
            "name" => required(&self.name),
            "game" => text(&self.game),
            "affiliation" => text(&self.affiliation),
            "style" => text(&self.style),
            "description" => text(&self.description),
            "image_url" => text(&self.image_url),
            other => self.source.value(other),
        }
    }
}

impl Entity for Character {
    const KIND: EntityType = EntityType::Character;

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> &SourceColumns {
        &self.source
    }

    fn set_source(&mut self, source: SourceColumns) {
        self.source = source;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Weapon {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub weapon_type: Option<String>,
    #[serde(default)]
    pub wielder: Option<String>,
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(skip)]
    pub source: SourceColumns,
}

impl Record for Weapon {
    fn value(&self, column: &str) -> Option<Cow<'_, str>> {
        match column {
            "id" => Some(Cow::Owned(self.id.to_string())),
            "name" => required(&self.name),
            "type" => text(&self.weapon_type),
            "wielder" => text(&self.wielder),
            "game" => text(&self.game),
            "style" => text(&self.style),
            "description" => text(&self.description),
            "image_url" => text(&self.image_url),
            other => self.source.value(other),
        }
    }
}

impl Entity for Weapon {
    const KIND: EntityType = EntityType::Weapon;

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> &SourceColumns {
        &self.source
    }

    fn set_source(&mut self, source: SourceColumns) {
        self.source = source;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Boss {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(skip)]
    pub source: SourceColumns,
}

impl Record for Boss {
    fn value(&self, column: &str) -> Option<Cow<'_, str>> {
        match column {
            "id" => Some(Cow::Owned(self.id.to_string())),
            "name" => required(&self.name),
            "title" => text(&self.title),
            "game" => text(&self.game),
            "description" => text(&self.description),
            "image_url" => text(&self.image_url),
            other => self.source.value(other),
        }
    }
}

impl Entity for Boss {
    const KIND: EntityType = EntityType::Boss;

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> &SourceColumns {
        &self.source
    }

    fn set_source(&mut self, source: SourceColumns) {
        self.source = source;
    }
}

/// A mission row. The column set comes from the file header and is shared by
/// every row of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Mission {
    columns: Arc<[String]>,
    values: Vec<Option<String>>,
}

impl Mission {
    /// Rows shorter than the header are padded with missing values
    pub fn new(columns: Arc<[String]>, mut values: Vec<Option<String>>) -> Self {
        values.resize(columns.len(), None);
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values in column order
    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }
}

impl Record for Mission {
    fn value(&self, column: &str) -> Option<Cow<'_, str>> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.values.get(idx).and_then(text)
    }
}
