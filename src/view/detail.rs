//! Detail lookup by entity type and id, and the detail page layout

use serde::Serialize;
use std::borrow::Cow;

use crate::dataset::Dataset;
use crate::error::{NotFound, ResolveError};
use crate::parser::{Boss, Character, Entity, Record, SourceColumns, Weapon};
use crate::schema::{EntityType, TableSchema, IDENTITY_COLUMNS};

/// A row matched by [`resolve`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityRef<'a> {
    Character(&'a Character),
    Weapon(&'a Weapon),
    Boss(&'a Boss),
}

impl EntityRef<'_> {
    pub fn kind(&self) -> EntityType {
        match self {
            EntityRef::Character(_) => EntityType::Character,
            EntityRef::Weapon(_) => EntityType::Weapon,
            EntityRef::Boss(_) => EntityType::Boss,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            EntityRef::Character(r) => r.id,
            EntityRef::Weapon(r) => r.id,
            EntityRef::Boss(r) => r.id,
        }
    }

    pub fn schema(&self) -> &'static TableSchema {
        crate::schema::Tab::from(self.kind()).schema()
    }

    fn source(&self) -> &SourceColumns {
        match self {
            EntityRef::Character(r) => r.source(),
            EntityRef::Weapon(r) => r.source(),
            EntityRef::Boss(r) => r.source(),
        }
    }

    /// Columns for the metadata section: the file's own columns in header
    /// order, or the schema's for rows that were not read from a file
    fn meta_keys(&self) -> Vec<String> {
        match self.source().header() {
            Some(header) => header
                .iter()
                .filter(|c| !IDENTITY_COLUMNS.contains(&c.as_str()))
                .cloned()
                .collect(),
            None => self.schema().meta_columns().map(|c| c.name.to_string()).collect(),
        }
    }

    /// Lay the row out for the detail page
    pub fn shape(&self) -> DetailView {
        let fields: Vec<Field> = self
            .meta_keys()
            .into_iter()
            .map(|key| Field {
                label: title_case(&key),
                value: self.text(&key),
                key,
            })
            .collect();
        let (left, right) = split_columns(fields);

        let name = self.text("name");
        DetailView {
            kind: self.kind(),
            id: self.id(),
            title: if name.is_empty() { "Details".to_string() } else { name },
            image_url: self.value("image_url").map(Cow::into_owned),
            description: self.text("description"),
            left,
            right,
        }
    }
}

impl Record for EntityRef<'_> {
    fn value(&self, column: &str) -> Option<Cow<'_, str>> {
        match self {
            EntityRef::Character(r) => r.value(column),
            EntityRef::Weapon(r) => r.value(column),
            EntityRef::Boss(r) => r.value(column),
        }
    }
}

/// A labelled metadata field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub key: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
    pub kind: EntityType,
    pub id: i64,
    pub title: String,
    pub image_url: Option<String>,
    pub description: String,
    pub left: Vec<Field>,
    pub right: Vec<Field>,
}

fn first_match<E: Entity>(rows: &[E], id: i64) -> Option<&E> {
    rows.iter().find(|r| r.id() == id)
}

/// Find the first row of `kind` whose id is `id`
pub fn resolve(dataset: &Dataset, kind: EntityType, id: i64) -> Result<EntityRef<'_>, NotFound> {
    let found = match kind {
        EntityType::Character => first_match(&dataset.characters, id).map(EntityRef::Character),
        EntityType::Weapon => first_match(&dataset.weapons, id).map(EntityRef::Weapon),
        EntityType::Boss => first_match(&dataset.bosses, id).map(EntityRef::Boss),
    };
    found.ok_or(NotFound { kind, id })
}

/// [`resolve`] with the entity type still in its query-string form
pub fn resolve_str<'a>(dataset: &'a Dataset, kind: &str, id: i64) -> Result<EntityRef<'a>, ResolveError> {
    let kind: EntityType = kind.parse()?;
    Ok(resolve(dataset, kind, id)?)
}

/// Split into two display columns; the left one takes the extra field
pub fn split_columns<T>(mut fields: Vec<T>) -> (Vec<T>, Vec<T>) {
    let mid = (fields.len() + 1) / 2;
    let right = fields.split_off(mid);
    (fields, right)
}

/// `image_url` -> `Image Url`
pub fn title_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut prev_alpha = false;
    for c in key.replace('_', " ").chars() {
        if prev_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_columns() {
        assert_eq!(split_columns::<u8>(vec![]), (vec![], vec![]));
        assert_eq!(split_columns(vec![1]), (vec![1], vec![]));
        assert_eq!(split_columns(vec![1, 2]), (vec![1], vec![2]));
        assert_eq!(split_columns(vec![1, 2, 3]), (vec![1, 2], vec![3]));
        assert_eq!(split_columns(vec![1, 2, 3, 4]), (vec![1, 2], vec![3, 4]));
        assert_eq!(split_columns(vec![1, 2, 3, 4, 5]), (vec![1, 2, 3], vec![4, 5]));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("image_url"), "Image Url");
        assert_eq!(title_case("game"), "Game");
        assert_eq!(title_case("devil_TRIGGER"), "Devil Trigger");
        assert_eq!(title_case("dmc5_era"), "Dmc5 Era");
    }

    #[test]
    fn test_shape_weapon() {
        let w = Weapon {
            id: 3,
            name: "Rebellion".into(),
            weapon_type: Some("Sword".into()),
            wielder: Some("Dante".into()),
            game: Some("DMC3".into()),
            style: None,
            description: Some("Sparda's gift".into()),
            image_url: None,
            ..Default::default()
        };
        let view = EntityRef::Weapon(&w).shape();
        assert_eq!(view.title, "Rebellion");
        assert_eq!(view.description, "Sparda's gift");
        let left: Vec<(&str, &str)> = view.left.iter().map(|f| (f.label.as_str(), f.value.as_str())).collect();
        let right: Vec<(&str, &str)> = view.right.iter().map(|f| (f.label.as_str(), f.value.as_str())).collect();
        assert_eq!(left, vec![("Type", "Sword"), ("Wielder", "Dante")]);
        assert_eq!(right, vec![("Game", "DMC3"), ("Style", "")]);
    }

    #[test]
    fn test_shape_untitled() {
        let c = Character {
            id: 5,
            name: String::new(),
            game: None,
            affiliation: None,
            style: None,
            description: None,
            image_url: None,
            ..Default::default()
        };
        let view = EntityRef::Character(&c).shape();
        assert_eq!(view.title, "Details");
        assert_eq!(view.left.len(), 2);
        assert_eq!(view.right.len(), 1);
    }

    #[test]
    fn test_shape_follows_file_columns() {
        let csv = "id,name,game,weapon,description\n1,Dante,DMC5,Rebellion,Hunter\n";
        let rows: Vec<Character> =
            crate::parser::parse_entities(csv.as_bytes(), &crate::schema::CHARACTERS).unwrap();
        let view = EntityRef::Character(&rows[0]).shape();

        assert_eq!(view.description, "Hunter");
        // affiliation and style are not in the file, weapon is not in the schema
        let keys: Vec<&str> = view.left.iter().chain(&view.right).map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["game", "weapon"]);
        assert_eq!(view.left.len(), 1);
        assert_eq!(view.right[0].label, "Weapon");
        assert_eq!(view.right[0].value, "Rebellion");
    }
}
