//! Query-string routing between the list view and detail pages
//!
//! The whole navigation state lives in the query string: `?type=boss&id=3`
//! opens a detail page, anything else shows the list.

use serde::Serialize;
use tracing::debug;
use url::form_urlencoded;

use crate::dataset::Dataset;
use crate::error::{NotFound, ResolveError, RoutingError};
use crate::schema::EntityType;
use crate::view::{resolve_str, DetailView};

/// Link back to the list view
pub const LIST_LINK: &str = "?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    /// `kind` is left unparsed; an unknown type is caught at dispatch
    Detail { kind: String, id: i64 },
}

/// What a route renders to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Page {
    List,
    Detail(DetailView),
    NotFound {
        kind: EntityType,
        id: i64,
        message: String,
        back: String,
    },
}

impl From<NotFound> for Page {
    fn from(err: NotFound) -> Self {
        Page::NotFound {
            kind: err.kind,
            id: err.id,
            message: "Item not found.".to_string(),
            back: LIST_LINK.to_string(),
        }
    }
}

/// Build the query string of a detail page
pub fn detail_link(kind: EntityType, id: i64) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("type", kind.as_str())
        .append_pair("id", &id.to_string())
        .finish();
    format!("?{}", query)
}

/// Decoded key/value pairs of a query string; the leading `?` is optional
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    let query = query.trim().trim_start_matches('?');
    form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn last_value<'p, K, V>(params: &'p [(K, V)], key: &str) -> Option<&'p str>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    params
        .iter()
        .rev()
        .find(|(k, _)| k.as_ref() == key)
        .map(|(_, v)| v.as_ref())
}

/// Extract `type` and `id`; for repeated keys the last value wins
pub fn detail_target<K, V>(params: &[(K, V)]) -> Result<(String, i64), RoutingError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let kind = last_value(params, "type").ok_or(RoutingError::MissingParameter("type"))?;
    let raw_id = last_value(params, "id").ok_or(RoutingError::MissingParameter("id"))?;
    let id = raw_id
        .trim()
        .parse::<i64>()
        .map_err(|_| RoutingError::InvalidId(raw_id.to_string()))?;

    Ok((kind.to_string(), id))
}

/// Decide between the list view and a detail page from decoded parameters
pub fn route_params<K, V>(params: &[(K, V)]) -> Route
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    match detail_target(params) {
        Ok((kind, id)) => Route::Detail { kind, id },
        Err(RoutingError::MissingParameter(_)) => Route::List,
        Err(err) => {
            debug!(%err, "falling back to list view");
            Route::List
        }
    }
}

/// Decide between the list view and a detail page from a raw query string
pub fn route(query: &str) -> Route {
    route_params(&parse_query(query))
}

/// Render a route against the dataset. Routing errors fall back to the list.
pub fn dispatch(dataset: &Dataset, route: &Route) -> Page {
    match route {
        Route::List => Page::List,
        Route::Detail { kind, id } => match resolve_str(dataset, kind, *id) {
            Ok(entity) => Page::Detail(entity.shape()),
            Err(ResolveError::NotFound(err)) => {
                debug!(%err, "detail lookup missed");
                err.into()
            }
            Err(ResolveError::Routing(err)) => {
                debug!(%err, "falling back to list view");
                Page::List
            }
        },
    }
}

/// Route and render a query string in one step
pub fn open(dataset: &Dataset, query: &str) -> Page {
    dispatch(dataset, &route(query))
}
