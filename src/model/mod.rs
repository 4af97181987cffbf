mod address;
mod contact;
mod movie;
mod movie_user;
mod role;
mod seen_movie;

pub use address::*;
pub use contact::*;
pub use movie::*;
pub use movie_user::*;
pub use role::*;
pub use seen_movie::*;

use crate::api::{ApiError, EntityApi};
use crate::date::{AppDate, DateFormats, DateParseError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;

/// Raw `application/x-www-form-urlencoded` body of a create or edit form.
/// Multi-selects repeat their key, so pairs are kept in order.
pub type FormData = Vec<(String, String)>;

/// Ids the relationship inputs of a form may point at, keyed by input name.
pub type Choices = HashMap<&'static str, Vec<u64>>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{field}: not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{field}: {source}")]
    InvalidDate {
        field: &'static str,
        source: DateParseError,
    },
}

/// Naming of one entity type across the UI and the REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityMeta {
    pub name: &'static str,
    pub plural: &'static str,
    /// Path segment of the admin pages, e.g. `movie-user`.
    pub route: &'static str,
    /// Path segment below the REST base url, e.g. `movie-users`.
    pub api_path: &'static str,
}

impl EntityMeta {
    pub fn list_url(&self) -> String {
        format!("/{}", self.route)
    }

    pub fn detail_url(&self, id: u64) -> String {
        format!("/{}/{}", self.route, id)
    }
}

/// A persisted record as returned by the backend.
pub trait Entity: DeserializeOwned + Clone + 'static {
    type Draft: Draft;

    const META: EntityMeta;

    fn id(&self) -> u64;

    /// Column headings of the list table, excluding the id column.
    fn headings() -> &'static [&'static str];

    /// One cell per heading.
    fn cells(&self, dates: &DateFormats) -> Vec<Cell>;

    /// Labelled values shown on the detail page.
    fn fields(&self, dates: &DateFormats) -> Vec<Field>;

    fn to_draft(&self) -> Self::Draft;
}

/// The editable, possibly not yet saved, shape of an entity.
pub trait Draft: Serialize + Default + Clone + 'static {
    fn id(&self) -> Option<u64>;

    fn set_id(&mut self, id: u64);

    fn from_form(form: &FormData) -> Result<Self, FormError>;

    fn form_fields(&self) -> Vec<FormField>;

    /// Loads the records its relationship inputs offer.
    async fn choices<A: EntityApi>(_api: &A) -> Result<Choices, ApiError> {
        Ok(Choices::new())
    }

    /// A draft that only names an existing record, used for relationships.
    fn reference(id: u64) -> Self {
        let mut draft = Self::default();
        draft.set_id(id);
        draft
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    pub label: String,
}

impl Link {
    pub fn to<E: Entity>(entity: &E) -> Self {
        let id = entity.id();
        Link {
            href: E::META.detail_url(id),
            label: id.to_string(),
        }
    }
}

/// Rendered content of a table cell or detail value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    Text { value: String },
    Link(Link),
    Links { links: Vec<Link> },
    Video { src: String },
    Empty,
}

impl Cell {
    pub fn text<S: AsRef<str>>(value: Option<S>) -> Self {
        match value {
            Some(value) => Cell::Text {
                value: value.as_ref().to_owned(),
            },
            None => Cell::Empty,
        }
    }

    pub fn date(value: Option<&AppDate>, dates: &DateFormats) -> Self {
        Cell::text(value.map(|date| date.format(dates)))
    }

    pub fn relation<E: Entity>(related: Option<&E>) -> Self {
        related.map_or(Cell::Empty, |related| Cell::Link(Link::to(related)))
    }

    pub fn relations<E: Entity>(related: &[E]) -> Self {
        if related.is_empty() {
            return Cell::Empty;
        }
        Cell::Links {
            links: related.iter().map(Link::to).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub id: &'static str,
    pub label: &'static str,
    pub value: Cell,
}

impl Field {
    pub fn new(id: &'static str, label: &'static str, value: Cell) -> Self {
        Field { id, label, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputKind {
    Text,
    Email,
    DatetimeLocal,
    /// Id of a related record.
    Select,
    /// Ids of related records; the value joins them with commas.
    MultiSelect,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: InputKind,
    pub value: String,
    pub options: Vec<SelectOption>,
}

impl FormField {
    pub fn new(name: &'static str, label: &'static str, kind: InputKind, value: Option<String>) -> Self {
        FormField {
            name,
            label,
            kind,
            value: value.unwrap_or_default(),
            options: Vec::new(),
        }
    }

    fn selected_ids(&self) -> Vec<&str> {
        match self.kind {
            InputKind::Select => vec![self.value.as_str()],
            InputKind::MultiSelect => self.value.split(',').map(str::trim).collect(),
            _ => Vec::new(),
        }
    }

    /// Fills the options of a select from `ids`. Selected ids missing from `ids` are kept.
    pub fn offer(&mut self, ids: &[u64]) {
        let selected = self
            .selected_ids()
            .into_iter()
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
            .collect::<Vec<_>>();
        let mut values = ids.iter().map(u64::to_string).collect::<Vec<_>>();
        for id in &selected {
            if !values.contains(id) {
                values.push(id.clone());
            }
        }
        self.options = values
            .into_iter()
            .map(|value| SelectOption {
                selected: selected.contains(&value),
                value,
            })
            .collect();
    }
}

pub fn ids_of<E: Entity>(entities: &[E]) -> Vec<u64> {
    entities.iter().map(Entity::id).collect()
}

fn form_values<'a>(form: &'a FormData, field: &'a str) -> impl Iterator<Item = &'a str> {
    form.iter()
        .filter(move |(name, _)| name == field)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Trimmed form value, with blank inputs read as absent.
pub fn form_text(form: &FormData, field: &str) -> Option<String> {
    form_values(form, field).next().map(str::to_owned)
}

pub fn form_id(form: &FormData, field: &'static str) -> Result<Option<u64>, FormError> {
    form_text(form, field)
        .map(|value| parse_id(field, &value))
        .transpose()
}

/// Every selected id of a multi-select.
pub fn form_ids(form: &FormData, field: &'static str) -> Result<Vec<u64>, FormError> {
    form_values(form, field).map(|id| parse_id(field, id)).collect()
}

/// The backend stores every date as an instant, so calendar dates are sent as midnight UTC.
pub fn form_date(form: &FormData, field: &'static str) -> Result<Option<AppDate>, FormError> {
    form_text(form, field)
        .map(|value| {
            AppDate::parse(&value)
                .map(AppDate::to_instant)
                .map_err(|source| FormError::InvalidDate { field, source })
        })
        .transpose()
}

fn parse_id(field: &'static str, value: &str) -> Result<u64, FormError> {
    value.parse().map_err(|_| FormError::InvalidNumber {
        field,
        value: value.to_owned(),
    })
}

pub fn id_value<D: Draft>(related: Option<&D>) -> Option<String> {
    related.and_then(D::id).map(|id| id.to_string())
}

pub fn id_list_value<D: Draft>(related: &[D]) -> Option<String> {
    let ids = related
        .iter()
        .filter_map(D::id)
        .map(|id| id.to_string())
        .collect::<Vec<_>>();
    if ids.is_empty() {
        None
    } else {
        Some(ids.join(", "))
    }
}
