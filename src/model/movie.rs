use super::*;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: u64,
    pub title: Option<String>,
    pub date: Option<AppDate>,
    /// Source url of the trailer.
    pub external_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDraft {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub date: Option<AppDate>,
    pub external_id: Option<String>,
}

impl Entity for Movie {
    type Draft = MovieDraft;

    const META: EntityMeta = EntityMeta {
        name: "Movie",
        plural: "Movies",
        route: "movie",
        api_path: "movies",
    };

    fn id(&self) -> u64 {
        self.id
    }

    fn headings() -> &'static [&'static str] {
        &["Title", "Date", "Trailer"]
    }

    fn cells(&self, dates: &DateFormats) -> Vec<Cell> {
        vec![
            Cell::text(self.title.as_ref()),
            Cell::date(self.date.as_ref(), dates),
            self.external_id
                .clone()
                .map_or(Cell::Empty, |src| Cell::Video { src }),
        ]
    }

    fn fields(&self, dates: &DateFormats) -> Vec<Field> {
        vec![
            Field::new("title", "Title", Cell::text(self.title.as_ref())),
            Field::new("date", "Date", Cell::date(self.date.as_ref(), dates)),
            Field::new("externalId", "External Id", Cell::text(self.external_id.as_ref())),
        ]
    }

    fn to_draft(&self) -> MovieDraft {
        MovieDraft {
            id: Some(self.id),
            title: self.title.clone(),
            date: self.date,
            external_id: self.external_id.clone(),
        }
    }
}

impl Draft for MovieDraft {
    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    fn from_form(form: &FormData) -> Result<Self, FormError> {
        Ok(MovieDraft {
            id: None,
            title: form_text(form, "title"),
            date: form_date(form, "date")?,
            external_id: form_text(form, "externalId"),
        })
    }

    fn form_fields(&self) -> Vec<FormField> {
        vec![
            FormField::new("title", "Title", InputKind::Text, self.title.clone()),
            FormField::new(
                "date",
                "Date",
                InputKind::DatetimeLocal,
                self.date.map(|date| date.input_value()),
            ),
            FormField::new("externalId", "External Id", InputKind::Text, self.external_id.clone()),
        ]
    }
}
