use super::*;
use serde::Deserialize;

/// A movie watched by a user at a given date.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeenMovie {
    pub id: u64,
    pub date: Option<AppDate>,
    pub movie: Option<Box<Movie>>,
    pub movie_user: Option<Box<MovieUser>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeenMovieDraft {
    pub id: Option<u64>,
    pub date: Option<AppDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie: Option<Box<MovieDraft>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie_user: Option<Box<MovieUserDraft>>,
}

impl Entity for SeenMovie {
    type Draft = SeenMovieDraft;

    const META: EntityMeta = EntityMeta {
        name: "Seen Movie",
        plural: "Seen Movies",
        route: "seen-movie",
        api_path: "seen-movies",
    };

    fn id(&self) -> u64 {
        self.id
    }

    fn headings() -> &'static [&'static str] {
        &["Date", "Movie", "Movie User"]
    }

    fn cells(&self, dates: &DateFormats) -> Vec<Cell> {
        vec![
            Cell::date(self.date.as_ref(), dates),
            Cell::relation(self.movie.as_deref()),
            Cell::relation(self.movie_user.as_deref()),
        ]
    }

    fn fields(&self, dates: &DateFormats) -> Vec<Field> {
        vec![
            Field::new("date", "Date", Cell::date(self.date.as_ref(), dates)),
            Field::new("movie", "Movie", Cell::relation(self.movie.as_deref())),
            Field::new("movieUser", "Movie User", Cell::relation(self.movie_user.as_deref())),
        ]
    }

    fn to_draft(&self) -> SeenMovieDraft {
        SeenMovieDraft {
            id: Some(self.id),
            date: self.date,
            movie: self
                .movie
                .as_ref()
                .map(|movie| Box::new(MovieDraft::reference(movie.id))),
            movie_user: self
                .movie_user
                .as_ref()
                .map(|user| Box::new(MovieUserDraft::reference(user.id))),
        }
    }
}

impl Draft for SeenMovieDraft {
    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    fn from_form(form: &FormData) -> Result<Self, FormError> {
        Ok(SeenMovieDraft {
            id: None,
            date: form_date(form, "date")?,
            movie: form_id(form, "movie")?.map(|id| Box::new(MovieDraft::reference(id))),
            movie_user: form_id(form, "movieUser")?.map(|id| Box::new(MovieUserDraft::reference(id))),
        })
    }

    fn form_fields(&self) -> Vec<FormField> {
        vec![
            FormField::new(
                "date",
                "Date",
                InputKind::DatetimeLocal,
                self.date.map(|date| date.input_value()),
            ),
            FormField::new("movie", "Movie", InputKind::Select, id_value(self.movie.as_deref())),
            FormField::new(
                "movieUser",
                "Movie User",
                InputKind::Select,
                id_value(self.movie_user.as_deref()),
            ),
        ]
    }

    async fn choices<A: EntityApi>(api: &A) -> Result<Choices, ApiError> {
        let movies = api.get_entities::<Movie>().await?;
        let users = api.get_entities::<MovieUser>().await?;
        Ok(Choices::from([
            ("movie", ids_of(&movies)),
            ("movieUser", ids_of(&users)),
        ]))
    }
}
