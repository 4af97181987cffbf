use super::*;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieUser {
    pub id: u64,
    pub username: Option<String>,
    #[serde(default)]
    pub seen_movies: Vec<SeenMovie>,
    #[serde(default)]
    pub roles: Vec<Role>,
    pub contact: Option<Box<Contact>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieUserDraft {
    pub id: Option<u64>,
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seen_movies: Option<Vec<SeenMovieDraft>>,
    pub roles: Vec<RoleDraft>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Box<ContactDraft>>,
}

impl Entity for MovieUser {
    type Draft = MovieUserDraft;

    const META: EntityMeta = EntityMeta {
        name: "Movie User",
        plural: "Movie Users",
        route: "movie-user",
        api_path: "movie-users",
    };

    fn id(&self) -> u64 {
        self.id
    }

    fn headings() -> &'static [&'static str] {
        &["Username", "Role"]
    }

    fn cells(&self, _dates: &DateFormats) -> Vec<Cell> {
        vec![
            Cell::text(self.username.as_ref()),
            Cell::relations(&self.roles),
        ]
    }

    fn fields(&self, _dates: &DateFormats) -> Vec<Field> {
        vec![
            Field::new("username", "Username", Cell::text(self.username.as_ref())),
            Field::new("role", "Role", Cell::relations(&self.roles)),
            Field::new("contact", "Contact", Cell::relation(self.contact.as_deref())),
            Field::new("seenMovies", "Seen Movies", Cell::relations(&self.seen_movies)),
        ]
    }

    fn to_draft(&self) -> MovieUserDraft {
        MovieUserDraft {
            id: Some(self.id),
            username: self.username.clone(),
            seen_movies: None,
            roles: self.roles.iter().map(Role::to_draft).collect(),
            contact: None,
        }
    }
}

impl Draft for MovieUserDraft {
    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    fn from_form(form: &FormData) -> Result<Self, FormError> {
        Ok(MovieUserDraft {
            id: None,
            username: form_text(form, "username"),
            seen_movies: None,
            roles: form_ids(form, "roles")?
                .into_iter()
                .map(RoleDraft::reference)
                .collect(),
            contact: None,
        })
    }

    fn form_fields(&self) -> Vec<FormField> {
        vec![
            FormField::new("username", "Username", InputKind::Text, self.username.clone()),
            FormField::new("roles", "Role", InputKind::MultiSelect, id_list_value(&self.roles)),
        ]
    }

    async fn choices<A: EntityApi>(api: &A) -> Result<Choices, ApiError> {
        let roles = api.get_entities::<Role>().await?;
        Ok(Choices::from([("roles", ids_of(&roles))]))
    }
}
