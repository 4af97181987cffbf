use super::*;
use serde::Deserialize;

/// Backend filter for movie users that no contact owns yet.
pub const UNASSIGNED_MOVIE_USERS: &str = "contact-is-null";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: u64,
    pub name: Option<String>,
    pub birth_date: Option<AppDate>,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub movie_user: Option<Box<MovieUser>>,
    #[serde(default)]
    pub addresses: Vec<Address>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDraft {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub birth_date: Option<AppDate>,
    pub gender: Option<String>,
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie_user: Option<Box<MovieUserDraft>>,
    /// Owned by the address side; never sent back from a form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<AddressDraft>>,
}

impl Entity for Contact {
    type Draft = ContactDraft;

    const META: EntityMeta = EntityMeta {
        name: "Contact",
        plural: "Contacts",
        route: "contact",
        api_path: "contacts",
    };

    fn id(&self) -> u64 {
        self.id
    }

    fn headings() -> &'static [&'static str] {
        &["Name", "Birth Date", "Gender", "Email", "Movie User"]
    }

    fn cells(&self, dates: &DateFormats) -> Vec<Cell> {
        vec![
            Cell::text(self.name.as_ref()),
            Cell::date(self.birth_date.as_ref(), dates),
            Cell::text(self.gender.as_ref()),
            Cell::text(self.email.as_ref()),
            Cell::relation(self.movie_user.as_deref()),
        ]
    }

    fn fields(&self, dates: &DateFormats) -> Vec<Field> {
        vec![
            Field::new("name", "Name", Cell::text(self.name.as_ref())),
            Field::new("birthDate", "Birth Date", Cell::date(self.birth_date.as_ref(), dates)),
            Field::new("gender", "Gender", Cell::text(self.gender.as_ref())),
            Field::new("email", "Email", Cell::text(self.email.as_ref())),
            Field::new("movieUser", "Movie User", Cell::relation(self.movie_user.as_deref())),
            Field::new("addresses", "Addresses", Cell::relations(&self.addresses)),
        ]
    }

    fn to_draft(&self) -> ContactDraft {
        ContactDraft {
            id: Some(self.id),
            name: self.name.clone(),
            birth_date: self.birth_date,
            gender: self.gender.clone(),
            email: self.email.clone(),
            movie_user: self
                .movie_user
                .as_ref()
                .map(|user| Box::new(MovieUserDraft::reference(user.id))),
            addresses: None,
        }
    }
}

impl Draft for ContactDraft {
    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    fn from_form(form: &FormData) -> Result<Self, FormError> {
        Ok(ContactDraft {
            id: None,
            name: form_text(form, "name"),
            birth_date: form_date(form, "birthDate")?,
            gender: form_text(form, "gender"),
            email: form_text(form, "email"),
            movie_user: form_id(form, "movieUser")?.map(|id| Box::new(MovieUserDraft::reference(id))),
            addresses: None,
        })
    }

    fn form_fields(&self) -> Vec<FormField> {
        vec![
            FormField::new("name", "Name", InputKind::Text, self.name.clone()),
            FormField::new(
                "birthDate",
                "Birth Date",
                InputKind::DatetimeLocal,
                self.birth_date.map(|date| date.input_value()),
            ),
            FormField::new("gender", "Gender", InputKind::Text, self.gender.clone()),
            FormField::new("email", "Email", InputKind::Email, self.email.clone()),
            FormField::new(
                "movieUser",
                "Movie User",
                InputKind::Select,
                id_value(self.movie_user.as_deref()),
            ),
        ]
    }

    async fn choices<A: EntityApi>(api: &A) -> Result<Choices, ApiError> {
        let users = api.get_entities_where::<MovieUser>(UNASSIGNED_MOVIE_USERS).await?;
        Ok(Choices::from([("movieUser", ids_of(&users))]))
    }
}
