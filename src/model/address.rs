use super::*;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: u64,
    pub country: Option<String>,
    pub area: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub contact: Option<Box<Contact>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDraft {
    pub id: Option<u64>,
    pub country: Option<String>,
    pub area: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Box<ContactDraft>>,
}

impl Entity for Address {
    type Draft = AddressDraft;

    const META: EntityMeta = EntityMeta {
        name: "Address",
        plural: "Addresses",
        route: "address",
        api_path: "addresses",
    };

    fn id(&self) -> u64 {
        self.id
    }

    fn headings() -> &'static [&'static str] {
        &["Country", "Area", "City", "Street", "Number", "Contact"]
    }

    fn cells(&self, _dates: &DateFormats) -> Vec<Cell> {
        vec![
            Cell::text(self.country.as_ref()),
            Cell::text(self.area.as_ref()),
            Cell::text(self.city.as_ref()),
            Cell::text(self.street.as_ref()),
            Cell::text(self.number.as_ref()),
            Cell::relation(self.contact.as_deref()),
        ]
    }

    fn fields(&self, _dates: &DateFormats) -> Vec<Field> {
        vec![
            Field::new("country", "Country", Cell::text(self.country.as_ref())),
            Field::new("area", "Area", Cell::text(self.area.as_ref())),
            Field::new("city", "City", Cell::text(self.city.as_ref())),
            Field::new("street", "Street", Cell::text(self.street.as_ref())),
            Field::new("number", "Number", Cell::text(self.number.as_ref())),
            Field::new("contact", "Contact", Cell::relation(self.contact.as_deref())),
        ]
    }

    fn to_draft(&self) -> AddressDraft {
        AddressDraft {
            id: Some(self.id),
            country: self.country.clone(),
            area: self.area.clone(),
            city: self.city.clone(),
            street: self.street.clone(),
            number: self.number.clone(),
            contact: self
                .contact
                .as_ref()
                .map(|contact| Box::new(ContactDraft::reference(contact.id))),
        }
    }
}

impl Draft for AddressDraft {
    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    fn from_form(form: &FormData) -> Result<Self, FormError> {
        Ok(AddressDraft {
            id: None,
            country: form_text(form, "country"),
            area: form_text(form, "area"),
            city: form_text(form, "city"),
            street: form_text(form, "street"),
            number: form_text(form, "number"),
            contact: form_id(form, "contact")?.map(|id| Box::new(ContactDraft::reference(id))),
        })
    }

    fn form_fields(&self) -> Vec<FormField> {
        vec![
            FormField::new("country", "Country", InputKind::Text, self.country.clone()),
            FormField::new("area", "Area", InputKind::Text, self.area.clone()),
            FormField::new("city", "City", InputKind::Text, self.city.clone()),
            FormField::new("street", "Street", InputKind::Text, self.street.clone()),
            FormField::new("number", "Number", InputKind::Text, self.number.clone()),
            FormField::new(
                "contact",
                "Contact",
                InputKind::Select,
                id_value(self.contact.as_deref()),
            ),
        ]
    }

    async fn choices<A: EntityApi>(api: &A) -> Result<Choices, ApiError> {
        let contacts = api.get_entities::<Contact>().await?;
        Ok(Choices::from([("contact", ids_of(&contacts))]))
    }
}
