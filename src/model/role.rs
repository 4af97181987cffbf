use super::*;
use serde::Deserialize;

/// Authority granted to a movie user. Only its id is known to the admin pages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Role {
    pub id: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoleDraft {
    pub id: Option<u64>,
}

impl Entity for Role {
    type Draft = RoleDraft;

    const META: EntityMeta = EntityMeta {
        name: "Role",
        plural: "Roles",
        route: "role",
        api_path: "roles",
    };

    fn id(&self) -> u64 {
        self.id
    }

    fn headings() -> &'static [&'static str] {
        &[]
    }

    fn cells(&self, _dates: &DateFormats) -> Vec<Cell> {
        Vec::new()
    }

    fn fields(&self, _dates: &DateFormats) -> Vec<Field> {
        Vec::new()
    }

    fn to_draft(&self) -> RoleDraft {
        RoleDraft { id: Some(self.id) }
    }
}

impl Draft for RoleDraft {
    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    fn from_form(_form: &FormData) -> Result<Self, FormError> {
        Ok(RoleDraft::default())
    }

    fn form_fields(&self) -> Vec<FormField> {
        Vec::new()
    }
}
