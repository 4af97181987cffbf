use crate::api::{ApiError, EntityApi};
use crate::model::{Draft, Entity};
use log::warn;

pub const BACKEND_UNAVAILABLE: &str = "Could not reach the movies backend, please try again later";

/// What the pages know about one entity type while a request is being served.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState<E> {
    pub loading: bool,
    pub error_message: Option<String>,
    pub entities: Vec<E>,
    pub entity: Option<E>,
}

impl<E> Default for EntityState<E> {
    fn default() -> Self {
        EntityState {
            loading: false,
            error_message: None,
            entities: Vec::new(),
            entity: None,
        }
    }
}

impl<E: Entity> EntityState<E> {
    fn request(&mut self) {
        self.loading = true;
        self.error_message = None;
    }

    /// Logs the failure and keeps a message fit for the page, without backend urls.
    pub fn fail(&mut self, err: &ApiError) {
        warn!("{} request failed: {}", E::META.name, err);
        self.loading = false;
        self.error_message = Some(match err {
            ApiError::IdExists { .. } | ApiError::IdNull { .. } => err.to_string(),
            err if err.is_not_found() => format!("The requested {} does not exist", E::META.name),
            _ => BACKEND_UNAVAILABLE.to_owned(),
        });
    }

    pub async fn get_entities<A: EntityApi>(&mut self, api: &A) -> Result<(), ApiError> {
        self.request();
        match api.get_entities::<E>().await {
            Ok(entities) => {
                self.loading = false;
                self.entities = entities;
                Ok(())
            }
            Err(err) => {
                self.entities.clear();
                self.fail(&err);
                Err(err)
            }
        }
    }

    pub async fn get_entity<A: EntityApi>(&mut self, api: &A, id: u64) -> Result<(), ApiError> {
        self.request();
        match api.get_entity::<E>(id).await {
            Ok(entity) => {
                self.loading = false;
                self.entity = Some(entity);
                Ok(())
            }
            Err(err) => {
                self.entity = None;
                self.fail(&err);
                Err(err)
            }
        }
    }

    pub async fn create_entity<A: EntityApi>(&mut self, api: &A, draft: &E::Draft) -> Result<u64, ApiError> {
        if draft.id().is_some() {
            let err = ApiError::IdExists { entity: E::META.name };
            self.fail(&err);
            return Err(err);
        }
        self.request();
        let result = api.create_entity::<E>(draft).await;
        self.apply_update(result)
    }

    pub async fn update_entity<A: EntityApi>(&mut self, api: &A, draft: &E::Draft) -> Result<u64, ApiError> {
        if draft.id().is_none() {
            let err = ApiError::IdNull { entity: E::META.name };
            self.fail(&err);
            return Err(err);
        }
        self.request();
        let result = api.update_entity::<E>(draft).await;
        self.apply_update(result)
    }

    pub async fn delete_entity<A: EntityApi>(&mut self, api: &A, id: u64) -> Result<(), ApiError> {
        self.request();
        match api.delete_entity::<E>(id).await {
            Ok(()) => {
                self.loading = false;
                self.entity = None;
                Ok(())
            }
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    fn apply_update(&mut self, result: Result<E, ApiError>) -> Result<u64, ApiError> {
        match result {
            Ok(entity) => {
                let id = entity.id();
                self.loading = false;
                self.entity = Some(entity);
                Ok(id)
            }
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::InMemoryApi;
    use crate::model::{Movie, MovieDraft};
    use serde_json::json;

    #[actix_rt::test]
    async fn get_entities() {
        let api = InMemoryApi::new().with::<Movie>(json!([{"id": 2, "title": "B"}, {"id": 1, "title": "A"}]));
        let mut state = EntityState::<Movie>::default();
        state.get_entities(&api).await.unwrap();
        assert!(!state.loading);
        assert_eq!(state.error_message, None);
        let ids = state.entities.iter().map(|movie| movie.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![2, 1]);
    }

    #[actix_rt::test]
    async fn failed_fetch_leaves_empty_list() {
        let api = InMemoryApi::failing();
        let mut state = EntityState::<Movie>::default();
        assert!(state.get_entities(&api).await.is_err());
        assert!(!state.loading);
        assert!(state.entities.is_empty());
        assert_eq!(state.error_message.as_deref(), Some(BACKEND_UNAVAILABLE));
    }

    #[actix_rt::test]
    async fn missing_entity() {
        let api = InMemoryApi::new();
        let mut state = EntityState::<Movie>::default();
        let err = state.get_entity(&api, 8).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(state.entity, None);
        assert!(!state.loading);
        assert_eq!(
            state.error_message.as_deref(),
            Some("The requested Movie does not exist")
        );
    }

    #[actix_rt::test]
    async fn create_refuses_existing_id() {
        let api = InMemoryApi::new();
        let mut state = EntityState::<Movie>::default();
        let draft = MovieDraft {
            id: Some(4),
            ..MovieDraft::default()
        };
        let err = state.create_entity(&api, &draft).await.unwrap_err();
        assert_eq!(err.to_string(), "A new Movie cannot already have an ID");
        assert!(api.calls().is_empty());

        let err = state.update_entity(&api, &MovieDraft::default()).await.unwrap_err();
        assert!(matches!(err, ApiError::IdNull { .. }));
        assert!(api.calls().is_empty());
    }

    #[actix_rt::test]
    async fn create_update_delete() {
        let api = InMemoryApi::new();
        let mut state = EntityState::<Movie>::default();
        let draft = MovieDraft {
            title: Some("Jackie Brown".to_owned()),
            ..MovieDraft::default()
        };
        let id = state.create_entity(&api, &draft).await.unwrap();
        assert_eq!(id, 1);
        assert!(!state.loading);
        assert_eq!(state.error_message, None);

        let mut edited = state.entity.as_ref().unwrap().to_draft();
        edited.title = Some("Jackie Brown (1997)".to_owned());
        state.update_entity(&api, &edited).await.unwrap();
        assert_eq!(
            state.entity.as_ref().unwrap().title.as_deref(),
            Some("Jackie Brown (1997)")
        );

        state.delete_entity(&api, id).await.unwrap();
        assert!(api.stored::<Movie>().is_empty());
        assert_eq!(
            api.calls(),
            vec!["POST /api/movies", "PUT /api/movies", "DELETE /api/movies/1"]
        );
    }
}
