use crate::model::{Draft, Entity};
use log::debug;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("could not build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} was not found")]
    NotFound { url: String },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("A new {entity} cannot already have an ID")]
    IdExists { entity: &'static str },
    #[error("Invalid id for {entity}")]
    IdNull { entity: &'static str },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

/// CRUD access to the entity resources of the movies backend.
pub trait EntityApi {
    async fn get_entities<E: Entity>(&self) -> Result<Vec<E>, ApiError>;
    /// The collection narrowed by a named backend filter, e.g. `contact-is-null`.
    async fn get_entities_where<E: Entity>(&self, filter: &str) -> Result<Vec<E>, ApiError>;
    async fn get_entity<E: Entity>(&self, id: u64) -> Result<E, ApiError>;
    async fn create_entity<E: Entity>(&self, draft: &E::Draft) -> Result<E, ApiError>;
    async fn update_entity<E: Entity>(&self, draft: &E::Draft) -> Result<E, ApiError>;
    async fn delete_entity<E: Entity>(&self, id: u64) -> Result<(), ApiError>;
}

/// Talks to the JHipster style REST resources below `base_url`.
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::ClientBuild)?;
        Ok(RestClient {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn collection_url<E: Entity>(&self) -> String {
        format!("{}/{}", self.base_url, E::META.api_path)
    }

    fn entity_url<E: Entity>(&self, id: u64) -> String {
        format!("{}/{}", self.collection_url::<E>(), id)
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|source| ApiError::Request {
            url: url.to_owned(),
            source,
        })?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(ApiError::NotFound {
                url: url.to_owned(),
            }),
            status if !status.is_success() => Err(ApiError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
            }),
            _ => Ok(response),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder, url: &str) -> Result<T, ApiError> {
        self.send(request, url)
            .await?
            .json()
            .await
            .map_err(|source| ApiError::Decode {
                url: url.to_owned(),
                source,
            })
    }
}

impl EntityApi for RestClient {
    async fn get_entities<E: Entity>(&self) -> Result<Vec<E>, ApiError> {
        debug!("REST request to get all {}", E::META.plural);
        let url = self.collection_url::<E>();
        self.fetch(self.http.get(&url), &url).await
    }

    async fn get_entities_where<E: Entity>(&self, filter: &str) -> Result<Vec<E>, ApiError> {
        debug!("REST request to get all {} where {}", E::META.plural, filter);
        let url = format!("{}?filter={}", self.collection_url::<E>(), filter);
        self.fetch(self.http.get(&url), &url).await
    }

    async fn get_entity<E: Entity>(&self, id: u64) -> Result<E, ApiError> {
        debug!("REST request to get {} : {}", E::META.name, id);
        let url = self.entity_url::<E>(id);
        self.fetch(self.http.get(&url), &url).await
    }

    async fn create_entity<E: Entity>(&self, draft: &E::Draft) -> Result<E, ApiError> {
        debug!("REST request to save {}", E::META.name);
        let url = self.collection_url::<E>();
        self.fetch(self.http.post(&url).json(draft), &url).await
    }

    async fn update_entity<E: Entity>(&self, draft: &E::Draft) -> Result<E, ApiError> {
        debug!("REST request to update {} : {:?}", E::META.name, draft.id());
        let url = self.collection_url::<E>();
        self.fetch(self.http.put(&url).json(draft), &url).await
    }

    async fn delete_entity<E: Entity>(&self, id: u64) -> Result<(), ApiError> {
        debug!("REST request to delete {} : {}", E::META.name, id);
        let url = self.entity_url::<E>(id);
        self.send(self.http.delete(&url), &url).await?;
        Ok(())
    }
}
