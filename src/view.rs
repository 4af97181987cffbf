use crate::api::{ApiError, EntityApi};
use crate::date::DateFormats;
use crate::model::{Cell, Choices, Draft, Entity, EntityMeta, Field, FormField};
use crate::state::EntityState;
use serde::Serialize;
use tera::Context;

/// Header data shared by every entity page.
#[derive(Debug, Serialize)]
struct EntityInfo {
    name: &'static str,
    plural: &'static str,
    route: &'static str,
    list_url: String,
}

impl From<&EntityMeta> for EntityInfo {
    fn from(meta: &EntityMeta) -> Self {
        EntityInfo {
            name: meta.name,
            plural: meta.plural,
            route: meta.route,
            list_url: meta.list_url(),
        }
    }
}

fn base_context<E: Entity>(state: &EntityState<E>) -> Context {
    let mut ctx = Context::new();
    ctx.insert("entity", &EntityInfo::from(&E::META));
    ctx.insert("error_message", &state.error_message);
    ctx.insert("notice", &None::<String>);
    ctx
}

/// Landing page linking every entity list.
pub fn index_context(entities: &[EntityMeta]) -> Context {
    let entities = entities.iter().map(EntityInfo::from).collect::<Vec<_>>();
    let mut ctx = Context::new();
    ctx.insert("entities", &entities);
    ctx.insert("error_message", &None::<String>);
    ctx.insert("notice", &None::<String>);
    ctx
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub id: u64,
    pub detail_href: String,
    pub edit_href: String,
    pub delete_href: String,
    pub cells: Vec<Cell>,
}

/// Table of every record of one entity type.
pub struct ListView<E> {
    match_url: String,
    state: EntityState<E>,
    requested: bool,
}

impl<E: Entity> ListView<E> {
    /// `match_url` is the path the list was reached under; row links are built below it.
    pub fn new(match_url: &str) -> Self {
        ListView::with_state(match_url, EntityState::default())
    }

    pub fn with_state(match_url: &str, state: EntityState<E>) -> Self {
        ListView {
            match_url: match_url.trim_end_matches('/').to_owned(),
            state,
            requested: false,
        }
    }

    /// Fetches the collection. Later calls on the same view do nothing.
    pub async fn load<A: EntityApi>(&mut self, api: &A) -> Result<(), ApiError> {
        if self.requested {
            return Ok(());
        }
        self.requested = true;
        self.state.get_entities(api).await
    }

    pub fn shows_table(&self) -> bool {
        !self.state.entities.is_empty()
    }

    pub fn shows_empty_message(&self) -> bool {
        self.state.entities.is_empty() && !self.state.loading
    }

    pub fn create_href(&self) -> String {
        format!("{}/new", self.match_url)
    }

    pub fn rows(&self, dates: &DateFormats) -> Vec<Row> {
        self.state
            .entities
            .iter()
            .map(|entity| {
                let detail_href = format!("{}/{}", self.match_url, entity.id());
                Row {
                    id: entity.id(),
                    edit_href: format!("{}/edit", detail_href),
                    delete_href: format!("{}/delete", detail_href),
                    detail_href,
                    cells: entity.cells(dates),
                }
            })
            .collect()
    }

    pub fn context(&self, dates: &DateFormats) -> Context {
        let mut ctx = base_context(&self.state);
        ctx.insert("headings", E::headings());
        ctx.insert("rows", &self.rows(dates));
        ctx.insert("create_href", &self.create_href());
        ctx.insert("show_table", &self.shows_table());
        ctx.insert("show_empty", &self.shows_empty_message());
        ctx
    }
}

/// Read-only page of a single record.
pub struct DetailView<E> {
    state: EntityState<E>,
    requested_id: Option<u64>,
}

impl<E: Entity> Default for DetailView<E> {
    fn default() -> Self {
        DetailView {
            state: EntityState::default(),
            requested_id: None,
        }
    }
}

impl<E: Entity> DetailView<E> {
    pub fn new() -> Self {
        DetailView::default()
    }

    pub fn entity(&self) -> Option<&E> {
        self.state.entity.as_ref()
    }

    /// Fetches the record unless `id` is the one already requested.
    pub async fn load<A: EntityApi>(&mut self, api: &A, id: u64) -> Result<(), ApiError> {
        if self.requested_id == Some(id) {
            return Ok(());
        }
        self.requested_id = Some(id);
        self.state.get_entity(api, id).await
    }

    pub fn fields(&self, dates: &DateFormats) -> Vec<Field> {
        self.entity()
            .map(|entity| entity.fields(dates))
            .unwrap_or_default()
    }

    pub fn context(&self, dates: &DateFormats) -> Context {
        let mut ctx = base_context(&self.state);
        ctx.insert("id", &self.entity().map(Entity::id));
        ctx.insert("fields", &self.fields(dates));
        ctx.insert(
            "edit_href",
            &self
                .entity()
                .map(|entity| format!("{}/edit", E::META.detail_url(entity.id()))),
        );
        ctx
    }
}

/// Create or edit page.
pub struct FormView<E: Entity> {
    state: EntityState<E>,
    draft: E::Draft,
    form_error: Option<String>,
    choices: Choices,
}

impl<E: Entity> FormView<E> {
    pub fn new(draft: E::Draft) -> Self {
        FormView::with_state(draft, EntityState::default())
    }

    pub fn with_state(draft: E::Draft, state: EntityState<E>) -> Self {
        FormView {
            state,
            draft,
            form_error: None,
            choices: Choices::new(),
        }
    }

    /// Fetches the records the relationship selects offer. On failure the selects only
    /// keep their current value.
    pub async fn load_choices<A: EntityApi>(&mut self, api: &A) -> Result<(), ApiError> {
        match E::Draft::choices(api).await {
            Ok(choices) => {
                self.choices = choices;
                Ok(())
            }
            Err(err) => {
                self.state.fail(&err);
                Err(err)
            }
        }
    }

    pub fn invalid(mut self, message: String) -> Self {
        self.form_error = Some(message);
        self
    }

    pub fn is_new(&self) -> bool {
        self.draft.id().is_none()
    }

    pub fn action(&self) -> String {
        match self.draft.id() {
            Some(id) => format!("{}/edit", E::META.detail_url(id)),
            None => format!("{}/new", E::META.list_url()),
        }
    }

    pub fn fields(&self) -> Vec<FormField> {
        let mut fields = self.draft.form_fields();
        for field in &mut fields {
            if let Some(ids) = self.choices.get(field.name) {
                field.offer(ids);
            }
        }
        fields
    }

    pub fn context(&self) -> Context {
        let mut ctx = base_context(&self.state);
        ctx.insert("id", &self.draft.id());
        ctx.insert("is_new", &self.is_new());
        ctx.insert("action", &self.action());
        ctx.insert("fields", &self.fields());
        ctx.insert("form_error", &self.form_error);
        ctx
    }
}

/// Confirmation page in front of a delete.
pub struct DeleteView<E> {
    id: u64,
    state: EntityState<E>,
}

impl<E: Entity> DeleteView<E> {
    pub fn new(id: u64) -> Self {
        DeleteView::with_state(id, EntityState::default())
    }

    pub fn with_state(id: u64, state: EntityState<E>) -> Self {
        DeleteView { id, state }
    }

    pub fn context(&self) -> Context {
        let mut ctx = base_context(&self.state);
        ctx.insert("id", &self.id);
        ctx.insert("action", &format!("{}/delete", E::META.detail_url(self.id)));
        ctx.insert("cancel_href", &E::META.list_url());
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::InMemoryApi;
    use crate::model::{Contact, Movie, MovieDraft, MovieUser, SeenMovie, SeenMovieDraft};
    use crate::templates;
    use serde_json::json;

    fn movies() -> Vec<Movie> {
        serde_json::from_value(json!([
            {"id": 1, "title": "A", "date": "2020-01-01"},
            {"id": 2, "title": "B", "date": "2021-05-05"}
        ]))
        .unwrap()
    }

    fn loaded<E: Entity>(entities: Vec<E>, loading: bool) -> EntityState<E> {
        EntityState {
            loading,
            entities,
            ..EntityState::default()
        }
    }

    #[test]
    fn empty_message_only_when_empty_and_idle() {
        for &(count, loading, expected) in &[
            (0, false, true),
            (0, true, false),
            (2, false, false),
            (2, true, false),
        ] {
            let entities: Vec<Movie> = movies().into_iter().take(count).collect();
            let view = ListView::with_state("/movie", loaded(entities, loading));
            assert_eq!(view.shows_empty_message(), expected, "{} {}", count, loading);
            assert_eq!(view.shows_table(), count > 0);
        }
    }

    #[test]
    fn rows_are_templated_with_ids() {
        let view = ListView::with_state("/movie/", loaded(movies(), false));
        let rows = view.rows(&DateFormats::default());
        assert_eq!(rows.len(), 2);
        for (row, movie) in rows.iter().zip(movies()) {
            assert_eq!(row.id, movie.id);
            assert_eq!(row.detail_href, format!("/movie/{}", movie.id));
            assert_eq!(row.edit_href, format!("/movie/{}/edit", movie.id));
            assert_eq!(row.delete_href, format!("/movie/{}/delete", movie.id));
        }
        assert_eq!(view.create_href(), "/movie/new");
    }

    #[test]
    fn render_movie_list() {
        let tera = templates::load().unwrap();
        let view = ListView::with_state("/movie", loaded(movies(), false));
        let html = tera
            .render("list.html", &view.context(&DateFormats::default()))
            .unwrap();
        assert_eq!(html.matches("class=\"entity-row\"").count(), 2);
        assert!(html.contains("01/01/2020"));
        assert!(html.contains("05/05/2021"));
        assert!(!html.contains("No Movies found"));
    }

    #[test]
    fn render_empty_contact_list() {
        let tera = templates::load().unwrap();
        let view = ListView::<Contact>::with_state("/contact", loaded(vec![], false));
        let html = tera
            .render("list.html", &view.context(&DateFormats::default()))
            .unwrap();
        assert!(html.contains("No Contacts found"));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn render_loading_contact_list() {
        let tera = templates::load().unwrap();
        let view = ListView::<Contact>::with_state("/contact", loaded(vec![], true));
        let html = tera
            .render("list.html", &view.context(&DateFormats::default()))
            .unwrap();
        assert!(!html.contains("No Contacts found"));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn relation_columns_link_or_stay_blank() {
        let tera = templates::load().unwrap();
        let seen: Vec<SeenMovie> = serde_json::from_value(json!([
            {"id": 1, "movie": {"id": 7}, "movieUser": {"id": 3}},
            {"id": 2}
        ]))
        .unwrap();
        let view = ListView::with_state("/seen-movie", loaded(seen, false));
        let html = tera
            .render("list.html", &view.context(&DateFormats::default()))
            .unwrap();
        assert!(html.contains("<a href=\"/movie/7\">7</a>"));
        assert!(html.contains("<a href=\"/movie-user/3\">3</a>"));
        assert_eq!(html.matches("href=\"/movie/").count(), 1);
    }

    #[actix_rt::test]
    async fn list_loads_once() {
        let api = InMemoryApi::new().with::<Movie>(json!([{"id": 1}]));
        let mut view = ListView::<Movie>::new("/movie");
        view.load(&api).await.unwrap();
        view.load(&api).await.unwrap();
        assert_eq!(api.calls(), vec!["GET /api/movies"]);
        assert_eq!(view.state.entities.len(), 1);
    }

    #[actix_rt::test]
    async fn failed_list_looks_empty() {
        let api = InMemoryApi::failing();
        let mut view = ListView::<Movie>::new("/movie");
        assert!(view.load(&api).await.is_err());
        assert!(view.shows_empty_message());
        assert!(view.state.error_message.is_some());
    }

    #[actix_rt::test]
    async fn detail_requests_route_id_once() {
        let api = InMemoryApi::new().with::<Movie>(json!([
            {"id": 1, "title": "A"},
            {"id": 2, "title": "B", "date": "2021-05-05T20:00:00Z", "externalId": "b.mp4"}
        ]));
        let mut view = DetailView::<Movie>::new();
        view.load(&api, 2).await.unwrap();
        view.load(&api, 2).await.unwrap();
        assert_eq!(api.calls(), vec!["GET /api/movies/2"]);
        assert_eq!(view.entity().map(|movie| movie.id), Some(2));

        let tera = templates::load().unwrap();
        let html = tera
            .render("detail.html", &view.context(&DateFormats::default()))
            .unwrap();
        assert!(html.contains("Movie [<b>2</b>]"));
        assert!(html.contains("05/05/21 20:00"));
        assert!(html.contains("href=\"/movie\""));
        assert!(html.contains("href=\"/movie/2/edit\""));

        view.load(&api, 1).await.unwrap();
        assert_eq!(api.calls(), vec!["GET /api/movies/2", "GET /api/movies/1"]);
    }

    #[test]
    fn form_action() {
        let view = FormView::<Movie>::new(MovieDraft::default());
        assert!(view.is_new());
        assert_eq!(view.action(), "/movie/new");

        let view = FormView::<Movie>::new(movies()[1].to_draft());
        assert_eq!(view.action(), "/movie/2/edit");
        let ctx = view.context().into_json();
        assert_eq!(ctx["fields"][0]["value"], "B");
        assert_eq!(ctx["fields"][1]["value"], "2021-05-05T00:00");
        assert_eq!(ctx["fields"][1]["kind"], "datetime-local");
    }

    #[actix_rt::test]
    async fn form_offers_related_records() {
        let api = InMemoryApi::new()
            .with::<Movie>(json!([{"id": 1}, {"id": 2}]))
            .with::<MovieUser>(json!([{"id": 3}]));
        let draft = SeenMovieDraft {
            movie: Some(Box::new(MovieDraft::reference(2))),
            ..SeenMovieDraft::default()
        };
        let mut view = FormView::<SeenMovie>::new(draft);
        view.load_choices(&api).await.unwrap();
        assert_eq!(api.calls(), vec!["GET /api/movies", "GET /api/movie-users"]);

        let fields = view.fields();
        let movie = fields.iter().find(|field| field.name == "movie").unwrap();
        let options = movie
            .options
            .iter()
            .map(|option| (option.value.as_str(), option.selected))
            .collect::<Vec<_>>();
        assert_eq!(options, vec![("1", false), ("2", true)]);
        let user = fields.iter().find(|field| field.name == "movieUser").unwrap();
        assert_eq!(user.options.len(), 1);
        assert!(!user.options[0].selected);
    }

    #[actix_rt::test]
    async fn form_without_choices_when_backend_fails() {
        let api = InMemoryApi::failing();
        let mut view = FormView::<SeenMovie>::new(SeenMovieDraft::default());
        assert!(view.load_choices(&api).await.is_err());
        assert!(view.fields().iter().all(|field| field.options.is_empty()));
        assert_eq!(view.state.error_message.as_deref(), Some(crate::state::BACKEND_UNAVAILABLE));
    }
}
