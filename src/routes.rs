use crate::api::{ApiError, EntityApi};
use crate::date::DateFormats;
use crate::model::*;
use crate::state::EntityState;
use crate::view::*;
use actix_web::http::{header, StatusCode};
use actix_web::{error, web, HttpRequest, HttpResponse};
use log::debug;
use serde::Deserialize;

type Tera = web::Data<tera::Tera>;
type Dates = web::Data<DateFormats>;
type Api<A> = web::Data<A>;

const ENTITIES: [EntityMeta; 6] = [
    Contact::META,
    Address::META,
    MovieUser::META,
    SeenMovie::META,
    Movie::META,
    Role::META,
];

fn log_error<E: std::fmt::Debug>(err: E, message: &'static str) -> error::Error {
    debug!("{:?}", err);
    error::ErrorInternalServerError(message)
}

fn render(
    tera: &tera::Tera,
    template: &str,
    ctx: &tera::Context,
    status: StatusCode,
) -> actix_web::Result<HttpResponse> {
    let body = tera
        .render(template, ctx)
        .map_err(|err| log_error(err, "Template error"))?;
    Ok(HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body))
}

fn redirect(location: String) -> HttpResponse {
    HttpResponse::Found()
        .append_header((header::LOCATION, location))
        .finish()
}

fn failure_status(err: &ApiError) -> StatusCode {
    match err {
        ApiError::IdExists { .. } | ApiError::IdNull { .. } => StatusCode::BAD_REQUEST,
        err if err.is_not_found() => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    }
}

/// Outcome of a create, update or delete, carried to the list page in the query string.
/// A malformed id only drops the notice.
#[derive(Debug, Deserialize)]
struct NoticeQuery {
    notice: Option<String>,
    id: Option<String>,
}

impl NoticeQuery {
    fn message(&self, meta: &EntityMeta) -> Option<String> {
        let id = self.id.as_deref()?.parse::<u64>().ok()?;
        match self.notice.as_deref()? {
            "created" => Some(format!("A new {} is created with identifier {}", meta.name, id)),
            "updated" => Some(format!("A {} is updated with identifier {}", meta.name, id)),
            "deleted" => Some(format!("A {} is deleted with identifier {}", meta.name, id)),
            _ => None,
        }
    }
}

fn notice_url(meta: &EntityMeta, notice: &str, id: u64) -> String {
    format!("{}?notice={}&id={}", meta.list_url(), notice, id)
}

async fn index(tera: Tera) -> actix_web::Result<HttpResponse> {
    render(&tera, "index.html", &index_context(&ENTITIES), StatusCode::OK)
}

async fn list<E: Entity, A: EntityApi + 'static>(
    req: HttpRequest,
    query: web::Query<NoticeQuery>,
    tera: Tera,
    dates: Dates,
    api: Api<A>,
) -> actix_web::Result<HttpResponse> {
    let mut view = ListView::<E>::new(req.path());
    if let Err(err) = view.load(api.get_ref()).await {
        debug!("rendering {} list without data: {:?}", E::META.name, err);
    }
    let mut ctx = view.context(&dates);
    ctx.insert("notice", &query.message(&E::META));
    render(&tera, "list.html", &ctx, StatusCode::OK)
}

async fn detail<E: Entity, A: EntityApi + 'static>(
    path: web::Path<u64>,
    tera: Tera,
    dates: Dates,
    api: Api<A>,
) -> actix_web::Result<HttpResponse> {
    let mut view = DetailView::<E>::new();
    let status = match view.load(api.get_ref(), path.into_inner()).await {
        Ok(()) => StatusCode::OK,
        Err(err) => failure_status(&err),
    };
    render(&tera, "detail.html", &view.context(&dates), status)
}

async fn render_form<E: Entity, A: EntityApi>(
    tera: &tera::Tera,
    api: &A,
    mut view: FormView<E>,
    status: StatusCode,
) -> actix_web::Result<HttpResponse> {
    if let Err(err) = view.load_choices(api).await {
        debug!("rendering {} form without choices: {:?}", E::META.name, err);
    }
    render(tera, "form.html", &view.context(), status)
}

async fn new_form<E: Entity, A: EntityApi + 'static>(tera: Tera, api: Api<A>) -> actix_web::Result<HttpResponse> {
    let view = FormView::<E>::new(E::Draft::default());
    render_form(&tera, api.get_ref(), view, StatusCode::OK).await
}

async fn create<E: Entity, A: EntityApi + 'static>(
    form: web::Form<FormData>,
    tera: Tera,
    api: Api<A>,
) -> actix_web::Result<HttpResponse> {
    let draft = match E::Draft::from_form(&form) {
        Ok(draft) => draft,
        Err(err) => {
            let view = FormView::<E>::new(E::Draft::default()).invalid(err.to_string());
            return render_form(&tera, api.get_ref(), view, StatusCode::BAD_REQUEST).await;
        }
    };
    let mut state = EntityState::<E>::default();
    match state.create_entity(api.get_ref(), &draft).await {
        Ok(id) => Ok(redirect(notice_url(&E::META, "created", id))),
        Err(err) => {
            let view = FormView::with_state(draft, state);
            render(&tera, "form.html", &view.context(), failure_status(&err))
        }
    }
}

async fn edit_form<E: Entity, A: EntityApi + 'static>(
    path: web::Path<u64>,
    tera: Tera,
    dates: Dates,
    api: Api<A>,
) -> actix_web::Result<HttpResponse> {
    let mut view = DetailView::<E>::new();
    if let Err(err) = view.load(api.get_ref(), path.into_inner()).await {
        return render(&tera, "detail.html", &view.context(&dates), failure_status(&err));
    }
    let draft = view.entity().map(Entity::to_draft).unwrap_or_default();
    render_form(&tera, api.get_ref(), FormView::<E>::new(draft), StatusCode::OK).await
}

async fn update<E: Entity, A: EntityApi + 'static>(
    path: web::Path<u64>,
    form: web::Form<FormData>,
    tera: Tera,
    api: Api<A>,
) -> actix_web::Result<HttpResponse> {
    let id = path.into_inner();
    let mut draft = match E::Draft::from_form(&form) {
        Ok(draft) => draft,
        Err(err) => {
            let view = FormView::<E>::new(E::Draft::reference(id)).invalid(err.to_string());
            return render_form(&tera, api.get_ref(), view, StatusCode::BAD_REQUEST).await;
        }
    };
    draft.set_id(id);
    let mut state = EntityState::<E>::default();
    match state.update_entity(api.get_ref(), &draft).await {
        Ok(id) => Ok(redirect(notice_url(&E::META, "updated", id))),
        Err(err) => {
            let view = FormView::with_state(draft, state);
            render(&tera, "form.html", &view.context(), failure_status(&err))
        }
    }
}

async fn delete_confirm<E: Entity>(path: web::Path<u64>, tera: Tera) -> actix_web::Result<HttpResponse> {
    let view = DeleteView::<E>::new(path.into_inner());
    render(&tera, "delete.html", &view.context(), StatusCode::OK)
}

async fn delete<E: Entity, A: EntityApi + 'static>(
    path: web::Path<u64>,
    tera: Tera,
    api: Api<A>,
) -> actix_web::Result<HttpResponse> {
    let id = path.into_inner();
    let mut state = EntityState::<E>::default();
    match state.delete_entity(api.get_ref(), id).await {
        Ok(()) => Ok(redirect(notice_url(&E::META, "deleted", id))),
        Err(err) => {
            let view = DeleteView::with_state(id, state);
            render(&tera, "delete.html", &view.context(), failure_status(&err))
        }
    }
}

fn entity_routes<E: Entity, A: EntityApi + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(&E::META.list_url())
            .service(web::resource("").route(web::get().to(list::<E, A>)))
            .service(
                web::resource("/new")
                    .route(web::get().to(new_form::<E, A>))
                    .route(web::post().to(create::<E, A>)),
            )
            .service(web::resource("/{id}").route(web::get().to(detail::<E, A>)))
            .service(
                web::resource("/{id}/edit")
                    .route(web::get().to(edit_form::<E, A>))
                    .route(web::post().to(update::<E, A>)),
            )
            .service(
                web::resource("/{id}/delete")
                    .route(web::get().to(delete_confirm::<E>))
                    .route(web::post().to(delete::<E, A>)),
            ),
    );
}

/// Mounts the index and the pages of every entity, served from the backend behind `A`.
pub fn configure<A: EntityApi + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index));
    entity_routes::<Contact, A>(cfg);
    entity_routes::<Address, A>(cfg);
    entity_routes::<MovieUser, A>(cfg);
    entity_routes::<SeenMovie, A>(cfg);
    entity_routes::<Movie, A>(cfg);
    entity_routes::<Role, A>(cfg);
}
