mod api;
mod config;
mod date;
mod model;
mod routes;
mod state;
mod templates;
mod view;

use actix_web::{middleware::Logger, web, App, HttpServer};
use api::RestClient;
use config::Config;
use log::info;
use std::io;

fn invalid_input<E: std::error::Error + Send + Sync + 'static>(err: E) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, err)
}

#[actix_rt::main]
async fn main() -> io::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("movies_admin=debug,actix_web=info"),
    )
    .init();

    let config = Config::from_env().map_err(invalid_input)?;
    let tera = web::Data::new(templates::load().map_err(invalid_input)?);
    let api = web::Data::new(RestClient::new(&config.api_url, config.api_timeout).map_err(invalid_input)?);
    let dates = web::Data::new(config.dates.clone());

    info!("serving admin pages on {} against {}", config.bind, config.api_url);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(tera.clone())
            .app_data(dates.clone())
            .app_data(api.clone())
            .configure(routes::configure::<RestClient>)
    })
    .bind(&config.bind)?
    .run()
    .await
}
