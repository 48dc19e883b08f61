pub mod catchers;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod routes;
pub mod store;

use std::sync::Arc;
use rocket::{catchers, routes, Build, Rocket};
use crate::{
    catchers::{internal_error, not_found, unprocessable},
    config::Config,
    lifecycle::{Lifecycle, Persistence},
    routes::{cast_vote, get_percent, AppState},
};

pub use shared::{models::*, VoteStore};

pub fn build_rocket(config: &Config, lifecycle: Arc<Lifecycle>) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("address", config.address))
        .merge(("port", config.port));

    rocket::custom(figment)
        .attach(Persistence::new(Arc::clone(&lifecycle), config.rotation_interval))
        .manage(AppState::new(lifecycle.store()))
        .mount("/", routes![cast_vote, get_percent])
        .register("/", catchers![not_found, unprocessable, internal_error])
}
