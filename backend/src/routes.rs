use rocket::{State, get, post, serde::json::Json};
use tracing::{debug, instrument};
use shared::{models::{PercentResponse, VoteKind}, Voter};
use crate::{error::ApiError, store::{lock, SharedStore}};

pub struct AppState {
    pub store: SharedStore,
}

impl AppState {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

// Any vote value is accepted; only "1" and "-1" move the tally.
#[instrument(skip(state, voter))]
#[post("/votes/<site>/<vote>")]
pub async fn cast_vote(
    state: &State<AppState>,
    site: &str,
    vote: &str,
    voter: Voter,
) -> Result<Json<PercentResponse>, ApiError> {
    if VoteKind::classify(vote).is_none() {
        debug!(vote, "Accepting vote value that will not be counted");
    }

    let mut store = lock(&state.store)?;
    store.cast_vote(site, &voter.ip, vote);
    Ok(Json(PercentResponse::ok(store.percent(site))))
}

#[get("/votes/<site>")]
pub async fn get_percent(state: &State<AppState>, site: &str) -> Result<Json<PercentResponse>, ApiError> {
    let mut store = lock(&state.store)?;
    Ok(Json(PercentResponse::ok(store.percent(site))))
}
