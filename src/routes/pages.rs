use askama::Template;
use askama_axum::IntoResponse as AskamaTemplateResponse;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use chrono::NaiveDate;
use tracing::debug;

use crate::{
    error::AppError,
    models::trip::{Trip, TripForm},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(trips_list))
        .route("/trips/new", get(trip_new_form).post(trip_new_submit))
        .route("/trips/:id", get(trip_detail))
}

#[derive(Clone)]
struct TripSummary {
    id: String,
    destination: String,
    dates: String,
}

#[derive(Template)]
#[template(path = "trips_list.html")]
struct TripsListTemplate {
    trips: Vec<TripSummary>,
}

async fn trips_list(State(state): State<AppState>) -> impl IntoResponse {
    let trips = state.storage.list_trips().await;
    let summaries = trips
        .into_iter()
        .map(|trip| TripSummary {
            dates: format!(
                "{} - {}",
                format_date(trip.start_date),
                format_date(trip.end_date)
            ),
            id: trip.id,
            destination: trip.destination,
        })
        .collect();
    AskamaTemplateResponse::into_response(TripsListTemplate { trips: summaries })
}

#[derive(Template)]
#[template(path = "trip_new.html")]
struct TripNewTemplate {
    show_error: bool,
    error_message: String,
    destination: String,
    start_date: String,
    end_date: String,
    image_url: String,
    packing_list: String,
    notes: String,
}

impl TripNewTemplate {
    fn empty() -> Self {
        Self {
            show_error: false,
            error_message: String::new(),
            destination: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            image_url: String::new(),
            packing_list: String::new(),
            notes: String::new(),
        }
    }
}

async fn trip_new_form() -> impl IntoResponse {
    AskamaTemplateResponse::into_response(TripNewTemplate::empty())
}

async fn trip_new_submit(
    State(state): State<AppState>,
    Form(form): Form<TripForm>,
) -> Result<Response, AppError> {
    match form.validate() {
        Ok(fields) => {
            state.storage.append_trip(Trip::new(fields)).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(err) => {
            debug!("trip submission rejected: {err}");
            Ok(render_form_error(form, err.to_string()))
        }
    }
}

fn render_form_error(form: TripForm, message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        AskamaTemplateResponse::into_response(TripNewTemplate {
            show_error: true,
            error_message: message,
            destination: form.destination,
            start_date: form.start_date,
            end_date: form.end_date,
            image_url: form.image_url.unwrap_or_default(),
            packing_list: form.packing_list.unwrap_or_default(),
            notes: form.notes.unwrap_or_default(),
        }),
    )
        .into_response()
}

#[derive(Template)]
#[template(path = "trip_detail.html")]
struct TripDetailTemplate {
    destination: String,
    start: String,
    end: String,
    has_image: bool,
    image_url: String,
    has_notes: bool,
    notes: String,
    packing_items: Vec<String>,
}

async fn trip_detail(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let trip = state
        .storage
        .get_trip(&trip_id)
        .await
        .ok_or(AppError::NotFound)?;
    let packing_items = packing_items(trip.packing_list.as_deref());
    Ok(AskamaTemplateResponse::into_response(TripDetailTemplate {
        start: format_date(trip.start_date),
        end: format_date(trip.end_date),
        has_image: trip.image_url.is_some(),
        image_url: trip.image_url.unwrap_or_default(),
        has_notes: trip.notes.is_some(),
        notes: trip.notes.unwrap_or_default(),
        destination: trip.destination,
        packing_items,
    }))
}

fn packing_items(summary: Option<&str>) -> Vec<String> {
    summary
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}
