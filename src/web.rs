use actix_files::Files;
use actix_web::{http::header, middleware, web, App, HttpResponse, HttpServer, Result};
use chrono::Datelike;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::asf::{weekly_overview, BoardScheduler};
use crate::gallery::content::MISSING_STEPS_MESSAGE;
use crate::gallery::timeline::{markers, ticks, Marker, Tick};
use crate::gallery::types::RatingFeedback;
use crate::gallery::{AnalysisContent, AnalysisStep, Catalog, ContentRegistry, Exercise, PageEntry, PrintSheet, Route};
use crate::pages;

pub struct AppState {
    pub catalog: Catalog,
    pub registry: ContentRegistry,
    pub board: BoardScheduler,
}

#[derive(Deserialize)]
pub struct GalleryQuery {
    q: Option<String>,
    /// Location fragment forwarded by the gallery page
    view: Option<String>,
}

/// Kept as raw strings so malformed values fall back instead of failing extraction
#[derive(Deserialize)]
pub struct ExerciseQuery {
    step: Option<String>,
    rating: Option<String>,
    hints: Option<String>,
    help: Option<String>,
}

#[derive(Deserialize)]
pub struct BoardQuery {
    /// Alert count shown by the previous render of the board page
    seen: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

#[derive(Serialize)]
pub struct TimelineResponse<'a> {
    ticks: Vec<Tick>,
    markers: Vec<Marker<'a>>,
}

#[derive(Serialize)]
pub struct AnalysisResponse<'a> {
    artist: &'a str,
    feedback: &'a RatingFeedback,
    steps: &'a [AnalysisStep],
}

/// Rebuilds the exercise from query parameters. Invalid values fall back to the defaults.
fn exercise_from(query: &ExerciseQuery, content: Option<&AnalysisContent>) -> Exercise {
    let mut exercise = Exercise::new();
    let step = query.step.as_deref().and_then(|s| s.trim().parse::<usize>().ok());
    if let (Some(step), Some(content)) = (step, content) {
        exercise.goto(step, content);
    }
    if let Some(rating) = query.rating.as_deref().and_then(|r| r.parse().ok()) {
        exercise.choose(rating);
    }
    if is_flag_set(query.hints.as_deref()) {
        exercise.toggle_hints();
    }
    if is_flag_set(query.help.as_deref()) {
        exercise.toggle_writing_help();
    }
    exercise
}

/// `1` (or any other non-zero number) turns a toggle on; anything else leaves it off
fn is_flag_set(value: Option<&str>) -> bool {
    value
        .and_then(|v| v.trim().parse::<u8>().ok())
        .is_some_and(|v| v != 0)
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type("text/html; charset=utf-8").body(body)
}

fn find_page<'a>(state: &'a AppState, path: &str) -> Result<&'a PageEntry> {
    state
        .catalog
        .find_by_path(path)
        .ok_or_else(|| actix_web::error::ErrorNotFound(format!("Unknown page {}", path)))
}

// HTML page handlers
async fn gallery(query: web::Query<GalleryQuery>, state: web::Data<AppState>) -> Result<HttpResponse> {
    if let Some(fragment) = &query.view {
        if let Route::Detail(page) = Route::parse(fragment, &state.catalog) {
            return Ok(HttpResponse::SeeOther()
                .insert_header((header::LOCATION, format!("/view/{}", page.path)))
                .finish());
        }
    }
    let year = state.board.now().year();
    Ok(html(pages::render_gallery(
        &state.catalog,
        query.q.as_deref().unwrap_or(""),
        year,
    )))
}

async fn detail(
    path: web::Path<String>,
    query: web::Query<ExerciseQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let page = find_page(&state, &path)?;
    let content = state.registry.content_for(page);
    if let Err(e) = &content {
        warn!("Cannot show analysis for {}: {}", page.id, e);
    }
    let exercise = exercise_from(&query, content.as_ref().ok());
    Ok(html(pages::render_detail(page, content.as_ref(), &exercise)))
}

async fn print_sheet(
    path: web::Path<String>,
    query: web::Query<ExerciseQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let page = find_page(&state, &path)?;
    match state.registry.content_for(page) {
        Ok(content) => {
            let exercise = exercise_from(&query, Some(&content));
            let sheet = PrintSheet::build(page, &content, &exercise, state.board.now().date());
            Ok(html(pages::render_print(&sheet)))
        }
        Err(e) => {
            warn!("Cannot print analysis for {}: {}", page.id, e);
            Ok(HttpResponse::NotFound().body(MISSING_STEPS_MESSAGE))
        }
    }
}

async fn board_page(query: web::Query<BoardQuery>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let seen = query.seen.as_deref().and_then(|s| s.trim().parse::<u64>().ok());
    let snapshot = state.board.snapshot().await;
    Ok(html(pages::render_board(&snapshot, state.board.schedule(), seen)))
}

// JSON endpoints
async fn get_pages(query: web::Query<SearchQuery>, state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.catalog.displayed_pages(query.q.as_deref().unwrap_or(""))))
}

async fn get_timeline(state: web::Data<AppState>) -> Result<HttpResponse> {
    let year = state.board.now().year();
    Ok(HttpResponse::Ok().json(TimelineResponse {
        ticks: ticks(year),
        markers: markers(&state.catalog.pages, year),
    }))
}

async fn get_analysis(path: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let page = find_page(&state, &path)?;
    match state.registry.content_for(page) {
        Ok(content) => Ok(HttpResponse::Ok().json(AnalysisResponse {
            artist: &content.artist,
            feedback: &content.feedback,
            steps: &content.steps,
        })),
        Err(e) => {
            warn!("Cannot load analysis for {}: {}", page.id, e);
            Ok(HttpResponse::NotFound().json(serde_json::json!({"error": MISSING_STEPS_MESSAGE})))
        }
    }
}

async fn get_board_status(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.board.snapshot().await))
}

async fn get_week(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(weekly_overview(state.board.schedule())))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(gallery))
        .route("/view/{path:.*}", web::get().to(detail))
        .route("/print/{path:.*}", web::get().to(print_sheet))
        .route("/asf", web::get().to(board_page))
        .route("/api/pages", web::get().to(get_pages))
        .route("/api/timeline", web::get().to(get_timeline))
        .route("/api/analysis/{path:.*}", web::get().to(get_analysis))
        .route("/api/asf/status", web::get().to(get_board_status))
        .route("/api/asf/schedule", web::get().to(get_week));
}

pub async fn start_server(bind: &str, port: u16, state: AppState) -> std::io::Result<()> {
    let app_state = web::Data::new(state);
    info!("Serving {} pages on http://{}:{}", app_state.catalog.pages.len(), bind, port);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", "static"))
            .service(Files::new("/assets", "assets"))
            .configure(configure)
    })
    .bind((bind, port))?
    .run()
    .await
}
