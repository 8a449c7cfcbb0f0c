//! Telecaller dashboard and feedback updates.

use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::error::AppError;
use super::{redirect, telecaller_url};
use crate::{views, AppState};

#[derive(Deserialize)]
struct TelecallerQuery {
    username: String,
}

#[derive(Deserialize)]
struct UpdateLeadForm {
    feedback: String,
    /// Only decides where to redirect; it is not an authenticated identity.
    username: String,
}

/// GET /telecaller?username=... — leads assigned to one user
async fn telecaller_dashboard(
    state: web::Data<AppState>,
    query: web::Query<TelecallerQuery>,
) -> Result<HttpResponse, AppError> {
    let leads = state.db.list_leads_for_username(&query.username)?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(views::telecaller_dashboard(&query.username, &leads)))
}

/// POST /update_lead/{lead_id} — record new feedback, then back to the
/// telecaller's dashboard
async fn update_lead(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    form: web::Form<UpdateLeadForm>,
) -> Result<HttpResponse, AppError> {
    let lead_id = path.into_inner();

    let user = state
        .db
        .get_user_by_username(&form.username)?
        .ok_or_else(|| AppError::NotFound(format!("user '{}' not found", form.username)))?;

    let change = state.db.update_lead_feedback(lead_id, &form.feedback)?;
    log::info!(
        "Lead {} feedback updated by {} (change {})",
        lead_id,
        user.username,
        change.id
    );

    Ok(redirect(&telecaller_url(&user.username)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/telecaller").route(web::get().to(telecaller_dashboard)));
    cfg.service(web::resource("/update_lead/{lead_id}").route(web::post().to(update_lead)));
}
