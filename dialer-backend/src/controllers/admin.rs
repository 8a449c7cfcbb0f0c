//! Admin dashboard, lead creation, and the feedback report download.

use actix_web::http::header::{ContentDisposition, ContentType, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::error::AppError;
use super::redirect;
use crate::models::UserRole;
use crate::{report, views, AppState};

#[derive(Deserialize)]
struct AddLeadForm {
    lead_name: String,
    assigned_to: i64,
}

/// GET /admin — every lead plus the telecallers they can be assigned to
async fn admin_dashboard(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let leads = state.db.list_leads()?;
    let telecallers = state.db.list_users_by_role(UserRole::TELECALLER)?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(views::admin_dashboard(&leads, &telecallers)))
}

/// POST /add_lead — create a lead, then back to the dashboard
async fn add_lead(
    state: web::Data<AppState>,
    form: web::Form<AddLeadForm>,
) -> Result<HttpResponse, AppError> {
    let lead_name = form.lead_name.trim();
    if lead_name.is_empty() {
        return Err(AppError::BadRequest("lead_name must not be empty".to_string()));
    }

    let lead = state.db.create_lead(lead_name, form.assigned_to)?;
    log::info!(
        "Created lead {} ({:?}) assigned to user {}",
        lead.id,
        lead.lead_name,
        form.assigned_to
    );

    Ok(redirect("/admin"))
}

/// GET /generate_report — change history as an .xlsx attachment
async fn generate_report(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let rows = state.db.feedback_report_rows()?;
    let workbook = report::build_feedback_report(&rows)?;
    log::info!(
        "Generated feedback report: {} rows, {} bytes",
        rows.len(),
        workbook.len()
    );

    Ok(HttpResponse::Ok()
        .content_type(report::XLSX_CONTENT_TYPE)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(report::REPORT_FILENAME.to_string())],
        })
        .body(workbook))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/admin").route(web::get().to(admin_dashboard)));
    cfg.service(web::resource("/add_lead").route(web::post().to(add_lead)));
    cfg.service(web::resource("/generate_report").route(web::get().to(generate_report)));
}
