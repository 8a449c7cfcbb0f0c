use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};

use crate::views;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)));
}

/// GET / — landing page
async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(views::index_page())
}
