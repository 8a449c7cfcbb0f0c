pub mod admin;
pub mod error;
pub mod health;
pub mod pages;
pub mod telecaller;

use actix_web::http::header;
use actix_web::{web, HttpResponse};

/// Register every route plus the extractor configs that turn malformed
/// form/query input into 400 responses.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::FormConfig::default().error_handler(error::form_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler));

    health::config(cfg);
    pages::config(cfg);
    admin::config(cfg);
    telecaller::config(cfg);
}

/// 302 redirect, as a browser form submission expects.
pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Link to a telecaller's dashboard.
pub(crate) fn telecaller_url(username: &str) -> String {
    format!("/telecaller?username={}", urlencoding::encode(username))
}

#[cfg(test)]
pub(crate) mod test_support {
    use actix_web::web;
    use std::sync::Arc;

    use crate::db::Database;
    use crate::AppState;

    pub fn app_state(db: Database) -> web::Data<AppState> {
        web::Data::new(AppState { db: Arc::new(db) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telecaller_url_is_encoded() {
        assert_eq!(telecaller_url("alice"), "/telecaller?username=alice");
        assert_eq!(telecaller_url("a b&c"), "/telecaller?username=a%20b%26c");
    }
}
