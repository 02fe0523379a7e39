use actix_web::{http::header, web, HttpResponse};
use crate::models::CallbackQuery;
use crate::routes::AppState;

/// Configure the browser-facing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/", web::get().to(index))
        .route("/login", web::get().to(login))
        .route("/callback", web::get().to(callback))
        .route("/wrapped", web::get().to(wrapped_page))
        .route("/similar", web::get().to(similar_page));
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Minimal page shell; the data comes from the JSON API
fn page(title: &str, endpoints: &[&str]) -> HttpResponse {
    let links: String = endpoints
        .iter()
        .map(|e| format!(r#"<li><a href="{0}">{0}</a></li>"#, e))
        .collect();

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
<nav><a href="/">Now Playing</a> | <a href="/wrapped">Wrapped</a> | <a href="/similar">Similar</a></nav>
<h1>{title}</h1>
<ul>{links}</ul>
</body>
</html>"#
    );

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

async fn index(state: web::Data<AppState>) -> HttpResponse {
    if state.auth.cached_token().await.is_none() {
        return redirect("/login");
    }
    page("Dashboard", &["/api/now", "/api/mood"])
}

async fn wrapped_page(state: web::Data<AppState>) -> HttpResponse {
    if state.auth.cached_token().await.is_none() {
        return redirect("/login");
    }
    page("Wrapped", &["/api/wrapped"])
}

async fn similar_page(state: web::Data<AppState>) -> HttpResponse {
    if state.auth.cached_token().await.is_none() {
        return redirect("/login");
    }
    page("Similar Tracks", &["/api/similar"])
}

/// Redirect to the Spotify consent screen
async fn login(state: web::Data<AppState>) -> HttpResponse {
    redirect(&state.auth.authorize_url())
}

/// OAuth callback: exchange the code and go back to the dashboard
async fn callback(state: web::Data<AppState>, query: web::Query<CallbackQuery>) -> HttpResponse {
    if let Some(error) = &query.error {
        tracing::warn!("Authorization denied: {}", error);
        return redirect("/login");
    }

    let Some(code) = query.code.as_deref() else {
        return redirect("/login");
    };

    match state.auth.exchange_code(code).await {
        Ok(_) => redirect("/"),
        Err(e) => {
            tracing::error!("Failed to exchange authorization code: {}", e);
            redirect("/login")
        }
    }
}
