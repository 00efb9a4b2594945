//! Server-rendered pages: staff login and the return desk

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use maud::{html, Markup, DOCTYPE};
use serde::Deserialize;

use crate::{config::SiteConfig, error::AppError, AppState};

pub const LOGIN_PATH: &str = "/admin/login";
pub const RETURN_PATH: &str = "/return";

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

/// Only same-site absolute paths are followed after login
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => RETURN_PATH,
    }
}

fn layout(site: &SiteConfig, title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (title) " | " (site.title) }
            }
            body {
                header {
                    h1 { a href="/" { (site.header) } }
                }
                main {
                    h2 { (title) }
                    (body)
                }
            }
        }
    }
}

pub fn login_page(site: &SiteConfig, next: &str, error: Option<&str>) -> Markup {
    layout(
        site,
        "Log in",
        html! {
            @if let Some(message) = error {
                p class="errornote" { (message) }
            }
            form method="post" action=(LOGIN_PATH) {
                input type="hidden" name="next" value=(next);
                p {
                    label for="id_username" { "Username:" }
                    input type="text" name="username" id="id_username" autofocus required;
                }
                p {
                    label for="id_password" { "Password:" }
                    input type="password" name="password" id="id_password" required;
                }
                input type="submit" value="Log in";
            }
        },
    )
}

pub fn return_page(site: &SiteConfig, username: &str) -> Markup {
    layout(
        site,
        "Return a book",
        html! {
            nav {
                a href="/" { (site.index_title) }
                " / Return a book"
                span class="user" {
                    " Welcome, " strong { (username) } ". "
                    a href="/admin/logout" { "Log out" }
                }
            }
            form id="return-form" {
                p {
                    label for="id_checkout" { "Checkout:" }
                    input type="number" name="checkout" id="id_checkout" min="1" required;
                }
                input type="submit" value="Return";
            }
            p class="help" {
                "Returned checkouts are closed through "
                code { "POST /api/v1/checkouts/{id}/return" }
                "."
            }
        },
    )
}

/// `GET /`: straight to the login page
pub async fn index() -> Redirect {
    Redirect::to(LOGIN_PATH)
}

/// `GET /admin/login`
pub async fn login_form(State(state): State<AppState>, Query(query): Query<NextQuery>) -> Markup {
    login_page(&state.config.site, safe_next(query.next.as_deref()), None)
}

/// `POST /admin/login`: staff only, sets the session cookie
pub async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let next = safe_next(form.next.as_deref()).to_string();

    match state
        .services
        .auth
        .authenticate_staff(&form.username, &form.password)
        .await
    {
        Ok((token, _)) => {
            let cookie = Cookie::build((state.config.auth.session_cookie.clone(), token))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax);
            Ok((jar.add(cookie), Redirect::to(&next)).into_response())
        }
        Err(AppError::Authentication(_)) | Err(AppError::Authorization(_)) => Ok(login_page(
            &state.config.site,
            &next,
            Some("Please enter the correct username and password for a staff account."),
        )
        .into_response()),
        Err(e) => Err(e),
    }
}

/// `GET /admin/logout`
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let cookie = Cookie::build((state.config.auth.session_cookie.clone(), "")).path("/");
    (jar.remove(cookie), Redirect::to(LOGIN_PATH))
}

/// `GET /return`: login required
pub async fn return_book(State(state): State<AppState>, jar: CookieJar) -> Result<Response, AppError> {
    let login = format!("{}?next={}", LOGIN_PATH, RETURN_PATH);

    let Some(token) = jar.get(&state.config.auth.session_cookie).map(|c| c.value().to_string()) else {
        return Ok(Redirect::to(&login).into_response());
    };

    let claims = match state.services.auth.verify_token(&token).await {
        Ok(claims) if claims.require_staff().is_ok() => claims,
        Ok(_) | Err(AppError::Authentication(_)) => return Ok(Redirect::to(&login).into_response()),
        Err(e) => return Err(e),
    };

    Ok(return_page(&state.config.site, &claims.sub).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next(None), "/return");
        assert_eq!(safe_next(Some("/books")), "/books");
        assert_eq!(safe_next(Some("//evil.example")), "/return");
        assert_eq!(safe_next(Some("https://evil.example")), "/return");
    }

    #[test]
    fn test_pages_render_site_context() {
        let site = SiteConfig::default();

        let login = login_page(&site, "/return", Some("Wrong password")).into_string();
        assert!(login.contains("Library Administration"));
        assert!(login.contains(r#"name="next" value="/return""#));
        assert!(login.contains("Wrong password"));

        let page = return_page(&site, "librarian").into_string();
        assert!(page.contains("<title>Return a book | Library</title>"));
        assert!(page.contains("librarian"));
        assert!(page.contains(&site.index_title));
    }
}
