//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    accounts, auth, batch, books, categories, checkouts, comments, feedbacks, health, notes, rents,
    shelves, shifts, user_profiles,
};
use crate::models::common::{
    AccountPage, BookPage, CategoryPage, CheckOutPage, CommentPage, FeedbackPage, NotePage, RentPage,
    ShelfPage, ShiftPage, UserProfilePage,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library API",
        version = "1.0.0",
        description = "Lending library administration REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    modifiers(&SecurityAddon),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Accounts
        accounts::list_accounts,
        accounts::get_account,
        accounts::create_account,
        accounts::update_account,
        // Catalog
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        shelves::list_shelves,
        shelves::get_shelf,
        shelves::create_shelf,
        shelves::update_shelf,
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::upload_cover,
        // Readers
        user_profiles::list_profiles,
        user_profiles::get_profile,
        user_profiles::create_profile,
        user_profiles::update_profile,
        user_profiles::upload_avatar,
        // Circulation
        checkouts::list_checkouts,
        checkouts::get_checkout,
        checkouts::create_checkout,
        checkouts::update_checkout,
        checkouts::return_checkout,
        rents::list_rents,
        rents::get_rent,
        rents::create_rent,
        rents::update_rent,
        shifts::list_shifts,
        shifts::get_shift,
        shifts::create_shift,
        shifts::update_shift,
        // Reviews
        comments::list_comments,
        comments::get_comment,
        comments::create_comment,
        comments::update_comment,
        notes::list_notes,
        notes::get_note,
        notes::create_note,
        notes::update_note,
        feedbacks::list_feedbacks,
        feedbacks::get_feedback,
        feedbacks::create_feedback,
        feedbacks::update_feedback,
        feedbacks::reply_feedback,
        // Batch
        batch::apply_action,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::AccountInfo,
            // Accounts
            crate::models::account::Account,
            crate::models::account::CreateAccount,
            crate::models::account::UpdateAccount,
            AccountPage,
            // Shared
            crate::models::Audit,
            crate::models::RecordStatus,
            crate::models::BatchAction,
            crate::models::BatchRequest,
            crate::models::BatchResponse,
            crate::api::ImageUpload,
            // Catalog
            crate::models::category::Category,
            crate::models::category::CreateCategory,
            crate::models::category::UpdateCategory,
            CategoryPage,
            crate::models::shelf::Shelf,
            crate::models::shelf::ShelfDetails,
            crate::models::shelf::CreateShelf,
            crate::models::shelf::UpdateShelf,
            ShelfPage,
            crate::models::book::Book,
            crate::models::book::BookDetails,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::BookStatus,
            BookPage,
            // Readers
            crate::models::user_profile::UserProfile,
            crate::models::user_profile::UserProfileDetails,
            crate::models::user_profile::CreateUserProfile,
            crate::models::user_profile::UpdateUserProfile,
            crate::models::Sex,
            UserProfilePage,
            // Circulation
            crate::models::checkout::CheckOut,
            crate::models::checkout::CheckOutDetails,
            crate::models::checkout::CreateCheckOut,
            crate::models::checkout::UpdateCheckOut,
            crate::models::CheckOutType,
            CheckOutPage,
            crate::models::rent::Rent,
            crate::models::rent::RentDetails,
            crate::models::rent::CreateRent,
            crate::models::rent::UpdateRent,
            crate::models::PayStatus,
            RentPage,
            crate::models::shift::Shift,
            crate::models::shift::ShiftDetails,
            crate::models::shift::CreateShift,
            crate::models::shift::UpdateShift,
            crate::models::ShiftStatus,
            ShiftPage,
            // Reviews
            crate::models::comment::Comment,
            crate::models::comment::CommentDetails,
            crate::models::comment::CreateComment,
            crate::models::comment::UpdateComment,
            CommentPage,
            crate::models::note::Note,
            crate::models::note::NoteDetails,
            crate::models::note::CreateNote,
            crate::models::note::UpdateNote,
            NotePage,
            crate::models::feedback::Feedback,
            crate::models::feedback::FeedbackDetails,
            crate::models::feedback::CreateFeedback,
            crate::models::feedback::UpdateFeedback,
            crate::models::feedback::ReplyFeedback,
            FeedbackPage,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "accounts", description = "Login accounts (superuser only)"),
        (name = "catalog", description = "Categories, shelves and books"),
        (name = "readers", description = "Reader profiles"),
        (name = "circulation", description = "Checkouts, rents and shifts"),
        (name = "reviews", description = "Comments, reading notes and feedback"),
        (name = "batch", description = "Bulk enable/disable")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_admin_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        for path in [
            "/auth/login",
            "/books/{id}/cover",
            "/user_profiles/{id}/avatar",
            "/checkouts/{id}/return",
            "/feedbacks/{id}/reply",
            "/batch/{resource}/{action}",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
        let components = doc.components.as_ref().unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(components.schemas.contains_key("ImageUpload"));
    }
}
