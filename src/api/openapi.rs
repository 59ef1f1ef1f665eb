//! OpenAPI documentation configuration.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, pay_order_template_handler, user_handler};
use crate::domain::{AuthIdentity, PayOrderTemplate, User};
use crate::services::Registration;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pay Order Service",
        version = "0.1.0",
        description = "User profiles and pay order templates behind a hosted identity provider"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        auth_handler::logout,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::create_user,
        user_handler::update_user,
        user_handler::delete_user,
        pay_order_template_handler::list_templates,
        pay_order_template_handler::get_template,
        pay_order_template_handler::create_template,
        pay_order_template_handler::update_template,
        pay_order_template_handler::delete_template,
    ),
    components(
        schemas(
            AuthIdentity,
            Registration,
            User,
            PayOrderTemplate,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            user_handler::CreateUserRequest,
            user_handler::UpdateUserRequest,
            pay_order_template_handler::CreatePayOrderTemplateRequest,
            pay_order_template_handler::UpdatePayOrderTemplateRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and logout through the identity provider"),
        (name = "Users", description = "User profiles"),
        (name = "Pay order templates", description = "Reusable pay order templates with encrypted banking fields")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
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
                        .description(Some("Access token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_resource_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/api/auth/register",
            "/api/auth/login",
            "/api/auth/logout",
            "/api/users",
            "/api/users/{id}",
            "/api/pay-order-templates",
            "/api/pay-order-templates/{id}",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }
}
