//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{AuthService, DynPayOrderTemplateService, DynUserService, Services};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User profile service
    pub user_service: DynUserService,
    /// Pay order template service
    pub pay_order_template_service: DynPayOrderTemplateService,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Build the production state from a connected database and configuration.
    pub fn from_config(database: Arc<Database>, config: &Config) -> Self {
        let services = Services::from_connection(database.get_connection(), config);
        Self::from_services(services, database)
    }

    /// Create state from an already wired service container.
    pub fn from_services(services: Services, database: Arc<Database>) -> Self {
        Self {
            auth_service: services.auth,
            user_service: services.users,
            pay_order_template_service: services.pay_order_templates,
            database,
        }
    }
}
