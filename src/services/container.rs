//! Service Container - wires every use case from configuration and a database.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::auth_service::DynUserService;
use super::{AuthService, Authenticator, CrudService, PayOrderTemplateService, UserService};
use crate::config::Config;
use crate::domain::{CreatePayOrderTemplateDto, PayOrderTemplate, UpdatePayOrderTemplateDto};
use crate::infra::cipher::FieldCipher;
use crate::infra::repositories::{
    PayOrderTemplateResource, PayOrderTemplateTable, UserResource, UserTable,
};
use crate::infra::{IdentityProvider, SupabaseIdentity};

pub type DynPayOrderTemplateService = Arc<
    dyn CrudService<
        Entity = PayOrderTemplate,
        Create = CreatePayOrderTemplateDto,
        Update = UpdatePayOrderTemplateDto,
    >,
>;

/// Every application service, shared behind `Arc`.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthService>,
    pub users: DynUserService,
    pub pay_order_templates: DynPayOrderTemplateService,
}

impl Services {
    pub fn new(
        auth: Arc<dyn AuthService>,
        users: DynUserService,
        pay_order_templates: DynPayOrderTemplateService,
    ) -> Self {
        Self {
            auth,
            users,
            pay_order_templates,
        }
    }

    /// Build the production graph: SeaORM tables, Supabase identity and the
    /// field cipher keyed from configuration.
    pub fn from_connection(db: DatabaseConnection, config: &Config) -> Self {
        let identity: Arc<dyn IdentityProvider> = Arc::new(SupabaseIdentity::from_config(config));
        Self::with_identity(db, identity, config)
    }

    /// Same as [`Services::from_connection`] with a caller-supplied identity provider.
    pub fn with_identity(
        db: DatabaseConnection,
        identity: Arc<dyn IdentityProvider>,
        config: &Config,
    ) -> Self {
        let cipher = Arc::new(FieldCipher::new(config.key_material()));

        let users: DynUserService = Arc::new(UserService::new(
            UserResource,
            Arc::new(UserTable::new(db.clone())),
        ));
        let pay_order_templates: DynPayOrderTemplateService = Arc::new(PayOrderTemplateService::new(
            PayOrderTemplateResource::new(cipher),
            Arc::new(PayOrderTemplateTable::new(db)),
        ));
        let auth = Arc::new(Authenticator::new(identity, users.clone(), config));

        Self::new(auth, users, pay_order_templates)
    }
}
