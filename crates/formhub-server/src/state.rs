//! Shared application state handed to every handler.

use std::sync::Arc;

use formhub_auth::{AuthConfig, AuthService};
use formhub_db::repository::{
    SurrealFormRepository, SurrealRevisionRepository, SurrealSubmissionRepository,
    SurrealUserRepository,
};
use formhub_forms::FormService;
use surrealdb::{Connection, Surreal};

pub type SurrealFormService<C> = FormService<
    SurrealUserRepository<C>,
    SurrealFormRepository<C>,
    SurrealSubmissionRepository<C>,
    SurrealRevisionRepository<C>,
>;

pub struct AppState<C: Connection> {
    pub auth: Arc<AuthService<SurrealUserRepository<C>>>,
    pub forms: Arc<SurrealFormService<C>>,
}

// Manual impl: `C` itself need not be `Clone`.
impl<C: Connection> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            auth: Arc::clone(&self.auth),
            forms: Arc::clone(&self.forms),
        }
    }
}

impl<C: Connection> AppState<C> {
    pub fn new(db: Surreal<C>, auth_config: AuthConfig) -> Self {
        let users = || match auth_config.pepper.clone() {
            Some(pepper) => SurrealUserRepository::with_pepper(db.clone(), pepper),
            None => SurrealUserRepository::new(db.clone()),
        };

        let forms = FormService::new(
            users(),
            SurrealFormRepository::new(db.clone()),
            SurrealSubmissionRepository::new(db.clone()),
            SurrealRevisionRepository::new(db.clone()),
        );
        let auth = AuthService::new(users(), auth_config.clone());

        Self {
            auth: Arc::new(auth),
            forms: Arc::new(forms),
        }
    }
}
