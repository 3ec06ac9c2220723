use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::mail::Mailer;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub env: &'static Config,
    pub mailer: Arc<Mailer>,
}

impl AppState {
    pub fn new(db: PgPool, env: &'static Config) -> Self {
        let mailer = Arc::new(Mailer::new(env.mail.clone()));
        Self { db, env, mailer }
    }
}
