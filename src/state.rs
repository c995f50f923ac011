use std::sync::Arc;

use crate::clients::mailer::MailClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, Notifier};

/// Everything a request handler needs, constructed once at startup and
/// injected. There is no process-wide singleton; tests build their own.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub mailer: Arc<MailClient>,

    pub notifier: Notifier,

    pub auth: AuthService,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let mailer = Arc::new(MailClient::new(config.mail.clone())?);
        let notifier = Notifier::new(mailer.clone());

        let auth = AuthService::new(
            &config.auth.jwt_secret,
            config.auth.issuer.clone(),
            config.auth.token_ttl_hours,
        );

        Ok(Self {
            config: Arc::new(config),
            store,
            mailer,
            notifier,
            auth,
        })
    }
}
