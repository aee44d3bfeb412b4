use std::sync::Arc;

use anyhow::Context;
use mongodb::Client;
use tracing::info;

use crate::auth::{
    google::{GoogleProvider, IdentityProvider},
    jwt::TokenIssuer,
};
use crate::config::{AppConfig, StoreBackend};
use crate::products::repo_types::Product;
use crate::store::{InMemoryRepository, MongoRepository, Repository};
use crate::users::repo_types::User;

const DEFAULT_DATABASE: &str = "easystore";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn Repository<User>>,
    pub products: Arc<dyn Repository<Product>>,
    pub tokens: TokenIssuer,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let (users, products): (Arc<dyn Repository<User>>, Arc<dyn Repository<Product>>) =
            match config.store_backend {
                StoreBackend::Mongodb => {
                    let uri = config
                        .database_url
                        .as_deref()
                        .context("MONGODB_URI must be set")?;
                    let client = Client::with_uri_str(uri)
                        .await
                        .context("connect to mongodb")?;
                    let db = match &config.database_name {
                        Some(name) => client.database(name),
                        None => client
                            .default_database()
                            .unwrap_or_else(|| client.database(DEFAULT_DATABASE)),
                    };
                    info!(database = %db.name(), "using mongodb store");
                    (
                        Arc::new(MongoRepository::<User>::new(db.clone())),
                        Arc::new(MongoRepository::<Product>::new(db)),
                    )
                }
                StoreBackend::Memory => {
                    info!("using in-memory store");
                    (
                        Arc::new(InMemoryRepository::<User>::new()),
                        Arc::new(InMemoryRepository::<Product>::new()),
                    )
                }
            };

        let tokens = TokenIssuer::new(&config.jwt);
        let identity = Arc::new(GoogleProvider::new(config.google.clone()));

        Ok(Self::from_parts(config, users, products, tokens, identity))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn Repository<User>>,
        products: Arc<dyn Repository<Product>>,
        tokens: TokenIssuer,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            config,
            users,
            products,
            tokens,
            identity,
        }
    }
}
