use std::net::SocketAddr;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Mongodb,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub database_name: Option<String>,
    pub jwt: JwtConfig,
    pub google: GoogleConfig,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend = match var("STORE_BACKEND").as_deref() {
            None | Some("mongodb") | Some("mongo") => StoreBackend::Mongodb,
            Some("memory") => StoreBackend::Memory,
            Some(other) => anyhow::bail!("unknown STORE_BACKEND: {other}"),
        };

        let database_url = var("MONGODB_URI");
        if store_backend == StoreBackend::Mongodb && database_url.is_none() {
            anyhow::bail!("MONGODB_URI must be set when STORE_BACKEND is mongodb");
        }

        let public_url = var("PUBLIC_URL")
            .or_else(|| var("RENDER_URL"))
            .unwrap_or_else(|| "http://localhost:3000".into());

        let jwt = JwtConfig {
            secret: var("JWT_SECRET").context("JWT_SECRET must be set")?,
        };
        let google = GoogleConfig {
            client_id: var("GOOGLE_CLIENT_ID").context("GOOGLE_CLIENT_ID must be set")?,
            client_secret: var("GOOGLE_CLIENT_SECRET")
                .context("GOOGLE_CLIENT_SECRET must be set")?,
            callback_url: format!("{}/auth/google/callback", public_url.trim_end_matches('/')),
        };

        let port = var("APP_PORT")
            .or_else(|| var("PORT"))
            .map(|v| v.parse::<u16>())
            .transpose()
            .context("APP_PORT must be a port number")?
            .unwrap_or(3000);

        Ok(Self {
            store_backend,
            database_url,
            database_name: var("MONGODB_DATABASE"),
            jwt,
            google,
            host: var("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
        })
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .context("APP_HOST/APP_PORT do not form a socket address")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_vars(|key| vars.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("JWT_SECRET", "s3cret"),
        ("GOOGLE_CLIENT_ID", "client-id"),
        ("GOOGLE_CLIENT_SECRET", "client-secret"),
    ];

    #[test]
    fn defaults_for_memory_backend() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("STORE_BACKEND", "memory"));
        let cfg = config_from(&pairs).expect("config");
        assert_eq!(cfg.store_backend, StoreBackend::Memory);
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(
            cfg.google.callback_url,
            "http://localhost:3000/auth/google/callback"
        );
    }

    #[test]
    fn mongodb_backend_requires_uri() {
        let err = config_from(&REQUIRED).unwrap_err();
        assert!(err.to_string().contains("MONGODB_URI"));
    }

    #[test]
    fn render_url_and_port_fallbacks() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("MONGODB_URI", "mongodb://localhost:27017/shop"),
            ("RENDER_URL", "https://shop.onrender.com/"),
            ("PORT", "10000"),
        ]);
        let cfg = config_from(&pairs).expect("config");
        assert_eq!(cfg.store_backend, StoreBackend::Mongodb);
        assert_eq!(cfg.port, 10000);
        assert_eq!(
            cfg.google.callback_url,
            "https://shop.onrender.com/auth/google/callback"
        );
        assert_eq!(cfg.listen_addr().unwrap().port(), 10000);
    }

    #[test]
    fn missing_jwt_secret_is_rejected() {
        let err = config_from(&[
            ("STORE_BACKEND", "memory"),
            ("GOOGLE_CLIENT_ID", "id"),
            ("GOOGLE_CLIENT_SECRET", "secret"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("STORE_BACKEND", "postgres"));
        assert!(config_from(&pairs).is_err());
    }
}
