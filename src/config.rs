use serde::Deserialize;

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub mongo_uri: String,
    pub db_name: String,
    pub collection_name: String,
    pub port: u16,
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// A local `.env` file is read first; variables already set in the
    /// environment take precedence over it.
    pub fn from_env() -> anyhow::Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("No .env file loaded: {}", e);
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            mongo_uri: lookup("MONGO_URI")
                .filter(|uri| !uri.trim().is_empty())
                .ok_or_else(|| {
                    anyhow::anyhow!("You must set your 'MONGO_URI' environment variable")
                })
                .and_then(|uri| {
                    if !uri.starts_with("mongodb://") && !uri.starts_with("mongodb+srv://") {
                        anyhow::bail!("MONGO_URI must start with mongodb:// or mongodb+srv://");
                    }
                    Ok(uri)
                })?,
            db_name: lookup("DB_NAME").unwrap_or_default(),
            collection_name: lookup("COLLECTION_NAME").unwrap_or_default(),
            port: match lookup("PORT").filter(|p| !p.trim().is_empty()) {
                Some(port) => port
                    .trim()
                    .parse()
                    .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
                None => DEFAULT_PORT,
            },
        };

        if config.db_name.is_empty() {
            tracing::warn!("DB_NAME is not set; writes will target an unnamed database");
        }
        if config.collection_name.is_empty() {
            tracing::warn!("COLLECTION_NAME is not set; writes will target an unnamed collection");
        }

        // Credentials live in the URI, so only its prefix is logged.
        tracing::debug!(
            "Mongo URI: {}...",
            config.mongo_uri.chars().take(14).collect::<String>()
        );
        tracing::debug!(
            "Target collection: {}.{}",
            config.db_name,
            config.collection_name
        );
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_lookup(lookup_from(&[
            ("MONGO_URI", "mongodb://localhost:27017"),
            ("DB_NAME", "techathon_db"),
            ("COLLECTION_NAME", "global_vectors"),
            ("PORT", "9090"),
        ]))
        .unwrap();

        assert_eq!(config.mongo_uri, "mongodb://localhost:27017");
        assert_eq!(config.db_name, "techathon_db");
        assert_eq!(config.collection_name, "global_vectors");
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn test_missing_uri_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[("DB_NAME", "db")])).unwrap_err();
        assert!(err.to_string().contains("MONGO_URI"));

        assert!(Config::from_lookup(lookup_from(&[("MONGO_URI", "   ")])).is_err());
    }

    #[test]
    fn test_uri_scheme_checked() {
        assert!(Config::from_lookup(lookup_from(&[("MONGO_URI", "postgres://x")])).is_err());
        assert!(
            Config::from_lookup(lookup_from(&[("MONGO_URI", "mongodb+srv://cluster.example")]))
                .is_ok()
        );
    }

    #[test]
    fn test_port_defaults_and_validation() {
        let config =
            Config::from_lookup(lookup_from(&[("MONGO_URI", "mongodb://localhost")])).unwrap();
        assert_eq!(config.port, 8080);
        assert!(config.db_name.is_empty());
        assert!(config.collection_name.is_empty());

        let err = Config::from_lookup(lookup_from(&[
            ("MONGO_URI", "mongodb://localhost"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
