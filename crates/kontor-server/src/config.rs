use serde::{Deserialize, Serialize};

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    pub url: String,
}

/// Initial admin account to seed on startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialAdminConfig {
    pub email: String,
    pub password: String,
}

/// Auth configuration. The signing secret is mandatory: a server
/// without it cannot issue or verify anything, so boot fails instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub initial_admin: Option<InitialAdminConfig>,
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

/// Where per-client document folders live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadsConfig {
    #[serde(default = "default_upload_dir")]
    pub root_dir: String,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            root_dir: default_upload_dir(),
        }
    }
}

/// Server configuration - loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listen: String, // "0.0.0.0:8080"
    pub db: DbConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub uploads: UploadsConfig,
}

/// Load server config from a YAML file with KONTOR__ env var overrides.
pub fn load_config(path: &str) -> anyhow::Result<ServerConfig> {
    use anyhow::Context;
    let config: ServerConfig = config::Config::builder()
        .add_source(config::File::new(path, config::FileFormat::Yaml))
        .add_source(
            config::Environment::with_prefix("KONTOR")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()
        .with_context(|| format!("Failed to build config from: {}", path))?
        .try_deserialize()
        .with_context(|| format!("Failed to deserialize config from: {}", path))?;

    if config.auth.jwt_secret.trim().is_empty() {
        anyhow::bail!("auth.jwt_secret must not be empty");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
listen: "127.0.0.1:8080"
db:
  url: "postgres://localhost/kontor"
auth:
  jwt_secret: "dev-secret"
"#;

    #[test]
    fn test_parse_minimal_config_applies_defaults() {
        let config: ServerConfig = serde_yml::from_str(MINIMAL).unwrap();
        assert_eq!(config.listen, "127.0.0.1:8080");
        assert_eq!(config.uploads.root_dir, "uploads");
        assert!(config.auth.initial_admin.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
listen: "0.0.0.0:9000"
db:
  url: "postgres://db/kontor"
auth:
  jwt_secret: "s3cret"
  initial_admin:
    email: "admin@example.com"
    password: "changeme123"
uploads:
  root_dir: "/var/lib/kontor/uploads"
"#;
        let config: ServerConfig = serde_yml::from_str(yaml).unwrap();
        let admin = config.auth.initial_admin.unwrap();
        assert_eq!(admin.email, "admin@example.com");
        assert_eq!(config.uploads.root_dir, "/var/lib/kontor/uploads");
    }

    #[test]
    fn test_missing_auth_section_fails() {
        let yaml = r#"
listen: "127.0.0.1:8080"
db:
  url: "postgres://localhost/kontor"
"#;
        assert!(serde_yml::from_str::<ServerConfig>(yaml).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        let config = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.db.url, "postgres://localhost/kontor");
    }

    #[test]
    fn test_load_config_rejects_empty_secret() {
        let yaml = MINIMAL.replace("dev-secret", "  ");
        let mut file = tempfile::NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        let err = load_config(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("jwt_secret"));
    }
}
