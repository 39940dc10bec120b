use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::cli::ConnectionArgs;

pub const CONFIG_FILENAME: &str = ".polaris.toml";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8181;

/// Connection settings persisted by `polaris init`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

pub const CLIENT_ID_ENV: &str = "CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "CLIENT_SECRET";

impl Config {
    /// Write the file readable by the owner only; it may hold a client secret
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        // mode() only applies on creation; tighten a file being overwritten
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
        }

        file.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Settings taken from command-line flags
    pub fn from_args(args: &ConnectionArgs) -> Self {
        Self {
            base_url: args.base_url.clone(),
            host: args.host.clone(),
            port: args.port,
            client_id: args.client_id.clone(),
            client_secret: args.client_secret.clone(),
        }
    }
}

fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILENAME)];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(CONFIG_FILENAME));
    }
    paths
}

pub fn load_config_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let content = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.as_ref().display()))?;
    Ok(config)
}

/// Load the first config file found in the working directory or the home
/// directory. `None` only when neither exists; a file that cannot be read or
/// parsed is an error.
pub fn load_optional() -> Result<Option<Config>> {
    load_first(&config_search_paths())
}

fn load_first(paths: &[PathBuf]) -> Result<Option<Config>> {
    match paths.iter().find(|p| p.exists()) {
        Some(path) => load_config_from_path(path).map(Some),
        None => Ok(None),
    }
}

/// How requests are authenticated
#[derive(Debug, Clone, PartialEq)]
pub enum Credentials {
    AccessToken(String),
    ClientCredentials {
        client_id: String,
        client_secret: String,
    },
}

/// Fully resolved connection settings
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub base_url: String,
    pub credentials: Credentials,
}

/// Merge flags, `CLIENT_ID`/`CLIENT_SECRET` and the config file, in that
/// order. `--base-url` cannot be combined with `--host`/`--port`, and
/// `--access-token` cannot be combined with `--client-id`/`--client-secret`.
/// The environment is only consulted when no access token was given.
pub fn resolve_connection(args: &ConnectionArgs, file: Option<&Config>) -> Result<Connection> {
    resolve_connection_with_env(args, file, |name| std::env::var(name).ok())
}

fn resolve_connection_with_env(
    args: &ConnectionArgs,
    file: Option<&Config>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Connection> {
    if args.base_url.is_some() && (args.host.is_some() || args.port.is_some()) {
        bail!("Please provide either --base-url or --host/--port, but not both");
    }

    if args.access_token.is_some() && (args.client_id.is_some() || args.client_secret.is_some()) {
        bail!(
            "Please provide credentials via either --client-id & --client-secret or --access-token, but not both"
        );
    }

    let file = file.cloned().unwrap_or_default();

    // Explicit host/port flags take precedence over a base_url from the file
    let base_url = match (&args.base_url, &args.host, args.port) {
        (Some(url), _, _) => url.clone(),
        (None, None, None) if file.base_url.is_some() => file.base_url.clone().unwrap_or_default(),
        (None, host, port) => {
            let host = host
                .clone()
                .or(file.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string());
            let port = port.or(file.port).unwrap_or(DEFAULT_PORT);
            format!("http://{}:{}", host, port)
        }
    };

    let credentials = if let Some(token) = &args.access_token {
        Credentials::AccessToken(token.clone())
    } else {
        let client_id = args
            .client_id
            .clone()
            .or_else(|| env(CLIENT_ID_ENV))
            .or(file.client_id);
        let client_secret = args
            .client_secret
            .clone()
            .or_else(|| env(CLIENT_SECRET_ENV))
            .or(file.client_secret);
        match (client_id, client_secret) {
            (Some(client_id), Some(client_secret)) => Credentials::ClientCredentials {
                client_id,
                client_secret,
            },
            _ => bail!(
                "Missing credentials: provide --client-id and --client-secret \
                (or CLIENT_ID / CLIENT_SECRET), --access-token, or run 'polaris init'"
            ),
        }
    };

    Ok(Connection {
        base_url: base_url.trim_end_matches('/').to_string(),
        credentials,
    })
}
