use anyhow::{bail, Result};
use std::path::Path;

use crate::cli::config::{Config, CONFIG_FILENAME};
use crate::cli::{ConnectionArgs, InitArgs};

pub fn execute_init(args: &InitArgs, connection: &ConnectionArgs) -> Result<()> {
    init_at(Path::new(CONFIG_FILENAME), args, connection)
}

fn init_at(path: &Path, args: &InitArgs, connection: &ConnectionArgs) -> Result<()> {
    if path.exists() && !args.force {
        bail!("{} already exists. Use --force to overwrite.", path.display());
    }
    if connection.base_url.is_some() && (connection.host.is_some() || connection.port.is_some()) {
        bail!("Please provide either --base-url or --host/--port, but not both");
    }
    if connection.access_token.is_some() {
        eprintln!("Note: --access-token is not saved; tokens expire");
    }

    let config = Config::from_args(connection);
    config.save_to(path)?;

    eprintln!("Created {}", path.display());
    if let Some(ref url) = config.base_url {
        eprintln!("  base_url: {}", url);
    }
    if let Some(ref host) = config.host {
        eprintln!("  host: {}", host);
    }
    if let Some(port) = config.port {
        eprintln!("  port: {}", port);
    }
    if let Some(ref client_id) = config.client_id {
        eprintln!("  client_id: {}", client_id);
    }
    eprintln!();
    eprintln!("Next: polaris catalogs list");

    Ok(())
}
