//! Serve command

use anyhow::Result;

use bursar_core::Config;

/// Start the REST API server
///
/// `--mock` forces the offline backend regardless of the environment.
pub async fn cmd_serve(host: &str, port: u16, mock: bool) -> Result<()> {
    let mut config = Config::from_env();
    if mock {
        config.mock_mode = true;
    }

    bursar_server::serve(config, host, port).await
}
