//! Optional start-up configuration from the environment.

use tokio::task::JoinHandle;

use crate::config::ConnectionConfig;
use crate::jira::TrackerClient;

/// Configure `client` from `JIRA_API_BASE_URL`, `JIRA_EMAIL` and
/// `JIRA_API_TOKEN` when all three are set.
pub fn auto_configure(client: &TrackerClient) -> Option<JoinHandle<bool>> {
    configure_from(client, ConnectionConfig::from_env())
}

/// Apply `config` and validate it in the background.
///
/// The outcome is only logged; the server keeps accepting manual connects
/// either way. Returns the validation task so callers may await it.
pub fn configure_from(
    client: &TrackerClient,
    config: Option<ConnectionConfig>,
) -> Option<JoinHandle<bool>> {
    let Some(config) = config else {
        tracing::debug!("No Jira credentials in environment, waiting for manual connect");
        return None;
    };

    tracing::info!(
        "Attempting automatic Jira config from environment (base URL {}, email {})",
        config.base_url,
        config.email
    );
    client.configure(&config);

    let client = client.clone();
    Some(tokio::spawn(async move {
        let ok = client.test_connection().await;
        if ok {
            tracing::info!("Automatic Jira connection succeeded");
        } else {
            tracing::warn!(
                "Automatic Jira connection failed: {}. Server will still accept manual connections.",
                client.last_error().unwrap_or_default()
            );
        }
        ok
    }))
}
