// Entrypoint for the CLI application.
// - Keeps `main` small: create an API client and hand it to the UI flow.
// - Returns `anyhow::Result` to simplify error handling for the tool.

use blackbox_sandbox_cli::{api::ApiClient, ui::run};

fn main() -> anyhow::Result<()> {
    // Create API client configured by environment variable
    // `SANDBOX_API_URL` or default to the production endpoint. See
    // `api::ApiClient::from_env`.
    let api = ApiClient::from_env()?;

    // Start the interactive flow. This call blocks until the user exits.
    run(api)?;
    Ok(())
}
