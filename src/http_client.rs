use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

static LIVE_CLIENT: OnceCell<Client> = OnceCell::new();

/// Client for the loopback live-game endpoint, built on first use.
///
/// The game client serves a self-signed certificate, so certificate checks are off. The
/// timeout passed on the first call sticks for the rest of the process.
pub fn live_client(timeout: Duration) -> Result<&'static Client> {
    LIVE_CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .build()
            .context("failed to build live client")
    })
}
