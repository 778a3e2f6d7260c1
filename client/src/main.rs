//! `myflix` entry-point: wires configuration, the HTTP adapter and the file
//! session store into the terminal front-end.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use myflix_client::cli::{CliArgs, run};
use myflix_client::config::ClientSettings;
use myflix_client::domain::CatalogueClient;
use myflix_client::outbound::http::HttpMovieApi;
use myflix_client::outbound::storage::FileKeyValueStore;

fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    match Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("create Tokio runtime: {e}"))
        .and_then(|runtime| runtime.block_on(async_main(args)))
    {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!(%message, "command failed");
            // Nothing left to report to if stderr is gone.
            let _ignored = writeln!(io::stderr().lock(), "{message}");
            ExitCode::FAILURE
        }
    }
}

async fn async_main(args: CliArgs) -> Result<(), String> {
    let settings = ClientSettings::load_from_iter([OsString::from("myflix")])
        .map_err(|e| format!("load configuration: {e}"))?;
    let base_url = settings.base_url().map_err(|e| e.to_string())?;
    let api = HttpMovieApi::new(base_url, settings.request_timeout()).map_err(|e| e.to_string())?;
    let store = FileKeyValueStore::open(settings.session_dir()).map_err(|e| e.to_string())?;
    let client = CatalogueClient::new(Arc::new(api), store);

    let mut stdout = io::stdout().lock();
    run(&client, args.command, &mut stdout)
        .await
        .map_err(|e| e.to_string())
}
