// tau entry point.
// Loads configuration, resolves credentials, and runs the navigation loop.

use std::process::ExitCode;

use tau_cli::cache::CacheStore;
use tau_cli::config::Config;
use tau_cli::credentials::get_credentials;
use tau_cli::ims::ImsClient;
use tau_cli::loader::DataLoader;
use tau_cli::moodle::MoodleClient;
use tau_cli::ui::{BrowserOpener, Prompter, TerminalPrompter};
use tau_cli::{App, Result, logging};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "tau exited with an error");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;
    let _guard = logging::init(&config.cache_dir, &config.log_filter)?;
    tracing::info!(cache_dir = %config.cache_dir.display(), "starting tau");

    let store = CacheStore::new(config.cache_dir.clone());
    let mut prompter = TerminalPrompter::new();

    let Some(login) = get_credentials(&store, &mut prompter)? else {
        prompter.info("Exiting...");
        return Ok(());
    };

    let moodle = MoodleClient::new(&config.moodle_url, login.clone())?;
    let ims = ImsClient::new(&config.ims_url, login)?;
    let loader = DataLoader::new(moodle, ims, store).with_ttl(config.cache_ttl);

    prompter.info("TAU-CLI");
    let mut app = App::new(loader, prompter, BrowserOpener);
    app.run().await?;

    tracing::info!("session ended");
    Ok(())
}
