//! Emporium interactive shop

use std::io;

use anyhow::Result;
use emporium::{
    config::{AppConfig, LogFormat},
    fixtures::Fixture,
    menu::Menu,
    session::Session,
};
use rand::{SeedableRng, rngs::StdRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Run the interactive shop on stdin and stdout
pub fn main() -> Result<()> {
    let config = AppConfig::load().unwrap_or_else(|error| error.exit());

    init_tracing(&config);

    let session_config = config.session_config();

    let mut session = match config.set.as_deref() {
        Some(set) => {
            info!(set, fixtures = %config.fixtures.display(), "loading fixture set");

            Fixture::from_set_in(config.fixtures.clone(), set)?.into_session(session_config)?
        }
        None => Session::reference(session_config)?,
    };

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();

    Menu::new(&mut session, stdin.lock(), stdout.lock(), rng).run()?;

    info!(
        orders = session.orders().history().len(),
        unprocessed = session.orders().queued_len(),
        "session ended"
    );

    Ok(())
}

/// Events go to stderr so they never interleave with the menu on stdout.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    match config.log_format {
        LogFormat::Compact => subscriber.compact().init(),
        LogFormat::Json => subscriber.json().init(),
    }
}
