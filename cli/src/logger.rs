use std::sync::OnceLock;

/// Set up log levels and formatting
pub struct Logger;

static LOGGER: OnceLock<Logger> = OnceLock::new();

impl Logger {
    pub fn init() -> &'static Self {
        LOGGER.get_or_init(|| {
            // No logs shown by default, only human-friendly messages
            // Enable logs output with "export RUST_LOG=debug" in terminal
            let initialized = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or("off"),
            )
            .try_init();

            if initialized.is_err() {
                eprintln!("Logger is already set, RUST_LOG is ignored");
            }

            Self
        })
    }
}
