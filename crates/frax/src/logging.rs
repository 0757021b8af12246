use std::sync::Once;

static INIT: Once = Once::new();

/// Install `env_logger` as the global logger. `RUST_LOG` overrides
/// `default_filter`; later calls are ignored.
pub fn init_logging(default_filter: Option<&str>) {
    INIT.call_once(|| {
        let env = env_logger::Env::default().default_filter_or(default_filter.unwrap_or("info"));
        if let Err(e) = env_logger::Builder::from_env(env).try_init() {
            // Someone else installed a logger first; theirs wins.
            eprintln!("frax: logger already initialized: {e}");
        }
    });
}
