//! Logger initialization.

/// Initializes `env_logger` once.
///
/// `filter` follows the `env_logger` syntax and wins over `RUST_LOG`; without
/// either the level is `info`. A second call only prints a warning.
pub fn init_logging(filter: Option<&str>) {
    let mut builder = env_logger::Builder::new();
    match filter
        .map(str::to_owned)
        .or_else(|| std::env::var("RUST_LOG").ok())
    {
        Some(filter) => {
            builder.parse_filters(&filter);
        }
        None => {
            builder.filter_level(log::LevelFilter::Info);
        }
    }
    if let Err(e) = builder.try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    }
}
