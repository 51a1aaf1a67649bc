use log::LevelFilter;

/// Installs the platform logger. Safe to call more than once; later calls
/// leave the first logger in place.
#[cfg(target_os = "android")]
pub fn init_logging(level: LevelFilter) {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(level)
            .with_tag("crisis-checklist"),
    );
}

/// Installs the platform logger. Safe to call more than once; later calls
/// leave the first logger in place. `RUST_LOG` overrides `level`.
#[cfg(not(target_os = "android"))]
pub fn init_logging(level: LevelFilter) {
    let result = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
    if result.is_err() {
        log::debug!("Logger already initialized");
    }
}
