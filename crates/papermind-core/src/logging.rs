use std::io::Write;

/// Initializes `env_logger` with `info` (or `debug`) unless `RUST_LOG` says otherwise.
pub fn init_logging(debug: bool) {
    init_with_filter(if debug { "debug" } else { "info" });
}

/// Same record format as [`init_logging`] with an explicit default filter,
/// e.g. a `--log-level` value. `RUST_LOG` still wins when set.
pub fn init_with_filter(filter: &str) {
    let result = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} [{}] {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        })
        .try_init();

    if result.is_err() {
        log::debug!("Logger already initialized, keeping it");
    }
}
