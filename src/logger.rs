use std::io::Write;

/// Initializes the global logger: `Info` by default, `Debug` when verbose.
pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format(|buf, record| writeln!(buf, "[conseil] {}", record.args()))
        .init();
}
