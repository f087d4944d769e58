use log::LevelFilter;

struct StdoutLogger;

static LOGGER: StdoutLogger = StdoutLogger;

impl log::Log for StdoutLogger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        println!("[{}] {}", record.level(), record.args());
    }

    fn flush(&self) {}
}

/// Install the stdout logger at debug level.
///
/// Result is ignored since init is called at most once, from the binary.
pub fn init() {
    let _ = log::set_logger(&LOGGER).map(|_| log::set_max_level(LevelFilter::Debug));
}
