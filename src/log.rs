use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Sets up `env_logger` to print messages up to `level` to stderr. Each line is prefixed with
/// the time elapsed since the logger was built, so that progress of long searches can be followed.
/// Repeated calls (e.g. from several unit tests) are ignored.
pub fn build_logger_for_level(level: LevelFilter) {
    let start = std::time::Instant::now();
    let _ = Builder::new()
        .filter_level(level)
        .format(move |buf, record| {
            writeln!(
                buf,
                "[{:>8.3}s {:<5} {}] {}",
                start.elapsed().as_secs_f64(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .is_test(cfg!(test))
        .try_init();
}

/// Increases `default` by one level for each occurrence of `-v` on the command line.
pub fn build_logger_for_verbosity(default: LevelFilter, verbosity: usize) {
    let levels = [
        LevelFilter::Off,
        LevelFilter::Error,
        LevelFilter::Warn,
        LevelFilter::Info,
        LevelFilter::Debug,
        LevelFilter::Trace,
    ];

    let base = levels.iter().position(|&l| l == default).unwrap_or(2);
    build_logger_for_level(levels[(base + verbosity).min(levels.len() - 1)]);
}
