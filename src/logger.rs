//! Logger setup for the call command
//!

use camino::Utf8Path;

use crate::cli;
use crate::globals::PROGRAM_NAME;

fn get_log_filename(output_dir: &Utf8Path) -> camino::Utf8PathBuf {
    output_dir.join(format!("{PROGRAM_NAME}.log"))
}

/// Log to stderr, and also to a log file in `output_dir` if given
///
/// The log level is Debug if `debug` is set, and Info otherwise.
///
fn setup_logger(output_dir: Option<&Utf8Path>, debug: bool) -> Result<(), fern::InitError> {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let mut logger = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{PROGRAM_NAME}][{}] {message}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.level(),
            ))
        })
        .level(level)
        .chain(std::io::stderr());

    if let Some(output_dir) = output_dir {
        logger = logger.chain(fern::log_file(get_log_filename(output_dir))?);
    }

    logger.apply()?;
    Ok(())
}

/// Create the output directory if needed, then setup the logger to write a log file there
///
/// No logger exists yet when this is called, so all errors are written directly to stderr, in the
/// same format used for command-line setting errors.
///
pub fn setup_output_dir_and_logger(output_dir: &Utf8Path, clobber: bool, debug: bool) {
    if let Err(msg) = cli::check_output_dirname(output_dir, clobber) {
        eprintln!("Invalid command-line setting: {msg}");
        std::process::exit(exitcode::USAGE);
    };

    if !output_dir.is_dir() {
        if let Err(e) = std::fs::create_dir_all(output_dir) {
            eprintln!("Can't create output directory '{output_dir}': {e}");
            std::process::exit(exitcode::CANTCREAT);
        }
    }

    setup_logger(Some(output_dir), debug).unwrap();
}
