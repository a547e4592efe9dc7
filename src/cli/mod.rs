mod call;
mod defaults;
mod shared;
mod utils;

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use simple_error::{SimpleResult, bail};

use self::call::validate_and_fix_call_settings;
pub use self::call::{CallSettings, CallerParameters, write_call_settings};
use self::shared::validate_and_fix_shared_settings;
pub use self::shared::SharedSettings;

#[derive(Subcommand)]
pub enum Commands {
    /// Call large deletions and tandem duplications from breakpoint, read pair and copy ratio
    /// evidence, and estimate the copy number contribution of each call
    Call(CallSettings),
}

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}"
)]
#[clap(propagate_version = true, rename_all = "kebab_case")]
pub struct Settings {
    #[command(flatten)]
    pub shared: SharedSettings,

    #[command(subcommand)]
    pub command: Commands,
}

impl Settings {
    pub fn get_output_dir(&self) -> &Utf8Path {
        match &self.command {
            Commands::Call(x) => &x.output_dir,
        }
    }
}

/// Checks if a directory does not exist
///
pub fn check_novel_dirname(dirname: &Utf8Path, label: &str) -> SimpleResult<()> {
    if dirname.exists() {
        bail!("{label} already exists: \"{dirname}\"");
    }
    Ok(())
}

/// Validate settings and update parameters that can't be processed by clap
///
/// Checks that the output directory is new, unless it may be overwritten
///
pub fn check_output_dirname(output_dir: &Utf8Path, clobber: bool) -> SimpleResult<()> {
    if clobber {
        return Ok(());
    }
    check_novel_dirname(output_dir, "Output directory")
}

pub fn validate_and_fix_settings_impl(mut settings: Settings) -> SimpleResult<Settings> {
    settings.shared = validate_and_fix_shared_settings(settings.shared)?;
    check_output_dirname(settings.get_output_dir(), settings.shared.clobber)?;

    settings.command = match settings.command {
        Commands::Call(x) => {
            let x = validate_and_fix_call_settings(x)?;
            Commands::Call(x)
        }
    };

    Ok(settings)
}

/// Validate settings and update to parameters that can't be processed automatically by clap.
///
pub fn validate_and_fix_settings(settings: Settings) -> Settings {
    match validate_and_fix_settings_impl(settings) {
        Ok(x) => x,
        Err(msg) => {
            eprintln!("Invalid command-line setting: {msg}");
            std::process::exit(exitcode::USAGE);
        }
    }
}

pub fn parse_settings() -> Settings {
    Settings::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_output_dirname() {
        let existing_dir = Utf8Path::new(env!("CARGO_MANIFEST_DIR"));
        assert!(check_output_dirname(existing_dir, false).is_err());
        assert!(check_output_dirname(existing_dir, true).is_ok());

        let novel_dir = existing_dir.join("not_a_real_largesv_output_dir");
        assert!(check_output_dirname(&novel_dir, false).is_ok());
    }
}
