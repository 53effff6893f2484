//! OBJ/MTL texture repair tool
//!
//! Point it at a folder holding one `.obj` file, its `.mtl` library and the
//! texture images (in any subfolder). Stale texture paths in the `.mtl` are
//! rewritten to folder-relative ones, asking which file to use whenever no
//! exact file name match exists.
//!
//! Usage: obj_repair <FOLDER> [--config repair.toml] [--threshold 0.6] [--yes] [--dry-run]

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::process::ExitCode;

use mtl_repair::foundation::logging;
use mtl_repair::prelude::*;

fn cli() -> Command {
    Command::new("obj_repair")
        .about("Repairs broken texture references in the .mtl file of an OBJ asset folder")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("folder")
                .value_name("FOLDER")
                .help("Folder containing exactly one .obj file")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Repair settings (.toml or .ron)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("threshold")
                .short('t')
                .long("threshold")
                .value_name("RATIO")
                .help("Minimum name similarity (0.0-1.0) for replacement candidates")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("yes")
                .short('y')
                .long("yes")
                .help("Accept the most similar texture without asking")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Report what would change without writing the .mtl file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Log filter when RUST_LOG is unset (error, warn, info, debug, trace)"),
        )
}

fn load_config(matches: &ArgMatches) -> Result<RepairConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => RepairConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RepairConfig::default(),
    };

    if let Some(threshold) = matches.get_one::<f64>("threshold") {
        config.similarity_threshold = *threshold;
    }
    if let Some(level) = matches.get_one::<String>("log-level") {
        config.log_level = level.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn run(matches: &ArgMatches) -> Result<RepairReport> {
    let config = load_config(matches)?;
    logging::init(&config.log_level);

    let folder = matches
        .get_one::<PathBuf>("folder")
        .context("missing folder argument")?;
    let repair = TextureRepair::new(config).with_dry_run(matches.get_flag("dry-run"));

    let report = if matches.get_flag("yes") {
        repair.run(folder, &mut BestCandidate)?
    } else {
        let mut prompt = ConsolePrompt::stdio(repair.config().skip_token.clone());
        repair.run(folder, &mut prompt)?
    };
    Ok(report)
}

/// Exit status when a run finishes, including partial repairs
const EXIT_OK: u8 = 0;
/// Exit status for usage errors and every abort
const EXIT_ABORT: u8 = 1;

/// Exit status for an argument parsing failure
///
/// `--help` and `--version` surface as clap errors that print to stdout.
fn usage_status(error: &clap::Error) -> u8 {
    if error.use_stderr() { EXIT_ABORT } else { EXIT_OK }
}

/// Log the outcome of a run and pick its exit status
fn finish(result: &Result<RepairReport>) -> u8 {
    match result {
        Ok(report) => {
            log::info!(
                "Summary: {} direct match(es), {} replacement(s), {} unresolved, {} line(s) changed{}",
                report.direct_matches,
                report.replacements_applied,
                report.unresolved,
                report.changed_lines,
                if report.written { "" } else { " (not written)" }
            );
            log::info!("Processing complete.");
            EXIT_OK
        }
        Err(e) => {
            logging::init("info");
            log::error!("Aborting: {:#}", e);
            EXIT_ABORT
        }
    }
}

fn main() -> ExitCode {
    let status = match cli().try_get_matches() {
        Ok(matches) => finish(&run(&matches)),
        Err(e) => {
            if let Err(io_err) = e.print() {
                eprintln!("Failed to print usage: {}", io_err);
            }
            usage_status(&e)
        }
    };
    ExitCode::from(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn parse_status(args: &[&str]) -> u8 {
        match cli().try_get_matches_from(args.iter().copied()) {
            Ok(matches) => finish(&run(&matches)),
            Err(e) => usage_status(&e),
        }
    }

    #[test]
    fn test_missing_folder_is_usage_error() {
        assert_eq!(parse_status(&["obj_repair"]), EXIT_ABORT);
    }

    #[test]
    fn test_extra_argument_is_usage_error() {
        assert_eq!(parse_status(&["obj_repair", "one", "two"]), EXIT_ABORT);
    }

    #[test]
    fn test_help_and_version_succeed() {
        assert_eq!(parse_status(&["obj_repair", "--help"]), EXIT_OK);
        assert_eq!(parse_status(&["obj_repair", "--version"]), EXIT_OK);
    }

    #[test]
    fn test_invalid_threshold_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().to_str().unwrap();
        assert_eq!(parse_status(&["obj_repair", folder, "--threshold", "2.0"]), EXIT_ABORT);
    }

    #[test]
    fn test_abort_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no_such_folder");
        assert_eq!(parse_status(&["obj_repair", missing.to_str().unwrap(), "--yes"]), EXIT_ABORT);
    }

    #[test]
    fn test_repaired_folder_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("crate.obj"), "mtllib crate.mtl\nv 0 0 0\n").unwrap();
        fs::write(dir.path().join("crate.mtl"), "map_Kd C:/old/wood.png\n").unwrap();
        fs::create_dir(dir.path().join("tex")).unwrap();
        fs::write(dir.path().join("tex/wood.png"), "").unwrap();

        let folder = dir.path().to_str().unwrap();
        assert_eq!(parse_status(&["obj_repair", folder, "--yes"]), EXIT_OK);
        assert_eq!(
            fs::read_to_string(dir.path().join("crate.mtl")).unwrap(),
            "map_Kd tex/wood.png\n"
        );
    }
}
