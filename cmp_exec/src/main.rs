//! Trajectory comparison executable entry point.
//!
//! # Architecture
//!
//! The executable runs once, from start to finish:
//!
//!     - Load the settings document
//!     - Create the output directory and initialise logging
//!     - Check both trajectory logs can be opened
//!     - Load and validate the logs against the columns the enabled panels
//!       need
//!     - Build the panels (overhead view and angle timelines)
//!     - Render the panels into the output image
//!
//! Any error aborts the run.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info};
use std::path::PathBuf;
use structopt::StructOpt;

// Internal
use cmp_lib::{
    comparison::{build_panels, PanelSelection, TrajPair},
    render::{render, CanvasSpec},
    traj_log::{check_file_opens, TrajLog},
};
use util::{logger::logger_init, session::Session, settings::Settings};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Used when no log path is configured, fails the file check with a clear
/// message.
const UNDEFINED_FILE: &str = "undefined_file";

const DEFAULT_OUTPUT_DIRECTORY: &str = "output";

const DEFAULT_OUTPUT_FILENAME: &str = "trajectories_comparison.png";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Compare the expected and real trajectories of a vehicle.
#[derive(Debug, StructOpt)]
#[structopt(name = "cmp_exec")]
struct Opts {
    /// Path to the JSON settings document
    #[structopt(
        short,
        long,
        parse(from_os_str),
        default_value = "params/settings.json"
    )]
    settings: PathBuf,

    /// Expected trajectory log, overrides `files.expected_trajectory_log_file`
    #[structopt(long, parse(from_os_str))]
    expected: Option<PathBuf>,

    /// Real trajectory log, overrides `files.real_trajectory_log_file`
    #[structopt(long, parse(from_os_str))]
    real: Option<PathBuf>,

    /// Print status lines, overrides `general.verbose`
    #[structopt(short, long)]
    verbose: bool,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- LOAD SETTINGS ----

    let settings = Settings::load(&opts.settings).wrap_err("Could not load the settings")?;

    let verbose = opts.verbose || settings.get("general.verbose", false);

    // ---- EARLY INITIALISATION ----

    let output_dir: String = settings.get(
        "files.output_directory",
        DEFAULT_OUTPUT_DIRECTORY.to_string(),
    );
    let log_file_name: Option<String> = settings.get("files.log_filename", None);

    let session = Session::new(&output_dir, log_file_name.as_deref())
        .wrap_err("Failed to create the session")?;

    logger_init(verbose, &session).wrap_err("Failed to initialise logging")?;

    debug!("CLI arguments: {:?}", opts);
    debug!("Settings loaded from {:?}: {}", settings.path(), settings);

    if session.created_output_root {
        info!("Directory '{}' created.", output_dir);
    }

    // ---- CHECK INPUT FILES ----

    let expected_path = opts.expected.unwrap_or_else(|| {
        settings
            .get(
                "files.expected_trajectory_log_file",
                UNDEFINED_FILE.to_string(),
            )
            .into()
    });
    let real_path = opts.real.unwrap_or_else(|| {
        settings
            .get("files.real_trajectory_log_file", UNDEFINED_FILE.to_string())
            .into()
    });

    check_file_opens(&expected_path).wrap_err("Cannot open the expected trajectory log")?;
    check_file_opens(&real_path).wrap_err("Cannot open the real trajectory log")?;

    // ---- LOAD TRAJECTORIES ----

    let selection = PanelSelection::from_settings(&settings);
    if selection.is_empty() {
        return Err(eyre!(
            "No panels are enabled, enable at least one panel in {:?}",
            opts.settings
        ));
    }

    let required = selection.required_columns();
    debug!("Required columns: {:?}", required);

    let expected = TrajLog::load(&expected_path, &required)
        .wrap_err("Failed to load the expected trajectory")?;
    let real =
        TrajLog::load(&real_path, &required).wrap_err("Failed to load the real trajectory")?;

    debug!(
        "Log columns: expected {:?}, real {:?}",
        expected.headers(),
        real.headers()
    );
    info!("Succesfully extracted trajectory points.");

    // ---- BUILD PANELS ----

    let panels = build_panels(
        &settings,
        &selection,
        TrajPair {
            expected: &expected,
            real: &real,
        },
    )
    .wrap_err("Failed to build the comparison panels")?;

    // ---- RENDER ----

    let canvas = CanvasSpec::from_settings(&settings);
    let output_path = session.output_path(settings.get(
        "files.output_filename",
        DEFAULT_OUTPUT_FILENAME.to_string(),
    ));

    render(&panels, &canvas, &output_path).wrap_err("Failed to render the comparison")?;

    info!("Succesfully saved the plot at {:?}.", output_path);

    Ok(())
}
