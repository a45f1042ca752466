use clap::Parser;
use gtk4::prelude::*;
use gtk4::{glib, Application};
use log::{info, warn};
use mcy_create::config::{load_setup, AppConfig};
use mcy_create::ui::{WizardOptions, WizardWindow};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

const APP_ID: &str = "org.yosyshq.mcy_create";

/// mcy-create - Set up a new mcy mutation coverage project
#[derive(Parser, Debug, Clone)]
#[command(name = "mcy-create")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project directory to pre-fill
    #[arg(value_name = "DIRECTORY")]
    directory: Option<PathBuf>,

    /// Initial mutation size (1-100000)
    #[arg(short = 's', long = "size", value_name = "SIZE")]
    size: Option<u32>,

    /// Saved test setup to resume from
    #[arg(long = "load", value_name = "FILE")]
    load: Option<PathBuf>,

    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,
}

fn main() -> glib::ExitCode {
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("Starting mcy-create v{}", env!("CARGO_PKG_VERSION"));

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load config, using defaults: {}", e);
            AppConfig::default()
        }
    };

    let setup = cli.load.as_ref().and_then(|path| match load_setup(path) {
        Ok(snapshot) => {
            info!("Loaded test setup from {}", path.display());
            Some(snapshot)
        }
        Err(e) => {
            warn!("Failed to load test setup '{}': {:#}", path.display(), e);
            None
        }
    });

    let options = WizardOptions {
        directory: cli
            .directory
            .map(|dir| dir.to_string_lossy().into_owned())
            .or_else(|| config.wizard.last_directory.clone()),
        mutation_size: cli.size.or(config.wizard.mutation_size),
        setup,
    };

    let config = Rc::new(RefCell::new(config));

    let app = Application::builder().application_id(APP_ID).build();

    app.connect_activate(move |app| {
        info!("Building wizard");
        let wizard = WizardWindow::new(app, config.clone(), options.clone());
        wizard.present();
    });

    // Pass only the program name since the arguments are already parsed
    app.run_with_args(&["mcy-create"])
}
