//! Headless driver for the Allva login core.
//!
//! Loads configuration, wires a [`LoginAttemptController`] against the
//! simulated authentication service and exposes it as a small CLI.

mod navigation;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use allva_config::{Config, ConfigLoad, ConfigLoader, ConfigSource};
use allva_core::auth::DeviceContextProvider;
use allva_core::{
    CatalogLocalization, ControllerDeps, LocalDeviceContext,
    LoginAttemptController, LoginError, LoginEvent, PreferenceStore,
    SimulatedAuthClient, TimeoutAuthClient,
};
use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use env_logger::{Builder, Target};
use log::LevelFilter;

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "allva-desktop")]
#[command(about = "Drive the Allva login flow without a window")]
struct Cli {
    /// Configuration file (overrides ALLVA_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Preference file (overrides configuration)
    #[arg(long, global = true)]
    preferences: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Attempt a login against the simulated service
    Login(LoginArgs),
    /// Request a password reset for a user number
    Recover {
        /// Defaults to the remembered user
        #[arg(long)]
        user: Option<String>,
    },
    /// Print the device context attached to login requests
    Device,
}

#[derive(ClapArgs, Debug)]
struct LoginArgs {
    /// Defaults to the remembered user
    #[arg(long)]
    user: Option<String>,

    #[arg(long)]
    password: String,

    /// Defaults to the remembered office
    #[arg(long)]
    office: Option<String>,

    /// Remember user and office for the next start
    #[arg(long, conflicts_with = "forget")]
    remember: bool,

    /// Drop any remembered user and office
    #[arg(long)]
    forget: bool,

    /// Submit the same credentials up to this many times
    #[arg(long, default_value_t = 1)]
    attempts: u32,

    /// Stay attached until a lockout started by this run ends
    #[arg(long)]
    follow_lockout: bool,
}

fn init_logger() {
    Builder::new()
        .target(Target::Stdout)
        .filter_level(LevelFilter::Warn)
        .filter_module("allva_desktop", LevelFilter::Debug)
        .filter_module("allva_core", LevelFilter::Info)
        .filter_module("allva_config", LevelFilter::Info)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
    }

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.preferences)?;

    let preferences = Arc::new(PreferenceStore::load(&config.preferences.path));
    let device = Arc::new(LocalDeviceContext::new(
        Arc::clone(&preferences),
        env!("CARGO_PKG_VERSION"),
    ));

    match cli.command {
        Command::Device => {
            let context = device.device_context();
            println!("device id:   {}", context.device_id);
            println!("mac address: {}", context.mac_address);
            println!("local ip:    {}", context.local_ip);
            println!("user agent:  {}", context.user_agent);
            Ok(())
        }
        Command::Recover { user } => {
            let controller = build_controller(&config, preferences, device);
            if let Some(user) = user {
                controller.set_user_number(user);
            }
            let result = controller.request_password_recovery().await;
            print_message(&controller);
            result.context("password recovery failed")
        }
        Command::Login(args) => {
            let controller = build_controller(&config, preferences, device);
            let result = run_login(&controller, args).await;
            controller.shutdown();
            result
        }
    }
}

fn load_config(
    explicit: Option<&Path>,
    preferences: Option<PathBuf>,
) -> anyhow::Result<Config> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = explicit {
        loader = loader.with_config_path(path);
    }
    let ConfigLoad {
        mut config,
        source,
        warnings,
    } = loader.load().context("failed to load configuration")?;

    if let ConfigSource::File(path) = &source {
        log::info!("Using configuration file {}", path.display());
    }
    if !warnings.is_empty() {
        eprintln!("configuration loaded with warnings, see log output");
    }

    if let Some(path) = preferences {
        config.preferences.path = path;
    }
    Ok(config)
}

fn build_controller(
    config: &Config,
    preferences: Arc<PreferenceStore>,
    device: Arc<LocalDeviceContext>,
) -> LoginAttemptController {
    let client = TimeoutAuthClient::new(
        SimulatedAuthClient::new(config.auth.simulated_latency),
        config.auth.request_timeout,
    );
    let localization = CatalogLocalization::load(
        config.localization.catalog_dir.as_deref(),
        &config.localization.languages,
    );

    LoginAttemptController::new(
        config.login.clone(),
        ControllerDeps {
            client: Arc::new(client),
            device,
            preferences,
            localization: Arc::new(localization),
        },
    )
}

async fn run_login(
    controller: &LoginAttemptController,
    args: LoginArgs,
) -> anyhow::Result<()> {
    if let Some(user) = args.user {
        controller.set_user_number(user);
    }
    if let Some(office) = args.office {
        controller.set_office_code(office);
    }
    controller.set_password(args.password);
    if args.remember {
        controller.set_remember_session(true);
    } else if args.forget {
        controller.set_remember_session(false);
    }

    let mut events = controller.events();
    for attempt in 1..=args.attempts.max(1) {
        match controller.submit().await {
            Ok(session) => {
                navigation::enter_main_window(&session);
                return Ok(());
            }
            Err(LoginError::Validation(err)) => {
                print_message(controller);
                return Err(err).context("the login form is incomplete");
            }
            Err(err @ (LoginError::LockoutStarted { .. } | LoginError::Locked { .. })) => {
                print_message(controller);
                if args.follow_lockout {
                    follow_lockout(&mut events).await;
                }
                return Err(err).context("login is locked");
            }
            Err(err) => {
                log::debug!("Attempt {attempt} failed: {err}");
                print_message(controller);
            }
        }
    }

    anyhow::bail!("login failed after {} attempt(s)", args.attempts.max(1))
}

async fn follow_lockout(
    events: &mut tokio::sync::broadcast::Receiver<LoginEvent>,
) {
    loop {
        match events.recv().await {
            Ok(LoginEvent::LockoutTick { ticks_remaining }) => {
                println!("locked, {ticks_remaining} tick(s) left");
            }
            Ok(LoginEvent::LockoutEnded) => {
                println!("lockout ended");
                return;
            }
            Ok(_) => {}
            Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => {}
            Err(tokio::sync::broadcast::error::RecvError::Closed) => return,
        }
    }
}

fn print_message(controller: &LoginAttemptController) {
    if let Some(message) = controller.snapshot().message {
        if message.is_error() {
            eprintln!("{}", message.text);
        } else {
            println!("{}", message.text);
        }
    }
}
