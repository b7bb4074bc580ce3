mod cli;
mod host;
mod keymap;
mod project;
mod pty_backend;

use std::sync::Arc;

use termdock_common::{EventBus, PaneBox, ProjectId, TermdockError};
use termdock_config::TermdockConfig;
use termdock_detect::PortRegistry;
use termdock_tiling::{FileLayoutStore, LayoutStore, MemoryLayoutStore, PaneTree};
use tracing_subscriber::EnvFilter;

use cli::Command;
use host::{Host, StdoutSink};
use keymap::Keymap;
use project::{PaneContext, ProjectPanes};
use pty_backend::PtyBackend;

fn main() {
    let args = cli::parse();

    let config = match termdock_config::load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) if args.config.is_some() => {
            eprintln!("termdock: {e}");
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("termdock: config load failed, using defaults: {e}");
            TermdockConfig::default()
        }
    };

    let log_directive = args
        .log_level
        .as_deref()
        .map(|level| format!("termdock={level}"))
        .unwrap_or_else(|| config.logging.level.directive().to_string());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "termdock=info".parse().expect("static directive parses")),
            ),
        )
        .init();

    tracing::info!("termdock v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match args.command {
        Some(Command::Layout { project }) => print_layout(&config, project.into()),
        Some(Command::Run {
            project,
            cwd,
            command,
        }) => run(config, project.into(), cwd, command),
        None => run(config, ProjectId::from("default"), None, None),
    };
    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
    tracing::info!("shutdown complete");
}

fn layout_store(config: &TermdockConfig) -> Arc<dyn LayoutStore> {
    match config.persistence.resolved_layout_dir() {
        Some(dir) => {
            tracing::debug!(dir = %dir.display(), "layout store");
            Arc::new(FileLayoutStore::new(dir))
        }
        None => {
            tracing::warn!("no data directory, layouts will not persist");
            Arc::new(MemoryLayoutStore::new())
        }
    }
}

fn print_layout(config: &TermdockConfig, project: ProjectId) -> Result<(), TermdockError> {
    match layout_store(config).get_layout(&project) {
        Some(tree) => println!("{}", serde_json::to_string_pretty(&tree)?),
        None => println!("no layout stored for {project}"),
    }
    Ok(())
}

fn run(
    config: TermdockConfig,
    project: ProjectId,
    cwd: Option<std::path::PathBuf>,
    command: Option<String>,
) -> Result<(), TermdockError> {
    let keymap = Keymap::from_config(&config.keybinds)?;
    tracing::info!("keymap loaded ({} bindings)", keymap.len());

    // Probes run here; the host loop itself stays on this thread.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let bus = Arc::new(EventBus::default());
    let ctx = PaneContext::from_config(&config, bus.clone(), PortRegistry::new())
        .with_runtime(runtime.handle().clone());
    let tree = PaneTree::load(project, layout_store(&config));
    let cwd = cwd.or_else(|| std::env::current_dir().ok());
    let panes = ProjectPanes::new(tree, cwd, ctx, StdoutSink::for_session);

    let backend = PtyBackend::new(config.terminal.shell.clone(), config.terminal.scrollback_bytes);
    let screen = PaneBox::new(
        f64::from(config.terminal.default_cols) * config.terminal.cell_width,
        f64::from(config.terminal.default_rows) * config.terminal.cell_height,
    );

    let result = Host::new(panes, backend, keymap, bus, screen).run(command.as_deref());
    runtime.shutdown_timeout(std::time::Duration::from_secs(1));
    result
}
