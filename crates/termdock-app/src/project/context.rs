use std::sync::Arc;

use termdock_common::EventBus;
use termdock_config::schema::ProbeConfig;
use termdock_config::TermdockConfig;
use termdock_detect::{DetectorSettings, LocalPortCheck, PortCheck, PortRegistry};
use termdock_session::{ConnectorConfig, ResizeTiming};

/// Everything a project's panes share with the rest of the process.
#[derive(Clone)]
pub struct PaneContext {
    pub connector: ConnectorConfig,
    pub resize: ResizeTiming,
    /// `None` when detection is disabled.
    pub detector: Option<DetectorSettings>,
    pub probe: ProbeConfig,
    pub bus: Arc<EventBus>,
    pub ports: PortRegistry,
    /// Pre-check run before a reachability probe is started.
    pub port_check: Arc<dyn PortCheck + Send + Sync>,
    /// Where reachability probes run. Without one, detections are
    /// published but never probed.
    pub runtime: Option<tokio::runtime::Handle>,
}

impl PaneContext {
    pub fn from_config(config: &TermdockConfig, bus: Arc<EventBus>, ports: PortRegistry) -> Self {
        Self {
            connector: ConnectorConfig::from_config(config),
            resize: ResizeTiming::from_config(config),
            detector: config
                .detector
                .enabled
                .then(|| DetectorSettings::from_config(&config.detector)),
            probe: config.probe.clone(),
            bus,
            ports,
            port_check: Arc::new(LocalPortCheck),
            runtime: None,
        }
    }

    pub fn with_port_check(mut self, check: Arc<dyn PortCheck + Send + Sync>) -> Self {
        self.port_check = check;
        self
    }

    pub fn with_runtime(mut self, runtime: tokio::runtime::Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }
}
