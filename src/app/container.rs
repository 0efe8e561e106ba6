use std::sync::Arc;

use crate::adapters::{AppConfig, FFprobeAdapter};
use crate::app::inspect_interactor::InspectInteractor;
use crate::ports::ProbePort;

pub trait AppContainer: Send + Sync {
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
}

pub struct DefaultAppContainer {
    inspect_interactor: Arc<InspectInteractor>,
}

impl DefaultAppContainer {
    /// Wire the ffprobe adapter according to the effective configuration
    pub fn new(config: &AppConfig) -> Self {
        let probe_port = Arc::new(
            FFprobeAdapter::new(config.ffprobe_path.clone()).with_timeout(config.timeout()),
        );
        Self::with_probe_port(probe_port, config)
    }

    /// Wire a caller-supplied probe port
    pub fn with_probe_port(probe_port: Arc<dyn ProbePort>, config: &AppConfig) -> Self {
        let inspect_interactor = Arc::new(InspectInteractor::new(
            probe_port,
            config.malformed_lines,
        ));

        Self { inspect_interactor }
    }
}

impl AppContainer for DefaultAppContainer {
    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }
}
