use std::sync::Arc;

use kg_01_bridge::test_utils::{LoaderBehavior, ScriptedLoader};
use kg_01_bridge::{
    CallBuilder, ConnectivityState, RetryConfig, RetryCoordinator, ScriptBridge, TransportConfig,
};
use kg_02_key_admin::KeyAdminService;
use serde_json::{json, Value};
use shared_bus::{EventFilter, InMemoryEventBus, PanelEvent, Subscription};

pub const BASE_URL: &str = "https://script.example.com/macros/s/deployment/exec";
pub const SECRET: &str = "271006";

/// The full stack over a scripted loader.
pub struct Stack {
    pub service: KeyAdminService,
    pub api: Arc<RetryCoordinator>,
    pub bridge: Arc<ScriptBridge>,
    pub loader: Arc<ScriptedLoader>,
    pub events: Subscription,
}

impl Stack {
    pub fn new(behaviors: Vec<LoaderBehavior>) -> Self {
        let bus = Arc::new(InMemoryEventBus::new());
        let events = bus.subscribe(EventFilter::all());

        let loader = Arc::new(ScriptedLoader::new(behaviors));
        let bridge = Arc::new(ScriptBridge::new(loader.clone(), &TransportConfig::default()));
        let builder = Arc::new(CallBuilder::new(BASE_URL, SECRET).unwrap());
        let connectivity = Arc::new(ConnectivityState::with_publisher(bus.clone()));
        let api = Arc::new(RetryCoordinator::new(
            builder,
            bridge.clone(),
            connectivity,
            RetryConfig::default(),
        ));
        let service = KeyAdminService::new(api.clone(), bus);

        Self {
            service,
            api,
            bridge,
            loader,
            events,
        }
    }

    /// Connectivity labels published so far, oldest first.
    pub fn transitions(&mut self) -> Vec<&'static str> {
        self.events
            .drain()
            .into_iter()
            .filter_map(|event| match event {
                PanelEvent::ConnectivityChanged(t) => Some(t.label()),
                _ => None,
            })
            .collect()
    }
}

pub fn ok() -> LoaderBehavior {
    LoaderBehavior::respond(json!({"success": true}))
}

pub fn sheet() -> Value {
    json!({
        "success": true,
        "keys": [
            {"key": "ALPHA-001", "expire_date": "2030-01-01", "status": "active",
             "hwid": "PC-ALPHA", "notes": "reseller", "created_date": "2024-02-01"},
            {"key": "BETA-002", "expire_date": "2030-06-30T00:00:00.000Z", "status": "active",
             "hwid": "", "notes": "", "created_date": "2024-03-01"}
        ]
    })
}
