use shared_bus::PanelEvent;
use shared_types::AlertLevel;

fn marker(level: AlertLevel) -> &'static str {
    match level {
        AlertLevel::Info => "[..]",
        AlertLevel::Success => "[ok]",
        AlertLevel::Warning => "[!!]",
        AlertLevel::Error => "[xx]",
    }
}

/// One status line per panel event.
pub fn render_event(event: &PanelEvent) -> String {
    match event {
        PanelEvent::Alert { level, message } => format!("{} {}", marker(*level), message),
        PanelEvent::ConnectivityChanged(transition) => {
            format!("[{}] {}", transition.label(), transition.cause)
        }
        PanelEvent::KeysChanged { total, demo: true } => format!("     {} keys (demo data)", total),
        PanelEvent::KeysChanged { total, demo: false } => format!("     {} keys", total),
    }
}
