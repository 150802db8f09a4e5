//! Key Administration Service - the panel's operations over the API bridge.
//!
//! Every operation reports progress as panel alerts on the event bus. The
//! local collection changes only after the remote side confirmed a mutation,
//! and every change is announced with `KeysChanged`.

use chrono::{DateTime, Days, NaiveDate, Utc};
use kg_01_bridge::{
    ApiError, ApiResult, CallParams, ConnectivitySnapshot, Operation, RetryCoordinator,
    SystemTimeSource, TimeSource,
};
use parking_lot::RwLock;
use shared_bus::{EventPublisher, PanelEvent};
use shared_types::{AlertLevel, KeyRecord, KeyStats};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{demo_keys, normalize_key, KeyCollection, KeySource, NewKey, UpdateKey};
use crate::error::{KeyAdminError, KeyAdminResult};

/// Date format used by the remote sheet.
const SHEET_DATE_FORMAT: &str = "%Y-%m-%d";

/// License key administration.
pub struct KeyAdminService {
    api: Arc<RetryCoordinator>,
    publisher: Arc<dyn EventPublisher>,
    time: Arc<dyn TimeSource>,
    keys: RwLock<KeyCollection>,
}

impl KeyAdminService {
    pub fn new(api: Arc<RetryCoordinator>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            api,
            publisher,
            time: Arc::new(SystemTimeSource),
            keys: RwLock::new(KeyCollection::new()),
        }
    }

    /// Replace the clock used for "today".
    #[must_use]
    pub fn with_time_source(mut self, time: Arc<dyn TimeSource>) -> Self {
        self.time = time;
        self
    }

    // =========================================================================
    // LOADING
    // =========================================================================

    /// Probe the API once, then load remote keys or fall back to demo data.
    pub async fn initialize(&self) -> KeySource {
        self.alert(AlertLevel::Info, "Checking connection...");

        match self.api.probe().await {
            Ok(_) => {
                self.alert(AlertLevel::Success, "Connected to key sheet API");
                self.load_keys().await
            }
            Err(error) => {
                warn!(error = %error, "Connection probe failed");
                self.alert(AlertLevel::Warning, "Using offline mode with demo data");
                self.load_demo()
            }
        }
    }

    /// Fetch every key. Any failure falls back to demo data.
    pub async fn load_keys(&self) -> KeySource {
        self.alert(AlertLevel::Info, "Loading keys data...");

        match self.fetch_keys().await {
            Ok(records) => {
                let total = records.len();
                self.keys.write().replace(records, KeySource::Remote);
                info!(total = total, "Keys loaded");
                self.announce_keys();
                self.alert(
                    AlertLevel::Success,
                    format!("Loaded {} keys successfully!", total),
                );
                KeySource::Remote
            }
            Err(error) => {
                warn!(error = %error, "Loading keys failed");
                self.alert(AlertLevel::Warning, error.to_string());
                self.load_demo()
            }
        }
    }

    /// Same as `load_keys`, announced as a refresh.
    pub async fn refresh(&self) -> KeySource {
        self.alert(AlertLevel::Info, "Refreshing data...");
        self.load_keys().await
    }

    /// Replace the collection with the built-in demo records.
    pub fn load_demo(&self) -> KeySource {
        self.alert(AlertLevel::Info, "Loading demo data...");
        self.keys.write().replace(demo_keys(), KeySource::Demo);
        self.announce_keys();
        self.alert(AlertLevel::Warning, "Demo data loaded (offline mode)");
        KeySource::Demo
    }

    /// Rows are decoded one at a time; a row that still fails is skipped.
    async fn fetch_keys(&self) -> ApiResult<Vec<KeyRecord>> {
        let reply = self.api.invoke(Operation::GetKeys, CallParams::new()).await?;
        let rows = reply
            .decode_field::<Vec<serde_json::Value>>("keys")?
            .unwrap_or_default();

        Ok(rows
            .into_iter()
            .enumerate()
            .filter_map(|(row, value)| {
                serde_json::from_value::<KeyRecord>(value)
                    .inspect_err(|error| warn!(row, error = %error, "Skipping undecodable key row"))
                    .ok()
            })
            .collect())
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Ban a key remotely, then mark it banned locally.
    pub async fn ban_key(&self, key: &str) -> KeyAdminResult<()> {
        let key = self.validated(normalize_key(key))?;
        self.alert(AlertLevel::Info, "Banning key...");

        let params = CallParams::new().with("key", key.as_str());
        if let Err(error) = self.api.invoke(Operation::Ban, params).await {
            return Err(self.failed(Operation::Ban, "Error", error));
        }

        if self.keys.write().mark_banned(&key) {
            self.announce_keys();
        }
        info!(key = %key, "Key banned");
        self.alert(
            AlertLevel::Success,
            format!("Successfully banned key: {}", key),
        );
        Ok(())
    }

    /// Delete a key remotely, then drop it locally.
    pub async fn delete_key(&self, key: &str) -> KeyAdminResult<()> {
        let key = self.validated(normalize_key(key))?;
        self.alert(AlertLevel::Info, "Deleting key...");

        let params = CallParams::new().with("key", key.as_str());
        if let Err(error) = self.api.invoke(Operation::DeleteKey, params).await {
            return Err(self.failed(Operation::DeleteKey, "Error", error));
        }

        if self.keys.write().remove(&key) {
            self.announce_keys();
        }
        info!(key = %key, "Key deleted");
        self.alert(
            AlertLevel::Success,
            format!("Successfully deleted key: {}", key),
        );
        Ok(())
    }

    /// Create a key and append it to the collection.
    ///
    /// The expiry comes from the server; when the reply omits it, it is
    /// computed locally as today plus `expire_days`.
    pub async fn add_key(&self, request: NewKey) -> KeyAdminResult<KeyRecord> {
        let request = self.validated(request.normalized())?;
        if self.keys.read().contains(&request.key) {
            return Err(self.rejected(KeyAdminError::validation("Key already exists")));
        }
        self.alert(AlertLevel::Info, "Adding new key...");

        let params = CallParams::new()
            .with("key", request.key.as_str())
            .with("expire_days", request.expire_days)
            .with("notes", request.notes.as_str());
        let reply = match self.api.invoke(Operation::AddKey, params).await {
            Ok(reply) => reply,
            Err(error) => return Err(self.failed(Operation::AddKey, "Failed to add key", error)),
        };

        let today = self.today();
        let expire_date = match reply.str_field("expire_date") {
            Some(date) => date.to_string(),
            None => {
                debug!(key = %request.key, "Reply has no expire_date, computing locally");
                expiry_after(today, request.expire_days)
            }
        };

        let record = KeyRecord::new(
            request.key.as_str(),
            expire_date,
            request.notes.as_str(),
            today.format(SHEET_DATE_FORMAT).to_string(),
        );
        self.keys.write().push(record.clone());
        self.announce_keys();

        info!(key = %record.key, expire_date = %record.expire_date, "Key added");
        self.alert(AlertLevel::Success, "Key added successfully!");
        Ok(record)
    }

    /// Change notes and expiry of a key held locally.
    pub async fn update_key(&self, request: UpdateKey) -> KeyAdminResult<KeyRecord> {
        let request = self.validated(request.normalized())?;
        if !self.keys.read().contains(&request.key) {
            return Err(self.rejected(KeyAdminError::validation(format!(
                "Key not found: {}",
                request.key
            ))));
        }
        self.alert(AlertLevel::Info, "Updating key...");

        let params = CallParams::new()
            .with("key", request.key.as_str())
            .with("expire_days", request.expire_days)
            .with("notes", request.notes.as_str());
        let reply = match self.api.invoke(Operation::UpdateKey, params).await {
            Ok(reply) => reply,
            Err(error) => {
                return Err(self.failed(Operation::UpdateKey, "Failed to update key", error))
            }
        };

        let updated = self.keys.write().update(
            &request.key,
            &request.notes,
            reply.str_field("expire_date"),
        );
        // Deleted while the call was in flight
        let Some(record) = updated else {
            return Err(self.rejected(KeyAdminError::validation(format!(
                "Key not found: {}",
                request.key
            ))));
        };
        self.announce_keys();

        info!(key = %record.key, expire_date = %record.expire_date, "Key updated");
        self.alert(AlertLevel::Success, "Key updated successfully!");
        Ok(record)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Snapshot of every record.
    pub fn keys(&self) -> Vec<KeyRecord> {
        self.keys.read().records().to_vec()
    }

    pub fn source(&self) -> KeySource {
        self.keys.read().source()
    }

    pub fn search(&self, term: &str) -> Vec<KeyRecord> {
        self.keys.read().search(term)
    }

    /// Statistics as of today.
    pub fn stats(&self) -> KeyStats {
        self.stats_on(self.today())
    }

    pub fn stats_on(&self, today: NaiveDate) -> KeyStats {
        self.keys.read().stats(today)
    }

    /// Current UTC date according to the service clock.
    pub fn today(&self) -> NaiveDate {
        let millis = i64::try_from(self.time.now_ms()).unwrap_or(i64::MAX);
        DateTime::<Utc>::from_timestamp_millis(millis)
            .map(|dt| dt.date_naive())
            .unwrap_or_default()
    }

    pub fn connectivity(&self) -> ConnectivitySnapshot {
        self.api.connectivity().snapshot()
    }

    /// Host network notification.
    pub fn set_network_available(&self, online: bool) {
        self.api.connectivity().set_external(online);
        if online {
            self.alert(AlertLevel::Success, "Connection restored");
        } else {
            self.alert(AlertLevel::Warning, "You are offline");
        }
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    fn alert(&self, level: AlertLevel, message: impl Into<String>) {
        self.publisher.publish(PanelEvent::alert(level, message));
    }

    fn announce_keys(&self) {
        let (total, demo) = {
            let keys = self.keys.read();
            (keys.len(), keys.source().is_demo())
        };
        self.publisher
            .publish(PanelEvent::KeysChanged { total, demo });
    }

    fn validated<T>(&self, result: KeyAdminResult<T>) -> KeyAdminResult<T> {
        result.inspect_err(|error| self.alert(AlertLevel::Error, error.to_string()))
    }

    fn rejected(&self, error: KeyAdminError) -> KeyAdminError {
        self.alert(AlertLevel::Error, error.to_string());
        error
    }

    fn failed(&self, operation: Operation, prefix: &str, error: ApiError) -> KeyAdminError {
        warn!(operation = %operation, error = %error, "Key operation failed");
        self.alert(AlertLevel::Error, format!("{}: {}", prefix, error));
        error.into()
    }
}

/// `today + days`, formatted the way the sheet does.
fn expiry_after(today: NaiveDate, days: u32) -> String {
    today
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
        .format(SHEET_DATE_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kg_01_bridge::test_utils::{FixedTimeSource, StubTransport};
    use kg_01_bridge::{CallBuilder, CallFailure, CallResult, ConnectivityState, RetryConfig};
    use serde_json::json;
    use shared_bus::{EventFilter, InMemoryEventBus, Subscription};
    use shared_types::KeyStatus;
    use std::time::Duration;

    // 2025-03-01T00:00:00Z
    const NOW_MS: u64 = 1_740_787_200_000;

    struct Harness {
        service: KeyAdminService,
        transport: Arc<StubTransport>,
        events: Subscription,
    }

    fn harness(results: Vec<CallResult>) -> Harness {
        let bus = Arc::new(InMemoryEventBus::new());
        let events = bus.subscribe(EventFilter::all());
        let transport = Arc::new(StubTransport::new(results));

        let builder =
            Arc::new(CallBuilder::new("https://script.example.com/exec", "271006").unwrap());
        let connectivity = Arc::new(ConnectivityState::with_publisher(bus.clone()));
        let policy = RetryConfig {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        };
        let api = Arc::new(RetryCoordinator::new(
            builder,
            transport.clone(),
            connectivity,
            policy,
        ));

        let service = KeyAdminService::new(api, bus)
            .with_time_source(Arc::new(FixedTimeSource::new(NOW_MS)));
        Harness {
            service,
            transport,
            events,
        }
    }

    fn ok(payload: serde_json::Value) -> CallResult {
        Ok(payload)
    }

    fn down() -> CallResult {
        Err(CallFailure::transport("connection refused"))
    }

    fn remote_keys() -> serde_json::Value {
        json!({
            "success": true,
            "keys": [
                {"key": "K-1", "expire_date": "2026-01-01", "status": "active",
                 "hwid": "PC-1", "notes": "", "created_date": "2025-01-01"},
                {"key": "K-2", "expire_date": "2024-01-01", "status": "banned",
                 "hwid": "", "notes": "abuse", "created_date": "2023-01-01"}
            ]
        })
    }

    fn alerts(events: &mut Subscription) -> Vec<(AlertLevel, String)> {
        events
            .drain()
            .into_iter()
            .filter_map(|event| match event {
                PanelEvent::Alert { level, message } => Some((level, message)),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_initialize_loads_remote_keys() {
        let mut h = harness(vec![ok(json!({"success": true})), ok(remote_keys())]);

        assert_eq!(h.service.initialize().await, KeySource::Remote);
        assert_eq!(h.service.keys().len(), 2);
        assert_eq!(h.service.source(), KeySource::Remote);

        let targets = h.transport.targets();
        assert_eq!(targets[0].operation(), Operation::Test);
        assert_eq!(targets[1].operation(), Operation::GetKeys);

        let alerts = alerts(&mut h.events);
        assert!(alerts
            .iter()
            .any(|(l, m)| *l == AlertLevel::Success && m == "Loaded 2 keys successfully!"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_initialize_offline_uses_demo_without_retry() {
        let mut h = harness(vec![down()]);

        assert_eq!(h.service.initialize().await, KeySource::Demo);
        // Single probe attempt, no getkeys
        assert_eq!(h.transport.attempts(), 1);
        assert_eq!(h.service.keys().len(), 3);

        let events = h.events.drain();
        assert!(events.contains(&PanelEvent::KeysChanged {
            total: 3,
            demo: true
        }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_failure_falls_back_to_demo() {
        let mut h = harness(vec![down()]);

        assert_eq!(h.service.load_keys().await, KeySource::Demo);
        assert_eq!(h.transport.attempts(), 3);
        assert!(h.service.keys().iter().any(|k| k.key == "VIP-KEY-2024"));

        let alerts = alerts(&mut h.events);
        assert!(alerts
            .iter()
            .any(|(l, m)| *l == AlertLevel::Warning && m.starts_with("Connection failed")));
    }

    #[tokio::test]
    async fn test_rejected_load_falls_back_to_demo() {
        let h = harness(vec![ok(json!({"success": false, "message": "Invalid secret"}))]);

        assert_eq!(h.service.refresh().await, KeySource::Demo);
        assert_eq!(h.transport.attempts(), 1);
        // A rejection still proves the API is reachable
        assert!(h.service.connectivity().online);
    }

    #[tokio::test]
    async fn test_missing_keys_field_is_empty_collection() {
        let h = harness(vec![ok(json!({"success": true}))]);
        assert_eq!(h.service.load_keys().await, KeySource::Remote);
        assert!(h.service.keys().is_empty());
    }

    #[tokio::test]
    async fn test_loose_rows_are_kept() {
        let h = harness(vec![ok(json!({
            "success": true,
            "keys": [
                {"key": "K-1", "expire_date": "2026-01-01", "status": "active",
                 "hwid": "PC-1", "notes": "", "created_date": "2025-01-01"},
                {"key": "K-2", "expire_date": "2026-01-01", "status": "",
                 "hwid": null, "notes": null, "created_date": null},
                {"key": 123456, "expire_date": "2026-01-01", "status": "Active"}
            ]
        }))]);

        assert_eq!(h.service.load_keys().await, KeySource::Remote);
        let keys = h.service.keys();
        let names: Vec<&str> = keys.iter().map(|k| k.key.as_str()).collect();
        assert_eq!(names, ["K-1", "K-2", "123456"]);
        assert!(keys[1].notes.is_empty());
        assert!(keys[1].hwid().is_none());
        assert_eq!(keys[2].status, KeyStatus::Active);
    }

    #[tokio::test]
    async fn test_undecodable_row_is_skipped() {
        let h = harness(vec![ok(json!({
            "success": true,
            "keys": [
                {"key": "K-1", "expire_date": "2026-01-01", "status": "active"},
                {"notes": "row without a key"},
                "not a row"
            ]
        }))]);

        assert_eq!(h.service.load_keys().await, KeySource::Remote);
        assert_eq!(h.service.keys().len(), 1);
        assert_eq!(h.service.keys()[0].key, "K-1");
    }

    #[tokio::test]
    async fn test_ban_marks_local_record() {
        let h = harness(vec![ok(remote_keys()), ok(json!({"success": true}))]);
        h.service.load_keys().await;

        h.service.ban_key("K-1").await.unwrap();

        let target = h.transport.targets().pop().unwrap();
        assert_eq!(target.operation(), Operation::Ban);
        assert_eq!(target.query_value("key").as_deref(), Some("K-1"));
        assert_eq!(h.service.stats_on(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()).banned_keys, 2);
    }

    #[tokio::test]
    async fn test_blank_key_never_reaches_network() {
        let mut h = harness(vec![ok(json!({"success": true}))]);

        let err = h.service.ban_key("   ").await.unwrap_err();
        assert!(matches!(err, KeyAdminError::Validation(_)));
        assert!(h.service.delete_key("").await.is_err());
        assert_eq!(h.transport.attempts(), 0);

        let alerts = alerts(&mut h.events);
        assert_eq!(alerts[0], (AlertLevel::Error, "Please enter a key".to_string()));
    }

    #[tokio::test]
    async fn test_rejected_ban_leaves_collection_alone() {
        let mut h = harness(vec![
            ok(remote_keys()),
            ok(json!({"success": false, "message": "Key not found"})),
        ]);
        h.service.load_keys().await;
        h.events.drain();

        let err = h.service.ban_key("K-1").await.unwrap_err();
        assert_eq!(err, KeyAdminError::Api(ApiError::application("Key not found")));
        assert!(!err.is_connectivity());
        assert_eq!(h.service.keys()[0].status, KeyStatus::Active);

        let alerts = alerts(&mut h.events);
        assert_eq!(
            alerts.last().unwrap(),
            &(AlertLevel::Error, "Error: Key not found".to_string())
        );
    }

    #[tokio::test]
    async fn test_delete_removes_local_record() {
        let h = harness(vec![ok(remote_keys()), ok(json!({"success": true}))]);
        h.service.load_keys().await;

        h.service.delete_key("K-2").await.unwrap();
        assert_eq!(h.service.keys().len(), 1);
        assert_eq!(
            h.transport.targets().pop().unwrap().operation(),
            Operation::DeleteKey
        );
    }

    #[tokio::test]
    async fn test_add_key_uses_returned_expiry() {
        let h = harness(vec![
            ok(remote_keys()),
            ok(json!({"success": true, "expire_date": "2025-03-31"})),
        ]);
        h.service.load_keys().await;

        let record = h
            .service
            .add_key(NewKey::new(" NEW-1 ", 30, " trial "))
            .await
            .unwrap();

        assert_eq!(record.key, "NEW-1");
        assert_eq!(record.expire_date, "2025-03-31");
        assert_eq!(record.created_date, "2025-03-01");
        assert_eq!(record.status, KeyStatus::Active);
        assert_eq!(record.hwid(), None);
        assert_eq!(h.service.keys().len(), 3);

        let target = h.transport.targets().pop().unwrap();
        assert_eq!(target.query_value("key").as_deref(), Some("NEW-1"));
        assert_eq!(target.query_value("expire_days").as_deref(), Some("30"));
        assert_eq!(target.query_value("notes").as_deref(), Some("trial"));
    }

    #[tokio::test]
    async fn test_add_key_computes_expiry_when_missing() {
        let h = harness(vec![ok(json!({"success": true}))]);
        let record = h.service.add_key(NewKey::new("NEW-2", 10, "")).await.unwrap();
        assert_eq!(record.expire_date, "2025-03-11");

        // Empty notes are not sent
        let target = h.transport.targets().pop().unwrap();
        assert!(target.query_value("notes").is_none());
    }

    #[tokio::test]
    async fn test_add_key_validation() {
        let h = harness(vec![ok(remote_keys())]);
        h.service.load_keys().await;
        let before = h.transport.attempts();

        assert!(h.service.add_key(NewKey::new("", 30, "")).await.is_err());
        assert!(h.service.add_key(NewKey::new("X", 0, "")).await.is_err());
        assert!(h.service.add_key(NewKey::new("X", 3651, "")).await.is_err());
        assert_eq!(
            h.service.add_key(NewKey::new("K-1", 30, "")).await,
            Err(KeyAdminError::validation("Key already exists"))
        );
        assert_eq!(h.transport.attempts(), before);
    }

    #[tokio::test]
    async fn test_update_key() {
        let h = harness(vec![
            ok(remote_keys()),
            ok(json!({"success": true, "expire_date": "2026-06-01"})),
            ok(json!({"success": true})),
        ]);
        h.service.load_keys().await;

        let record = h
            .service
            .update_key(UpdateKey::new("K-1", 90, "renewed"))
            .await
            .unwrap();
        assert_eq!(record.notes, "renewed");
        assert_eq!(record.expire_date, "2026-06-01");

        // No expiry in the reply keeps the current one
        let record = h
            .service
            .update_key(UpdateKey::new("K-1", 90, "again"))
            .await
            .unwrap();
        assert_eq!(record.expire_date, "2026-06-01");
        assert_eq!(record.notes, "again");
    }

    #[tokio::test]
    async fn test_update_unknown_key_is_validation_error() {
        let h = harness(vec![ok(remote_keys())]);
        h.service.load_keys().await;

        let err = h
            .service
            .update_key(UpdateKey::new("MISSING", 30, ""))
            .await
            .unwrap_err();
        assert_eq!(err, KeyAdminError::validation("Key not found: MISSING"));
        assert_eq!(h.transport.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_mutation_is_connectivity_error() {
        let h = harness(vec![ok(remote_keys()), down()]);
        h.service.load_keys().await;

        let err = h.service.delete_key("K-1").await.unwrap_err();
        assert!(err.is_connectivity());
        assert_eq!(h.service.keys().len(), 2);
        assert!(!h.service.connectivity().online);
    }

    #[tokio::test]
    async fn test_search_and_stats() {
        let h = harness(vec![ok(remote_keys())]);
        h.service.load_keys().await;

        assert_eq!(h.service.search("pc-1").len(), 1);
        assert_eq!(h.service.search("ABUSE").len(), 1);
        assert_eq!(h.service.search("").len(), 2);

        let stats = h.service.stats();
        assert_eq!(stats.total_keys, 2);
        assert_eq!(stats.active_keys, 1);
        assert_eq!(stats.banned_keys, 1);
        assert_eq!(stats.expired_keys, 1);
        assert_eq!(stats.active_users, 0);
    }

    #[tokio::test]
    async fn test_key_expiring_today_is_expired() {
        let h = harness(vec![ok(json!({
            "success": true,
            "keys": [{"key": "LAST-DAY", "expire_date": "2025-03-01", "status": "active"}]
        }))]);
        h.service.load_keys().await;

        let stats = h.service.stats();
        assert_eq!(stats.expired_keys, 1);
        assert_eq!(stats.active_users, 0);
    }

    #[test]
    fn test_today_from_clock() {
        let h = harness(vec![]);
        assert_eq!(h.service.today(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn test_network_notifications() {
        let mut h = harness(vec![]);

        h.service.set_network_available(false);
        assert!(!h.service.connectivity().online);
        h.service.set_network_available(true);
        assert!(h.service.connectivity().online);

        let events = h.events.drain();
        let transitions: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                PanelEvent::ConnectivityChanged(t) => Some(t.label()),
                _ => None,
            })
            .collect();
        assert_eq!(transitions, vec!["OFFLINE", "ONLINE"]);
        assert!(events.contains(&PanelEvent::alert(AlertLevel::Warning, "You are offline")));
    }

    #[test]
    fn test_expiry_after() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        assert_eq!(expiry_after(today, 7), "2025-01-01");
    }
}
