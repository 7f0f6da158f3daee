// Alerts store - session alert list plus the persisted dismissed set
use crate::application::key_value_store::KeyValueStore;
use crate::domain::alert::{Alert, AlertSeverity};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Storage key holding the dismissed alert IDs as a JSON string array.
/// An absent key reads as an empty set.
pub const DISMISSED_ALERTS_KEY: &str = "piste-weather.dismissed-alerts";

struct AlertsState {
    alerts: Vec<Alert>,
    dismissed: HashSet<String>,
}

/// Alert list seeded at construction plus a dismissed-ID set that survives
/// restarts. Dismissed IDs are tracked independently of the alerts
/// themselves; a stale ID that matches no current alert is harmless and
/// simply never filters anything.
pub struct AlertsStore {
    storage: Arc<dyn KeyValueStore>,
    state: RwLock<AlertsState>,
}

impl AlertsStore {
    pub fn new(alerts: Vec<Alert>, storage: Arc<dyn KeyValueStore>) -> Self {
        let dismissed = load_dismissed(storage.as_ref());
        Self {
            storage,
            state: RwLock::new(AlertsState { alerts, dismissed }),
        }
    }

    /// Non-dismissed alerts, most urgent first (ascending priority).
    /// The sort is stable so equal priorities keep their seeded order.
    pub async fn active_alerts(&self) -> Vec<Alert> {
        let state = self.state.read().await;
        let mut active: Vec<Alert> = state
            .alerts
            .iter()
            .filter(|a| !state.dismissed.contains(&a.id))
            .cloned()
            .collect();
        active.sort_by_key(|a| a.priority);
        active
    }

    /// Hide an alert and persist the full dismissed set right away.
    /// Idempotent; a storage failure is logged and the dismissal stays
    /// session-only.
    pub async fn dismiss_alert(&self, id: &str) {
        let mut state = self.state.write().await;
        if state.dismissed.insert(id.to_string()) {
            self.persist(&state.dismissed);
        }
    }

    /// Bring every dismissed alert back and persist the empty set.
    pub async fn restore_alerts(&self) {
        let mut state = self.state.write().await;
        state.dismissed.clear();
        self.persist(&state.dismissed);
    }

    /// Append to the session list. Does not touch persisted dismissals,
    /// so re-adding a previously dismissed ID keeps it hidden.
    pub async fn add_alert(&self, alert: Alert) {
        self.state.write().await.alerts.push(alert);
    }

    pub async fn alerts_of_severity(&self, severity: AlertSeverity) -> Vec<Alert> {
        self.active_alerts()
            .await
            .into_iter()
            .filter(|a| a.severity == severity)
            .collect()
    }

    pub async fn alerts_in_category(&self, category: &str) -> Vec<Alert> {
        self.active_alerts()
            .await
            .into_iter()
            .filter(|a| a.category == category)
            .collect()
    }

    fn persist(&self, dismissed: &HashSet<String>) {
        let mut ids: Vec<&str> = dismissed.iter().map(String::as_str).collect();
        ids.sort_unstable();
        match serde_json::to_string(&ids) {
            Ok(json) => {
                if let Err(e) = self.storage.set(DISMISSED_ALERTS_KEY, &json) {
                    tracing::warn!("failed to persist dismissed alerts: {}", e);
                }
            }
            Err(e) => tracing::warn!("failed to encode dismissed alerts: {}", e),
        }
    }
}

fn load_dismissed(storage: &dyn KeyValueStore) -> HashSet<String> {
    match storage.get(DISMISSED_ALERTS_KEY) {
        Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                tracing::warn!("stored dismissed-alert list is not valid JSON: {}", e);
                HashSet::new()
            }
        },
        Ok(None) => HashSet::new(),
        Err(e) => {
            tracing::warn!("could not read dismissed alerts, starting empty: {}", e);
            HashSet::new()
        }
    }
}

/// The fixed alert list a session starts with.
pub fn default_alerts() -> Vec<Alert> {
    vec![
        Alert {
            id: "avalanche-level-3".to_string(),
            severity: AlertSeverity::Danger,
            category: "safety".to_string(),
            title: "Avalanche danger level 3".to_string(),
            message: "Considerable avalanche danger above 2200 m on north-facing slopes."
                .to_string(),
            priority: 1,
            dismissible: false,
            link: Some("https://www.aemet.es/en/eltiempo/prediccion/montana".to_string()),
            timestamp: Utc::now(),
        },
        Alert {
            id: "wind-top-lifts".to_string(),
            severity: AlertSeverity::Warning,
            category: "lifts".to_string(),
            title: "Strong wind at the summit".to_string(),
            message: "Top chairlifts may close during the afternoon if gusts persist.".to_string(),
            priority: 2,
            dismissible: true,
            link: None,
            timestamp: Utc::now(),
        },
        Alert {
            id: "road-chains".to_string(),
            severity: AlertSeverity::Warning,
            category: "access".to_string(),
            title: "Chains required on the access road".to_string(),
            message: "Snow chains mandatory from the valley junction upwards.".to_string(),
            priority: 2,
            dismissible: true,
            link: None,
            timestamp: Utc::now(),
        },
        Alert {
            id: "fresh-snow-20".to_string(),
            severity: AlertSeverity::Info,
            category: "conditions".to_string(),
            title: "20 cm of fresh snow overnight".to_string(),
            message: "Powder conditions expected on upper runs this morning.".to_string(),
            priority: 5,
            dismissible: true,
            link: None,
            timestamp: Utc::now(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory_store::MemoryStore;

    fn alert(id: &str, priority: u32) -> Alert {
        Alert {
            id: id.to_string(),
            severity: AlertSeverity::Info,
            category: "conditions".to_string(),
            title: format!("alert {}", id),
            message: String::new(),
            priority,
            dismissible: true,
            link: None,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_active_alerts_sorted_by_priority_stable() {
        let store = AlertsStore::new(
            vec![alert("c", 2), alert("a", 1), alert("b", 2)],
            Arc::new(MemoryStore::default()),
        );

        let ids: Vec<String> = store
            .active_alerts()
            .await
            .into_iter()
            .map(|a| a.id)
            .collect();
        // Ties keep the seeded order: c before b
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[tokio::test]
    async fn test_dismiss_is_idempotent() {
        let store = AlertsStore::new(
            vec![alert("a", 1), alert("b", 2)],
            Arc::new(MemoryStore::default()),
        );

        store.dismiss_alert("a").await;
        let once = store.active_alerts().await;
        store.dismiss_alert("a").await;
        let twice = store.active_alerts().await;

        assert_eq!(once, twice);
        assert_eq!(once.len(), 1);
        assert_eq!(once[0].id, "b");
    }

    #[tokio::test]
    async fn test_dismissed_ids_round_trip_through_storage() {
        let storage = Arc::new(MemoryStore::default());

        let store = AlertsStore::new(vec![alert("a", 1), alert("b", 2)], storage.clone());
        store.dismiss_alert("b").await;

        // A new store over the same backing storage sees the same filtering
        let reloaded = AlertsStore::new(vec![alert("a", 1), alert("b", 2)], storage);
        let ids: Vec<String> = reloaded
            .active_alerts()
            .await
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[tokio::test]
    async fn test_stale_dismissed_id_is_harmless() {
        let storage = Arc::new(MemoryStore::default());
        storage
            .set(DISMISSED_ALERTS_KEY, r#"["gone-since-last-season"]"#)
            .unwrap();

        let store = AlertsStore::new(vec![alert("a", 1)], storage);
        assert_eq!(store.active_alerts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_persisted_value_reads_as_empty() {
        let storage = Arc::new(MemoryStore::default());
        storage.set(DISMISSED_ALERTS_KEY, "not json").unwrap();

        let store = AlertsStore::new(vec![alert("a", 1)], storage);
        assert_eq!(store.active_alerts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_restore_clears_and_persists_empty_set() {
        let storage = Arc::new(MemoryStore::default());
        let store = AlertsStore::new(vec![alert("a", 1), alert("b", 2)], storage.clone());

        store.dismiss_alert("a").await;
        store.dismiss_alert("b").await;
        assert!(store.active_alerts().await.is_empty());

        store.restore_alerts().await;
        assert_eq!(store.active_alerts().await.len(), 2);
        assert_eq!(
            storage.get(DISMISSED_ALERTS_KEY).unwrap().as_deref(),
            Some("[]")
        );
    }

    #[tokio::test]
    async fn test_add_alert_does_not_resurrect_dismissed_id() {
        let store = AlertsStore::new(vec![alert("a", 1)], Arc::new(MemoryStore::default()));
        store.dismiss_alert("a").await;

        store.add_alert(alert("a", 1)).await;
        assert!(store.active_alerts().await.is_empty());

        store.add_alert(alert("z", 9)).await;
        assert_eq!(store.active_alerts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_store_does_not_enforce_dismissible_flag() {
        // The flag is presentation guidance only; the store accepts the
        // dismissal anyway
        let mut pinned = alert("pinned", 1);
        pinned.dismissible = false;

        let store = AlertsStore::new(vec![pinned], Arc::new(MemoryStore::default()));
        store.dismiss_alert("pinned").await;
        assert!(store.active_alerts().await.is_empty());
    }

    #[tokio::test]
    async fn test_severity_and_category_filters_skip_dismissed() {
        let mut warning = alert("w", 1);
        warning.severity = AlertSeverity::Warning;
        warning.category = "lifts".to_string();

        let store = AlertsStore::new(
            vec![warning, alert("i", 2)],
            Arc::new(MemoryStore::default()),
        );

        assert_eq!(store.alerts_of_severity(AlertSeverity::Warning).await.len(), 1);
        assert_eq!(store.alerts_in_category("lifts").await.len(), 1);

        store.dismiss_alert("w").await;
        assert!(store.alerts_of_severity(AlertSeverity::Warning).await.is_empty());
        assert!(store.alerts_in_category("lifts").await.is_empty());
    }
}
