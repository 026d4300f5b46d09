//! End-to-end flow through the assembled engine: observation →
//! candidates → deduplication gate → lifecycle → statistics.

use std::sync::Arc;

use alert_engine::{Admission, AlertEngine, EngineConfig, EngineError};
use alert_model::{AlertType, Observation, RiskTier, Severity};
use chrono::{Duration, Utc};
use storage::MemoryStore;

fn engine() -> AlertEngine<MemoryStore> {
    AlertEngine::new(Arc::new(MemoryStore::new()), EngineConfig::default()).unwrap()
}

fn observation(location_id: i64, temperature: f64) -> Observation {
    Observation {
        temperature: Some(temperature),
        recorded_at: Some(Utc::now()),
        observation_id: Some(100),
        ..Observation::empty(location_id, "open-meteo")
    }
}

#[tokio::test]
async fn heat_wave_raises_exactly_one_active_alert() {
    let engine = engine();

    let candidates = engine.evaluate(&observation(1, 46.0));
    assert_eq!(candidates.len(), 1);
    let candidate = candidates.into_iter().next().unwrap();
    assert_eq!(candidate.alert_type, AlertType::HighTemperature);
    assert_eq!(candidate.risk_tier, RiskTier::Critico);
    assert_eq!(candidate.threshold_value, 45.0);
    assert_eq!(candidate.observed_value, 46.0);

    let admission = engine.admit_and_create(candidate).await.unwrap();
    assert!(admission.created());

    let active = engine.list_active(Some(1)).unwrap();
    assert_eq!(active.len(), 1);
    assert!(active[0].is_active);
    assert_eq!(active[0].observation_id, Some(100));
}

#[tokio::test]
async fn repeat_breach_one_minute_later_is_suppressed() {
    let engine = engine();

    let first = engine.evaluate(&observation(1, 46.0)).remove(0);
    assert!(engine.admit_and_create(first).await.unwrap().created());

    let mut later = observation(1, 46.0);
    later.recorded_at = Some(Utc::now() + Duration::minutes(1));
    let second = engine.evaluate(&later).remove(0);
    assert!(matches!(
        engine.admit_and_create(second).await.unwrap(),
        Admission::Suppressed { existing_id: Some(_) }
    ));

    assert_eq!(engine.list_active(Some(1)).unwrap().len(), 1);
}

#[tokio::test]
async fn breach_after_suppression_window_is_a_new_alert() {
    let engine = engine();

    let mut old = observation(1, 46.0);
    old.recorded_at = Some(Utc::now() - Duration::hours(25));
    let candidate = engine.evaluate(&old).remove(0);
    assert!(engine.admit_and_create(candidate).await.unwrap().created());

    let candidate = engine.evaluate(&observation(1, 46.0)).remove(0);
    assert!(engine.admit_and_create(candidate).await.unwrap().created());

    assert_eq!(engine.list_active(Some(1)).unwrap().len(), 2);
}

#[tokio::test]
async fn deep_cold_classifies_as_critical_low_temperature() {
    let engine = engine();

    let candidates = engine.evaluate(&observation(1, -12.0));
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].alert_type, AlertType::LowTemperature);
    assert_eq!(candidates[0].risk_tier, RiskTier::Critico);
    assert_eq!(candidates[0].threshold_value, -10.0);
}

#[tokio::test]
async fn deactivation_flows_through_lifecycle() {
    let engine = engine();

    let candidate = engine.evaluate(&observation(1, 46.0)).remove(0);
    let Admission::Created(alert) = engine.admit_and_create(candidate).await.unwrap() else {
        panic!("expected creation");
    };

    assert!(engine.deactivate(alert.id).unwrap());
    assert!(!engine.deactivate(alert.id).unwrap());
    assert!(matches!(engine.deactivate(9999).unwrap_err(), EngineError::NotFound(9999)));
    assert!(engine.list_active(Some(1)).unwrap().is_empty());
}

#[tokio::test]
async fn statistics_reflect_admitted_alerts() {
    let engine = engine();

    for (location, temperature) in [(1, 46.0), (2, 41.0), (2, -12.0)] {
        let candidate = engine.evaluate(&observation(location, temperature)).remove(0);
        assert!(engine.admit_and_create(candidate).await.unwrap().created());
    }

    let stats = engine.statistics(30).unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.active, 3);
    assert_eq!(stats.by_type[&AlertType::HighTemperature], 2);
    assert_eq!(stats.by_type[&AlertType::LowTemperature], 1);
    assert_eq!(stats.by_risk_tier[&RiskTier::Critico], 2);
    assert_eq!(stats.most_affected_location, Some(2));
}

#[tokio::test]
async fn alert_types_catalog_is_complete() {
    let engine = engine();
    let types = engine.alert_types();

    assert_eq!(types.len(), 5);
    let wind = types
        .iter()
        .find(|t| t.alert_type == AlertType::StrongWind)
        .unwrap();
    assert_eq!(wind.tiers.critico, 75.0);
    assert_eq!(wind.severities[&RiskTier::Alto], Severity::Advisory);
    assert_eq!(wind.severities[&RiskTier::Bajo], Severity::Warning);
}
