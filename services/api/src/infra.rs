use async_trait::async_trait;
use engineer_intake::workflows::intake::{
    Coordinates, FinalizedIntake, GeocodeError, HandoffError, IntakeHandoff, LoggingHandoff,
    ReverseGeocoder,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Hand-off that logs like [`LoggingHandoff`] and keeps a copy so the demo can print it.
#[derive(Default, Clone)]
pub(crate) struct InMemoryHandoff {
    intakes: Arc<Mutex<Vec<FinalizedIntake>>>,
}

impl IntakeHandoff for InMemoryHandoff {
    fn hand_off(&self, intake: FinalizedIntake) -> Result<(), HandoffError> {
        LoggingHandoff.hand_off(intake.clone())?;
        let mut guard = self.intakes.lock().expect("handoff mutex poisoned");
        guard.push(intake);
        Ok(())
    }
}

impl InMemoryHandoff {
    pub(crate) fn intakes(&self) -> Vec<FinalizedIntake> {
        self.intakes.lock().expect("handoff mutex poisoned").clone()
    }
}

/// Geocoder that never finds a name, so addresses fall back to formatted coordinates.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct OfflineGeocoder;

#[async_trait]
impl ReverseGeocoder for OfflineGeocoder {
    async fn display_name(&self, _at: Coordinates) -> Result<Option<String>, GeocodeError> {
        Ok(None)
    }
}
