use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};
use tn_counsel::config::DatasetConfig;
use tn_counsel::counselling::scoring::{is_slider_value, MAX_WEIGHT};
use tn_counsel::counselling::{DatasetLoader, DatasetSnapshot};
use tn_counsel::error::AppError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) dataset: DatasetConfig,
    snapshot: Arc<RwLock<Arc<DatasetSnapshot>>>,
}

impl AppState {
    pub(crate) fn new(
        readiness: Arc<AtomicBool>,
        metrics: Arc<PrometheusHandle>,
        dataset: DatasetConfig,
        snapshot: DatasetSnapshot,
    ) -> Self {
        Self {
            readiness,
            metrics,
            dataset,
            snapshot: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    pub(crate) fn snapshot(&self) -> Result<Arc<DatasetSnapshot>, AppError> {
        let guard = self
            .snapshot
            .read()
            .map_err(|_| AppError::State("dataset snapshot lock poisoned".to_string()))?;
        Ok(Arc::clone(&guard))
    }

    pub(crate) fn replace_snapshot(&self, snapshot: DatasetSnapshot) -> Result<(), AppError> {
        let mut guard = self
            .snapshot
            .write()
            .map_err(|_| AppError::State("dataset snapshot lock poisoned".to_string()))?;
        *guard = Arc::new(snapshot);
        Ok(())
    }
}

pub(crate) fn load_snapshot(config: &DatasetConfig) -> Result<DatasetSnapshot, AppError> {
    let dataset = DatasetLoader::from_dir(&config.data_dir, config.year)?;
    Ok(DatasetSnapshot::compute(dataset))
}

pub(crate) fn parse_weight(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|err| format!("failed to parse '{raw}' as a number ({err})"))?;
    if is_slider_value(value) {
        Ok(value)
    } else {
        Err(format!(
            "weight must be a whole number between 0 and {MAX_WEIGHT}, got {value}"
        ))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::path::PathBuf;

    pub(crate) fn dataset_config() -> DatasetConfig {
        DatasetConfig {
            data_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("../../crates/tn-counsel/tests/data"),
            year: 2020,
        }
    }

    pub(crate) fn app_state(ready: bool) -> AppState {
        let config = dataset_config();
        let snapshot = load_snapshot(&config).expect("fixture snapshot loads");
        let handle = PrometheusBuilder::new().build_recorder().handle();
        AppState::new(
            Arc::new(AtomicBool::new(ready)),
            Arc::new(handle),
            config,
            snapshot,
        )
    }
}
