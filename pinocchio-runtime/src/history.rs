//  HISTORY.rs
//    Run-historic records produced by the driver and consumed by
//    external presentation code.
//

use serde::{Deserialize, Serialize};

use pinocchio_core::error::Error;


/***** STEP LOG *****/
/// The last agent's signal dict for one step, plus the aggregated
/// violation total under the `"V"` key: the last agent's signal dict
/// plus the aggregated `V`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StepLog {
    pub r: f64,
    pub v: f64,
    pub a: f64,
    pub d: f64,
}


/***** RUN RECORD *****/
/// One completed (or in-progress) run, JSON-serialisable for external
/// presentation tooling.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: usize,
    pub title: String,
    pub steps: u64,
    pub total_time_secs: f64,
    pub logs: Vec<StepLog>,
    /// Windowed moving averages of R and V, keyed by signal name.
    pub evolution: std::collections::BTreeMap<String, Vec<f64>>,
}

/// Computes the moving average of `data` over a window of `window`
/// samples using the prefix-sum technique, matching `environment.py`'s
/// `movingAverage`.
///
/// # Errors
/// Returns [`Error::InvalidWindow`] if `window` is not strictly positive.
pub fn moving_average(data: &[f64], window: i64) -> Result<Vec<f64>, Error> {
    if window <= 0 {
        return Err(Error::InvalidWindow { window });
    }
    let window = window as usize;
    if data.is_empty() || window > data.len() {
        return Ok(Vec::new());
    }

    let mut cumsum = vec![0.0; data.len() + 1];
    for (i, x) in data.iter().enumerate() {
        cumsum[i + 1] = cumsum[i] + x;
    }
    Ok((0..=data.len() - window).map(|i| (cumsum[i + window] - cumsum[i]) / window as f64).collect())
}


/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_window_errors() {
        assert!(matches!(moving_average(&[1.0, 2.0], 0), Err(Error::InvalidWindow { .. })));
        assert!(matches!(moving_average(&[1.0, 2.0], -3), Err(Error::InvalidWindow { .. })));
    }

    #[test]
    fn moving_average_matches_manual_computation() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let avg = moving_average(&data, 2).unwrap();
        assert_eq!(avg, vec![1.5, 2.5, 3.5, 4.5]);
    }

    #[test]
    fn window_larger_than_data_is_empty() {
        assert_eq!(moving_average(&[1.0], 5).unwrap(), Vec::<f64>::new());
    }

    #[test]
    fn run_record_round_trips_through_json() {
        let mut evolution = std::collections::BTreeMap::new();
        evolution.insert("R".to_string(), vec![1.0, 2.0]);
        let record = RunRecord { id: 0, title: "Run 1".into(), steps: 10, total_time_secs: 0.5, logs: vec![StepLog { r: 1.0, v: 0.0, a: 0.0, d: 0.0 }], evolution };
        let json = serde_json::to_string(&record).unwrap();
        let back: RunRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.steps, 10);
        assert_eq!(back.logs.len(), 1);
    }
}
