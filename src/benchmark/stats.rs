use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Distribution, Max, Min, OrderStatistics};

/// Summary of per-iteration timings, all durations in seconds.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub stddev: f64,
    pub rounds: u64,
    pub median: f64,
    pub iqr: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr_outliers: u64,
    pub stddev_outliers: u64,
    pub outliers: String,
    pub ld15iqr: f64,
    pub hd15iqr: f64,
    pub ops: f64,
    pub total: f64,
    pub iterations: u64,
    pub data: Vec<f64>,
}

impl Stats {
    /// `samples` holds one per-iteration duration for every round.
    pub fn from_samples(samples: &[f64], iterations: u64) -> Self {
        if samples.is_empty() {
            return Stats {
                iterations,
                outliers: "0;0".to_string(),
                ..Default::default()
            };
        }

        let mut data = Data::new(samples.to_vec());
        let rounds = samples.len() as u64;
        let mean = data.mean().unwrap_or(0.0);
        let stddev = if rounds < 2 {
            0.0
        } else {
            data.std_dev().unwrap_or(0.0)
        };
        let median = data.median();
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        let (q1, q3) = quartiles(&sorted);
        let iqr = q3 - q1;

        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;
        let ld15iqr = samples
            .iter()
            .copied()
            .filter(|s| *s >= low_fence)
            .fold(f64::INFINITY, f64::min);
        let hd15iqr = samples
            .iter()
            .copied()
            .filter(|s| *s <= high_fence)
            .fold(f64::NEG_INFINITY, f64::max);
        let iqr_outliers = samples
            .iter()
            .filter(|s| **s < low_fence || **s > high_fence)
            .count() as u64;
        let stddev_outliers = samples
            .iter()
            .filter(|s| **s < mean - stddev || **s > mean + stddev)
            .count() as u64;

        Stats {
            min: data.min(),
            max: data.max(),
            mean,
            stddev,
            rounds,
            median,
            iqr,
            q1,
            q3,
            iqr_outliers,
            stddev_outliers,
            outliers: format!("{stddev_outliers};{iqr_outliers}"),
            ld15iqr,
            hd15iqr,
            ops: if mean > 0.0 { 1.0 / mean } else { 0.0 },
            total: samples.iter().sum(),
            iterations,
            data: samples.to_vec(),
        }
    }
}

/// Quartiles of sorted data. Even counts take the medians of the lower
/// and upper halves, odd counts interpolate between neighbours.
fn quartiles(sorted: &[f64]) -> (f64, f64) {
    let n = sorted.len();
    match n {
        0 => (0.0, 0.0),
        1 => (sorted[0], sorted[0]),
        _ if n % 2 == 0 => (
            Data::new(sorted[..n / 2].to_vec()).median(),
            Data::new(sorted[n / 2..].to_vec()).median(),
        ),
        _ => {
            let (k, r) = (n / 4, n % 4);
            if r == 1 {
                (
                    0.25 * sorted[k - 1] + 0.75 * sorted[k],
                    0.75 * sorted[3 * k] + 0.25 * sorted[3 * k + 1],
                )
            } else {
                (
                    0.75 * sorted[k] + 0.25 * sorted[k + 1],
                    0.25 * sorted[3 * k + 1] + 0.75 * sorted[3 * k + 2],
                )
            }
        }
    }
}
