//! Common Air Quality Index (CAQI) helpers
//!
//! Hourly grid for PM10 and PM2.5 (µg/m³). The index is piecewise linear
//! within each band and the overall value is the worst pollutant.
//!
//! | level     | index   | PM10 1h  | PM2.5 1h |
//! |-----------|---------|----------|----------|
//! | very low  | 0-25    | 0-25     | 0-15     |
//! | low       | 25-50   | 25-50    | 15-30    |
//! | medium    | 50-75   | 50-90    | 30-55    |
//! | high      | 75-100  | 90-180   | 55-110   |
//! | very high | >100    | >180     | >110     |

const INDEX_BP: [f64; 5] = [0.0, 25.0, 50.0, 75.0, 100.0];
const PM10_1H_BP: [f64; 5] = [0.0, 25.0, 50.0, 90.0, 180.0];
const PM25_1H_BP: [f64; 5] = [0.0, 15.0, 30.0, 55.0, 110.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaqiLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl CaqiLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaqiLevel::VeryLow => "very low",
            CaqiLevel::Low => "low",
            CaqiLevel::Medium => "medium",
            CaqiLevel::High => "high",
            CaqiLevel::VeryHigh => "very high",
        }
    }

    pub fn from_index(index: u32) -> Self {
        match index {
            0..=25 => CaqiLevel::VeryLow,
            26..=50 => CaqiLevel::Low,
            51..=75 => CaqiLevel::Medium,
            76..=100 => CaqiLevel::High,
            _ => CaqiLevel::VeryHigh,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caqi {
    pub value: u32,
    pub level: CaqiLevel,
}

/// Index for a single concentration on the given breakpoint grid.
/// Past the last breakpoint the top band's slope is extended.
fn sub_index(concentration: f64, breakpoints: &[f64; 5]) -> Option<f64> {
    if !concentration.is_finite() || concentration < 0.0 {
        return None;
    }

    let band = breakpoints
        .windows(2)
        .position(|w| concentration <= w[1])
        .unwrap_or(breakpoints.len() - 2);

    let (c_lo, c_hi) = (breakpoints[band], breakpoints[band + 1]);
    let (i_lo, i_hi) = (INDEX_BP[band], INDEX_BP[band + 1]);

    Some((i_hi - i_lo) / (c_hi - c_lo) * (concentration - c_lo) + i_lo)
}

/// Hourly CAQI from PM10 and PM2.5 readings.
/// Returns `None` when both inputs are missing or any given input is invalid.
pub fn get_caqi(pm10_1h: Option<f64>, pm25_1h: Option<f64>) -> Option<Caqi> {
    let mut worst: Option<f64> = None;

    for (reading, breakpoints) in [(pm10_1h, &PM10_1H_BP), (pm25_1h, &PM25_1H_BP)] {
        if let Some(concentration) = reading {
            let index = sub_index(concentration, breakpoints)?;
            worst = Some(worst.map_or(index, |w| w.max(index)));
        }
    }

    let value = worst?.round() as u32;
    Some(Caqi {
        value,
        level: CaqiLevel::from_index(value),
    })
}
