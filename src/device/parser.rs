//! Normalization of the `sensordatavalues` list

use std::collections::BTreeMap;

use serde_json::Value;

use crate::caqi;
use crate::error::{NamError, Result};
use crate::models::RawSensorReading;

/// Lower-cased sensor key -> value rounded to one decimal
pub type SensorMap = BTreeMap<String, f64>;

/// Legacy firmware keys and their current names
pub const RENAME_KEY_MAP: [(&str, &str); 7] = [
    ("bmp_pressure", "bmp180_pressure"),
    ("bmp_temperature", "bmp180_temperature"),
    ("conc_co2_ppm", "mhz14a_carbon_dioxide"),
    ("humidity", "dht22_humidity"),
    ("sds_p1", "sds011_p1"),
    ("sds_p2", "sds011_p2"),
    ("temperature", "dht22_temperature"),
];

/// Particulate sensor families that get a CAQI
pub const CAQI_SENSORS: [&str; 3] = ["pms", "sds011", "sps30"];

/// Round to one decimal on the exact decimal value, ties to even
fn round_one(value: f64) -> f64 {
    format!("{:.1}", value).parse::<f64>().unwrap_or(value)
}

fn reading_value(reading: &RawSensorReading) -> Result<f64> {
    let value = match &reading.value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    value.ok_or_else(|| {
        NamError::InvalidSensorData(format!(
            "Invalid value for sensor {}: {}",
            reading.value_type, reading.value
        ))
    })
}

/// Parse `sensordatavalues` into a sensor map.
///
/// Pressures are converted from Pa to hPa and legacy keys are renamed.
pub fn parse_sensor_data(values: &Value) -> Result<SensorMap> {
    let readings: Vec<RawSensorReading> = serde_json::from_value(values.clone())
        .map_err(|e| NamError::InvalidSensorData(format!("Invalid sensor data: {}", e)))?;

    let mut result = SensorMap::new();
    for reading in &readings {
        let value = round_one(reading_value(reading)?);
        result.insert(reading.value_type.to_lowercase(), value);
    }

    for (key, value) in result.iter_mut() {
        if key.contains("pressure") {
            *value /= 100.0;
        }
    }

    for (old_key, new_key) in RENAME_KEY_MAP {
        if let Some(value) = result.remove(old_key) {
            result.insert(new_key.to_string(), value);
        }
    }

    Ok(result)
}

/// Device uptime in seconds, given either as a number or a numeric string
pub fn parse_uptime(value: &Value) -> Result<i64> {
    let uptime = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    uptime.ok_or_else(|| NamError::InvalidSensorData(format!("Invalid uptime: {}", value)))
}

/// Add `{family}_caqi` and `{family}_caqi_level` for every family with both PM readings
pub fn add_caqi_fields(sensors: &SensorMap, out: &mut serde_json::Map<String, Value>) {
    for family in CAQI_SENSORS {
        let pm10 = sensors.get(&format!("{}_p1", family)).copied();
        let pm25 = sensors.get(&format!("{}_p2", family)).copied();
        if pm10.is_none() || pm25.is_none() {
            continue;
        }

        if let Some(index) = caqi::get_caqi(pm10, pm25) {
            out.insert(format!("{}_caqi", family), Value::from(index.value));
            out.insert(
                format!("{}_caqi_level", family),
                Value::from(index.level.as_str().replace(' ', "_")),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_lowercase_and_round() {
        let data = json!([
            {"value_type": "BME280_temperature", "value": "7.56"},
            {"value_type": "signal", "value": -72},
            {"value_type": "SPS30_P2", "value": 6.04},
        ]);
        let map = parse_sensor_data(&data).unwrap();

        assert!(approx(map["bme280_temperature"], 7.6));
        assert!(approx(map["signal"], -72.0));
        assert!(approx(map["sps30_p2"], 6.0));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_pressure_converted_to_hpa() {
        let data = json!([
            {"value_type": "BME280_pressure", "value": "100733.53"},
            {"value_type": "BMP280_pressure", "value": 101412.0},
        ]);
        let map = parse_sensor_data(&data).unwrap();

        assert!(approx(map["bme280_pressure"], 100733.5 / 100.0));
        assert!(approx(map["bmp280_pressure"], 1014.12));
    }

    #[test]
    fn test_legacy_keys_are_moved() {
        let data = json!([
            {"value_type": "temperature", "value": "6.3"},
            {"value_type": "humidity", "value": "67.6"},
            {"value_type": "SDS_P1", "value": "19.6"},
            {"value_type": "SDS_P2", "value": "11.7"},
            {"value_type": "BMP_pressure", "value": "100082.51"},
            {"value_type": "conc_co2_ppm", "value": "865"},
        ]);
        let map = parse_sensor_data(&data).unwrap();

        for (old_key, _) in RENAME_KEY_MAP {
            assert!(!map.contains_key(old_key), "{} left behind", old_key);
        }
        assert!(approx(map["dht22_temperature"], 6.3));
        assert!(approx(map["dht22_humidity"], 67.6));
        assert!(approx(map["sds011_p1"], 19.6));
        assert!(approx(map["sds011_p2"], 11.7));
        assert!(approx(map["bmp180_pressure"], 1000.825));
        assert!(approx(map["mhz14a_carbon_dioxide"], 865.0));
        assert!(!map.contains_key("bmp180_temperature"));
    }

    #[test]
    fn test_duplicate_type_last_wins() {
        let data = json!([
            {"value_type": "SPS30_P1", "value": "1.0"},
            {"value_type": "sps30_p1", "value": "2.0"},
        ]);
        let map = parse_sensor_data(&data).unwrap();
        assert!(approx(map["sps30_p1"], 2.0));
    }

    #[test]
    fn test_invalid_shapes() {
        for data in [
            json!({"value_type": "a", "value": 1}),
            json!([{"value": 1}]),
            json!([{"value_type": "pms_p1"}]),
            json!([{"value_type": "pms_p1", "value": null}]),
            json!([{"value_type": "pms_p1", "value": "n/a"}]),
            json!(null),
        ] {
            let err = parse_sensor_data(&data).unwrap_err();
            assert!(matches!(err, NamError::InvalidSensorData(_)), "{:?}", data);
        }
    }

    #[test]
    fn test_rounding_ties_and_near_ties() {
        let data = json!([
            {"value_type": "a", "value": "7.25"},
            {"value_type": "b", "value": 20.65},
            {"value_type": "c", "value": "0.15"},
            {"value_type": "d", "value": "1.45"},
            {"value_type": "e", "value": "2.675"},
            {"value_type": "f", "value": "-0.05"},
            {"value_type": "g_pressure", "value": "100812.25"},
        ]);
        let map = parse_sensor_data(&data).unwrap();

        assert_eq!(map["a"], 7.2);
        assert_eq!(map["b"], 20.6);
        assert_eq!(map["c"], 0.1);
        assert_eq!(map["d"], 1.4);
        assert_eq!(map["e"], 2.7);
        assert_eq!(map["f"], -0.1);
        assert!(approx(map["g_pressure"], 100812.2 / 100.0));
    }

    #[test]
    fn test_uptime() {
        assert_eq!(parse_uptime(&json!("456987")).unwrap(), 456987);
        assert_eq!(parse_uptime(&json!(1234)).unwrap(), 1234);
        assert!(parse_uptime(&json!("soon")).is_err());
        assert!(parse_uptime(&json!(null)).is_err());
    }

    #[test]
    fn test_caqi_fields() {
        let mut sensors = SensorMap::new();
        sensors.insert("pms_p1".into(), 40.0);
        sensors.insert("pms_p2".into(), 20.0);
        sensors.insert("sds011_p1".into(), 12.0);
        sensors.insert("sps30_p1".into(), -3.0);
        sensors.insert("sps30_p2".into(), 4.0);

        let mut out = serde_json::Map::new();
        add_caqi_fields(&sensors, &mut out);

        assert_eq!(out["pms_caqi"], json!(40));
        assert_eq!(out["pms_caqi_level"], json!("low"));
        assert!(!out.contains_key("sds011_caqi"));
        assert!(!out.contains_key("sps30_caqi"));
    }

    #[test]
    fn test_caqi_level_uses_underscores() {
        let mut sensors = SensorMap::new();
        sensors.insert("sds011_p1".into(), 5.0);
        sensors.insert("sds011_p2".into(), 3.0);

        let mut out = serde_json::Map::new();
        add_caqi_fields(&sensors, &mut out);
        assert_eq!(out["sds011_caqi_level"], json!("very_low"));
    }
}
