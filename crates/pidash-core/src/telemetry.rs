//! Inbound telemetry frames.
//!
//! The server pushes one JSON object per text frame. Each frame replaces the
//! previous snapshot wholesale — there is no merging and no validation beyond
//! JSON well-formedness. Every sensor field is optional; a sensor that could
//! not be read arrives as `null`.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

/// Default WebSocket port of the telemetry server.
pub const DEFAULT_PORT: u16 = 8765;

/// Device-reported throttle bitmask (`vcgencmd get_throttled` low bits).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThrottleFlags(pub u32);

impl ThrottleFlags {
    const UNDER_VOLTAGE: u32 = 1 << 0;
    const FREQ_CAPPED: u32 = 1 << 1;
    const THROTTLED: u32 = 1 << 2;
    const SOFT_TEMP_LIMIT: u32 = 1 << 3;

    pub fn under_voltage(self) -> bool {
        self.0 & Self::UNDER_VOLTAGE != 0
    }

    pub fn freq_capped(self) -> bool {
        self.0 & Self::FREQ_CAPPED != 0
    }

    pub fn throttled(self) -> bool {
        self.0 & Self::THROTTLED != 0
    }

    pub fn soft_temp_limit(self) -> bool {
        self.0 & Self::SOFT_TEMP_LIMIT != 0
    }

    pub fn any(self) -> bool {
        self.0 & 0xF != 0
    }

    /// Labels of the currently active conditions, in bit order.
    pub fn active_labels(self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.under_voltage() {
            labels.push("under-voltage");
        }
        if self.freq_capped() {
            labels.push("freq-capped");
        }
        if self.throttled() {
            labels.push("throttled");
        }
        if self.soft_temp_limit() {
            labels.push("soft-temp-limit");
        }
        labels
    }
}

/// The four supply rails reported by the device, volts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VoltageRails {
    #[serde(default)]
    pub core: Option<f64>,
    #[serde(default)]
    pub sdram: Option<f64>,
    #[serde(default)]
    pub sdram_i: Option<f64>,
    #[serde(default)]
    pub sdram_p: Option<f64>,
}

/// One telemetry frame. Replaces the previous snapshot wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Throttle condition bitmask; absent means no conditions reported.
    #[serde(default)]
    pub throttled: ThrottleFlags,
    /// SoC temperature, °C.
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub voltage: Option<VoltageRails>,
    /// ARM clock frequency, MHz.
    #[serde(default)]
    pub frequency: Option<f64>,
    /// Base64-encoded JPEG from the camera, if one was captured.
    #[serde(default)]
    pub image: Option<String>,
}

impl TelemetrySnapshot {
    /// Parse one inbound text frame. Callers keep the previous snapshot on
    /// failure; the frame is dropped, not the connection.
    pub fn parse(frame: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(frame)
    }

    /// Core rail voltage, the one rail charted over time.
    pub fn core_voltage(&self) -> Option<f64> {
        self.voltage.and_then(|v| v.core)
    }

    /// Decode the camera still to JPEG bytes. `Ok(None)` when the frame
    /// carried no image or an empty placeholder string.
    pub fn decode_image(&self) -> Result<Option<Vec<u8>>, base64::DecodeError> {
        match self.image.as_deref() {
            None | Some("") => Ok(None),
            Some(b64) => BASE64.decode(b64).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_frame() {
        let frame = r#"{
            "throttled": 5,
            "temperature": 42.1,
            "voltage": {"core": 1.2, "sdram": 1.1, "sdram_i": 1.1, "sdram_p": 1.1},
            "frequency": 1000,
            "image": null
        }"#;
        let snap = TelemetrySnapshot::parse(frame).unwrap();
        assert_eq!(snap.temperature, Some(42.1));
        assert_eq!(snap.frequency, Some(1000.0));
        assert_eq!(snap.core_voltage(), Some(1.2));
        assert!(snap.image.is_none());
    }

    #[test]
    fn throttled_5_sets_bits_0_and_2_only() {
        let flags = ThrottleFlags(5);
        assert!(flags.under_voltage());
        assert!(!flags.freq_capped());
        assert!(flags.throttled());
        assert!(!flags.soft_temp_limit());
        assert_eq!(flags.active_labels(), vec!["under-voltage", "throttled"]);
    }

    #[test]
    fn bit_tests_are_independent() {
        for bit in 0..4 {
            let flags = ThrottleFlags(1 << bit);
            let set = [
                flags.under_voltage(),
                flags.freq_capped(),
                flags.throttled(),
                flags.soft_temp_limit(),
            ];
            assert_eq!(set.iter().filter(|&&b| b).count(), 1, "bit {bit}");
            assert!(set[bit]);
        }
    }

    #[test]
    fn null_sensors_deserialize_as_none() {
        let snap = TelemetrySnapshot::parse(
            r#"{"throttled": 0, "temperature": null, "voltage": null, "frequency": null, "image": null}"#,
        )
        .unwrap();
        assert!(snap.temperature.is_none());
        assert!(snap.voltage.is_none());
        assert!(snap.frequency.is_none());
        assert!(!snap.throttled.any());
    }

    #[test]
    fn missing_fields_default() {
        let snap = TelemetrySnapshot::parse("{}").unwrap();
        assert_eq!(snap, TelemetrySnapshot::default());
    }

    #[test]
    fn malformed_frame_is_an_error() {
        assert!(TelemetrySnapshot::parse("not json").is_err());
        assert!(TelemetrySnapshot::parse(r#"{"throttled": "five"}"#).is_err());
    }

    #[test]
    fn partial_voltage_object() {
        let snap = TelemetrySnapshot::parse(r#"{"voltage": {"core": 1.35}}"#).unwrap();
        let rails = snap.voltage.unwrap();
        assert_eq!(rails.core, Some(1.35));
        assert!(rails.sdram.is_none());
    }

    #[test]
    fn decode_image_roundtrip() {
        let jpeg = [0xFFu8, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        let snap = TelemetrySnapshot {
            image: Some(BASE64.encode(jpeg)),
            ..Default::default()
        };
        assert_eq!(snap.decode_image().unwrap().unwrap(), jpeg);
    }

    #[test]
    fn decode_image_empty_is_none() {
        let snap = TelemetrySnapshot {
            image: Some(String::new()),
            ..Default::default()
        };
        assert!(snap.decode_image().unwrap().is_none());
        assert!(TelemetrySnapshot::default().decode_image().unwrap().is_none());
    }

    #[test]
    fn decode_image_invalid_base64_is_an_error() {
        let snap = TelemetrySnapshot {
            image: Some("%%not-base64%%".into()),
            ..Default::default()
        };
        assert!(snap.decode_image().is_err());
    }
}
