//! Synthetic sensor values standing in for real device feeds.
//!
//! Nothing here keeps state between calls. Randomness comes from the
//! caller's `Rng` so tests can pass a seeded generator.

use std::str::FromStr;

use chrono::{DateTime, Days, NaiveDate, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::domain::clock::to_iso8601;
use crate::domain::models::UnknownVariant;

pub const TRAILING_DAYS: u64 = 7;

const CARD_HOLDERS: &[&str] = &["John Doe", "Jane Smith", "Alice Johnson", "Bob Wilson"];
const SCHOOLS: &[&str] = &["Engineering", "Business", "Arts", "Science"];
const WEATHER_CONDITIONS: &[&str] = &["Sunny", "Cloudy", "Rainy", "Partly Cloudy"];
const MAINS_VOLTAGE: u32 = 220;
const MAINS_FREQUENCY: u32 = 50;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub temperature: Vec<BandPoint>,
    pub humidity: Vec<BandPoint>,
    pub rfid_scans: Vec<RfidScanPoint>,
    pub energy_consumption: Vec<EnergyPoint>,
    pub summary: AnalyticsSummary,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BandPoint {
    pub date: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RfidScanPoint {
    pub date: String,
    pub main_entrance: u32,
    pub office_floor: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EnergyPoint {
    pub date: String,
    pub lights: f64,
    pub outlets: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub avg_temperature: f64,
    pub total_devices: u32,
    pub online_devices: u32,
    pub offline_devices: u32,
    #[serde(rename = "totalRFIDScansToday")]
    pub total_rfid_scans_today: u32,
    pub total_energy_today: f64,
    pub plant_health_score: u32,
    pub weather_condition: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DeviceTypeShare {
    #[serde(rename = "type")]
    pub device_type: &'static str,
    pub count: u32,
    pub percentage: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RfidStats {
    pub today_scans: u32,
    pub unique_cards: u32,
    pub peak_hour: &'static str,
    pub avg_response_time: &'static str,
    pub access_denied: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnergyStats {
    pub total_today: &'static str,
    pub lights: &'static str,
    pub outlets: &'static str,
    pub estimated_cost: &'static str,
    pub compared_to_yesterday: &'static str,
}

/// Site-wide reading used by the dashboard overview.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LiveSnapshot {
    pub temperature: f64,
    pub recent_scans: u32,
    pub active_cards: u32,
    pub total_power_consumption: f64,
    pub lights_on: u32,
    pub outlets_on: u32,
    pub avg_soil_moisture: f64,
    pub plants_need_water: u32,
    pub active_scales: u32,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    RfidReader,
    SmartLight,
    SmartOutlet,
    PlantWatering,
    WeatherSensor,
    WeightScale,
}

impl DeviceKind {
    pub const ALL: [DeviceKind; 6] = [
        Self::RfidReader,
        Self::SmartLight,
        Self::SmartOutlet,
        Self::PlantWatering,
        Self::WeatherSensor,
        Self::WeightScale,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RfidReader => "rfid_reader",
            Self::SmartLight => "smart_light",
            Self::SmartOutlet => "smart_outlet",
            Self::PlantWatering => "plant_watering",
            Self::WeatherSensor => "weather_sensor",
            Self::WeightScale => "weight_scale",
        }
    }
}

impl FromStr for DeviceKind {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| UnknownVariant(value.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceTypeSnapshot {
    pub device_type: &'static str,
    pub updated_at: String,
    #[serde(flatten)]
    pub readings: KindReadings,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum KindReadings {
    RfidReader(RfidReading),
    SmartLight(LightReading),
    SmartOutlet(OutletReading),
    PlantWatering(WateringReading),
    WeatherSensor(WeatherReading),
    WeightScale(ScaleReading),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RfidReading {
    pub full_name: &'static str,
    pub mac_address: String,
    pub time: String,
    pub date: String,
    pub school: &'static str,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LightReading {
    pub bulb_status: &'static str,
    pub voltage: u32,
    pub current: f64,
    pub power: f64,
    pub energy: f64,
    pub frequency: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutletReading {
    pub outlet_status: &'static str,
    pub voltage: u32,
    pub current: f64,
    pub power: f64,
    pub energy: f64,
    pub frequency: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WateringReading {
    pub datetime: String,
    pub waterpump_status: &'static str,
    pub soil_moisture_status: &'static str,
    pub humidity: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeatherReading {
    pub datetime: String,
    pub weather: &'static str,
    pub temperature: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScaleReading {
    pub datetime: String,
    pub measurement: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceLiveStub {
    pub device_id: String,
    pub datetime: String,
    pub status: &'static str,
}

/// Seven daily points ending at `today`, oldest first.
pub fn analytics_report<R: Rng>(rng: &mut R, today: NaiveDate) -> AnalyticsReport {
    let mut temperature = Vec::new();
    let mut humidity = Vec::new();
    let mut rfid_scans = Vec::new();
    let mut energy_consumption = Vec::new();

    for days_back in (0..TRAILING_DAYS).rev() {
        let date = today
            .checked_sub_days(Days::new(days_back))
            .unwrap_or(today)
            .format("%Y-%m-%d")
            .to_string();

        temperature.push(BandPoint {
            date: date.clone(),
            value: sample(rng, 26.0, 32.0, 1),
            min: sample(rng, 24.0, 26.0, 1),
            max: sample(rng, 30.0, 33.0, 1),
        });
        humidity.push(BandPoint {
            date: date.clone(),
            value: sample(rng, 60.0, 75.0, 0),
            min: sample(rng, 55.0, 60.0, 0),
            max: sample(rng, 70.0, 80.0, 0),
        });
        rfid_scans.push(RfidScanPoint {
            date: date.clone(),
            main_entrance: rng.gen_range(120..200),
            office_floor: rng.gen_range(70..120),
        });
        energy_consumption.push(EnergyPoint {
            date,
            lights: sample(rng, 15.0, 20.0, 1),
            outlets: sample(rng, 30.0, 45.0, 1),
            total: sample(rng, 45.0, 65.0, 1),
        });
    }

    AnalyticsReport {
        temperature,
        humidity,
        rfid_scans,
        energy_consumption,
        summary: AnalyticsSummary {
            avg_temperature: 28.5,
            total_devices: 12,
            online_devices: 11,
            offline_devices: 1,
            total_rfid_scans_today: 236,
            total_energy_today: 65.8,
            plant_health_score: 85,
            weather_condition: "Sunny",
        },
    }
}

pub fn device_type_distribution() -> Vec<DeviceTypeShare> {
    [
        ("RFID Readers", 17),
        ("Smart Lights", 17),
        ("Smart Outlets", 17),
        ("Plant Monitors", 17),
        ("Weather Sensors", 17),
        ("Weight Scales", 15),
    ]
    .into_iter()
    .map(|(device_type, percentage)| DeviceTypeShare {
        device_type,
        count: 2,
        percentage,
    })
    .collect()
}

pub fn rfid_stats() -> RfidStats {
    RfidStats {
        today_scans: 236,
        unique_cards: 47,
        peak_hour: "09:00",
        avg_response_time: "0.3s",
        access_denied: 2,
    }
}

pub fn energy_stats() -> EnergyStats {
    EnergyStats {
        total_today: "65.8 kWh",
        lights: "22.4 kWh",
        outlets: "43.4 kWh",
        estimated_cost: "Rp 98,700",
        compared_to_yesterday: "-8%",
    }
}

pub fn live_snapshot<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> LiveSnapshot {
    LiveSnapshot {
        temperature: sample(rng, 26.0, 32.0, 1),
        recent_scans: rng.gen_range(5..15),
        active_cards: rng.gen_range(40..55),
        total_power_consumption: sample(rng, 40.0, 70.0, 1),
        lights_on: rng.gen_range(1..3),
        outlets_on: rng.gen_range(1..3),
        avg_soil_moisture: sample(rng, 35.0, 55.0, 0),
        plants_need_water: u32::from(rng.gen_bool(0.3)),
        active_scales: u32::from(rng.gen_bool(0.7)),
        updated_at: to_iso8601(now),
    }
}

pub fn device_type_snapshot<R: Rng>(
    rng: &mut R,
    now: DateTime<Utc>,
    kind: DeviceKind,
) -> DeviceTypeSnapshot {
    let datetime = to_iso8601(now);

    let readings = match kind {
        DeviceKind::RfidReader => KindReadings::RfidReader(RfidReading {
            full_name: pick(rng, CARD_HOLDERS),
            mac_address: format!(
                "00:1B:44:11:{}:{}",
                rng.gen_range(0..99_u32),
                rng.gen_range(0..99_u32)
            ),
            time: now.format("%H:%M:%S").to_string(),
            date: now.format("%Y-%m-%d").to_string(),
            school: pick(rng, SCHOOLS),
            id: format!("ID-{}", rng.gen_range(1000..10000_u32)),
        }),
        DeviceKind::SmartLight => KindReadings::SmartLight(LightReading {
            bulb_status: on_off(rng, 0.7),
            voltage: MAINS_VOLTAGE,
            current: sample(rng, 0.05, 0.10, 2),
            power: sample(rng, 10.0, 20.0, 1),
            energy: sample(rng, 10.0, 15.0, 1),
            frequency: MAINS_FREQUENCY,
        }),
        DeviceKind::SmartOutlet => KindReadings::SmartOutlet(OutletReading {
            outlet_status: on_off(rng, 0.7),
            voltage: MAINS_VOLTAGE,
            current: sample(rng, 1.0, 6.0, 2),
            power: sample(rng, 200.0, 1200.0, 0),
            energy: sample(rng, 1.0, 6.0, 2),
            frequency: MAINS_FREQUENCY,
        }),
        DeviceKind::PlantWatering => KindReadings::PlantWatering(WateringReading {
            datetime: datetime.clone(),
            waterpump_status: on_off(rng, 0.2),
            soil_moisture_status: if rng.gen_bool(0.5) { "Moist" } else { "Dry" },
            humidity: sample(rng, 55.0, 70.0, 0),
        }),
        DeviceKind::WeatherSensor => KindReadings::WeatherSensor(WeatherReading {
            datetime: datetime.clone(),
            weather: pick(rng, WEATHER_CONDITIONS),
            temperature: sample(rng, 26.0, 32.0, 1),
        }),
        DeviceKind::WeightScale => KindReadings::WeightScale(ScaleReading {
            datetime: datetime.clone(),
            measurement: sample(rng, 0.0, 100.0, 2),
        }),
    };

    DeviceTypeSnapshot {
        device_type: kind.as_str(),
        updated_at: datetime,
        readings,
    }
}

pub fn device_live_stub(device_id: &str, now: DateTime<Utc>) -> DeviceLiveStub {
    DeviceLiveStub {
        device_id: device_id.to_string(),
        datetime: to_iso8601(now),
        status: "online",
    }
}

fn sample<R: Rng>(rng: &mut R, low: f64, high: f64, decimals: i32) -> f64 {
    round_to(rng.gen_range(low..=high), decimals)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

fn on_off<R: Rng>(rng: &mut R, on_probability: f64) -> &'static str {
    if rng.gen_bool(on_probability) { "On" } else { "Off" }
}

fn pick<R: Rng>(rng: &mut R, options: &[&'static str]) -> &'static str {
    options.choose(rng).copied().unwrap_or_default()
}
