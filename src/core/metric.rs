/// The closed set of tracked sensor metrics
///
/// Each metric carries its canonical config key, display label, default unit
/// and CSV column position, so adding a metric is a single change here.

use serde::{Deserialize, Serialize};

/// One of the nine monitored sensor metrics.
///
/// Declaration order matches the CSV column order (column 0 is the
/// timestamp), which also gives the canonical ordering of `BTreeMap` keys in
/// every serialized payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "illumination_intensity")]
    IlluminationIntensity,
    #[serde(rename = "temperature")]
    Temperature,
    #[serde(rename = "humidity")]
    Humidity,
    #[serde(rename = "ph")]
    Ph,
    #[serde(rename = "microbial_density")]
    MicrobialDensity,
    #[serde(rename = "turbidity")]
    Turbidity,
    #[serde(rename = "COD")]
    ChemicalOxygenDemand,
    #[serde(rename = "DO")]
    DissolvedOxygen,
    #[serde(rename = "EC")]
    ElectricalConductivity,
}

impl Metric {
    /// All metrics, in CSV column order.
    pub const ALL: [Metric; 9] = [
        Metric::IlluminationIntensity,
        Metric::Temperature,
        Metric::Humidity,
        Metric::Ph,
        Metric::MicrobialDensity,
        Metric::Turbidity,
        Metric::ChemicalOxygenDemand,
        Metric::DissolvedOxygen,
        Metric::ElectricalConductivity,
    ];

    /// Canonical key as used in config files and API payloads.
    pub fn key(&self) -> &'static str {
        match self {
            Metric::IlluminationIntensity => "illumination_intensity",
            Metric::Temperature => "temperature",
            Metric::Humidity => "humidity",
            Metric::Ph => "ph",
            Metric::MicrobialDensity => "microbial_density",
            Metric::Turbidity => "turbidity",
            Metric::ChemicalOxygenDemand => "COD",
            Metric::DissolvedOxygen => "DO",
            Metric::ElectricalConductivity => "EC",
        }
    }

    /// Display label shown in CLI tables and dashboard cards.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::IlluminationIntensity => "光照强度",
            Metric::Temperature => "温度",
            Metric::Humidity => "湿度",
            Metric::Ph => "酸碱度",
            Metric::MicrobialDensity => "微生物密度",
            Metric::Turbidity => "浊度",
            Metric::ChemicalOxygenDemand => "化学需氧量",
            Metric::DissolvedOxygen => "溶解氧",
            Metric::ElectricalConductivity => "电导率",
        }
    }

    /// Unit used when a threshold entry does not supply one.
    pub fn default_unit(&self) -> &'static str {
        match self {
            Metric::IlluminationIntensity => "lux",
            Metric::Temperature => "℃",
            Metric::Humidity => "%",
            Metric::Ph => "pH",
            Metric::MicrobialDensity => "CFU/mL",
            Metric::Turbidity => "NTU",
            Metric::ChemicalOxygenDemand => "mg/L",
            Metric::DissolvedOxygen => "mg/L",
            Metric::ElectricalConductivity => "μS/cm",
        }
    }

    /// Zero-based CSV column holding this metric (column 0 is the timestamp).
    pub fn column(&self) -> usize {
        match self {
            Metric::IlluminationIntensity => 1,
            Metric::Temperature => 2,
            Metric::Humidity => 3,
            Metric::Ph => 4,
            Metric::MicrobialDensity => 5,
            Metric::Turbidity => 6,
            Metric::ChemicalOxygenDemand => 7,
            Metric::DissolvedOxygen => 8,
            Metric::ElectricalConductivity => 9,
        }
    }

    /// Whether a row must carry a numeric value for this metric to be
    /// accepted at all. Only illumination and temperature are mandatory; the
    /// rest are parsed opportunistically.
    pub fn required(&self) -> bool {
        matches!(self, Metric::IlluminationIntensity | Metric::Temperature)
    }

    pub fn from_key(key: &str) -> Option<Metric> {
        Metric::ALL.iter().copied().find(|m| m.key() == key)
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
