use serde::{Deserialize, Deserializer, Serialize};

/// Stock of a treatment category at one facility (Resources Inventory sheet).
///
/// Field aliases accept the spreadsheet headers the inventory was exported with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    #[serde(alias = "Region")]
    pub region: String,
    #[serde(alias = "Facility")]
    pub facility: String,
    #[serde(alias = "Category")]
    pub category: String,
    #[serde(alias = "available stock", alias = "Available Stock")]
    pub available_stock: u32,
}

/// Pricing of a treatment category at one facility (Treatment Costs sheet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    #[serde(alias = "Region")]
    pub region: String,
    #[serde(alias = "Facility")]
    pub facility: String,
    #[serde(alias = "Category")]
    pub category: String,
    #[serde(alias = "base cost", alias = "Base Cost")]
    pub base_cost: f64,
    #[serde(
        alias = "NHIF covered",
        alias = "nhif",
        deserialize_with = "deserialize_flag"
    )]
    pub nhif_covered: bool,
    #[serde(alias = "insurance co-pay", alias = "Insurance Co-Pay")]
    pub insurance_co_pay: f64,
    #[serde(alias = "out of pocket", alias = "Out of Pocket")]
    pub out_of_pocket: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Int(i64),
    Text(String),
}

/// Spreadsheet exports encode the NHIF flag as a bool, 0/1 or yes/no text.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match RawFlag::deserialize(deserializer)? {
        RawFlag::Bool(b) => Ok(b),
        RawFlag::Int(0) => Ok(false),
        RawFlag::Int(1) => Ok(true),
        RawFlag::Int(n) => Err(serde::de::Error::custom(format!(
            "invalid NHIF flag {n}, expected 0 or 1"
        ))),
        RawFlag::Text(s) => match s.trim().to_lowercase().as_str() {
            "yes" | "y" | "true" | "1" => Ok(true),
            "no" | "n" | "false" | "0" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "invalid NHIF flag '{other}'"
            ))),
        },
    }
}
