//! Static business parameters as they appear in the exposure dataset.

use std::collections::BTreeMap;

use serde::Deserialize;

use br_core::{ExposureId, ZoneId};

/// Key of the customer-origin bucket with no geographic dependency.
pub const OTHERS_KEY: &str = "Others";

/// Where a share of a business's customers comes from.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum CustomerOrigin {
    Zone(ZoneId),
    /// Customers from outside the modelled area; always present.
    Others,
}

/// Customer-origin population-share table.
///
/// Deserializes from the exposure dataset's `{"<zone>": share, "Others": share}`
/// map.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<String, f64>")]
pub struct CustomerShares {
    zones:  BTreeMap<ZoneId, f64>,
    others: f64,
}

impl CustomerShares {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of one zone share.
    pub fn with_zone(mut self, zone: impl Into<String>, share: f64) -> Self {
        self.zones.insert(ZoneId::new(zone), share);
        self
    }

    pub fn with_others(mut self, share: f64) -> Self {
        self.others = share;
        self
    }

    /// Zone shares in zone order.
    pub fn zones(&self) -> impl Iterator<Item = (&ZoneId, f64)> {
        self.zones.iter().map(|(z, s)| (z, *s))
    }

    pub fn others(&self) -> f64 {
        self.others
    }

    /// All buckets, zones first, `Others` last.
    pub fn iter(&self) -> impl Iterator<Item = (CustomerOrigin, f64)> + '_ {
        self.zones
            .iter()
            .map(|(z, s)| (CustomerOrigin::Zone(z.clone()), *s))
            .chain(std::iter::once((CustomerOrigin::Others, self.others)))
    }

    /// No customer data at all.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty() && self.others == 0.0
    }

    pub fn total(&self) -> f64 {
        self.zones.values().sum::<f64>() + self.others
    }
}

impl From<BTreeMap<String, f64>> for CustomerShares {
    fn from(raw: BTreeMap<String, f64>) -> Self {
        let mut shares = CustomerShares::default();
        for (key, share) in raw {
            if key == OTHERS_KEY {
                shares.others += share;
            } else {
                shares.zones.insert(ZoneId(key), share);
            }
        }
        shares
    }
}

/// Immutable parameters of one business.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct BusinessParams {
    #[serde(rename = "CompanyName", default)]
    pub company_name:   String,

    #[serde(rename = "NumEmployees")]
    pub employee_count: u32,

    /// Annual sales volume in currency units.
    #[serde(rename = "SalesVolume")]
    pub annual_sales:   f64,

    #[serde(rename = "SupplierLocations", default)]
    pub suppliers:      Vec<ExposureId>,

    /// One entry per employee with a known home building.
    #[serde(rename = "EmployeeLocations", default)]
    pub employee_homes: Vec<ExposureId>,

    #[serde(rename = "VisitorHomeCBGs", default)]
    pub customers:      CustomerShares,
}
