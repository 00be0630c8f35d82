#[cfg(test)]
#[path = "../../tests/unit/demand/model_test.rs"]
mod model_test;

use super::MAX_PARCEL_WEIGHT;
use crate::network::Coord;
use crate::utils::{CourierError, CourierResult};
use rustc_hash::FxHashMap;

/// A raw demand feature: a building (or a block of buildings) with parcel counts per provider.
#[derive(Clone, Debug)]
pub struct DemandFeature {
    /// Feature id.
    pub id: String,
    /// Centroid of the feature geometry.
    pub coord: Coord,
    /// Postal code. Can be empty when unknown.
    pub postal_code: String,
    /// Total amount of parcels of all providers.
    pub total: u64,
    parcels: FxHashMap<String, u64>,
    parcel_types: FxHashMap<String, String>,
}

impl DemandFeature {
    /// Creates a new feature without provider attributes.
    pub fn new(id: &str, coord: Coord, postal_code: &str, total: u64) -> Self {
        Self {
            id: id.to_string(),
            coord,
            postal_code: postal_code.to_string(),
            total,
            parcels: FxHashMap::default(),
            parcel_types: FxHashMap::default(),
        }
    }

    /// Sets amount of parcels and optionally a parcel type (e.g. "b2b" or "b2c") of given provider.
    pub fn with_provider(mut self, provider: &str, parcels: u64, parcel_type: Option<&str>) -> Self {
        self.parcels.insert(provider.to_string(), parcels);
        if let Some(parcel_type) = parcel_type {
            self.parcel_types.insert(provider.to_string(), parcel_type.to_string());
        }
        self
    }

    /// Returns amount of parcels of given provider.
    pub fn parcels_of(&self, provider: &str) -> CourierResult<u64> {
        self.parcels.get(provider).copied().ok_or_else(|| CourierError::AttributeLookup {
            provider: provider.to_string(),
            field: format!("{provider}_tag"),
        })
    }

    /// Returns parcel type of given provider if known.
    pub fn parcel_type_of(&self, provider: &str) -> Option<&str> {
        self.parcel_types.get(provider).map(|parcel_type| parcel_type.as_str())
    }
}

/// A single delivery point within a demand group.
#[derive(Clone, Debug)]
pub struct DeliveryPoint {
    /// Id of the source feature.
    pub id: String,
    /// Point coordinate.
    pub coord: Coord,
    /// Postal code.
    pub postal_code: String,
    /// Amount of parcels to be delivered.
    pub parcels: u64,
    /// Parcel type if known.
    pub parcel_type: Option<String>,
}

/// A named bucket of delivery points of one provider, typically within one postal code area.
#[derive(Clone, Debug)]
pub struct DemandGroup {
    /// A group key: `provider_postalCode` with optional cluster suffixes.
    pub key: String,
    /// A provider.
    pub provider: String,
    /// Delivery points.
    pub points: Vec<DeliveryPoint>,
}

impl DemandGroup {
    /// Returns amount of deliveries: points with at least one parcel.
    pub fn delivery_count(&self) -> usize {
        self.points.iter().filter(|point| point.parcels > 0).count()
    }

    /// Returns total amount of parcels.
    pub fn parcel_count(&self) -> u64 {
        self.points.iter().map(|point| point.parcels).sum()
    }
}

/// A single parcel with an optional weight.
#[derive(Clone, Debug)]
pub struct Parcel {
    /// Parcel id.
    pub id: String,
    /// A provider.
    pub provider: String,
    weight: Option<f64>,
}

impl Parcel {
    /// Creates a parcel without weight.
    pub fn new(id: &str, provider: &str) -> Self {
        Self { id: id.to_string(), provider: provider.to_string(), weight: None }
    }

    /// Sets parcel weight which should be within `[0, 31.5]` kilograms.
    pub fn with_weight(self, weight: f64) -> CourierResult<Self> {
        validate_weight(weight)?;
        Ok(Self { weight: Some(weight), ..self })
    }

    /// Returns parcel weight.
    pub fn weight(&self) -> Option<f64> {
        self.weight
    }
}

/// A delivery of one or more parcels to a single point.
#[derive(Clone, Debug)]
pub struct Delivery {
    /// Delivery id.
    pub id: String,
    /// Delivery coordinate.
    pub coord: Coord,
    /// A provider.
    pub provider: String,
    /// Parcel type.
    pub parcel_type: String,
    postal_code: Option<String>,
    weights: Vec<f64>,
}

impl Delivery {
    /// Creates a new delivery. Postal code, if specified, should consist of five digits. Each weight
    /// should be within `[0, 31.5]` kilograms.
    pub fn new(
        id: &str,
        coord: Coord,
        provider: &str,
        parcel_type: &str,
        postal_code: Option<&str>,
        weights: Vec<f64>,
    ) -> CourierResult<Self> {
        if let Some(postal_code) = postal_code {
            validate_postal_code(postal_code)?;
        }

        weights.iter().try_for_each(|&weight| validate_weight(weight))?;

        Ok(Self {
            id: id.to_string(),
            coord,
            provider: provider.to_string(),
            parcel_type: parcel_type.to_string(),
            postal_code: postal_code.map(|code| code.to_string()),
            weights,
        })
    }

    /// Returns postal code.
    pub fn postal_code(&self) -> Option<&str> {
        self.postal_code.as_deref()
    }

    /// Returns amount of parcels.
    pub fn amount(&self) -> usize {
        self.weights.len()
    }

    /// Returns individual parcel weights.
    pub fn weights(&self) -> &[f64] {
        self.weights.as_slice()
    }

    /// Returns total weight of all parcels.
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }
}

fn validate_weight(weight: f64) -> CourierResult<()> {
    if (0. ..=MAX_PARCEL_WEIGHT).contains(&weight) {
        Ok(())
    } else {
        Err(CourierError::validation("parcel weight", weight, "should be between 0 and 31.5 kg"))
    }
}

fn validate_postal_code(postal_code: &str) -> CourierResult<()> {
    if postal_code.len() == 5 && postal_code.bytes().all(|byte| byte.is_ascii_digit()) {
        Ok(())
    } else {
        Err(CourierError::validation("postal code", postal_code, "should be a 5-digit number"))
    }
}
