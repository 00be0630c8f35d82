#[cfg(test)]
#[path = "../../tests/unit/demand/weights_test.rs"]
mod weights_test;

use crate::utils::{CourierError, CourierResult, Random, compare_floats, round_to};
use std::cmp::Ordering;
use std::sync::Arc;

/// Max parcel weight in kilograms.
pub const MAX_PARCEL_WEIGHT: f64 = 31.5;

/// A named weight class: a probability to be selected, a weight range and Beta distribution
/// shape parameters which define the weight distribution within the range.
#[derive(Clone, Debug)]
pub struct WeightClass {
    /// Class name.
    pub name: String,
    /// Selection probability.
    pub probability: f64,
    /// Lower bound of weight range.
    pub low: f64,
    /// Upper bound of weight range.
    pub high: f64,
    /// Alpha shape parameter of Beta distribution.
    pub alpha: f64,
    /// Beta shape parameter of Beta distribution.
    pub beta: f64,
}

impl WeightClass {
    /// Creates a new instance of `WeightClass`.
    pub fn new(name: &str, probability: f64, (low, high): (f64, f64), (alpha, beta): (f64, f64)) -> Self {
        Self { name: name.to_string(), probability, low, high, alpha, beta }
    }
}

/// An immutable table of weight classes.
#[derive(Clone, Debug)]
pub struct ParcelWeightModel {
    classes: Vec<WeightClass>,
}

impl ParcelWeightModel {
    /// Creates a model from a custom table. Probabilities should be in `[0, 1]` and sum up to at
    /// most one, ranges should be within `[0, 31.5]` and shape parameters should be positive.
    pub fn new(classes: Vec<WeightClass>) -> CourierResult<Self> {
        if classes.is_empty() {
            return Err(CourierError::missing("weight classes"));
        }

        for class in classes.iter() {
            if !(0. ..=1.).contains(&class.probability) {
                return Err(CourierError::validation("weight class probability", class.probability, "should be in [0, 1]"));
            }

            if class.low < 0. || class.high > MAX_PARCEL_WEIGHT || class.low > class.high {
                return Err(CourierError::validation(
                    "weight class range",
                    format!("{}: [{}, {}]", class.name, class.low, class.high),
                    "should be a non-empty range within [0, 31.5]",
                ));
            }

            if class.alpha <= 0. || class.beta <= 0. {
                return Err(CourierError::validation(
                    "weight class shape",
                    format!("{}: ({}, {})", class.name, class.alpha, class.beta),
                    "shape parameters should be positive",
                ));
            }
        }

        let total = classes.iter().map(|class| class.probability).sum::<f64>();
        if total > 1. + 1E-9 {
            return Err(CourierError::validation("weight class probabilities", total, "sum should not exceed one"));
        }

        Ok(Self { classes })
    }

    /// Returns a default table for regular parcels.
    pub fn regular() -> Self {
        Self {
            classes: vec![
                WeightClass::new("Less than 0.1 kg", 0.021446032122536235, (0., 0.1), (2., 4.96289445355335)),
                WeightClass::new("0.1 kg to 0.2 kg", 0.05205014910511699, (0.1, 0.2), (2., 5.310245414967183)),
                WeightClass::new("0.2 kg to 0.5 kg", 0.21793679280014996, (0.2, 0.5), (2.507224168573464, 5.)),
                WeightClass::new("0.6 kg to 1 kg", 0.1673767492281103, (0.6, 1.), (2., 5.)),
                WeightClass::new("1.1 kg to 2 kg", 0.16511961332205177, (1.1, 2.), (2., 4.442763656468539)),
                WeightClass::new("2.1 kg to 5 kg", 0.1342253505036545, (2.1, 5.), (2., 5.619389445362472)),
                WeightClass::new("More than 5 kg", 0.24184531291838005, (5., MAX_PARCEL_WEIGHT), (2., 5.)),
            ],
        }
    }

    /// Returns a default table for business-to-business parcels.
    pub fn b2b() -> Self {
        Self {
            classes: vec![
                WeightClass::new("0.5 kg to 1 kg", 0.10, (0.5, 1.), (2., 5.)),
                WeightClass::new("1 kg to 3 kg", 0.12, (1., 3.), (2., 5.)),
                WeightClass::new("3 kg to 10 kg", 0.33, (3., 10.), (2., 5.)),
                WeightClass::new("10 kg to 20 kg", 0.25, (10., 20.), (2., 5.)),
                WeightClass::new("20 kg to 31.5 kg", 0.15, (20., MAX_PARCEL_WEIGHT), (2., 5.)),
            ],
        }
    }

    /// Returns weight classes.
    pub fn classes(&self) -> &[WeightClass] {
        self.classes.as_slice()
    }

    /// Selects a class using cumulative probabilities and given value from `[0, 1)`.
    /// Returns `None` when value is beyond total probability.
    pub fn select(&self, value: f64) -> Option<&WeightClass> {
        self.classes
            .iter()
            .scan(0., |cumulative, class| {
                *cumulative += class.probability;
                Some((*cumulative, class))
            })
            .find(|(cumulative, _)| compare_floats(value, *cumulative) == Ordering::Less)
            .map(|(_, class)| class)
    }
}

/// Samples parcel weights in kilograms.
pub struct WeightSampler {
    random: Arc<dyn Random + Send + Sync>,
    regular: ParcelWeightModel,
    b2b: ParcelWeightModel,
}

impl WeightSampler {
    /// Creates a new instance of `WeightSampler` with default weight tables.
    pub fn new(random: Arc<dyn Random + Send + Sync>) -> Self {
        Self::with_models(random, ParcelWeightModel::regular(), ParcelWeightModel::b2b())
    }

    /// Creates a new instance of `WeightSampler` with custom weight tables.
    pub fn with_models(random: Arc<dyn Random + Send + Sync>, regular: ParcelWeightModel, b2b: ParcelWeightModel) -> Self {
        Self { random, regular, b2b }
    }

    /// Samples a weight rounded to two decimals within `[0, 31.5]`.
    pub fn sample(&self, is_b2b: bool) -> f64 {
        let model = if is_b2b { &self.b2b } else { &self.regular };
        let random = self.random.as_ref();

        let weight = match model.select(random.uniform_real(0., 1.)) {
            Some(class) => class.low + (class.high - class.low) * sample_beta(random, class.alpha, class.beta),
            None => random.uniform_real(0., 1.) * MAX_PARCEL_WEIGHT,
        };

        round_to(weight, 2).clamp(0., MAX_PARCEL_WEIGHT)
    }
}

/// Samples Beta distribution using two Gamma variates.
pub(crate) fn sample_beta(random: &(dyn Random + Send + Sync), alpha: f64, beta: f64) -> f64 {
    let x = sample_gamma(random, alpha);
    let y = sample_gamma(random, beta);

    x / (x + y)
}

/// Samples Gamma distribution with unit scale using Marsaglia-Tsang method. Shapes below one
/// are boosted by one and corrected with `u^(1/shape)`.
pub(crate) fn sample_gamma(random: &(dyn Random + Send + Sync), shape: f64) -> f64 {
    if shape < 1. {
        let u = random.uniform_real(0., 1.);
        return sample_gamma(random, shape + 1.) * u.powf(1. / shape);
    }

    let d = shape - 1. / 3.;
    let c = 1. / (9. * d).sqrt();

    loop {
        let (x, v) = loop {
            let x = random.standard_normal();
            let v = 1. + c * x;
            if v > 0. {
                break (x, v * v * v);
            }
        };

        let u = random.uniform_real(0., 1.);
        if u < 1. - 0.0331 * (x * x) * (x * x) || u.ln() < 0.5 * x * x + d * (1. - v + v.ln()) {
            return d * v;
        }
    }
}
