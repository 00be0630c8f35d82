use super::*;
use crate::utils::DefaultRandom;
use proptest::prelude::*;

fn total_probability(model: &ParcelWeightModel) -> f64 {
    model.classes().iter().map(|class| class.probability).sum()
}

#[test]
fn can_use_valid_default_tables() {
    let regular = ParcelWeightModel::regular();
    let b2b = ParcelWeightModel::b2b();

    assert!(ParcelWeightModel::new(regular.classes().to_vec()).is_ok());
    assert!(ParcelWeightModel::new(b2b.classes().to_vec()).is_ok());

    assert_eq!(regular.classes().len(), 7);
    assert_eq!(b2b.classes().len(), 5);
    assert!((total_probability(&regular) - 1.).abs() < 1E-9);
    assert!((total_probability(&b2b) - 0.95).abs() < 1E-9);
}

parameterized_test! {can_select_class_by_cumulative_probability, (value, expected), {
    let model = ParcelWeightModel::b2b();

    assert_eq!(model.select(value).map(|class| class.name.as_str()), expected);
}}

can_select_class_by_cumulative_probability! {
    case01_first: (0., Some("0.5 kg to 1 kg")),
    case02_first_upper: (0.0999, Some("0.5 kg to 1 kg")),
    case03_boundary: (0.1, Some("1 kg to 3 kg")),
    case04_middle: (0.5, Some("3 kg to 10 kg")),
    case05_last: (0.94, Some("20 kg to 31.5 kg")),
    case06_uncovered: (0.96, None),
}

parameterized_test! {can_validate_weight_classes, (classes, is_missing), {
    let result = ParcelWeightModel::new(classes);

    if is_missing {
        assert!(matches!(result, Err(CourierError::MissingData { .. })));
    } else {
        assert!(matches!(result, Err(CourierError::Validation { .. })));
    }
}}

can_validate_weight_classes! {
    case01_empty: (vec![], true),
    case02_probability: (vec![WeightClass::new("a", 1.5, (0., 1.), (2., 5.))], false),
    case03_negative_probability: (vec![WeightClass::new("a", -0.1, (0., 1.), (2., 5.))], false),
    case04_range_above_max: (vec![WeightClass::new("a", 0.5, (0., 40.), (2., 5.))], false),
    case05_inverted_range: (vec![WeightClass::new("a", 0.5, (5., 1.), (2., 5.))], false),
    case06_shape: (vec![WeightClass::new("a", 0.5, (0., 1.), (0., 5.))], false),
    case07_sum: (vec![WeightClass::new("a", 0.6, (0., 1.), (2., 5.)), WeightClass::new("b", 0.6, (1., 2.), (2., 5.))], false),
}

#[test]
fn can_sample_weight_within_selected_class() {
    let model = ParcelWeightModel::new(vec![WeightClass::new("only", 1., (2., 3.), (2., 5.))]).unwrap();
    let sampler = WeightSampler::with_models(Arc::new(DefaultRandom::new_repeatable(1)), model.clone(), model);

    (0..100).for_each(|_| {
        let weight = sampler.sample(false);
        assert!((2. ..=3.).contains(&weight), "unexpected weight: {weight}");
    });
}

#[test]
fn can_use_uniform_fallback_when_probabilities_are_not_covered() {
    let model = ParcelWeightModel::new(vec![WeightClass::new("rare", 0., (0., 0.1), (2., 5.))]).unwrap();
    let sampler = WeightSampler::with_models(Arc::new(DefaultRandom::new_repeatable(1)), model.clone(), model);

    let weights = (0..200).map(|_| sampler.sample(true)).collect::<Vec<_>>();

    assert!(weights.iter().all(|weight| (0. ..=MAX_PARCEL_WEIGHT).contains(weight)));
    assert!(weights.iter().any(|&weight| weight > 0.1));
}

#[test]
fn can_sample_beta_within_unit_interval() {
    let random = DefaultRandom::new_repeatable(7);

    let values = (0..1000).map(|_| sample_beta(&random, 2., 5.)).collect::<Vec<_>>();
    let mean = values.iter().sum::<f64>() / values.len() as f64;

    assert!(values.iter().all(|value| (0. ..=1.).contains(value)));
    assert!((mean - 2. / 7.).abs() < 0.05, "unexpected mean: {mean}");
}

parameterized_test! {can_sample_gamma_with_expected_mean, shape, {
    let random = DefaultRandom::new_repeatable(3);

    let values = (0..2000).map(|_| sample_gamma(&random, shape)).collect::<Vec<_>>();
    let mean = values.iter().sum::<f64>() / values.len() as f64;

    assert!(values.iter().all(|&value| value >= 0.));
    assert!((mean - shape).abs() < 0.15 * shape.max(1.), "unexpected mean {mean} for shape {shape}");
}}

can_sample_gamma_with_expected_mean! {
    case01_small_shape: 0.5,
    case02_unit_shape: 1.,
    case03_large_shape: 5.,
}

fn expected_mean(model: &ParcelWeightModel) -> f64 {
    let classes = model
        .classes()
        .iter()
        .map(|class| class.probability * (class.low + (class.high - class.low) * class.alpha / (class.alpha + class.beta)))
        .sum::<f64>();

    classes + (1. - total_probability(model)) * MAX_PARCEL_WEIGHT / 2.
}

parameterized_test! {can_sample_many_weights_within_range_and_expected_mean, (is_b2b, model), {
    can_sample_many_weights_within_range_and_expected_mean_impl(is_b2b, model);
}}

can_sample_many_weights_within_range_and_expected_mean! {
    case01_regular: (false, ParcelWeightModel::regular()),
    case02_b2b: (true, ParcelWeightModel::b2b()),
}

fn can_sample_many_weights_within_range_and_expected_mean_impl(is_b2b: bool, model: ParcelWeightModel) {
    let sampler = WeightSampler::new(Arc::new(DefaultRandom::new_repeatable(7)));
    let samples = 100_000;

    let weights = (0..samples).map(|_| sampler.sample(is_b2b)).collect::<Vec<_>>();
    let mean = weights.iter().sum::<f64>() / samples as f64;

    assert!(weights.iter().all(|weight| (0. ..=MAX_PARCEL_WEIGHT).contains(weight)));
    assert!(weights.iter().all(|weight| (weight * 100. - (weight * 100.).round()).abs() < 1E-6));
    assert!((mean - expected_mean(&model)).abs() < 0.1, "mean {mean}, expected {}", expected_mean(&model));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn can_sample_rounded_weights_within_bounds(seed in 0_u64..10_000, is_b2b in any::<bool>()) {
        let sampler = WeightSampler::new(Arc::new(DefaultRandom::new_repeatable(seed)));

        for _ in 0..20 {
            let weight = sampler.sample(is_b2b);

            prop_assert!((0. ..=MAX_PARCEL_WEIGHT).contains(&weight));
            prop_assert!((weight * 100. - (weight * 100.).round()).abs() < 1E-6);
        }
    }
}
