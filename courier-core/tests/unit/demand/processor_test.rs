use super::*;
use crate::helpers::utils::create_test_environment;
use crate::network::Coord;
use crate::utils::DefaultRandom;

fn create_feature(id: &str, postal_code: &str, dhl: u64, ups: u64) -> DemandFeature {
    DemandFeature::new(id, Coord::new(0., 0.), postal_code, dhl + ups)
        .with_provider("dhl", dhl, Some("b2b"))
        .with_provider("ups", ups, None)
}

fn create_processor(config: DemandConfig) -> DemandProcessor {
    DemandProcessor::new(config, &["dhl", "ups"], create_test_environment()).expect("cannot create processor")
}

#[test]
fn can_group_features_by_provider_and_postal_code() {
    let features = vec![
        create_feature("f1", "10115", 2, 1),
        create_feature("f2", "10117", 1, 0),
        create_feature("f3", "10115", 0, 3),
        create_feature("f4", "10115", 4, 0),
    ];

    let groups = create_processor(DemandConfig::default()).group_features(features.as_slice()).unwrap();

    let summary = groups.iter().map(|group| (group.key.as_str(), group.delivery_count(), group.parcel_count())).collect::<Vec<_>>();
    assert_eq!(summary, vec![("dhl_10115", 2, 6), ("dhl_10117", 1, 1), ("ups_10115", 2, 4)]);
    assert_eq!(groups[0].points[0].parcel_type.as_deref(), Some("b2b"));
    assert_eq!(groups[2].provider, "ups");
}

#[test]
fn can_skip_outliers_and_features_without_postal_code() {
    let config = DemandConfig { max_parcels_per_feature: 10, ..DemandConfig::default() };
    let features = vec![create_feature("f1", "10115", 2, 1), create_feature("f2", "10115", 20, 0), create_feature("f3", "", 1, 1)];

    let groups = create_processor(config).group_features(features.as_slice()).unwrap();

    assert_eq!(groups.iter().map(|group| group.key.as_str()).collect::<Vec<_>>(), vec!["dhl_10115", "ups_10115"]);
    assert!(groups.iter().all(|group| group.points.len() == 1));
}

#[test]
fn can_report_missing_features() {
    let result = create_processor(DemandConfig::default()).group_features(&[]);

    assert!(matches!(result, Err(CourierError::MissingData { .. })));
}

#[test]
fn can_report_missing_provider_attribute() {
    let features = vec![DemandFeature::new("f1", Coord::new(0., 0.), "10115", 1).with_provider("dhl", 1, None)];

    let result = create_processor(DemandConfig::default()).group_features(features.as_slice());

    assert!(matches!(result, Err(CourierError::AttributeLookup { provider, .. }) if provider == "ups"));
}

#[test]
fn can_process_features_into_bounded_groups() {
    let config = DemandConfig { demand_border: 30, ..DemandConfig::default() };
    let features = (0..100)
        .map(|idx| {
            DemandFeature::new(format!("f{idx}").as_str(), Coord::new(idx as f64, (idx % 7) as f64), "10115", 1)
                .with_provider("dhl", 1, None)
                .with_provider("ups", 0, None)
        })
        .collect::<Vec<_>>();

    let groups = create_processor(config).process(features.as_slice()).unwrap();

    assert_eq!(groups.len(), 4);
    assert!(groups.iter().all(|group| group.delivery_count() <= 25));
    assert_eq!(get_totals(groups.as_slice()), (100, 100));
}

#[test]
fn can_create_deliveries_with_sampled_weights() {
    let features = vec![create_feature("f1", "10115", 3, 0), create_feature("f2", "10115", 2, 0)];
    let processor = create_processor(DemandConfig::default());
    let groups = processor.group_features(features.as_slice()).unwrap();
    let sampler = WeightSampler::new(Arc::new(DefaultRandom::new_repeatable(0)));

    let deliveries = processor.create_deliveries(&groups[0], &sampler).unwrap();

    assert_eq!(deliveries.iter().map(|delivery| delivery.id.as_str()).collect::<Vec<_>>(), vec!["f1_f1", "f2_f2"]);
    assert_eq!(deliveries.iter().map(|delivery| delivery.amount()).sum::<usize>(), 5);
    assert!(deliveries.iter().all(|delivery| delivery.parcel_type == "b2b"));
    assert!(deliveries.iter().all(|delivery| delivery.postal_code() == Some("10115")));
    assert!(deliveries.iter().flat_map(|delivery| delivery.weights()).all(|weight| (0. ..=MAX_PARCEL_WEIGHT).contains(weight)));
}

#[test]
fn can_use_b2c_parcel_type_by_default() {
    let features = vec![create_feature("f1", "10115", 0, 2)];
    let processor = create_processor(DemandConfig::default());
    let groups = processor.group_features(features.as_slice()).unwrap();
    let sampler = WeightSampler::new(Arc::new(DefaultRandom::new_repeatable(0)));

    let deliveries = processor.create_deliveries(&groups[0], &sampler).unwrap();

    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].parcel_type, "b2c");
    assert_eq!(deliveries[0].provider, "ups");
}

#[test]
fn can_reject_invalid_postal_code_of_delivery() {
    let features = vec![create_feature("f1", "ABC", 1, 0)];
    let processor = create_processor(DemandConfig::default());
    let groups = processor.group_features(features.as_slice()).unwrap();
    let sampler = WeightSampler::new(Arc::new(DefaultRandom::new_repeatable(0)));

    let result = processor.create_deliveries(&groups[0], &sampler);

    assert!(matches!(result, Err(CourierError::Validation { .. })));
}

#[test]
fn can_reject_zero_demand_border() {
    let config = DemandConfig { demand_border: 0, ..DemandConfig::default() };

    let result = DemandProcessor::new(config, &["dhl"], create_test_environment());

    match result {
        Err(err) => assert_eq!(err, CourierError::validation("demand border", 0, "should be positive")),
        Ok(_) => unreachable!("zero demand border is accepted"),
    }
}

#[test]
fn can_read_config_from_json() {
    let config = DemandConfig::from_json(r#"{ "demandBorder": 1000 }"#.as_bytes()).unwrap();

    assert_eq!(config.demand_border, 1000);
    assert_eq!(config.max_parcels_per_feature, 1500);
    assert_eq!(config.kmeans_max_iterations, 100);
}
