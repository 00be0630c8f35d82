use super::*;

fn create_point(id: &str, parcels: u64) -> DeliveryPoint {
    DeliveryPoint { id: id.to_string(), coord: Coord::new(0., 0.), postal_code: "10115".to_string(), parcels, parcel_type: None }
}

#[test]
fn can_get_provider_attributes() {
    let feature = DemandFeature::new("f1", Coord::new(1., 2.), "10115", 5)
        .with_provider("dhl", 3, Some("b2b"))
        .with_provider("ups", 2, None);

    assert_eq!(feature.parcels_of("dhl"), Ok(3));
    assert_eq!(feature.parcels_of("ups"), Ok(2));
    assert_eq!(feature.parcel_type_of("dhl"), Some("b2b"));
    assert_eq!(feature.parcel_type_of("ups"), None);
}

#[test]
fn can_report_missing_provider_attribute() {
    let feature = DemandFeature::new("f1", Coord::new(1., 2.), "10115", 5);

    let result = feature.parcels_of("dpd");

    assert_eq!(result, Err(CourierError::AttributeLookup { provider: "dpd".to_string(), field: "dpd_tag".to_string() }));
}

#[test]
fn can_count_deliveries_and_parcels() {
    let group = DemandGroup {
        key: "dhl_10115".to_string(),
        provider: "dhl".to_string(),
        points: vec![create_point("p1", 3), create_point("p2", 0), create_point("p3", 1)],
    };

    assert_eq!(group.delivery_count(), 2);
    assert_eq!(group.parcel_count(), 4);
}

parameterized_test! {can_validate_parcel_weight, (weight, is_ok), {
    let result = Parcel::new("p1", "dhl").with_weight(weight);

    assert_eq!(result.is_ok(), is_ok);
    if let Ok(parcel) = result {
        assert_eq!(parcel.weight(), Some(weight));
    }
}}

can_validate_parcel_weight! {
    case01_zero: (0., true),
    case02_regular: (2.5, true),
    case03_max: (31.5, true),
    case04_too_heavy: (31.51, false),
    case05_negative: (-1., false),
}

parameterized_test! {can_validate_delivery_postal_code, (postal_code, is_ok), {
    let result = Delivery::new("d1", Coord::new(0., 0.), "dhl", "b2c", postal_code, vec![1.]);

    assert_eq!(result.is_ok(), is_ok);
}}

can_validate_delivery_postal_code! {
    case01_valid: (Some("10115"), true),
    case02_absent: (None, true),
    case03_short: (Some("1011"), false),
    case04_long: (Some("101155"), false),
    case05_letters: (Some("1O115"), false),
}

#[test]
fn can_create_delivery() {
    let delivery = Delivery::new("d1", Coord::new(0., 0.), "dhl", "b2b", Some("10115"), vec![1.5, 2., 0.25]).unwrap();

    assert_eq!(delivery.amount(), 3);
    assert_eq!(delivery.total_weight(), 3.75);
    assert_eq!(delivery.postal_code(), Some("10115"));
    assert_eq!(delivery.weights(), &[1.5, 2., 0.25]);
}

#[test]
fn can_reject_delivery_with_invalid_weight() {
    let result = Delivery::new("d1", Coord::new(0., 0.), "dhl", "b2c", None, vec![1., 40.]);

    assert!(matches!(result, Err(CourierError::Validation { .. })));
}
