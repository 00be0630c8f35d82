use super::*;
use crate::helpers::network::create_line_network;

fn create_builder_with_nodes(count: usize) -> InMemoryNetworkBuilder {
    let mut builder = InMemoryNetworkBuilder::default();
    (0..count).for_each(|idx| {
        builder.add_node(Coord::new(idx as f64, 0.));
    });

    builder
}

#[test]
fn can_build_network() {
    let network = create_line_network(3, &[Some("z1")]);

    assert_eq!(network.node_count(), 3);
    assert_eq!(network.links().len(), 4);
    assert_eq!(network.out_links(1), &[1, 2]);
    assert_eq!(network.out_links(99), &[] as &[LinkId]);
    assert_eq!(network.link(0).and_then(|link| link.zone.clone()), Some("z1".into()));
    assert_eq!(network.link(2).and_then(|link| link.zone.clone()), Some("z1".into()));
    assert!(network.link(1).and_then(|link| link.zone.clone()).is_none());
    assert_eq!(network.node(2).map(|node| node.coord), Some(Coord::new(200., 0.)));
}

parameterized_test! {can_validate_link, (from, to, length, freespeed, is_missing), {
    let mut builder = create_builder_with_nodes(2);

    let result = builder.add_link(from, to, length, freespeed, &["car"], None);

    if is_missing {
        assert!(matches!(result, Err(CourierError::MissingData { .. })));
    } else {
        assert!(matches!(result, Err(CourierError::Validation { .. })));
    }
}}

can_validate_link! {
    case01_unknown_from: (5, 1, 10., 1., true),
    case02_unknown_to: (0, 2, 10., 1., true),
    case03_negative_length: (0, 1, -1., 1., false),
    case04_infinite_length: (0, 1, f64::INFINITY, 1., false),
    case05_zero_speed: (0, 1, 10., 0., false),
}

#[test]
fn can_reject_network_without_links() {
    let result = create_builder_with_nodes(2).build();

    assert!(matches!(result, Err(CourierError::MissingData { .. })));
}

#[test]
fn can_find_nearest_link() {
    let network = create_line_network(4, &[]);

    assert_eq!(network.nearest_link(&Coord::new(160., 5.)), Some(1));
    assert_eq!(network.nearest_link(&Coord::new(-50., 0.)), Some(0));
    assert_eq!(network.nearest_link(&Coord::new(1000., 0.)), Some(2));
}

#[test]
fn can_check_allowed_modes() {
    let mut builder = create_builder_with_nodes(2);
    let id = builder.add_link(0, 1, 10., 1., &["car", "truck"], None).unwrap();
    let network = builder.build().unwrap();

    let link = network.link(id).unwrap();
    assert!(link.allows("truck"));
    assert!(!link.allows("bike"));
}
