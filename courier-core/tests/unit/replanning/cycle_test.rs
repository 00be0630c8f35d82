use super::*;
use crate::helpers::models::{test_service, test_vehicle};
use crate::helpers::network::create_test_oracle;
use crate::helpers::utils::{create_capturing_logger, create_test_environment, create_test_environment_with_logger};
use crate::routing::RoutingConfig;
use crate::scheduling::SchedulerKind;
use crate::solver::CheapestInsertionSolver;

fn create_carriers(size: usize, replanned: &[usize]) -> Vec<Carrier> {
    (0..size)
        .map(|idx| {
            let id = format!("c{idx}");
            let mut carrier = Carrier::new(
                id.as_str(),
                vec![test_vehicle(&format!("{id}_v"), 0, Some(0), (0., 36000.))],
                vec![test_service(&format!("{id}_j"), 1 + idx % 4)],
            );
            carrier.attributes.had_first_replanning = replanned.contains(&idx);

            carrier
        })
        .collect()
}

fn create_cycle(config: ReplanningConfig, environment: Arc<Environment>) -> ReplanningCycle {
    let routing = RoutingScheduler::new(
        RoutingConfig { scheduler: SchedulerKind::PriorityPool, workers: 2, ..RoutingConfig::default() },
        environment.clone(),
        Arc::new(CheapestInsertionSolver::new(environment.clone())),
        Arc::new(create_test_oracle(6, &[])),
    )
    .expect("cannot create routing scheduler");

    ReplanningCycle::new(config, environment, routing)
}

fn routed_ids(carriers: &[Carrier]) -> Vec<&str> {
    carriers.iter().filter(|carrier| carrier.selected_plan().is_some()).map(|carrier| carrier.id.as_str()).collect()
}

parameterized_test! {can_skip_iterations_outside_of_window, (iteration, expected_active), {
    can_skip_iterations_outside_of_window_impl(iteration, expected_active);
}}

can_skip_iterations_outside_of_window! {
    case01_before_first: (1, false),
    case02_first: (2, true),
    case03_inside: (3, true),
    case04_last: (5, true),
    case05_after_last: (6, false),
}

fn can_skip_iterations_outside_of_window_impl(iteration: usize, expected_active: bool) {
    let config = ReplanningConfig { first_iteration: 2, last_iteration: 5, ..ReplanningConfig::default() };
    let cycle = create_cycle(config, create_test_environment());
    let mut carriers = create_carriers(2, &[]);

    let report = cycle.run_once(carriers.as_mut_slice(), iteration).expect("replanning should not fail");

    assert_eq!(report.is_some(), expected_active);
    assert_eq!(carriers.iter().all(|carrier| carrier.attributes.had_first_replanning), expected_active);
}

#[test]
fn can_bound_first_replanning_by_max_carriers() {
    let config = ReplanningConfig { max_carriers: 2, reoptimization_probability: 1., ..ReplanningConfig::default() };
    let cycle = create_cycle(config, create_test_environment());
    let mut carriers = create_carriers(5, &[]);

    let report = cycle.run_once(carriers.as_mut_slice(), 0).expect("replanning should not fail").expect("no report");

    assert_eq!(report.succeeded, 2);
    assert_eq!(routed_ids(&carriers), vec!["c0", "c1"]);
    let marked = carriers.iter().filter(|carrier| carrier.attributes.had_first_replanning).count();
    assert_eq!(marked, 2);
}

#[test]
fn can_cover_all_carriers_within_several_iterations() {
    let config = ReplanningConfig { max_carriers: 2, reoptimization_probability: 0., ..ReplanningConfig::default() };
    let cycle = create_cycle(config, create_test_environment());
    let mut carriers = create_carriers(5, &[]);

    let reports = (0..4)
        .map(|iteration| cycle.run_once(carriers.as_mut_slice(), iteration).expect("replanning should not fail"))
        .collect::<Vec<_>>();

    let succeeded = reports.iter().map(|report| report.as_ref().map_or(0, |report| report.succeeded)).collect::<Vec<_>>();
    assert_eq!(succeeded, vec![2, 2, 1, 0]);
    assert!(carriers.iter().all(|carrier| carrier.plans().len() == 1));
}

#[test]
fn can_prefer_first_replanning_over_reoptimization() {
    let config = ReplanningConfig { max_carriers: 3, reoptimization_probability: 1., ..ReplanningConfig::default() };
    let cycle = create_cycle(config, create_test_environment());
    let mut carriers = create_carriers(6, &[0, 1, 2]);

    cycle.run_once(carriers.as_mut_slice(), 0).expect("replanning should not fail");

    assert_eq!(routed_ids(&carriers), vec!["c3", "c4", "c5"]);
}

#[test]
fn can_reoptimize_random_subset_of_replanned_carriers() {
    let config = ReplanningConfig { max_carriers: 3, reoptimization_probability: 1., ..ReplanningConfig::default() };
    let cycle = create_cycle(config, create_test_environment());
    let mut carriers = create_carriers(8, &(0..8).collect::<Vec<_>>());

    let report = cycle.run_once(carriers.as_mut_slice(), 0).expect("replanning should not fail").expect("no report");

    assert_eq!(report.succeeded, 3);
    assert_eq!(routed_ids(&carriers).len(), 3);
}

#[test]
fn can_return_none_when_nothing_is_selected() {
    let (logger, messages) = create_capturing_logger();
    let config = ReplanningConfig { reoptimization_probability: 0., ..ReplanningConfig::default() };
    let cycle = create_cycle(config, create_test_environment_with_logger(logger));
    let mut carriers = create_carriers(4, &[0, 1, 2, 3]);

    let report = cycle.run_once(carriers.as_mut_slice(), 7).expect("replanning should not fail");

    assert!(report.is_none());
    assert!(routed_ids(&carriers).is_empty());
    assert!(messages.lock().unwrap().contains(&"replanning iteration 7: 0 of 4 carriers selected".to_string()));
}

#[test]
fn can_read_replanning_config_from_json() {
    let json = r#"{"maxCarriers": 8, "lastIteration": 20}"#;

    let config = ReplanningConfig::from_json(json.as_bytes()).expect("cannot read config");

    assert_eq!(config.max_carriers, 8);
    assert_eq!(config.last_iteration, 20);
    assert_eq!(config.first_iteration, 0);
    assert_eq!(config.reoptimization_probability, 0.05);
}
