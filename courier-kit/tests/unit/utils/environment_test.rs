use super::*;
use std::sync::Mutex;

#[test]
fn can_limit_workers() {
    assert_eq!(Parallelism::new(3).max_workers(), 3);
    assert_eq!(Parallelism::new(0).max_workers(), get_cpus().max(1));
}

#[test]
fn can_replace_logger() {
    let messages = Arc::new(Mutex::new(Vec::<String>::new()));
    let sink = messages.clone();

    let environment = Environment::new_repeatable(0, Parallelism::new(1))
        .with_logger(Arc::new(move |msg| sink.lock().unwrap().push(msg.to_string())));
    (environment.logger)("hello");

    assert_eq!(messages.lock().unwrap().as_slice(), &["hello".to_string()]);
}
