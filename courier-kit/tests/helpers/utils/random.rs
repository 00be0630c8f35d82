use crate::prelude::*;
use rand::SeedableRng;
use std::sync::Mutex;

/// Replays scripted values in the given order.
pub struct FakeRandom {
    ints: Mutex<Vec<i32>>,
    reals: Mutex<Vec<f64>>,
}

impl FakeRandom {
    pub fn new(ints: Vec<i32>, reals: Vec<f64>) -> Self {
        fn reverse<T>(mut values: Vec<T>) -> Vec<T> {
            values.reverse();
            values
        }

        Self { ints: Mutex::new(reverse(ints)), reals: Mutex::new(reverse(reals)) }
    }
}

impl Random for FakeRandom {
    fn uniform_int(&self, min: i32, max: i32) -> i32 {
        assert!(min <= max);
        self.ints.lock().unwrap().pop().expect("no more ints")
    }

    fn uniform_real(&self, min: f64, max: f64) -> f64 {
        assert!(min <= max);
        self.reals.lock().unwrap().pop().expect("no more reals")
    }

    fn get_rng(&self) -> RandomGen {
        RandomGen::seed_from_u64(0)
    }
}
