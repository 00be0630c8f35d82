#[cfg(test)]
#[path = "../../tests/unit/utils/random_test.rs"]
mod random_test;

use rand::prelude::*;
use rand::Error;
use rand_distr::StandardNormal;
use std::cell::UnsafeCell;
use std::rc::Rc;
use std::sync::Mutex;

/// Provides the way to use randomized values in generic way.
pub trait Random {
    /// Produces integral random value, uniformly distributed on the closed interval [min, max]
    fn uniform_int(&self, min: i32, max: i32) -> i32 {
        if min == max {
            return min;
        }

        assert!(min < max);
        self.get_rng().gen_range(min..max + 1)
    }

    /// Produces real random value, uniformly distributed on the closed interval [min, max)
    fn uniform_real(&self, min: f64, max: f64) -> f64 {
        if (min - max).abs() < f64::EPSILON {
            return min;
        }

        assert!(min < max);
        self.get_rng().gen_range(min..max)
    }

    /// Flips a coin and returns true if it is "heads", false otherwise.
    fn is_head_not_tails(&self) -> bool {
        self.get_rng().gen_bool(0.5)
    }

    /// Tests probability value in (0., 1.) range.
    fn is_hit(&self, probability: f64) -> bool {
        self.get_rng().gen_bool(probability.clamp(0., 1.))
    }

    /// Produces a value from standard normal distribution (zero mean, unit variance).
    fn standard_normal(&self) -> f64 {
        self.get_rng().sample(StandardNormal)
    }

    /// Returns RNG.
    fn get_rng(&self) -> RandomGen;
}

/// A default random implementation.
///
/// By default, it uses a thread local generator seeded from entropy. A repeatable instance
/// keeps its own seeded generator which makes the produced sequence deterministic for the
/// same order of calls.
#[derive(Default)]
pub struct DefaultRandom {
    seeded: Option<Mutex<SmallRng>>,
}

impl DefaultRandom {
    /// Creates an instance of `DefaultRandom` with repeatable (predictable) random generation.
    pub fn new_repeatable(seed: u64) -> Self {
        Self { seeded: Some(Mutex::new(SmallRng::seed_from_u64(seed))) }
    }
}

impl Random for DefaultRandom {
    fn get_rng(&self) -> RandomGen {
        match self.seeded.as_ref() {
            Some(rng) => {
                let mut rng = rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                RandomGen::seed_from_u64(rng.next_u64())
            }
            None => RandomGen { rng: DEFAULT_RNG.with(|t| t.clone()) },
        }
    }
}

thread_local! {
    static DEFAULT_RNG: Rc<UnsafeCell<SmallRng>> = Rc::new(UnsafeCell::new(SmallRng::from_entropy()));
}

/// Specifies underlying random generator type.
#[derive(Clone, Debug)]
pub struct RandomGen {
    rng: Rc<UnsafeCell<SmallRng>>,
}

impl SeedableRng for RandomGen {
    type Seed = <SmallRng as SeedableRng>::Seed;

    fn from_seed(seed: Self::Seed) -> Self {
        Self { rng: Rc::new(UnsafeCell::new(SmallRng::from_seed(seed))) }
    }

    fn seed_from_u64(state: u64) -> Self {
        Self { rng: Rc::new(UnsafeCell::new(SmallRng::seed_from_u64(state))) }
    }
}

impl RngCore for RandomGen {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        let rng = unsafe { &mut *self.rng.get() };
        rng.next_u32()
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        let rng = unsafe { &mut *self.rng.get() };
        rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let rng = unsafe { &mut *self.rng.get() };
        rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        let rng = unsafe { &mut *self.rng.get() };
        rng.try_fill_bytes(dest)
    }
}
