//! Memoized schedules keyed by scenario value
//!
//! Simulation is pure, so a schedule can be reused for any scenario with the
//! same field values. Concurrent misses on one key may both compute; the last
//! insert wins and the results are identical.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use log::trace;

use crate::loan::{ExtraPaymentGoal, LoanScenario};
use crate::schedule::{AmortizationEngine, Schedule};

/// Hashable identity of a scenario (exact bit patterns of its numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScenarioKey {
    principal: u64,
    annual_interest_rate: u64,
    term_months: u32,
    extra_monthly_payment: u64,
    goal: ExtraPaymentGoal,
}

impl From<&LoanScenario> for ScenarioKey {
    fn from(scenario: &LoanScenario) -> Self {
        Self {
            principal: scenario.principal().to_bits(),
            annual_interest_rate: scenario.annual_interest_rate().to_bits(),
            term_months: scenario.term_months(),
            extra_monthly_payment: scenario.extra_monthly_payment().to_bits(),
            goal: scenario.extra_payment_goal(),
        }
    }
}

/// Schedule cache for one engine configuration
#[derive(Debug, Default)]
pub struct ScheduleCache {
    engine: AmortizationEngine,

    /// Cached schedules by scenario
    entries: RwLock<HashMap<ScenarioKey, Arc<Schedule>>>,

    hits: AtomicU64,
    misses: AtomicU64,
}

impl ScheduleCache {
    /// Create a new cache around an engine
    pub fn new(engine: AmortizationEngine) -> Self {
        Self {
            engine,
            ..Default::default()
        }
    }

    pub fn engine(&self) -> &AmortizationEngine {
        &self.engine
    }

    /// Return the cached schedule or simulate and store it
    pub fn get_or_simulate(&self, scenario: &LoanScenario) -> Arc<Schedule> {
        let key = ScenarioKey::from(scenario);

        if let Some(schedule) = self.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!("schedule cache hit for {:?}", key);
            return schedule;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let schedule = Arc::new(self.engine.simulate(scenario));
        self.write_entries().insert(key, Arc::clone(&schedule));
        schedule
    }

    /// Get a cached schedule without simulating
    pub fn get(&self, key: &ScenarioKey) -> Option<Arc<Schedule>> {
        self.read_entries().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_entries().is_empty()
    }

    /// Clear all cached schedules and statistics
    pub fn clear(&self) {
        self.write_entries().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Get cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits() + self.misses();
        if total == 0 {
            0.0
        } else {
            self.hits() as f64 / total as f64
        }
    }

    // A poisoned lock only means another thread panicked mid-insert; the map
    // holds complete entries either way.
    fn read_entries(&self) -> std::sync::RwLockReadGuard<'_, HashMap<ScenarioKey, Arc<Schedule>>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_entries(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<ScenarioKey, Arc<Schedule>>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    fn scenario(principal: f64) -> LoanScenario {
        LoanScenario::new(principal, 9.93, 360).unwrap()
    }

    #[test]
    fn test_hit_and_miss_accounting() {
        let cache = ScheduleCache::default();

        let first = cache.get_or_simulate(&scenario(500_000.0));
        let second = cache.get_or_simulate(&scenario(500_000.0));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hit_rate(), 0.5);
    }

    #[test]
    fn test_distinct_scenarios_get_distinct_entries() {
        let cache = ScheduleCache::default();
        let base = scenario(500_000.0);
        let extra = base
            .with_extra_payment(1_000.0, ExtraPaymentGoal::ShortenTerm)
            .unwrap();
        let reduce = base
            .with_extra_payment(1_000.0, ExtraPaymentGoal::ReduceInstallment)
            .unwrap();

        assert_ne!(ScenarioKey::from(&extra), ScenarioKey::from(&reduce));

        let a = cache.get_or_simulate(&base);
        let b = cache.get_or_simulate(&extra);
        cache.get_or_simulate(&reduce);

        assert_eq!(cache.len(), 3);
        assert!(b.len() < a.len());
    }

    #[test]
    fn test_clear() {
        let cache = ScheduleCache::default();
        cache.get_or_simulate(&scenario(100_000.0));
        assert!(!cache.is_empty());

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.hit_rate(), 0.0);
    }

    #[test]
    fn test_concurrent_callers_agree() {
        let cache = ScheduleCache::default();
        let s = scenario(321_000.0);

        let schedules: Vec<_> = (0..32).into_par_iter().map(|_| cache.get_or_simulate(&s)).collect();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits() + cache.misses(), 32);
        for schedule in &schedules {
            assert_eq!(**schedule, *schedules[0]);
        }
    }
}
