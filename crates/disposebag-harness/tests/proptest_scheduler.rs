//! Property tests for virtual-time scheduling.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use disposebag_core::Disposable;
use disposebag_harness::TestScheduler;
use proptest::prelude::*;

proptest! {
    #[test]
    fn periodic_runs_match_elapsed_periods(
        period in 1u64..10,
        steps in prop::collection::vec(0u64..15, 1..10),
    ) {
        let scheduler = TestScheduler::new();
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&ticks);
        let task = scheduler.schedule_periodic(Duration::from_secs(period), move |tick| {
            sink.lock().unwrap().push(tick);
        });

        let mut elapsed = 0;
        for step in steps {
            scheduler.advance_time_by(Duration::from_secs(step));
            elapsed += step;
            prop_assert_eq!(task.runs(), elapsed / period);
        }

        let seen = ticks.lock().unwrap().clone();
        let expected: Vec<u64> = (0..elapsed / period).collect();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn disposed_task_never_runs_again(
        period in 1u64..10,
        before in 0u64..30,
        after in 0u64..30,
    ) {
        let scheduler = TestScheduler::new();
        let task = scheduler.schedule_periodic(Duration::from_secs(period), |_| {});

        scheduler.advance_time_by(Duration::from_secs(before));
        let runs = task.runs();
        task.dispose();
        scheduler.advance_time_by(Duration::from_secs(after));

        prop_assert_eq!(task.runs(), runs);
        prop_assert_eq!(scheduler.now(), Duration::from_secs(before + after));
    }

    #[test]
    fn delayed_task_runs_once_when_due(delay in 0u64..20, advance in 0u64..40) {
        let scheduler = TestScheduler::new();
        let task = scheduler.schedule_after(Duration::from_secs(delay), || {});
        scheduler.advance_time_by(Duration::from_secs(advance));
        prop_assert_eq!(task.runs(), u64::from(advance >= delay));
    }
}
