//! Adds racing against lifecycle-triggered disposal.
//!
//! Whatever the interleaving, a resource handed to a bag ends up disposed:
//! either it joined before the trigger and was disposed with the members,
//! or it arrived afterwards and was disposed on the spot.

use std::sync::{Arc, Barrier};
use std::thread;

use disposebag::{
    Disposable, DisposableRef, DisposeBag, DisposeEvent, LifecycleState, attach, disposables,
};
use disposebag_harness::TestLifecycleOwner;

const WORKERS: usize = 4;
const PER_WORKER: usize = 200;

#[test]
fn no_resource_outlives_a_destroyed_bag() {
    for _ in 0..20 {
        let owner = TestLifecycleOwner::shared_in(LifecycleState::Resumed);
        let bag = DisposeBag::with_event(&owner, DisposeEvent::Destroy);
        let start = Barrier::new(WORKERS + 1);

        let created: Vec<Vec<DisposableRef>> = thread::scope(|scope| {
            let workers: Vec<_> = (0..WORKERS)
                .map(|_| {
                    let bag = bag.clone();
                    let start = &start;
                    scope.spawn(move || {
                        start.wait();
                        (0..PER_WORKER)
                            .map(|_| {
                                let resource = disposables::empty();
                                bag.add(resource.clone());
                                resource
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            start.wait();
            owner.perform_destroy();

            workers
                .into_iter()
                .map(|worker| worker.join().unwrap())
                .collect()
        });

        assert!(bag.is_disposed());
        assert!(bag.is_empty());
        assert!(created.iter().flatten().all(|r| r.is_disposed()));
        assert_eq!(owner.observer_count(), 0);
    }
}

#[test]
fn manual_dispose_races_with_adds() {
    let owner = TestLifecycleOwner::shared_in(LifecycleState::Created);
    let bag = DisposeBag::with_event(&owner, DisposeEvent::Destroy);
    let start = Barrier::new(WORKERS + 1);

    let created: Vec<Vec<DisposableRef>> = thread::scope(|scope| {
        let workers: Vec<_> = (0..WORKERS)
            .map(|_| {
                let bag = bag.clone();
                let start = &start;
                scope.spawn(move || {
                    start.wait();
                    (0..PER_WORKER)
                        .map(|_| {
                            let resource = disposables::empty();
                            bag.add(resource.clone());
                            resource
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        start.wait();
        bag.dispose();

        workers
            .into_iter()
            .map(|worker| worker.join().unwrap())
            .collect()
    });

    assert!(created.iter().flatten().all(|r| r.is_disposed()));
    assert_eq!(owner.observer_count(), 0);
}

#[test]
fn attachments_from_many_threads_all_fire() {
    let owner = TestLifecycleOwner::shared_in(LifecycleState::Started);
    let resources: Vec<DisposableRef> = thread::scope(|scope| {
        let workers: Vec<_> = (0..WORKERS)
            .map(|_| {
                let owner = Arc::clone(&owner);
                scope.spawn(move || {
                    (0..PER_WORKER / 4)
                        .map(|_| {
                            let resource = disposables::empty();
                            attach(resource.clone(), &owner, DisposeEvent::Stop);
                            resource
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        workers
            .into_iter()
            .flat_map(|worker| worker.join().unwrap())
            .collect()
    });

    assert_eq!(owner.observer_count(), WORKERS * (PER_WORKER / 4));
    owner.perform_stop();
    assert!(resources.iter().all(|r| r.is_disposed()));
    assert_eq!(owner.observer_count(), 0);
}
