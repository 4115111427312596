//! Behavior of semaphore and event objects through the typed API.

use std::{
    sync::{
        Arc, Barrier,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use proptest::prelude::*;
use px_svc::{
    error::{KernelError, ToRawResultCode},
    event, raw,
    semaphore::{self, CreateSemaphoreError, Disposition, OpenSemaphoreError, ReleaseSemaphoreError},
    sync::{self, CloseHandleError, INFINITE, WaitSynchronizationError},
};

#[test]
fn named_semaphores_share_their_count() {
    let (a, disposition) = semaphore::create(0, 8, Some("Local\\svc-share")).unwrap();
    assert_eq!(disposition, Disposition::Created);

    let (b, disposition) = semaphore::create(5, 8, Some("Local\\svc-share")).unwrap();
    assert_eq!(disposition, Disposition::Opened);

    assert_eq!(semaphore::release(&a, 1).unwrap(), 0);
    sync::wait_synchronization_single(&b, 0).unwrap();
    assert!(matches!(
        sync::wait_synchronization_single(&a, 0),
        Err(WaitSynchronizationError::TimedOut)
    ));

    sync::close_handle(a).unwrap();
    sync::close_handle(b).unwrap();
}

#[test]
fn open_finds_only_existing_semaphores() {
    assert!(matches!(
        semaphore::open("Local\\svc-open-missing"),
        Err(OpenSemaphoreError::NotFound)
    ));

    let (created, _) = semaphore::create(2, 2, Some("Local\\svc-open")).unwrap();
    let opened = semaphore::open("Local\\svc-open").unwrap();
    assert_ne!(created, opened);
    assert_eq!(
        semaphore::release(&opened, 1).map_err(|e| e.to_rc()),
        Err(KernelError::OutOfRange.to_rc())
    );

    sync::close_handle(created).unwrap();
    sync::close_handle(opened).unwrap();

    assert!(matches!(
        semaphore::open("Local\\svc-open"),
        Err(OpenSemaphoreError::NotFound)
    ));
}

#[test]
fn name_held_by_an_event_is_an_invalid_handle_for_semaphores() {
    let (ev, existed) = event::create(false, Some("Local\\svc-collide")).unwrap();
    assert!(!existed);

    assert!(matches!(
        semaphore::create(0, 1, Some("Local\\svc-collide")),
        Err(CreateSemaphoreError::InvalidHandle)
    ));
    assert!(matches!(
        semaphore::open("Local\\svc-collide"),
        Err(OpenSemaphoreError::InvalidHandle)
    ));

    sync::close_handle(ev).unwrap();
}

#[test]
fn creating_in_the_global_namespace_needs_privilege() {
    raw::set_create_global_privilege(false);
    let res = semaphore::create(0, 1, Some("Global\\svc-denied"));
    raw::set_create_global_privilege(true);

    assert!(matches!(res, Err(CreateSemaphoreError::AccessDenied)));
    assert!(raw::has_create_global_privilege());
}

#[test]
fn release_on_a_closed_handle_is_rejected() {
    let (sem, _) = semaphore::create(0, 1, None).unwrap();
    let copy = sem;
    sync::close_handle(sem).unwrap();

    assert!(matches!(
        semaphore::release(&copy, 1),
        Err(ReleaseSemaphoreError::InvalidHandle)
    ));
    assert!(matches!(
        sync::close_handle(copy),
        Err(CloseHandleError::InvalidHandle)
    ));
}

#[test]
fn event_wakes_every_waiter_and_stays_signalled() {
    let (ev, _) = event::create(false, None).unwrap();
    let barrier = Arc::new(Barrier::new(4));
    let waiters: Vec<_> = (0..3)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                sync::wait_synchronization_single(&ev, INFINITE)
            })
        })
        .collect();

    barrier.wait();
    thread::sleep(Duration::from_millis(10));
    event::signal(&ev).unwrap();

    for waiter in waiters {
        waiter.join().unwrap().unwrap();
    }
    sync::wait_synchronization_single(&ev, 0).unwrap();

    event::clear(&ev).unwrap();
    assert!(matches!(
        sync::wait_synchronization_single(&ev, 0),
        Err(WaitSynchronizationError::TimedOut)
    ));
    sync::close_handle(ev).unwrap();
}

#[test]
fn release_admits_as_many_waiters_as_units() {
    let (sem, _) = semaphore::create(0, 16, None).unwrap();
    let acquired = Arc::new(AtomicUsize::new(0));

    let waiters: Vec<_> = (0..4)
        .map(|_| {
            let acquired = Arc::clone(&acquired);
            thread::spawn(move || {
                let res = sync::wait_synchronization_single(&sem, 500_000_000);
                if res.is_ok() {
                    acquired.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(20));
    semaphore::release(&sem, 2).unwrap();

    for waiter in waiters {
        waiter.join().unwrap();
    }
    assert_eq!(acquired.load(Ordering::SeqCst), 2);
    sync::close_handle(sem).unwrap();
}

#[test]
fn bounded_wait_returns_after_its_timeout() {
    let (sem, _) = semaphore::create(0, 1, None).unwrap();
    let start = Instant::now();

    assert!(matches!(
        sync::wait_synchronization_single(&sem, 30_000_000),
        Err(WaitSynchronizationError::TimedOut)
    ));
    assert!(start.elapsed() >= Duration::from_millis(30));
    sync::close_handle(sem).unwrap();
}

proptest! {
    #[test]
    fn release_reports_previous_count(initial in 0i32..1000, n in 1i32..1000) {
        let max = 1500;
        let (sem, _) = semaphore::create(initial, max, None).unwrap();

        match semaphore::release(&sem, n) {
            Ok(previous) => {
                prop_assert_eq!(previous, initial);
                prop_assert!(initial + n <= max);
            }
            Err(ReleaseSemaphoreError::OutOfRange) => prop_assert!(initial + n > max),
            Err(err) => prop_assert!(false, "unexpected error: {err}"),
        }
        sync::close_handle(sem).unwrap();
    }
}
