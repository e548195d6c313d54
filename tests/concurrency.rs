//! Heavy interleaving tests for the concurrent queue and registry.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use framelink::util::{ConcurrentQueue, ConcurrentRegistry};

#[test]
fn queue_no_loss_no_duplication_under_contention() {
    const PRODUCERS: usize = 8;
    const CONSUMERS: usize = 4;
    const PER_PRODUCER: usize = 5_000;

    let queue: Arc<ConcurrentQueue<usize>> = Arc::new(ConcurrentQueue::new());

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let queue = queue.clone();
            thread::spawn(move || {
                for i in 0..PER_PRODUCER {
                    queue.push(p * PER_PRODUCER + i);
                }
            })
        })
        .collect();

    // Each consumer stops at a sentinel so none blocks past the drain.
    const DONE: usize = usize::MAX;

    let consumers: Vec<_> = (0..CONSUMERS)
        .map(|_| {
            let queue = queue.clone();
            thread::spawn(move || {
                let mut popped = Vec::new();
                loop {
                    match queue.pop_wait() {
                        Some(DONE) | None => break,
                        Some(value) => popped.push(value),
                    }
                }
                popped
            })
        })
        .collect();

    for producer in producers {
        producer.join().unwrap();
    }
    for _ in 0..CONSUMERS {
        queue.push(DONE);
    }

    let mut seen = HashSet::new();
    let mut total = 0usize;
    for consumer in consumers {
        for value in consumer.join().unwrap() {
            assert!(seen.insert(value), "item {value} observed twice");
            total += 1;
        }
    }
    assert_eq!(total, PRODUCERS * PER_PRODUCER);
}

#[test]
fn clear_unblocks_waiting_pop() {
    let queue: Arc<ConcurrentQueue<u32>> = Arc::new(ConcurrentQueue::new());

    let waiter = {
        let queue = queue.clone();
        thread::spawn(move || queue.pop_wait())
    };

    thread::sleep(Duration::from_millis(50));
    queue.clear();

    // Must return None rather than block forever.
    assert_eq!(waiter.join().unwrap(), None);
}

#[test]
fn queue_fifo_preserved_with_single_consumer() {
    let queue = ConcurrentQueue::new();
    for i in 0..100u32 {
        queue.push(i);
    }
    for i in 0..100u32 {
        assert_eq!(queue.pop(), Some(i));
    }
}

#[test]
fn registry_iteration_sees_consistent_entries() {
    let registry: Arc<ConcurrentRegistry<u32, (u32, u32)>> = Arc::new(ConcurrentRegistry::new());

    // Writers keep both halves of the value equal; readers must never see a
    // torn pair.
    let writers: Vec<_> = (0..4)
        .map(|_| {
            let registry = registry.clone();
            thread::spawn(move || {
                for round in 0..500u32 {
                    for key in 0..16 {
                        registry.insert_or_assign(key, (round, round));
                    }
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = registry.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    registry.for_each_all(|(a, b)| assert_eq!(a, b));
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }
}

#[test]
fn registry_broadcast_filter_excludes_sender() {
    let registry = ConcurrentRegistry::new();
    for id in 1u32..=5 {
        registry.insert_or_assign(id, id);
    }

    let sender = 3u32;
    let mut reached = Vec::new();
    registry.for_each_some(|id| *id != sender, |id| reached.push(*id));
    reached.sort_unstable();
    assert_eq!(reached, vec![1, 2, 4, 5]);
}
