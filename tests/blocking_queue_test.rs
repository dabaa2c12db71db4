//! Blocking queue behaviour tests

use std::collections::HashSet;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use traffic_light::simulation::BlockingQueue;

#[test]
fn test_receive_returns_newest_first() {
    let queue = BlockingQueue::new();
    for value in 1..=5 {
        queue.send(value);
    }

    let received: Vec<i32> = (0..5).map(|_| queue.receive()).collect();
    assert_eq!(received, vec![5, 4, 3, 2, 1]);
    assert!(queue.is_empty());
}

#[test]
fn test_receive_blocks_until_send() {
    let queue = Arc::new(BlockingQueue::new());
    let (tx, rx) = mpsc::channel();

    let consumer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            let started = Instant::now();
            let value = queue.receive();
            tx.send((value, started.elapsed())).unwrap();
        })
    };

    // Nothing to receive yet
    assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());

    queue.send("green");
    let (value, waited) = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("receiver was not woken by send");
    assert_eq!(value, "green");
    assert!(waited >= Duration::from_millis(50));
    consumer.join().unwrap();
}

#[test]
fn test_no_items_lost_or_duplicated_across_consumers() {
    const CONSUMERS: usize = 4;
    const PER_CONSUMER: usize = 250;

    let queue = Arc::new(BlockingQueue::new());
    let consumers: Vec<_> = (0..CONSUMERS)
        .map(|_| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                (0..PER_CONSUMER)
                    .map(|_| queue.receive())
                    .collect::<Vec<usize>>()
            })
        })
        .collect();

    for value in 0..CONSUMERS * PER_CONSUMER {
        queue.send(value);
    }

    let mut seen = HashSet::new();
    for consumer in consumers {
        for value in consumer.join().unwrap() {
            assert!(seen.insert(value), "value {} received twice", value);
        }
    }
    assert_eq!(seen.len(), CONSUMERS * PER_CONSUMER);
    assert!(queue.is_empty());
}

#[test]
fn test_limited_queue_evicts_oldest() {
    let queue = BlockingQueue::with_limit(3);
    assert_eq!(queue.limit(), Some(3));

    for value in 1..=5 {
        queue.send(value);
    }

    assert_eq!(queue.len(), 3);
    assert_eq!(queue.evicted(), 2);
    assert_eq!(queue.receive(), 5);
    assert_eq!(queue.receive(), 4);
    assert_eq!(queue.receive(), 3);
    assert!(queue.is_empty());
}

#[test]
fn test_unbounded_queue_keeps_everything() {
    let queue = BlockingQueue::default();
    assert_eq!(queue.limit(), None);

    for value in 0..1000 {
        queue.send(value);
    }
    assert_eq!(queue.len(), 1000);
    assert_eq!(queue.evicted(), 0);
}
