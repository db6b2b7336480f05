//! Tests for concurrent access to one DataStore

use std::sync::Arc;
use std::thread;

use multikv::DataStore;

#[test]
fn test_concurrent_zadd_same_key() {
    let store = Arc::new(DataStore::new());

    let handles: Vec<_> = (0..10)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..100 {
                    let n = t * 100 + i;
                    assert!(store.zadd("shared", n as f64, &format!("member-{}", n)));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.zcard("shared"), 1000);
    let all = store.zquery("shared", f64::NEG_INFINITY, "", f64::INFINITY, "", 0, usize::MAX);
    assert_eq!(all.len(), 1000);
    for (n, (member, score)) in all.iter().enumerate() {
        assert_eq!(member, &format!("member-{}", n));
        assert_eq!(*score, n as f64);
    }
}

#[test]
fn test_concurrent_incrby() {
    let store = Arc::new(DataStore::new());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..250 {
                    store.incrby("counter", 1);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.get("counter"), Some("2000".to_string()));
}

#[test]
fn test_concurrent_readers_and_writers() {
    let store = Arc::new(DataStore::new());
    for i in 0..50 {
        store.rpush("list", &i.to_string());
        store.sadd("set", &i.to_string());
    }

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..100 {
                    store.lmove("list", "list", "LEFT", "RIGHT");
                    store.hset("hash", [(format!("f{}-{}", t, i), i.to_string())]);
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..100 {
                    assert_eq!(store.lrange("list", 0, -1).map(|l| l.len()), Some(50));
                    assert_eq!(store.scard("set"), 50);
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }

    assert_eq!(store.llen("list"), 50);
    assert_eq!(store.hset("hash", Vec::<(String, String)>::new()), 0);
    assert_eq!(store.hget("hash", "f3-99"), Some("99".to_string()));
}
