use std::sync::atomic::{AtomicI64, Ordering};

/// Process-wide monotonic version source. Every mutation across every
/// session draws from this single counter, so version values are strictly
/// increasing server-wide.
#[derive(Debug, Default)]
pub struct VersionCounter(AtomicI64);

impl VersionCounter {
    pub fn new() -> Self {
        Self(AtomicI64::new(0))
    }

    /// Next version value; the first call in a fresh process returns 1.
    pub fn next(&self) -> i64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Last issued value (0 if none issued yet)
    pub fn current(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn first_version_is_one() {
        let counter = VersionCounter::new();
        assert_eq!(counter.next(), 1);
        assert_eq!(counter.next(), 2);
        assert_eq!(counter.current(), 2);
    }

    #[tokio::test]
    async fn concurrent_increments_never_repeat() {
        let counter = Arc::new(VersionCounter::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let counter = counter.clone();
            handles.push(tokio::spawn(async move {
                (0..100).map(|_| counter.next()).collect::<Vec<_>>()
            }));
        }

        let mut seen = std::collections::HashSet::new();
        for handle in handles {
            for v in handle.await.unwrap() {
                assert!(seen.insert(v), "version {} issued twice", v);
            }
        }
        assert_eq!(counter.current(), 800);
    }
}
