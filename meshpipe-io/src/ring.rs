//! Bounded lock-free single-producer / multi-consumer ring
//!
//! The import pipeline hands batch ids from the producer thread to worker
//! threads through this ring. Each slot carries an atomic sequence number
//! (Vyukov-style sequenced ring): a slot is writable when its sequence
//! equals the producer cursor, and readable when it equals the consumer
//! cursor plus one. Both operations are non-blocking and allocation-free.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Keeps the producer and consumer cursors on separate cache lines.
#[repr(align(64))]
struct CacheAligned<T>(T);

struct Slot<T> {
    sequence: AtomicUsize,
    value: UnsafeCell<MaybeUninit<T>>,
}

/// Bounded lock-free FIFO of small copyable handles.
///
/// Exactly one thread may push; any number of threads may pop. Capacity is
/// rounded up to the next power of two, with a minimum of 2.
pub struct SpmcRing<T> {
    slots: Box<[Slot<T>]>,
    mask: usize,
    /// Consumers claim from the head.
    head: CacheAligned<AtomicUsize>,
    /// The producer publishes at the tail.
    tail: CacheAligned<AtomicUsize>,
    closed: AtomicBool,
}

unsafe impl<T: Send> Send for SpmcRing<T> {}
unsafe impl<T: Send> Sync for SpmcRing<T> {}

impl<T: Copy> SpmcRing<T> {
    /// Create a ring with at least `capacity` slots
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(2).next_power_of_two();
        let slots = (0..capacity)
            .map(|i| Slot {
                sequence: AtomicUsize::new(i),
                value: UnsafeCell::new(MaybeUninit::uninit()),
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            slots,
            mask: capacity - 1,
            head: CacheAligned(AtomicUsize::new(0)),
            tail: CacheAligned(AtomicUsize::new(0)),
            closed: AtomicBool::new(false),
        }
    }

    /// Number of slots in the ring
    pub fn capacity(&self) -> usize {
        self.mask + 1
    }

    /// Non-blocking push; returns `false` when the ring is full or closed.
    ///
    /// The ring is single-producer: concurrent pushes from more than one
    /// thread are not supported.
    pub fn try_push(&self, item: T) -> bool {
        if self.closed.load(Ordering::Acquire) {
            return false;
        }

        let tail = self.tail.0.load(Ordering::Relaxed);
        let slot = &self.slots[tail & self.mask];

        if slot.sequence.load(Ordering::Acquire) != tail {
            return false; // full
        }

        unsafe { (*slot.value.get()).write(item) };
        slot.sequence.store(tail + 1, Ordering::Release);
        self.tail.0.store(tail + 1, Ordering::Release);
        true
    }

    /// Non-blocking pop; returns `None` when the ring is empty.
    pub fn try_pop(&self) -> Option<T> {
        let mut head = self.head.0.load(Ordering::Relaxed);

        loop {
            let slot = &self.slots[head & self.mask];
            let sequence = slot.sequence.load(Ordering::Acquire);

            if sequence == head + 1 {
                // Published and unclaimed; race other consumers for it. The
                // per-slot sequence fence carries the synchronizing edge, so
                // the cursor CAS itself can be relaxed.
                match self.head.0.compare_exchange_weak(
                    head,
                    head + 1,
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => {
                        let item = unsafe { (*slot.value.get()).assume_init() };
                        slot.sequence
                            .store(head + self.capacity(), Ordering::Release);
                        return Some(item);
                    }
                    Err(current) => {
                        head = current;
                        continue;
                    }
                }
            }

            if sequence < head + 1 {
                return None; // empty
            }

            // Another consumer already recycled this slot; catch up.
            head = self.head.0.load(Ordering::Relaxed);
        }
    }

    /// Reject further pushes; items already queued remain poppable
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    /// Check whether the ring has been closed
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Check whether the ring currently holds no items
    pub fn is_empty(&self) -> bool {
        self.head.0.load(Ordering::Acquire) == self.tail.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_capacity_rounds_to_power_of_two() {
        assert_eq!(SpmcRing::<usize>::with_capacity(0).capacity(), 2);
        assert_eq!(SpmcRing::<usize>::with_capacity(1).capacity(), 2);
        assert_eq!(SpmcRing::<usize>::with_capacity(5).capacity(), 8);
        assert_eq!(SpmcRing::<usize>::with_capacity(16).capacity(), 16);
    }

    #[test]
    fn test_push_until_full_pop_until_empty() {
        let ring = SpmcRing::with_capacity(4);
        for i in 0..4usize {
            assert!(ring.try_push(i));
        }
        // At most `capacity` items ever reside in the ring.
        assert!(!ring.try_push(99));

        for expected in 0..4usize {
            assert_eq!(ring.try_pop(), Some(expected));
        }
        assert_eq!(ring.try_pop(), None);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_slots_are_reusable_after_wraparound() {
        let ring = SpmcRing::with_capacity(2);
        for round in 0..10usize {
            assert!(ring.try_push(round));
            assert!(ring.try_push(round + 100));
            assert_eq!(ring.try_pop(), Some(round));
            assert_eq!(ring.try_pop(), Some(round + 100));
        }
    }

    #[test]
    fn test_closed_ring_rejects_push_but_drains() {
        let ring = SpmcRing::with_capacity(4);
        assert!(ring.try_push(1usize));
        ring.close();
        assert!(ring.is_closed());
        assert!(!ring.try_push(2));
        assert_eq!(ring.try_pop(), Some(1));
    }

    #[test]
    fn test_multi_consumer_drain_delivers_each_item_once() {
        const ITEMS: usize = 10_000;
        const CONSUMERS: usize = 4;
        const END: usize = usize::MAX;

        let ring = SpmcRing::with_capacity(64);
        let received = Mutex::new(Vec::new());

        std::thread::scope(|scope| {
            for _ in 0..CONSUMERS {
                scope.spawn(|| {
                    let mut local = Vec::new();
                    loop {
                        match ring.try_pop() {
                            Some(END) => break,
                            Some(item) => local.push(item),
                            None => std::hint::spin_loop(),
                        }
                    }
                    received.lock().unwrap().extend(local);
                });
            }

            for i in 0..ITEMS {
                while !ring.try_push(i) {
                    std::hint::spin_loop();
                }
            }
            // One end-of-stream marker per consumer; no consumer exits
            // before seeing one.
            for _ in 0..CONSUMERS {
                while !ring.try_push(END) {
                    std::hint::spin_loop();
                }
            }
        });

        let mut all = received.into_inner().unwrap();
        assert_eq!(all.len(), ITEMS);
        all.sort_unstable();
        for (i, item) in all.iter().enumerate() {
            assert_eq!(*item, i);
        }
    }
}
