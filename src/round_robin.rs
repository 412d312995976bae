//! Round-robin selection with retention.
//!
//! [`RoundRobin`] hands out ordinals `0..cap` in ascending, wrapping order.
//! A variant that goes bad can be pulled out of rotation with
//! [`retain`](Algorithm::retain) and put back with
//! [`recover`](Algorithm::recover); the surviving variants keep their
//! relative order, and a recovered ordinal rejoins in its original position,
//! not at the end of the line.
//!
//! ```rust
//! use rota::{Algorithm, RoundRobin};
//!
//! let rr = RoundRobin::new(4)?;
//! assert_eq!(rr.next()?, 0);
//!
//! // ordinal 1 goes bad: the rotation skips it
//! assert!(rr.retain(1)?);
//! assert_eq!(rr.next()?, 2);
//! assert_eq!(rr.next()?, 3);
//!
//! // recovered, it is back in its old position
//! assert!(rr.recover(1));
//! assert_eq!(rr.next()?, 0);
//! assert_eq!(rr.next()?, 1);
//! # Ok::<(), rota::Error>(())
//! ```
//!
//! [`Modulo`] is the retention-free alternative: a lock-free counter for
//! pools whose members never leave rotation.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::error::Error;
use crate::ring::Ring;

/// Selection seam between the [`Balancer`](crate::Balancer) facade and a
/// concrete strategy.
pub trait Algorithm {
    /// Ordinal of the next variant in rotation.
    fn next(&self) -> Result<usize, Error>;

    /// Exclude `ordinal` from rotation until recovered. `Ok(false)` when it
    /// was already excluded.
    fn retain(&self, ordinal: usize) -> Result<bool, Error>;

    /// Re-admit a previously retained `ordinal`. `false` when it was not
    /// excluded.
    fn recover(&self, ordinal: usize) -> bool;
}

/// Lock-serialized ring state.
///
/// `included` counts ordinals still in rotation and is the explicit
/// empty/singleton marker: no link field ever doubles as an exhaustion
/// sentinel. An excluded node's links are stale and must not be followed;
/// `recover` rewrites both before relinking.
#[derive(Debug)]
struct Inner {
    ring: Ring<()>,
    excluded: Vec<bool>,
    included: usize,
    cursor: usize,
}

impl Inner {
    /// Nearest included ordinal scanning downward from `from`, wrapping,
    /// stopping before revisiting `from`.
    fn nearest_below(&self, from: usize) -> Option<usize> {
        let cap = self.ring.len();
        let mut at = (from + cap - 1) % cap;
        while at != from {
            if !self.excluded[at] {
                return Some(at);
            }
            at = (at + cap - 1) % cap;
        }
        None
    }

    /// Nearest included ordinal scanning upward from `from`, wrapping.
    fn nearest_above(&self, from: usize) -> Option<usize> {
        let cap = self.ring.len();
        let mut at = (from + 1) % cap;
        while at != from {
            if !self.excluded[at] {
                return Some(at);
            }
            at = (at + 1) % cap;
        }
        None
    }

    /// Splice `ordinal` between `left` and `left`'s current successor.
    fn link_after(&mut self, left: usize, ordinal: usize) {
        let right = self.ring[left].next;
        self.ring[ordinal].prev = left;
        self.ring[ordinal].next = right;
        self.ring[left].next = ordinal;
        self.ring[right].prev = ordinal;
    }
}

/// Retention-aware round-robin over a fixed pool of `cap` ordinals.
///
/// Every operation holds the one lock for its full body, so concurrent
/// callers observe a strictly sequential history and no partially relinked
/// ring is ever visible. `next` and `retain` are O(1); `recover` is O(cap)
/// worst case when it skips a long run of excluded ordinals to find its
/// reinsertion point. Nothing allocates after construction.
#[derive(Debug)]
pub struct RoundRobin {
    inner: Mutex<Inner>,
    cap: usize,
}

impl RoundRobin {
    /// Fails with [`Error::NoVariant`] when `cap < 1`.
    pub fn new(cap: usize) -> Result<Self, Error> {
        if cap < 1 {
            return Err(Error::NoVariant);
        }

        Ok(Self {
            inner: Mutex::new(Inner {
                ring: Ring::with_capacity(cap),
                excluded: vec![false; cap],
                included: cap,
                cursor: 0,
            }),
            cap,
        })
    }

    /// Pool size this selector was built for.
    pub fn cap(&self) -> usize {
        self.cap
    }
}

impl Algorithm for RoundRobin {
    fn next(&self) -> Result<usize, Error> {
        let mut inner = self.inner.lock();
        if inner.included == 0 {
            trace!("rr.exhausted");
            return Err(Error::NoVariant);
        }
        let current = inner.cursor;
        inner.cursor = inner.ring[current].next;
        Ok(current)
    }

    fn retain(&self, ordinal: usize) -> Result<bool, Error> {
        let mut inner = self.inner.lock();
        if inner.excluded[ordinal] {
            return Ok(false);
        }
        inner.excluded[ordinal] = true;
        inner.included -= 1;
        debug!(ordinal, left = inner.included, "rr.retain");

        if inner.included == 0 {
            // Last member out; the ring is fully unlinked and the cursor
            // is meaningless until a recover puts a member back.
            return Ok(true);
        }

        let (prev, next) = {
            let node = &inner.ring[ordinal];
            (node.prev, node.next)
        };
        inner.ring[prev].next = next;
        inner.ring[next].prev = prev;

        // The cursor never rests on an excluded node.
        if inner.cursor == ordinal {
            inner.cursor = next;
        }
        Ok(true)
    }

    fn recover(&self, ordinal: usize) -> bool {
        let mut inner = self.inner.lock();
        if !inner.excluded[ordinal] {
            return false;
        }
        inner.excluded[ordinal] = false;
        inner.included += 1;
        debug!(ordinal, left = inner.included, "rr.recover");

        if let Some(left) = inner.nearest_below(ordinal) {
            // After the nearest lower member keeps the cycle ascending.
            inner.link_after(left, ordinal);
        } else if let Some(right) = inner.nearest_above(ordinal) {
            let left = inner.ring[right].prev;
            inner.link_after(left, ordinal);
        } else {
            // Sole member again; the cursor was referencing the dead
            // fully-unlinked state.
            let node = &mut inner.ring[ordinal];
            node.next = ordinal;
            node.prev = ordinal;
            inner.cursor = ordinal;
        }
        true
    }
}

/// Counter-modulo round-robin with no retention support.
///
/// One atomic fetch-add serves `next`: the counter runs forever and the
/// ordinal is its remainder mod `cap`, so there is no lock and no CAS loop.
/// Use it where variants never need to leave rotation; `retain` and
/// `recover` always report a no-op.
#[derive(Debug)]
pub struct Modulo {
    counter: AtomicUsize,
    cap: usize,
}

impl Modulo {
    /// Fails with [`Error::NoVariant`] when `cap < 1`.
    pub fn new(cap: usize) -> Result<Self, Error> {
        if cap < 1 {
            return Err(Error::NoVariant);
        }

        Ok(Self {
            counter: AtomicUsize::new(0),
            cap,
        })
    }

    /// Pool size this selector was built for.
    pub fn cap(&self) -> usize {
        self.cap
    }
}

impl Algorithm for Modulo {
    fn next(&self) -> Result<usize, Error> {
        Ok(self.counter.fetch_add(1, Ordering::Relaxed) % self.cap)
    }

    fn retain(&self, _ordinal: usize) -> Result<bool, Error> {
        Ok(false)
    }

    fn recover(&self, _ordinal: usize) -> bool {
        false
    }
}
