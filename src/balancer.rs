//! Item-level facade over a selection algorithm.
//!
//! [`Balancer`] pairs an [`Algorithm`] with the ordered collection it
//! selects from and translates ordinals back into items. Algorithm errors
//! bubble up wrapped with the failing operation, so call sites can tell
//! selection exhaustion apart from their own failures.

use thiserror::Error;

use crate::round_robin::{Algorithm, RoundRobin};

/// Facade failures. The source is always the core's
/// [`Error`](crate::Error), annotated with the operation that hit it.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum BalancerError {
    #[error("algorithm: next: {0}")]
    Next(#[source] crate::Error),
    #[error("algorithm: retain: {0}")]
    Retain(#[source] crate::Error),
}

/// Ordered pool of items handed out by an [`Algorithm`].
#[derive(Debug)]
pub struct Balancer<A, I> {
    algorithm: A,
    items: Vec<I>,
}

impl<I> Balancer<RoundRobin, I> {
    /// Retention-aware round-robin over `items`, sized to fit. Propagates
    /// the algorithm's construction error when `items` is empty.
    pub fn round_robin(items: Vec<I>) -> Result<Self, crate::Error> {
        let algorithm = RoundRobin::new(items.len())?;
        Ok(Self::new(algorithm, items))
    }
}

impl<A: Algorithm, I> Balancer<A, I> {
    /// Pair `algorithm` with `items`. The algorithm must already be sized
    /// to `items.len()`.
    pub fn new(algorithm: A, items: Vec<I>) -> Self {
        Self { algorithm, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Next item in rotation, with its ordinal.
    pub fn next(&self) -> Result<(&I, usize), BalancerError> {
        let ordinal = self.algorithm.next().map_err(BalancerError::Next)?;
        Ok((&self.items[ordinal], ordinal))
    }

    /// Pull `ordinal` out of rotation. `Ok(false)` when it already was out.
    pub fn retain(&self, ordinal: usize) -> Result<bool, BalancerError> {
        self.algorithm.retain(ordinal).map_err(BalancerError::Retain)
    }

    /// Put `ordinal` back into rotation. `false` when it was not out.
    pub fn recover(&self, ordinal: usize) -> bool {
        self.algorithm.recover(ordinal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::round_robin::Modulo;

    fn pool() -> Balancer<RoundRobin, &'static str> {
        Balancer::round_robin(vec!["a", "b", "c"]).unwrap()
    }

    #[test]
    fn maps_ordinals_to_items() {
        let balancer = pool();
        assert_eq!(balancer.len(), 3);
        assert_eq!(balancer.next().unwrap(), (&"a", 0));
        assert_eq!(balancer.next().unwrap(), (&"b", 1));
        assert_eq!(balancer.next().unwrap(), (&"c", 2));
        assert_eq!(balancer.next().unwrap(), (&"a", 0));
    }

    #[test]
    fn empty_pool_rejected() {
        let err = Balancer::round_robin(Vec::<u8>::new()).unwrap_err();
        assert_eq!(err, Error::NoVariant);
    }

    #[test]
    fn retain_skips_item() {
        let balancer = pool();
        assert!(balancer.retain(0).unwrap());
        assert_eq!(balancer.next().unwrap(), (&"b", 1));
        assert!(!balancer.retain(0).unwrap());
    }

    #[test]
    fn exhaustion_wraps_no_variant() {
        let balancer = pool();
        for i in 0..3 {
            balancer.retain(i).unwrap();
        }
        let err = balancer.next().unwrap_err();
        assert_eq!(err, BalancerError::Next(Error::NoVariant));
        assert_eq!(err.to_string(), "algorithm: next: no variant");
    }

    #[test]
    fn recover_restores_item() {
        let balancer = pool();
        balancer.retain(1).unwrap();
        assert!(balancer.recover(1));
        assert!(!balancer.recover(1));
        assert_eq!(balancer.next().unwrap(), (&"a", 0));
        assert_eq!(balancer.next().unwrap(), (&"b", 1));
    }

    #[test]
    fn modulo_backed_pool() {
        let balancer = Balancer::new(Modulo::new(2).unwrap(), vec!["x", "y"]);
        assert_eq!(balancer.next().unwrap(), (&"x", 0));
        assert_eq!(balancer.next().unwrap(), (&"y", 1));
        assert_eq!(balancer.next().unwrap(), (&"x", 0));
        assert!(!balancer.retain(0).unwrap());
    }
}
