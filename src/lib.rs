pub mod balancer;
pub mod error;
pub mod ring;
pub mod round_robin;

pub use balancer::{Balancer, BalancerError};
pub use error::Error;
pub use round_robin::{Algorithm, Modulo, RoundRobin};
