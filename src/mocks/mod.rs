//! Mock implementations for testing.
//!
//! This module provides mock implementations of the trait abstractions
//! that allow unit testing without external dependencies.

pub mod clock;
pub mod currency;
pub mod ids;
pub mod pricing;

pub use clock::MockClock;
pub use currency::MockCurrency;
pub use ids::MockIds;
pub use pricing::MockOracle;
