//! # Random Number Generation
//!
//! [`XsecRng`] wraps a seeded `StdRng` so that every sampling run can be
//! reproduced from the seed it logs.
//!
//! - Runs with a configured seed use [`XsecRng::from_seed`]
//! - Runs without one draw a seed from the operating system with
//!   [`XsecRng::from_entropy`] and record it
//!
//! `XsecRng` implements `RngCore`, so it can drive any `rand_distr`
//! distribution directly.
//!
//! ## Usage Example
//!
//! ```rust
//! use xsec_sampling::rng::XsecRng;
//!
//! let mut rng = XsecRng::from_seed(12345);
//! let u = rng.gen_uniform();
//! assert!((0.0..1.0).contains(&u));
//! ```

mod prng;

pub use prng::XsecRng;
