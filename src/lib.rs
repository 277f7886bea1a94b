//! Solar spectrum strips: wavelength becomes colour, intensity becomes
//! opacity.
//!
//! ```text
//!  loader → colour model + normalizer → aggregate → bands → render
//! ```

pub mod bands;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod run;
pub mod viewer;
