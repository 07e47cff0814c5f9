pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod experiment;
pub mod layers;
pub mod logging;
pub mod math;
pub mod metrics;
pub mod model;
pub mod models;
pub mod modem;
pub mod optim;
pub mod plot;
pub mod rng;
pub mod tensor;
pub mod util;

pub use error::{Error, Result};
