pub mod cnn;
pub mod sequential;

pub use cnn::build_classifier;
pub use sequential::Sequential;
