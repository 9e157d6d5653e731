// Domain layer: form/feature types and the ports the model artifacts plug into.

pub mod model;
pub mod ports;
