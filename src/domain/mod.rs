// Domain layer: the coverage model and the ports the pipeline is built against.

pub mod model;
pub mod ordered;
pub mod ports;
