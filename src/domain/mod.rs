// Domain layer: platform records and the ports the stages talk through.

pub mod model;
pub mod ports;
