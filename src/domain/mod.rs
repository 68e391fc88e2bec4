// Domain layer: entities, ranking rules and ports. No I/O here.

pub mod model;
pub mod ports;
pub mod ranking;
