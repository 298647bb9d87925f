// Domain layer: packages, modules, the module arena and the extractor port.

pub mod graph;
pub mod model;
pub mod ports;
