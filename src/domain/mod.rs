// Domain layer: static indicator entities, the table type every chart consumes, and the ports.

pub mod model;
pub mod ports;
pub mod section;
pub mod table;
