pub mod curve;
pub mod equipment;
pub mod model;
pub mod plant;
pub mod schedule;
pub mod types;

pub use curve::*;
pub use equipment::*;
pub use model::*;
pub use plant::*;
pub use schedule::*;
pub use types::*;
