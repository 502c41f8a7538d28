pub mod constants;
pub mod error;
pub mod exposure;
pub mod external;
pub mod gesture;
pub mod particles;
pub mod performance;
pub mod pipeline;
pub mod profile;
pub mod shapes;
pub mod sim;
pub mod state;
pub static POINTS_WGSL: &str = include_str!("../shaders/points.wgsl");

pub use constants::*;
pub use error::*;
pub use exposure::*;
pub use external::*;
pub use gesture::*;
pub use particles::*;
pub use performance::*;
pub use pipeline::*;
pub use profile::*;
pub use shapes::*;
pub use sim::*;
pub use state::*;
