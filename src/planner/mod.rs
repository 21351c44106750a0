pub mod neighbors;
pub mod rrt_connect;
pub mod sampler;
pub mod tree;
pub mod viewer;

pub use neighbors::{nearest, Neighbor};
pub use rrt_connect::{RrtConnect, RrtConnectConfig};
pub use sampler::{DirectionFrame, SampleContext, Sampler, SamplingStrategy};
pub use tree::{Tree, Vertex};
pub use viewer::Viewer;
