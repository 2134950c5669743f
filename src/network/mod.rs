pub mod layout;
pub mod state;
pub mod weights;

pub use layout::LayerLayout;
pub use state::{Freshness, NetworkState};
pub use weights::WeightTensor;
