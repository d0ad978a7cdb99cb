#![deny(missing_docs)]
#![doc = "Core points, oracle capability traits and error types shared by the chordwalk samplers."]

pub mod errors;
pub mod oracle;
pub mod point;
pub mod rng;

pub use errors::{ErrorInfo, SamplerError};
pub use oracle::{
    Chord, ConvexBody, CoordinateOracle, FacetCache, FacetHit, Halfspace, Membership,
    ReflectiveOracle, SemidefiniteOracle,
};
pub use point::Point;
pub use rng::{derive_substream_seed, RngHandle};
