pub mod facets;
pub mod search;
pub mod suggest;

pub use facets::*;
pub use search::*;
pub use suggest::*;
