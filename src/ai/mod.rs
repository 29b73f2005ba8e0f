pub mod eval;
pub mod search;

pub use eval::{EvalWeights, evaluate};
pub use search::{SearchResult, SearchStats, Searcher};
