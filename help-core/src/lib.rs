pub mod filters;
pub mod judge;
pub mod lifecycle;
pub mod matching;
pub mod similarity;
pub mod stats;

// Re-export main components
pub use filters::*;
pub use judge::*;
pub use lifecycle::*;
pub use matching::*;
pub use similarity::*;
pub use stats::*;
