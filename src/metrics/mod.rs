mod decade;
mod hidden_gem;
mod table;

pub use decade::DecadeBucket;
pub use hidden_gem::{hidden_gem_score, HIDDEN_GEM_SENTINEL};
pub use table::{derive, DerivedRecord, DerivedTable};
