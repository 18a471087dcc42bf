pub mod stage1_query;
pub mod stage2_search;
pub mod stage3_rewrite;

pub use stage1_query::*;
pub use stage2_search::*;
pub use stage3_rewrite::*;
