pub mod langsearch;
pub mod source;
pub mod state;

pub use langsearch::*;
pub use source::*;
pub use state::*;
