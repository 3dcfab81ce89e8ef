pub mod error;
pub mod extract;
pub mod normalize;
pub mod prober;
pub mod result;

pub use error::ScanError;
pub use extract::{LinkTargets, PageExtract, PageLinks, SearchFields};
pub use normalize::normalize_link;
pub use prober::Prober;
pub use result::ProbeResult;
