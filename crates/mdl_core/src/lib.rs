//! markdown-dl core: pure crawl bookkeeping with no IO.
mod frontier;
mod seeds;
mod urls;

pub use frontier::FrontierState;
pub use seeds::parse_seed_list;
pub use urls::{matches_prefix, strip_fragment};
