pub mod config;
pub mod crawler;
pub mod driver;
pub mod error;
pub mod export;
pub mod fetch;
pub mod normalize;
pub mod table;
pub mod vendor;

#[cfg(test)]
mod test_support;

pub use crawler::{CrawlOptions, Crawler};
pub use error::{CrawlError, ParseError};
pub use table::{Cell, PricingRow, PricingTable};
pub use vendor::{DigitalOcean, Vendor, VendorKind, Vultr};
