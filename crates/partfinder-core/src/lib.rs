pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod delivery;
pub mod error;
pub mod http;
pub mod model;
pub mod parse;
pub mod pipeline;
pub mod router;
pub mod secondary;
pub mod selectors;

pub use aggregate::aggregate;
pub use config::Config;
pub use error::{Extraction, ExtractionError};
pub use http::{HttpTransport, Page, Transport};
pub use model::{Component, Offer, OfferSource, ResolutionStatus, UNKNOWN};
pub use pipeline::{Pipeline, RunSummary};
pub use router::{classify, Resolution, Route};
