use rust_decimal::Decimal;
use std::fmt;

/// Placeholder written for specification attributes missing from the input sheet
pub const UNKNOWN: &str = "Unknown";

/// One target part number from the input sheet
#[derive(Debug, Clone)]
pub struct Component {
    /// Part number used for the vendor search
    pub reference: String,
    pub package: String,
    /// Flash size in KiB
    pub flash_size: Option<u32>,
    /// RAM size in KiB
    pub ram_size: Option<u32>,
    pub available: bool,
    pub offers: Vec<Offer>,
    pub status: ResolutionStatus,
}

impl Component {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            package: UNKNOWN.to_string(),
            flash_size: None,
            ram_size: None,
            available: false,
            offers: Vec::new(),
            status: ResolutionStatus::Pending,
        }
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    pub fn with_sizes(mut self, flash_size: Option<u32>, ram_size: Option<u32>) -> Self {
        self.flash_size = flash_size;
        self.ram_size = ram_size;
        self
    }
}

/// Where an offer was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferSource {
    /// Row of the primary vendor's catalog listing with immediate stock
    Catalog,
    /// Lead-time tier from the primary vendor's delivery schedule
    Backorder,
    /// Tier from the secondary vendor's offers table
    SecondaryVendor,
}

/// One purchasable listing for a component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer {
    pub part_number: String,
    pub price: Decimal,
    pub min_order_quantity: u32,
    pub stock_quantity: u32,
    pub delivery_days: u32,
    pub source_url: String,
    pub source: OfferSource,
}

/// How far resolution of a component got
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResolutionStatus {
    /// Not processed yet
    #[default]
    Pending,
    /// At least one offer was retained
    Resolved,
    /// A catalog was parsed but nothing qualified
    NoOffers,
    /// The search landed on a page shape that is deliberately not parsed
    Skipped,
    /// The search could not be routed to any catalog
    Unresolved(String),
}

impl fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionStatus::Pending => write!(f, "pending"),
            ResolutionStatus::Resolved => write!(f, "resolved"),
            ResolutionStatus::NoOffers => write!(f, "no offers"),
            ResolutionStatus::Skipped => write!(f, "skipped"),
            ResolutionStatus::Unresolved(reason) => write!(f, "unresolved ({reason})"),
        }
    }
}
