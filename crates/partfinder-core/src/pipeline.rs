use anyhow::Result;

use crate::aggregate::aggregate;
use crate::config::Config;
use crate::http::{HttpTransport, Transport};
use crate::model::{Component, ResolutionStatus};
use crate::router::{self, Resolution};

/// Counts gathered over one run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub components: usize,
    pub resolved: usize,
    pub no_offers: usize,
    pub skipped: usize,
    pub unresolved: usize,
    pub offers: usize,
    /// Rows and tiers discarded as malformed or unreachable
    pub discarded: usize,
}

impl RunSummary {
    fn record(&mut self, component: &Component, discarded: usize) {
        self.components += 1;
        self.offers += component.offers.len();
        self.discarded += discarded;
        match component.status {
            ResolutionStatus::Resolved => self.resolved += 1,
            ResolutionStatus::NoOffers => self.no_offers += 1,
            ResolutionStatus::Skipped => self.skipped += 1,
            ResolutionStatus::Unresolved(_) => self.unresolved += 1,
            ResolutionStatus::Pending => {}
        }
    }
}

/// Resolves components one at a time against the configured vendors
pub struct Pipeline<T> {
    config: Config,
    transport: T,
}

impl Pipeline<HttpTransport> {
    pub fn with_http(config: Config) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::new(config, transport))
    }
}

impl<T: Transport> Pipeline<T> {
    pub fn new(config: Config, transport: T) -> Self {
        Self { config, transport }
    }

    /// Search, extract and aggregate a single component. Returns the number of rows and
    /// tiers discarded along the way.
    pub fn resolve(&self, component: &mut Component) -> usize {
        let resolution = router::resolve(&self.config, &self.transport, &component.reference);
        let discarded = match &resolution {
            Resolution::Offers(extraction) => extraction.error_count(),
            Resolution::Skipped | Resolution::Unresolved(_) => 0,
        };
        aggregate(component, resolution);
        discarded
    }

    /// Resolve every component in order, fully finishing one before starting the next
    pub fn run(
        &self,
        components: &mut [Component],
        mut on_progress: impl FnMut(&Component),
    ) -> RunSummary {
        let mut summary = RunSummary::default();
        for component in components.iter_mut() {
            let discarded = self.resolve(component);
            summary.record(component, discarded);
            on_progress(component);
        }
        log::info!(
            "Resolved {}/{} components, {} offers ({} rows discarded)",
            summary.resolved,
            summary.components,
            summary.offers,
            summary.discarded
        );
        summary
    }
}
