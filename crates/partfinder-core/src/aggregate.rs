use crate::model::{Component, ResolutionStatus};
use crate::router::Resolution;

/// Attach the outcome of resolving a component to it.
///
/// Offers from all sources are kept in the order they were produced; identical offers
/// from different sources are distinct listings and are not merged.
pub fn aggregate(component: &mut Component, resolution: Resolution) {
    match resolution {
        Resolution::Offers(extraction) if !extraction.offers.is_empty() => {
            log::info!(
                "{}: {} offers",
                component.reference,
                extraction.offers.len()
            );
            component.offers = extraction.offers;
            component.available = true;
            component.status = ResolutionStatus::Resolved;
        }
        Resolution::Offers(_) => {
            log::info!("{}: no offers", component.reference);
            component.status = ResolutionStatus::NoOffers;
        }
        Resolution::Skipped => component.status = ResolutionStatus::Skipped,
        Resolution::Unresolved(reason) => {
            component.status = ResolutionStatus::Unresolved(reason);
        }
    }
}
