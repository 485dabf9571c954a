use crate::model::Offer;

/// Why a single catalog row or delivery tier contributed nothing
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("{0} not found")]
    MissingField(&'static str),

    #[error("{field} is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("lead time is not in days: {0:?}")]
    UnitMismatch(String),

    #[error("lead time is on request")]
    OnRequest,

    #[error("lead time of {0} days is too long")]
    DeliveryTooLong(u32),

    #[error(transparent)]
    Fetch(#[from] anyhow::Error),
}

impl ExtractionError {
    pub(crate) fn invalid_number(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidNumber {
            field,
            value: value.into(),
        }
    }

    /// Filtered-out tiers are expected and not worth a warning
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            ExtractionError::UnitMismatch(_)
                | ExtractionError::OnRequest
                | ExtractionError::DeliveryTooLong(_)
        )
    }
}

/// Offers collected from one source together with the rows/tiers that were discarded
#[derive(Debug, Default)]
pub struct Extraction {
    pub offers: Vec<Offer>,
    pub failures: Vec<ExtractionError>,
}

impl Extraction {
    /// Fold a per-row outcome into the batch, logging discarded rows
    pub fn record<I>(&mut self, context: &str, outcome: Result<I, ExtractionError>)
    where
        I: IntoIterator<Item = Offer>,
    {
        match outcome {
            Ok(offers) => self.offers.extend(offers),
            Err(e) => {
                if e.is_rejection() {
                    log::debug!("{context}: skipped ({e})");
                } else {
                    log::warn!("{context}: discarded ({e})");
                }
                self.failures.push(e);
            }
        }
    }

    pub fn extend(&mut self, other: Extraction) {
        self.offers.extend(other.offers);
        self.failures.extend(other.failures);
    }

    /// Failures excluding tiers that were filtered out on purpose
    pub fn error_count(&self) -> usize {
        self.failures.iter().filter(|e| !e.is_rejection()).count()
    }
}
