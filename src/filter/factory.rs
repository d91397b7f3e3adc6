use super::{PfFilter, PfNonTimestampKeyFilter, PfReferenceTimestampKeyFilter, PfTimestampKeyFilter};
use crate::concept::PfConcept;
use crate::keys::KeyShape;

/// Selects the filter matching an entity's key shape
pub struct PfFilterFactory;

impl PfFilterFactory {
    pub fn create_filter(shape: KeyShape) -> Box<dyn PfFilter> {
        match shape {
            KeyShape::Concept => Box::new(PfNonTimestampKeyFilter::concept()),
            KeyShape::Reference => Box::new(PfNonTimestampKeyFilter::reference()),
            KeyShape::Timestamp => Box::new(PfTimestampKeyFilter),
            KeyShape::ReferenceTimestamp => Box::new(PfReferenceTimestampKeyFilter),
        }
    }

    pub fn filter_for<T: PfConcept>() -> Box<dyn PfFilter> {
        Self::create_filter(T::KEY_SHAPE)
    }
}
