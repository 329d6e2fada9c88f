use super::map::{ALL_MATCH, ConditionalValueMap, MIXED, Tag, coarsen};
use crate::error::DetailError;
use crate::model::deck::CardPowerDetail;
use crate::model::unit::Unit;

/// Power of one card for each team it counts under, split by whether the
/// whole deck shares that team and/or the card's attribute.
#[derive(Debug, Clone, Default)]
pub struct PowerMap {
    inner: ConditionalValueMap<CardPowerDetail>,
}

impl PowerMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_power(&mut self, unit: Unit, same_unit: bool, same_attr: bool, value: CardPowerDetail) {
        let unit_member = if same_unit { ALL_MATCH } else { MIXED };
        let attr_member = if same_attr { ALL_MATCH } else { MIXED };
        self.inner
            .set(Tag::Unit(unit), unit_member, attr_member, value.total, value);
    }

    /// Power for real member counts. Only "all five" and "anything else" are
    /// stored, so both counts are collapsed before the lookup.
    pub fn get_power(
        &self,
        unit: Unit,
        unit_member: u8,
        attr_member: u8,
    ) -> Result<&CardPowerDetail, DetailError> {
        self.inner
            .get(Tag::Unit(unit), coarsen(unit_member), coarsen(attr_member))
    }

    pub fn as_map(&self) -> &ConditionalValueMap<CardPowerDetail> {
        &self.inner
    }

    pub fn min(&self) -> f64 {
        self.inner.min()
    }

    pub fn max(&self) -> f64 {
        self.inner.max()
    }

    pub fn is_certainly_less_than(&self, other: &PowerMap) -> bool {
        self.inner.is_certainly_less_than(&other.inner)
    }
}
