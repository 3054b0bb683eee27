use serde::{Deserialize, Serialize};

use crate::booking::ServiceType;

/// Per-head rates for one service type, in cents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRates {
    pub adult_cents: i64,
    pub child_cents: i64,
}

/// Rate table injected into the booking service. Loaded from the
/// `[pricing]` config section; the defaults match the launch price list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTable {
    pub transfer: ServiceRates,
    pub sightseeing: ServiceRates,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            transfer: ServiceRates {
                adult_cents: 15_000,
                child_cents: 7_500,
            },
            sightseeing: ServiceRates {
                adult_cents: 20_000,
                child_cents: 10_000,
            },
        }
    }
}

impl RateTable {
    pub fn rates(&self, service: ServiceType) -> &ServiceRates {
        match service {
            ServiceType::Transfer => &self.transfer,
            ServiceType::Sightseeing => &self.sightseeing,
        }
    }

    /// Total booking value for a passenger mix.
    pub fn quote(&self, service: ServiceType, adults: i32, children: i32) -> i64 {
        let rates = self.rates(service);
        rates.adult_cents * adults as i64 + rates.child_cents * children as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_quote_two_adults_one_child() {
        let rates = RateTable::default();
        assert_eq!(rates.quote(ServiceType::Transfer, 2, 1), 37_500);
    }

    #[test]
    fn sightseeing_quote_single_adult() {
        let rates = RateTable::default();
        assert_eq!(rates.quote(ServiceType::Sightseeing, 1, 0), 20_000);
    }
}
