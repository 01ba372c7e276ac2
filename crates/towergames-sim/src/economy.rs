//! Points balance and inventory ledger.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use towergames_core::enums::ItemKind;
use towergames_core::GameError;

/// Point balance and owned item counts. Points can never go negative: every
/// debit is checked before it is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyLedger {
    points: u32,
    owned: BTreeMap<ItemKind, u32>,
}

impl EconomyLedger {
    pub fn new(points: u32) -> Self {
        Self {
            points,
            owned: BTreeMap::new(),
        }
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn owned(&self, item: ItemKind) -> u32 {
        self.owned.get(&item).copied().unwrap_or(0)
    }

    pub fn inventory(&self) -> &BTreeMap<ItemKind, u32> {
        &self.owned
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.points >= cost
    }

    /// Debit `cost` and add one `item`, or change nothing.
    pub fn purchase(&mut self, item: ItemKind, cost: u32) -> Result<(), GameError> {
        if !self.can_afford(cost) {
            return Err(GameError::InsufficientFunds {
                have: self.points,
                cost,
            });
        }
        self.points -= cost;
        *self.owned.entry(item).or_insert(0) += 1;
        debug!("bought {item:?} for {cost}, {} points left", self.points);
        Ok(())
    }

    /// Use up one owned `item`.
    pub fn consume(&mut self, item: ItemKind) -> Result<(), GameError> {
        match self.owned.get_mut(&item) {
            Some(count) if *count > 0 => {
                *count -= 1;
                Ok(())
            }
            _ => Err(GameError::NotOwned { item }),
        }
    }

    /// Kill rewards and drop pick-ups.
    pub fn credit(&mut self, points: u32) {
        self.points = self.points.saturating_add(points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchase_rejected_when_short() {
        let mut ledger = EconomyLedger::new(40);
        assert_eq!(
            ledger.purchase(ItemKind::RepairHammer, 50),
            Err(GameError::InsufficientFunds { have: 40, cost: 50 })
        );
        assert_eq!(ledger.points(), 40);
        assert_eq!(ledger.owned(ItemKind::RepairHammer), 0);
    }

    #[test]
    fn purchase_debits_and_adds_item() {
        let mut ledger = EconomyLedger::new(60);
        ledger.purchase(ItemKind::RepairHammer, 50).unwrap();
        assert_eq!(ledger.points(), 10);
        assert_eq!(ledger.owned(ItemKind::RepairHammer), 1);
    }

    #[test]
    fn exact_balance_is_affordable() {
        let mut ledger = EconomyLedger::new(50);
        assert!(ledger.can_afford(50));
        ledger.purchase(ItemKind::FirstAid, 50).unwrap();
        assert_eq!(ledger.points(), 0);
    }

    #[test]
    fn consume_requires_ownership() {
        let mut ledger = EconomyLedger::new(200);
        assert_eq!(
            ledger.consume(ItemKind::SmallTurret),
            Err(GameError::NotOwned {
                item: ItemKind::SmallTurret
            })
        );
        ledger.purchase(ItemKind::SmallTurret, 100).unwrap();
        ledger.consume(ItemKind::SmallTurret).unwrap();
        assert_eq!(ledger.owned(ItemKind::SmallTurret), 0);
        assert!(ledger.consume(ItemKind::SmallTurret).is_err());
    }

    #[test]
    fn credit_saturates() {
        let mut ledger = EconomyLedger::new(u32::MAX - 1);
        ledger.credit(10);
        assert_eq!(ledger.points(), u32::MAX);
    }
}
