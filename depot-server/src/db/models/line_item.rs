//! Line item types shared by receipts, consumption slips and maintenance

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of a receipt or consumption slip
///
/// `consumable` is the `consumable:id` string of the SKU this line moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub consumable: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub unit: String,
}

impl LineItem {
    /// quantity * unit_price
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// One replaced part on a maintenance ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub name: String,
    pub quantity: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_total_is_quantity_times_price() {
        let item = LineItem {
            consumable: "consumable:toner_bk".into(),
            quantity: 3,
            unit_price: Decimal::new(1250, 2), // 12.50
            unit: "pcs".into(),
        };
        assert_eq!(item.line_total(), Decimal::new(3750, 2));
    }
}
