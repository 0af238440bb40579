use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A position in one token, as supplied by the portfolio store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub id: Uuid,
    pub portfolio_id: Uuid,
    pub token_symbol: String,
    pub quantity: Decimal,
    pub average_price: Decimal,
    pub current_price: Option<Decimal>,
    /// Usually `quantity * average_price`, but may be tracked independently
    /// from transaction history.
    pub invested_amount: Decimal,
}

impl Holding {
    /// Price used to value an unsold bag at today's market.
    pub fn market_price(&self) -> Decimal {
        self.current_price.unwrap_or(self.average_price)
    }

    /// `quantity * average_price`, saturating at `Decimal::MAX`.
    pub fn cost_basis(&self) -> Decimal {
        self.quantity.saturating_mul(self.average_price)
    }

    /// A holding with nothing to sell or no cost basis cannot be projected.
    pub fn is_projectable(&self) -> bool {
        self.quantity > Decimal::ZERO && self.average_price > Decimal::ZERO
    }
}
