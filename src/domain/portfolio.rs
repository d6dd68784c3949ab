//! Portfolio state: idle cash and BTC position.

/// Cash/position pair threaded through the strategy engine.
///
/// Only the engine mutates it; everything else reads it through the accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioState {
    cash: f64,
    position: f64,
}

impl PortfolioState {
    pub fn new(initial_cash: f64) -> Self {
        PortfolioState {
            cash: initial_cash,
            position: 0.0,
        }
    }

    /// Start from an existing holding (live mode, or resuming a run).
    pub fn with_position(cash: f64, position: f64) -> Self {
        PortfolioState { cash, position }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// cash + position * price
    pub fn value(&self, price: f64) -> f64 {
        self.cash + self.position * price
    }

    pub(crate) fn deposit(&mut self, amount: f64) {
        self.cash += amount;
    }

    pub(crate) fn withdraw(&mut self, amount: f64) {
        self.cash -= amount;
    }

    pub(crate) fn add_units(&mut self, quantity: f64) {
        self.position += quantity;
    }

    /// Sell the whole position at `price`, crediting cash. Returns the proceeds.
    pub(crate) fn liquidate(&mut self, price: f64) -> f64 {
        let proceeds = self.position * price;
        self.cash += proceeds;
        self.position = 0.0;
        proceeds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_portfolio() {
        let p = PortfolioState::new(10_000.0);
        assert!((p.cash() - 10_000.0).abs() < f64::EPSILON);
        assert_eq!(p.position(), 0.0);
    }

    #[test]
    fn value_without_position_is_cash() {
        let p = PortfolioState::new(10_000.0);
        assert!((p.value(50_000.0) - 10_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn value_marks_position_to_price() {
        let p = PortfolioState::with_position(1_000.0, 0.5);
        assert!((p.value(60_000.0) - 31_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn deposit_and_withdraw() {
        let mut p = PortfolioState::new(100.0);
        p.deposit(50.0);
        p.withdraw(30.0);
        assert!((p.cash() - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn add_units_accumulates() {
        let mut p = PortfolioState::new(0.0);
        p.add_units(0.25);
        p.add_units(0.5);
        assert!((p.position() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn liquidate_moves_position_into_cash() {
        let mut p = PortfolioState::with_position(500.0, 2.0);
        let proceeds = p.liquidate(30_000.0);
        assert!((proceeds - 60_000.0).abs() < f64::EPSILON);
        assert!((p.cash() - 60_500.0).abs() < f64::EPSILON);
        assert_eq!(p.position(), 0.0);
    }

    #[test]
    fn liquidate_empty_position_is_noop() {
        let mut p = PortfolioState::new(500.0);
        let proceeds = p.liquidate(30_000.0);
        assert_eq!(proceeds, 0.0);
        assert!((p.cash() - 500.0).abs() < f64::EPSILON);
    }
}
