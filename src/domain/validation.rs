/// Level Validator - admission rules for incoming price levels
///
/// Levels are checked one by one. An invalid level is set aside and reported,
/// the valid levels of the same message still reach the book.
///
/// ## Validation Rules
/// - Price must be finite and positive
/// - Size must be finite and not negative (zero means "remove")
///
/// ## Usage
/// ```rust
/// use depth_engine::domain::validation::LevelValidator;
/// use depth_engine::domain::orderbook::Side;
///
/// let validator = LevelValidator::new();
/// let (levels, rejected) = validator.split_side(Side::Bid, &[[100.0, 5.0], [99.0, -1.0]]);
/// assert_eq!(levels.len(), 1);
/// assert_eq!(rejected.len(), 1);
/// ```

use crate::domain::orderbook::{Price, PriceLevel, Side};

/// Validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum LevelValidationError {
    /// Price is NaN, infinite, zero or negative
    InvalidPrice { side: Side, price: f64 },

    /// Size is NaN, infinite or negative
    InvalidSize { side: Side, price: f64, size: f64 },
}

impl std::fmt::Display for LevelValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelValidationError::InvalidPrice { side, price } => {
                write!(f, "Invalid {} price: {}", side, price)
            }
            LevelValidationError::InvalidSize { side, price, size } => {
                write!(f, "Invalid {} size {} at price {}", side, size, price)
            }
        }
    }
}

impl std::error::Error for LevelValidationError {}

/// Level validator
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelValidator;

impl LevelValidator {
    pub fn new() -> Self {
        LevelValidator
    }

    /// Validates a single `[price, size]` pair
    pub fn validate_level(&self, side: Side, raw: [f64; 2]) -> Result<PriceLevel, LevelValidationError> {
        let [price, size] = raw;

        let price = Price::new(price).ok_or(LevelValidationError::InvalidPrice { side, price })?;

        if !size.is_finite() || size < 0.0 {
            return Err(LevelValidationError::InvalidSize {
                side,
                price: price.value(),
                size,
            });
        }

        Ok(PriceLevel::new(price, size))
    }

    /// Splits one side into valid levels (message order kept) and rejections
    pub fn split_side(
        &self,
        side: Side,
        raw: &[[f64; 2]],
    ) -> (Vec<PriceLevel>, Vec<LevelValidationError>) {
        let mut levels = Vec::with_capacity(raw.len());
        let mut rejected = Vec::new();
        for pair in raw {
            match self.validate_level(side, *pair) {
                Ok(level) => levels.push(level),
                Err(err) => rejected.push(err),
            }
        }
        (levels, rejected)
    }
}
