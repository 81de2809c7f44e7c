//! Position state and the buy/sell fold that produces it.

use std::fmt;

/// Fully invested or flat. There is no sizing in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Flat,
    Long,
}

impl Position {
    /// Fraction of capital exposed to the market: 0.0 or 1.0.
    pub fn exposure(self) -> f64 {
        match self {
            Position::Flat => 0.0,
            Position::Long => 1.0,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Position::Flat => 0,
            Position::Long => 1,
        }
    }

    pub fn is_long(self) -> bool {
        self == Position::Long
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// One step of the position fold: a buy goes long, a sell goes flat,
/// anything else carries `prev` forward unchanged.
pub fn next_position(prev: Position, buy: bool, sell: bool) -> Position {
    if buy {
        Position::Long
    } else if sell {
        Position::Flat
    } else {
        prev
    }
}

/// Left-to-right scan over buy/sell flags, starting flat before the first bar.
pub fn derive_positions(events: &[(bool, bool)]) -> Vec<Position> {
    events
        .iter()
        .scan(Position::Flat, |state, &(buy, sell)| {
            *state = next_position(*state, buy, sell);
            Some(*state)
        })
        .collect()
}
