//! Value objects - immutable types that represent domain concepts

mod geo;
mod outcome;
mod pair;
mod snowflake;

pub use geo::{GeoPoint, EARTH_RADIUS_KM};
pub use outcome::MatchOutcome;
pub use pair::PairKey;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
