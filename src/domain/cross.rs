//! Price-versus-level predicates.
//!
//! Scalar comparisons used to describe where a value sits relative to a
//! level or a `[lower, upper]` channel between two consecutive bars.

pub fn crossing(price: f64, level: f64) -> bool {
    price == level
}

/// `prev` below the level and `price` at or above it.
pub fn crossing_up(prev: f64, price: f64, level: f64) -> bool {
    prev < level && price >= level
}

/// `prev` above the level and `price` at or below it.
pub fn crossing_down(prev: f64, price: f64, level: f64) -> bool {
    prev > level && price <= level
}

pub fn greater_than(price: f64, level: f64) -> bool {
    price > level
}

pub fn less_than(price: f64, level: f64) -> bool {
    price < level
}

pub fn inside_channel(price: f64, lower: f64, upper: f64) -> bool {
    price >= lower && price <= upper
}

pub fn outside_channel(price: f64, lower: f64, upper: f64) -> bool {
    price < lower || price > upper
}

pub fn entering_channel(prev: f64, price: f64, lower: f64, upper: f64) -> bool {
    outside_channel(prev, lower, upper) && inside_channel(price, lower, upper)
}

pub fn exiting_channel(prev: f64, price: f64, lower: f64, upper: f64) -> bool {
    inside_channel(prev, lower, upper) && outside_channel(price, lower, upper)
}

pub fn moving_up(prev: f64, price: f64) -> bool {
    price > prev
}

pub fn moving_down(prev: f64, price: f64) -> bool {
    price < prev
}

/// Percentage rise from `prev`; 0 when falling or when `prev` is 0.
pub fn moving_up_percent(prev: f64, price: f64) -> f64 {
    if prev == 0.0 || price <= prev {
        return 0.0;
    }
    (price - prev) / prev * 100.0
}

/// Percentage fall from `prev`; 0 when rising or when `prev` is 0.
pub fn moving_down_percent(prev: f64, price: f64) -> f64 {
    if prev == 0.0 || price >= prev {
        return 0.0;
    }
    (prev - price) / prev * 100.0
}
