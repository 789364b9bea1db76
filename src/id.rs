//! ID generation utilities for Junction
//!
//! Provides generated vehicle identifiers for enqueue requests that don't
//! supply one.

use rand::Rng;

/// Generate a vehicle identifier
///
/// Format: `Vehicle-{random_hex}`
/// Example: `Vehicle-a1b2`
pub fn generate_vehicle_id() -> String {
    let random: u16 = rand::rng().random();
    format!("Vehicle-{:04x}", random)
}
