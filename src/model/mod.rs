pub mod attendance;
pub mod leave;
pub mod overtime;
pub mod period;
pub mod review;
pub mod salary;
pub mod shift;

use uuid::Uuid;

/// Opaque record id: short domain prefix plus a random suffix.
pub fn new_id(prefix: &str) -> String {
    format!("{}{}", prefix, Uuid::new_v4().to_simple())
}
