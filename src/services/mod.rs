//! # Services
//!
//! - **Database health** (`db_health`) - Reachability probe behind `/status`
//! - **Clock** (`clock`) - Non-decreasing wall-clock timestamps

pub mod clock;
pub mod db_health;
