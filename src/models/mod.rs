//! Instance and solution models.
//!
//! Inputs ([`Job`], [`Machine`], [`City`]) are immutable once loaded; outputs
//! ([`Schedule`], [`Route`]) are produced once, after a solve.
//!
//! # Domain Mappings
//!
//! | u-milp | Manufacturing | Logistics |
//! |--------|--------------|-----------|
//! | Job | Order/Operation | Shipment |
//! | Machine | Machine/Line | Dock |
//! | City | - | Stop/Customer |
//! | Route | - | Vehicle Tour |

mod city;
mod job;
mod machine;
mod route;
mod schedule;

pub use city::City;
pub use job::Job;
pub use machine::Machine;
pub use route::Route;
pub use schedule::{Schedule, ScheduleEntry};
