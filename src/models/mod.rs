//! Roster domain models.
//!
//! Provides the data types shared by quota computation, slot assignment,
//! validation and manual editing.
//!
//! # Domain Mappings
//!
//! | u-roster | Guard duty | Hospital | Support desk |
//! |----------|-----------|----------|--------------|
//! | Group | Company/Platoon | Ward team | Team |
//! | Cell | Guard post hour | On-call hour | Queue hour |
//! | Activity window | Training | Rounds | Sprint review |
//! | Staffing rule | Night-watch pairing | Weekend cap | Release freeze |
//! | WeeklySchedule | Guard roster | On-call rota | Coverage plan |

mod group;
mod roster;
mod rule;
mod violation;
pub(crate) mod window;

pub use group::{find_group, Group, GroupId};
pub use roster::WeeklySchedule;
pub use rule::StaffingRule;
pub use violation::{Violation, ViolationKind};
pub use window::{Cell, TimeWindow, DAYS_PER_WEEK, POSITIONS_PER_SLOT, SLOTS_PER_DAY};
