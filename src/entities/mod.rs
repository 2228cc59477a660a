pub mod announcement;
pub mod cylinder;
pub mod order;
pub mod rating;
pub mod safety_record;
pub mod user;

pub use announcement::Entity as Announcement;
pub use cylinder::{CylinderSpecs, CylinderStatus, Entity as Cylinder};
pub use order::{Entity as Order, OrderStatus};
pub use rating::Entity as Rating;
pub use safety_record::{Entity as SafetyRecord, HazardLevel, RectifyStatus};
pub use user::{Entity as User, UserRole};
