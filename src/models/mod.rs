//! JSON models of the organization API.
//!
//! Field names follow the API schema exactly. Fields the schema marks as required are
//! serialized even when unset (as `null`); optional ones are left out.

mod organization;
mod plan;
mod subscription;
mod user;

pub use organization::Organization;
pub use plan::Plan;
pub use subscription::Subscription;
pub use user::User;
