//! sea-orm entities owned by the lifecycle service.

pub mod directory_users;
pub mod unverified_users;
