pub mod permission;
pub mod resource;
pub mod role;
pub mod role_permission;
pub mod user;
