pub mod roles;

pub use roles::UserRole;
