pub mod roster_repo;
pub mod grid_repo;
pub mod preference_repo;
pub mod catalog_repo;
pub mod audit_repo;
