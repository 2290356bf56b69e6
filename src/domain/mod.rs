pub mod roster_model;
pub mod grid_model;
pub mod preference_model;
pub mod catalog_model;
pub mod roster_logic;
pub mod auto_fill;
