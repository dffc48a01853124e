pub mod collision;
pub mod dynamics;
pub mod energy;
pub mod gravity;
pub mod orbital;
