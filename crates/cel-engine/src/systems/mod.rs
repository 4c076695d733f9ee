pub mod damage;
pub mod hit;
pub mod paint;
pub mod update;
