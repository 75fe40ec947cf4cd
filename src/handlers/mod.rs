pub mod health;
pub mod mensa;
pub mod skill;
