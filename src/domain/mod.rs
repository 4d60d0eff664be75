// Domain layer - Value objects and pure chart computations
pub mod bounds;
pub mod cat;
pub mod chart;
pub mod range;
pub mod series;
pub mod weight;
