pub mod figure;
pub mod grid;
pub mod series;
pub mod style;
pub mod theme;
