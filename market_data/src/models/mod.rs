pub mod bar;
pub mod instrument;
pub mod interval;
pub mod series;
