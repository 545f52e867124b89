pub mod chart;
pub mod dist;
pub mod io;
