pub mod ampl;
pub mod dat;
