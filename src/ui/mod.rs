pub mod panels;
pub mod plot;
pub mod recommend;
