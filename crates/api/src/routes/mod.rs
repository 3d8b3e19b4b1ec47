//! HTTP Routes

pub mod form;
pub mod model;
pub mod predictions;
