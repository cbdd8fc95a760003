pub mod constant;
pub mod html;
