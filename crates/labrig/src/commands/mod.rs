pub mod check;
pub mod up;
