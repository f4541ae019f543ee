pub mod shapes;
pub mod text;
