//! Command implementations.

pub mod compile;
pub mod extract;
pub mod generate;
pub mod specs;

pub use self::compile::execute_compile;
pub use self::extract::execute_extract;
pub use self::generate::execute_generate;
pub use self::specs::execute_specs;
