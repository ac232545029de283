pub mod defaults;
pub mod file;
pub mod stdin;
