pub mod content_type;
pub mod hasher;
pub mod naming;
pub mod scanner;

pub use scanner::Scanner;
