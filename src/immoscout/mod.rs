pub mod helpers;
pub mod immoscout;
pub mod parser;
