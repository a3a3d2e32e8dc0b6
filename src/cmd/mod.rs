pub mod export;
pub mod publish;
pub mod serve;
pub mod validate;
