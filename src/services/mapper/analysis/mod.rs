pub mod canonical;
pub mod indexes;
pub mod inverted;
pub mod scoring;
pub mod tables;
pub mod tokenizer;
