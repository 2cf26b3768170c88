pub mod config;
pub mod corpus;
pub mod generate;
pub mod ingredient;
pub mod mutate;
pub mod oracle;
pub mod rng;
pub mod select;

pub use config::GeneratorConfig;
pub use generate::{GenerateError, GenerationStats, TypedMutGen};
pub use oracle::{Oracle, Outcome};
