mod entity;

pub use entity::{EntityRepository, snake_case_key};
