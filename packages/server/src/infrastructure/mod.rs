//! Infrastructure layer: concrete storage behind the domain traits.

pub mod repository;
