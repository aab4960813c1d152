//! CrudService: generic CRUD over any `Resource`, plus request validation.

mod crud;
mod validation;
pub use crud::CrudService;
pub use validation::{RequestValidator, ValidationRule};
