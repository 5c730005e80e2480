pub mod debounce;
pub mod validation;
