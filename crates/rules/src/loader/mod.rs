//! Rule template loading.
//!
//! A template is an ordinary rule file (`groups: [...]`). Its first group
//! supplies the rule pool and group defaults for [`crate::generator`].

mod core;
mod error;

#[cfg(test)]
mod tests;

pub use self::core::{Template, TemplateLoader};
pub use self::error::{Result, TemplateError};
