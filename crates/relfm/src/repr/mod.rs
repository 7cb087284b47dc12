//! Model parameter storage.
//!
//! Types here only hold parameters; scoring lives in [`crate::inference`].

pub mod fm;
