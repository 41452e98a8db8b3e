//! Contract build step

use crate::errors::ScriptError;

pub mod script;
pub mod wasm;

pub use script::ScriptBuilder;
pub use wasm::WasmBuilder;

/// Produces the contract wasm on disk
pub trait BuildService {
    /// Run the build, any failure must stop the migration
    fn build(&self) -> Result<(), ScriptError>;
}

impl<T: BuildService + ?Sized> BuildService for Box<T> {
    fn build(&self) -> Result<(), ScriptError> {
        (**self).build()
    }
}
