//! Bindings module orchestrator following the RSB module specification.
//!
//! Declarative wrap jobs for the native widget families this crate exposes:
//! a job names the documentation items to wrap and the tweaks to apply to
//! the parsed model before the generation backend takes over. The backend
//! itself (documentation parser, emitters) is an external collaborator
//! behind [`GenBackend`].

mod core;
mod propgrid;

pub use core::{
    CallbackDef, ClassDef, GenBackend, MethodDef, ModuleModel, ModuleSpec, Tweak, TypedefDef,
    WrapJob,
};
pub use propgrid::property_grid_job;
