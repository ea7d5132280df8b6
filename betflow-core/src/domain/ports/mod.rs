// src/domain/ports/mod.rs

pub mod manifest;
pub mod renderer;

pub use manifest::ManifestLoader;
pub use renderer::TemplateEngine;
