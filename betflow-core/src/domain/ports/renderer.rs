use crate::domain::error::DomainError;

/// Renders the templated parts of test arguments (`{{ var('x') }}`).
pub trait TemplateEngine: Send + Sync {
    fn render(&self, template: &str) -> Result<String, DomainError>;
}
