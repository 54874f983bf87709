//! Template Renderer
//!
//! Interprets a mapping's line sequence against a [`Scope`]. Literal lines are
//! interpolated, conditionals pick a body, loops render their body once per
//! element. Lines at one nesting level are joined with `\n`.

use serde_json::Value;

use crate::error::MappingError;
use crate::interpolate::{Interpolator, PlaceholderInterpolator};
use crate::mapping::{Comparison, Conditional, Loop, MappingRepository, TemplateLine};
use crate::scope::Scope;

/// Renders mapping entries into text
#[derive(Debug, Clone)]
pub struct TemplateRenderer<'m, I = PlaceholderInterpolator> {
    mapping: &'m MappingRepository,
    interpolator: I,
}

impl<'m> TemplateRenderer<'m> {
    /// Renderer using the default `{{name}}` interpolator
    pub fn with_defaults(mapping: &'m MappingRepository) -> Self {
        Self::new(mapping, PlaceholderInterpolator::default())
    }
}

impl<'m, I: Interpolator> TemplateRenderer<'m, I> {
    pub fn new(mapping: &'m MappingRepository, interpolator: I) -> Self {
        Self { mapping, interpolator }
    }

    /// Render the mapping entry `type_name` against `scope`
    pub fn render(&self, type_name: &str, scope: &Scope) -> Result<String, MappingError> {
        let lines = self.mapping.lookup(type_name)?;
        self.render_lines(lines, scope)
    }

    /// Render a line sequence against `scope`
    pub fn render_lines(&self, lines: &[TemplateLine], scope: &Scope) -> Result<String, MappingError> {
        let mut rendered = Vec::with_capacity(lines.len());
        for line in lines {
            match line {
                TemplateLine::Literal(text) => {
                    rendered.push(self.interpolator.interpolate(text, scope)?);
                }
                TemplateLine::Conditional(cond) => {
                    if let Some(html) = self.render_conditional(cond, scope)? {
                        rendered.push(html);
                    }
                }
                TemplateLine::Loop(lp) => {
                    rendered.push(self.render_loop(lp, scope)?);
                }
            }
        }
        Ok(rendered.join("\n"))
    }

    /// `None` when the comparison fails and there is no `else` body
    fn render_conditional(&self, cond: &Conditional, scope: &Scope) -> Result<Option<String>, MappingError> {
        let comparison = Comparison::parse(&cond.cond).ok_or_else(|| MappingError::UnsupportedCondition {
            cond: cond.cond.clone(),
        })?;
        let left = self.interpolator.interpolate(&cond.left, scope)?;
        let right = self.interpolator.interpolate(&cond.right, scope)?;
        tracing::debug!("cmp {} == {}", left, right);

        if comparison.holds(&left, &right) {
            return self.render_lines(&cond.then, scope).map(Some);
        }
        match &cond.otherwise {
            Some(otherwise) => self.render_lines(otherwise, scope).map(Some),
            None => Ok(None),
        }
    }

    fn render_loop(&self, lp: &Loop, scope: &Scope) -> Result<String, MappingError> {
        let value = scope
            .lookup(&lp.variable)
            .ok_or_else(|| MappingError::UnknownLoopVariable { name: lp.variable.clone() })?;
        let Value::Array(elements) = value else {
            return Err(MappingError::NotIterable { name: lp.variable.clone() });
        };

        let mut fragments = Vec::with_capacity(elements.len());
        for element in elements {
            let child = scope.child(lp.binding.clone(), element.clone());
            let html = self.render_lines(&lp.body, &child)?;
            // Second pass: placeholders carried in by the element itself.
            fragments.push(self.interpolator.interpolate(&html, &child)?);
        }
        Ok(fragments.join("\n"))
    }
}
