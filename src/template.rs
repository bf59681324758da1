//! Template set construction and rendering.
//! Every catalog asset carrying the template suffix is parsed into a single
//! MiniJinja environment and addressed by its virtual path.

use crate::catalog::Catalog;
use crate::constants::{APP_PREFIX, REST_PREFIX, TEMPLATE_SUFFIX};
use crate::error::{Error, Result};
use globset::GlobBuilder;
use log::debug;
use minijinja::{Environment, Template, UndefinedBehavior};
use serde::Serialize;

/// Parameters substituted into a template.
///
/// Fields a stage does not set keep their zero value and render as `""`,
/// `0` or `false`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationContext {
    pub app_name: String,
    pub host: String,
    pub port: u16,
    pub driver: String,
    pub connection_string: String,
    pub import_path: String,
    pub migrations: bool,
}

/// Named collection of parsed templates.
pub struct TemplateSet {
    env: Environment<'static>,
    names: Vec<String>,
}

impl TemplateSet {
    /// Parses every template asset of `catalog`.
    ///
    /// # Errors
    /// * `Error::InvalidAsset` if a template body is not UTF-8
    /// * `Error::TemplateParseError` on the first body that fails to parse;
    ///   no partially built set is returned
    pub fn build(catalog: &dyn Catalog) -> Result<Self> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);

        let mut names: Vec<String> =
            catalog.names().into_iter().filter(|n| n.ends_with(TEMPLATE_SUFFIX)).collect();
        names.sort();

        for name in &names {
            let body = catalog.get(name)?;
            let source = String::from_utf8(body.into_owned()).map_err(|e| Error::InvalidAsset {
                name: name.clone(),
                reason: e.to_string(),
            })?;
            debug!("Parsing template {name}");
            env.add_template_owned(name.clone(), source)
                .map_err(|source| Error::TemplateParseError { path: name.clone(), source })?;
        }

        Ok(Self { env, names })
    }

    /// Looks up a template by its exact virtual path.
    pub fn lookup(&self, path: &str) -> Option<Template<'_, '_>> {
        self.env.get_template(path).ok()
    }

    /// Virtual paths of every parsed template, sorted.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, path: &str) -> bool {
        self.names.iter().any(|n| n == path)
    }

    /// Renders the template at `path` with `context`.
    ///
    /// # Errors
    /// * `Error::TemplateNotFound` if `path` is not in the set
    /// * `Error::RenderError` if evaluation fails, e.g. on an undefined placeholder
    pub fn render<S: Serialize>(&self, path: &str, context: S) -> Result<String> {
        let template =
            self.lookup(path).ok_or_else(|| Error::TemplateNotFound { path: path.to_string() })?;
        template
            .render(context)
            .map_err(|source| Error::RenderError { path: path.to_string(), source })
    }
}

/// Lists the template variants stored directly under `prefix`.
///
/// Names are returned without prefix and suffix, sorted. Nested paths below
/// the prefix are not variants.
///
/// # Errors
/// * `Error::InvalidAsset` if `prefix` does not form a valid glob
pub fn list_frameworks(catalog: &dyn Catalog, prefix: &str) -> Result<Vec<String>> {
    let matcher = GlobBuilder::new(&format!("{prefix}*{TEMPLATE_SUFFIX}"))
        .literal_separator(true)
        .build()
        .map_err(|e| Error::InvalidAsset {
            name: prefix.to_string(),
            reason: format!("invalid variant prefix: {e}"),
        })?
        .compile_matcher();

    let mut variants: Vec<String> = catalog
        .names()
        .into_iter()
        .filter(|name| matcher.is_match(name))
        .filter_map(|name| {
            name.strip_prefix(prefix)
                .and_then(|rest| rest.strip_suffix(TEMPLATE_SUFFIX))
                .map(str::to_string)
        })
        .collect();
    variants.sort();
    Ok(variants)
}

/// Every selectable application variant, application and REST skeletons combined.
pub fn available_frameworks(catalog: &dyn Catalog) -> Result<Vec<String>> {
    let mut variants = list_frameworks(catalog, APP_PREFIX)?;
    variants.extend(list_frameworks(catalog, REST_PREFIX)?);
    variants.sort();
    variants.dedup();
    Ok(variants)
}

/// Resolves the virtual path of the application template for `framework`.
///
/// Application skeletons take precedence over REST skeletons of the same name.
///
/// # Errors
/// * `Error::UnsupportedFramework` if neither path exists in the set
pub fn application_template(templates: &TemplateSet, framework: &str) -> Result<String> {
    [APP_PREFIX, REST_PREFIX]
        .iter()
        .map(|prefix| format!("{prefix}{framework}{TEMPLATE_SUFFIX}"))
        .find(|path| templates.contains(path))
        .ok_or_else(|| Error::UnsupportedFramework { framework: framework.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EmbeddedCatalog;

    #[test]
    fn test_zero_values_render_empty() {
        let templates = TemplateSet::build(&EmbeddedCatalog).unwrap();
        let rendered = templates
            .render("templates/gitignore.tpl", GenerationContext::default())
            .unwrap();
        assert!(!rendered.contains("none"));
        assert!(!rendered.contains("undefined"));
    }

    #[test]
    fn test_application_template_prefers_app_prefix() {
        let templates = TemplateSet::build(&EmbeddedCatalog).unwrap();
        assert_eq!(application_template(&templates, "gin").unwrap(), "templates/app/gin.tpl");
        assert_eq!(application_template(&templates, "goji").unwrap(), "templates/rest/goji.tpl");
    }

    #[test]
    fn test_lookup_and_render_borrow_the_set() {
        let templates = TemplateSet::build(&EmbeddedCatalog).unwrap();
        assert!(templates.lookup("templates/app/gin.tpl").is_some());
        assert!(templates.lookup("templates/app/missing.tpl").is_none());

        let context = GenerationContext { app_name: "shop".to_string(), ..Default::default() };
        let rendered = templates.render("templates/gitignore.tpl", &context).unwrap();
        assert!(rendered.contains("/shop"));
    }

    #[test]
    fn test_invalid_variant_prefix() {
        match list_frameworks(&EmbeddedCatalog, "templates/[app/") {
            Err(Error::InvalidAsset { name, reason }) => {
                assert_eq!(name, "templates/[app/");
                assert!(reason.contains("invalid variant prefix"));
            }
            other => panic!("Expected InvalidAsset, got {:?}", other),
        }
    }
}
