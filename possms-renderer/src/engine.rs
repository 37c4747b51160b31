//! Tera rendering engine — [`Section`] enum and [`ReceiptRenderer`].
//!
//! # Section order
//!
//! | Section   | Template          | Rendered when                  |
//! |-----------|-------------------|--------------------------------|
//! | Company   | `company.tera`    | `show_company_info`            |
//! | Separator | `separator.tera`  | `show_separator`               |
//! | Order     | `order.tera`      | `show_order_info`              |
//! | Items     | `items.tera`      | `show_items`                   |
//! | Total     | `total.tera`      | `show_total`                   |
//! | Tax       | `tax.tera`        | `show_tax` and tax > 0         |
//! | Customer  | `customer.tera`   | `show_customer` and named      |
//! | Footer    | `footer.tera`     | `show_footer`                  |

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tera::Tera;

use possms_core::{CompanyInfo, Order, ReceiptSections};

use crate::context::ReceiptContext;
use crate::error::{io_err, RenderError};

// ---------------------------------------------------------------------------
// Embedded templates
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("company.tera", include_str!("templates/company.tera")),
    ("separator.tera", include_str!("templates/separator.tera")),
    ("order.tera", include_str!("templates/order.tera")),
    ("items.tera", include_str!("templates/items.tera")),
    ("total.tera", include_str!("templates/total.tera")),
    ("tax.tera", include_str!("templates/tax.tera")),
    ("customer.tera", include_str!("templates/customer.tera")),
    ("footer.tera", include_str!("templates/footer.tera")),
];

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/").to_lowercase()
}

/// `*.tera` files directly inside `dir`, keyed by file name.
fn load_user_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut templates = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("tera") {
            continue;
        }
        let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        templates.push((normalize_template_name(rel), contents));
    }
    Ok(templates)
}

fn build_tera(user_template_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: HashMap<String, String> = TPLS
        .iter()
        .map(|(name, content)| (name.to_string(), content.to_string()))
        .collect();
    if let Some(dir) = user_template_dir {
        templates.extend(load_user_templates(dir)?);
    }

    let mut tera = Tera::default();
    tera.add_raw_templates(templates.into_iter().collect::<Vec<_>>())?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// Parts of the SMS receipt body, in print order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Company,
    Separator,
    Order,
    Items,
    Total,
    Tax,
    Customer,
    Footer,
}

impl Section {
    pub fn all() -> &'static [Section] {
        &[
            Section::Company,
            Section::Separator,
            Section::Order,
            Section::Items,
            Section::Total,
            Section::Tax,
            Section::Customer,
            Section::Footer,
        ]
    }

    pub fn template_name(&self) -> &'static str {
        match self {
            Section::Company   => "company.tera",
            Section::Separator => "separator.tera",
            Section::Order     => "order.tera",
            Section::Items     => "items.tera",
            Section::Total     => "total.tera",
            Section::Tax       => "tax.tera",
            Section::Customer  => "customer.tera",
            Section::Footer    => "footer.tera",
        }
    }

    fn enabled(&self, toggles: &ReceiptSections, ctx: &ReceiptContext) -> bool {
        match self {
            Section::Company   => toggles.show_company_info,
            Section::Separator => toggles.show_separator,
            Section::Order     => toggles.show_order_info,
            Section::Items     => toggles.show_items,
            Section::Total     => toggles.show_total,
            Section::Tax       => toggles.show_tax && ctx.tax.is_some(),
            Section::Customer  => toggles.show_customer && ctx.customer.is_some(),
            Section::Footer    => toggles.show_footer,
        }
    }

    /// Sections built from optional lines lose their blank lines.
    fn drops_blank_lines(&self) -> bool {
        matches!(self, Section::Company | Section::Order | Section::Footer)
    }
}

// ---------------------------------------------------------------------------
// ReceiptRenderer
// ---------------------------------------------------------------------------

/// Renders SMS receipt bodies. Create once and reuse.
///
/// `user_template_dir` may contain `<section>.tera` files that replace the
/// embedded defaults.
pub struct ReceiptRenderer {
    tera: Tera,
}

impl ReceiptRenderer {
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        Ok(ReceiptRenderer { tera: build_tera(user_template_dir)? })
    }

    /// Embedded templates only.
    pub fn embedded() -> Result<Self, RenderError> {
        Self::new(None)
    }

    /// Embedded templates plus overrides from `<home>/.possms/templates/`.
    pub fn for_home(home: &Path) -> Result<Self, RenderError> {
        let dir: PathBuf = possms_core::config::templates_dir_at(home);
        Self::new(Some(&dir))
    }

    pub fn render(
        &self,
        order: &Order,
        company: &CompanyInfo,
        toggles: &ReceiptSections,
    ) -> Result<String, RenderError> {
        self.render_with_context(&ReceiptContext::from_order(order, company), toggles)
    }

    /// Render using a caller-provided [`ReceiptContext`].
    pub fn render_with_context(
        &self,
        ctx: &ReceiptContext,
        toggles: &ReceiptSections,
    ) -> Result<String, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        let mut parts = Vec::new();
        for section in Section::all() {
            if !section.enabled(toggles, ctx) {
                continue;
            }
            let raw = self.tera.render(section.template_name(), &tera_ctx)?;
            let text = if section.drops_blank_lines() {
                raw.lines()
                    .filter(|line| !line.trim().is_empty())
                    .collect::<Vec<_>>()
                    .join("\n")
            } else {
                raw.trim_end().to_string()
            };
            if !text.trim().is_empty() {
                parts.push(text);
            }
        }
        Ok(parts.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_templates_parse() {
        ReceiptRenderer::embedded().expect("embedded templates should parse");
    }

    #[test]
    fn every_section_has_an_embedded_template() {
        for section in Section::all() {
            assert!(
                TPLS.iter().any(|(name, _)| *name == section.template_name()),
                "no template for {section:?}"
            );
        }
    }

    #[test]
    fn template_names_are_normalized() {
        assert_eq!(normalize_template_name(Path::new("Footer.TERA")), "footer.tera");
    }
}
