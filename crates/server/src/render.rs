//! Printable quotation rendering.
//!
//! The document arrives with its cost summary already computed; the
//! template formats the six figures and never re-derives pricing.

use std::collections::HashMap;

use tera::{Context, Tera};

use aluquote_core::domain::quotation::QuotationDocument;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

/// Builds the template engine with the embedded quotation template and the
/// `money` filter (two-decimal formatting, presentation only).
pub fn templates() -> Result<Tera, RenderError> {
    let mut tera = Tera::default();
    tera.add_raw_template("quotation.html", include_str!("../templates/quotation.html"))?;
    tera.register_filter("money", money_filter);
    Ok(tera)
}

pub fn render_document(tera: &Tera, document: &QuotationDocument) -> Result<String, RenderError> {
    let mut context = Context::new();
    context.insert("document", document);
    context.insert("date", &document.date.format("%Y-%m-%d").to_string());
    Ok(tera.render("quotation.html", &context)?)
}

/// Formats a number (or a decimal serialized as a string) to two decimal
/// places. Usage: `amount | money`.
fn money_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let amount = match value {
        tera::Value::Number(number) => number.as_f64().unwrap_or(0.0),
        tera::Value::String(raw) => raw
            .parse::<f64>()
            .map_err(|_| tera::Error::msg(format!("money filter got a non-numeric string `{raw}`")))?,
        tera::Value::Null => 0.0,
        _ => return Err(tera::Error::msg("money filter expects a number")),
    };
    Ok(tera::Value::String(format!("{amount:.2}")))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use aluquote_core::domain::catalog::{Catalog, CatalogItem, CatalogItemId, ItemCategory};
    use aluquote_core::domain::customer::CustomerDetails;
    use aluquote_core::domain::quotation::QuotationDocument;
    use aluquote_core::domain::series::AreaRateTable;
    use aluquote_core::pricing::cart::{AddItemRequest, QuotationCart};

    use super::{render_document, templates};

    fn document() -> QuotationDocument {
        let catalog = Catalog::new(vec![
            CatalogItem {
                id: CatalogItemId("glass-clear-6".to_string()),
                name: "Clear Glass 6mm".to_string(),
                category: ItemCategory::Glass,
                base_price: Decimal::ZERO,
                attributes: None,
            },
            CatalogItem {
                id: CatalogItemId("acc-handle-b".to_string()),
                name: "Handle Type B".to_string(),
                category: ItemCategory::Accessory,
                base_price: Decimal::new(875, 2),
                attributes: None,
            },
        ]);
        let rates = AreaRateTable::default();
        let mut cart = QuotationCart::new();
        cart.add_item(
            &catalog,
            &rates,
            AddItemRequest {
                catalog_item_id: CatalogItemId("glass-clear-6".to_string()),
                quantity: 1,
                width_mm: Some(Decimal::from(1000)),
                height_mm: Some(Decimal::from(1200)),
            },
        )
        .expect("add glass");
        cart.add_item(
            &catalog,
            &rates,
            AddItemRequest {
                catalog_item_id: CatalogItemId("acc-handle-b".to_string()),
                quantity: 2,
                width_mm: None,
                height_mm: None,
            },
        )
        .expect("add handles");

        QuotationDocument::from_cart(
            &cart,
            CustomerDetails {
                name: "Sharma Interiors".to_string(),
                email: "orders@sharma.example".to_string(),
                phone: None,
                address: Some("Industrial Estate, Pune".to_string()),
            },
            Some("installation included".to_string()),
        )
        .expect("build document")
    }

    #[test]
    fn rendered_document_shows_lines_and_all_summary_figures() {
        let tera = templates().expect("build templates");
        let html = render_document(&tera, &document()).expect("render");

        assert!(html.contains("Clear Glass 6mm"));
        assert!(html.contains("Handle Type B"));
        assert!(html.contains("Sharma Interiors"));
        // Glass pane priced at 18,000.00; grand totals flow from the summary.
        assert!(html.contains("18000.00"));
        for label in ["Subtotal", "Wastage", "Discount", "Taxable", "Tax", "Grand Total"] {
            assert!(html.contains(label), "missing {label} in rendered document");
        }
    }

    #[test]
    fn area_lines_show_their_dimensions() {
        let tera = templates().expect("build templates");
        let html = render_document(&tera, &document()).expect("render");

        assert!(html.contains("1000"));
        assert!(html.contains("1200"));
    }
}
