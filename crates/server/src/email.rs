//! Email dispatch for quotations. One attempt per send action, pass/fail
//! reported back; retry policy is the caller's business.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use secrecy::ExposeSecret;
use tracing::warn;

use aluquote_core::config::EmailConfig;
use aluquote_core::domain::quotation::QuotationDocument;

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("mailer configuration error: {0}")]
    Configuration(String),
    #[error("invalid recipient address: {0}")]
    InvalidRecipient(String),
    #[error("smtp transport error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait QuotationMailer: Send + Sync {
    async fn send_quotation(
        &self,
        document: &QuotationDocument,
        recipient: &str,
    ) -> Result<(), MailerError>;
}

pub struct SmtpMailer {
    config: EmailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: EmailConfig) -> Result<Self, MailerError> {
        let credentials = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|error| {
                MailerError::Configuration(format!("could not create smtp relay: {error}"))
            })?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self { config, transport })
    }
}

#[async_trait]
impl QuotationMailer for SmtpMailer {
    async fn send_quotation(
        &self,
        document: &QuotationDocument,
        recipient: &str,
    ) -> Result<(), MailerError> {
        let from: Mailbox = format!("{} <{}>", self.config.from_name, self.config.from_address)
            .parse()
            .map_err(|error| {
                MailerError::Configuration(format!("invalid from address: {error}"))
            })?;
        let to: Mailbox = recipient
            .parse()
            .map_err(|error| MailerError::InvalidRecipient(format!("{recipient}: {error}")))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(format!("Quotation {} from {}", document.id.0, self.config.from_name))
            .header(ContentType::TEXT_PLAIN)
            .body(quotation_body(document))
            .map_err(|error| {
                MailerError::Configuration(format!("could not build message: {error}"))
            })?;

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|error| MailerError::Transport(error.to_string()))
    }
}

/// Stand-in used when email is disabled: logs the send and reports success
/// so local draft/send flows stay usable.
#[derive(Default)]
pub struct NoopMailer;

#[async_trait]
impl QuotationMailer for NoopMailer {
    async fn send_quotation(
        &self,
        document: &QuotationDocument,
        recipient: &str,
    ) -> Result<(), MailerError> {
        warn!(
            event_name = "system.email.noop",
            quotation_id = %document.id.0,
            recipient = %recipient,
            "email is disabled; quotation send recorded without dispatch"
        );
        Ok(())
    }
}

fn quotation_body(document: &QuotationDocument) -> String {
    let mut body = format!(
        "Dear {},\n\nPlease find your quotation below.\n\n",
        document.customer.name
    );
    for line in &document.items {
        body.push_str(&format!(
            "  {} x{} @ {:.2} = {:.2}\n",
            line.name, line.quantity, line.unit_price, line.total_price
        ));
    }
    body.push_str(&format!(
        "\nSubtotal: {:.2}\nWastage: {:.2}\nDiscount: {:.2}\nTaxable: {:.2}\nTax: {:.2}\nTotal: {:.2}\n",
        document.summary.subtotal,
        document.summary.wastage_amount,
        document.summary.discount_amount,
        document.summary.taxable_amount,
        document.summary.tax_amount,
        document.summary.total,
    ));
    if let Some(notes) = &document.notes {
        body.push_str(&format!("\nNotes: {notes}\n"));
    }
    body
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use aluquote_core::domain::catalog::{Catalog, CatalogItem, CatalogItemId, ItemCategory};
    use aluquote_core::domain::customer::CustomerDetails;
    use aluquote_core::domain::quotation::QuotationDocument;
    use aluquote_core::domain::series::AreaRateTable;
    use aluquote_core::pricing::cart::{AddItemRequest, QuotationCart};

    use super::{quotation_body, NoopMailer, QuotationMailer};

    fn document() -> QuotationDocument {
        let catalog = Catalog::new(vec![CatalogItem {
            id: CatalogItemId("acc-handle-b".to_string()),
            name: "Handle Type B".to_string(),
            category: ItemCategory::Accessory,
            base_price: Decimal::new(875, 2),
            attributes: None,
        }]);
        let mut cart = QuotationCart::new();
        cart.add_item(
            &catalog,
            &AreaRateTable::default(),
            AddItemRequest {
                catalog_item_id: CatalogItemId("acc-handle-b".to_string()),
                quantity: 4,
                width_mm: None,
                height_mm: None,
            },
        )
        .expect("add handles");

        QuotationDocument::from_cart(
            &cart,
            CustomerDetails {
                name: "Mehta Glassworks".to_string(),
                email: "site@mehta.example".to_string(),
                phone: None,
                address: None,
            },
            None,
        )
        .expect("build document")
    }

    #[test]
    fn body_carries_all_six_summary_figures() {
        let body = quotation_body(&document());

        for label in ["Subtotal:", "Wastage:", "Discount:", "Taxable:", "Tax:", "Total:"] {
            assert!(body.contains(label), "missing {label} in body");
        }
        assert!(body.contains("Handle Type B x4"));
    }

    #[tokio::test]
    async fn noop_mailer_reports_success() {
        let mailer = NoopMailer;
        let result = mailer.send_quotation(&document(), "site@mehta.example").await;
        assert!(result.is_ok());
    }
}
