//! Email notification stage.
//!
//! Renders the fixed HTML template by literal placeholder substitution,
//! attaches the signature image (base64, on every mail), and sends through
//! the transactional transport. One attempt, no retry; the provider's
//! response is preserved verbatim for the success audit entry.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use fotodrop_core::{Config, DeliveryError, DeliveryResult, Photographer, RecipientRecord};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Body, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

const RECIPIENT_NAME_PLACEHOLDER: &str = "{{recipientName}}";
const MODEL_ID_PLACEHOLDER: &str = "{{folderNumber}}";
const PHOTOGRAPHER_NAME_PLACEHOLDER: &str = "{{photographerName}}";
const PHOTOGRAPHER_HANDLE_PLACEHOLDER: &str = "{{photographerHandle}}";
const LINK_PLACEHOLDER: &str = "{{driveLink}}";

/// Substitute the five template placeholders, first occurrence each.
/// Placeholders absent from the template are simply left alone.
pub fn render_body(
    template: &str,
    recipient_name: &str,
    model_id: &str,
    photographer: &Photographer,
    link: &str,
) -> String {
    template
        .replacen(RECIPIENT_NAME_PLACEHOLDER, recipient_name, 1)
        .replacen(MODEL_ID_PLACEHOLDER, model_id, 1)
        .replacen(PHOTOGRAPHER_NAME_PLACEHOLDER, &photographer.name, 1)
        .replacen(PHOTOGRAPHER_HANDLE_PLACEHOLDER, &photographer.handle, 1)
        .replacen(LINK_PLACEHOLDER, link, 1)
}

/// One attachment, content base64-encoded as the provider interface expects.
#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_base64: String,
}

/// A rendered email ready for the transport.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to_email: String,
    pub to_name: String,
    pub subject: String,
    pub html_body: String,
    pub attachment: EmailAttachment,
}

/// The provider's response to a successful send, logged verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct SendReceipt {
    pub code: String,
    pub message: String,
}

/// Transactional email transport port.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> DeliveryResult<SendReceipt>;
}

/// SMTP transport on lettre.
pub struct SmtpMailer {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    /// Create the mailer from config. Returns `None` when SMTP is not
    /// configured, so callers can fail with a clear message up front.
    pub fn from_config(config: &Config) -> Option<Self> {
        let host = config.smtp_host()?;
        let from = config.smtp_from()?.to_string();
        let port = config.smtp_port();

        let mailer = if config.smtp_tls() {
            let b = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host).ok()?;
            let b = b.port(port);
            let b = if let (Some(u), Some(p)) = (config.smtp_user(), config.smtp_password()) {
                b.credentials(Credentials::new(u.to_string(), p.to_string()))
            } else {
                b
            };
            tracing::info!(host = %host, port = port, "Mailer initialized (SMTP with STARTTLS)");
            b.build()
        } else {
            let b = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(port);
            let b = if let (Some(u), Some(p)) = (config.smtp_user(), config.smtp_password()) {
                b.credentials(Credentials::new(u.to_string(), p.to_string()))
            } else {
                b
            };
            tracing::info!(host = %host, port = port, "Mailer initialized (SMTP)");
            b.build()
        };

        Some(SmtpMailer { mailer, from })
    }
}

#[async_trait]
impl EmailTransport for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> DeliveryResult<SendReceipt> {
        let from: Mailbox = self
            .from
            .parse()
            .map_err(|e| DeliveryError::Send(format!("invalid SMTP_FROM: {}", e)))?;
        let to: Mailbox = format!("{} <{}>", email.to_name, email.to_email)
            .parse()
            .or_else(|_| email.to_email.parse())
            .map_err(|e| DeliveryError::Send(format!("invalid recipient: {}", e)))?;

        let content = BASE64
            .decode(&email.attachment.content_base64)
            .map_err(|e| DeliveryError::Send(format!("invalid attachment encoding: {}", e)))?;
        let attachment = Attachment::new(email.attachment.filename.clone()).body(
            Body::new(content),
            ContentType::parse("image/png")
                .map_err(|e| DeliveryError::Send(format!("attachment content type: {}", e)))?,
        );

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(&email.subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::html(email.html_body.clone()))
                    .singlepart(attachment),
            )
            .map_err(|e| DeliveryError::Send(e.to_string()))?;

        let response = self
            .mailer
            .send(message)
            .await
            .map_err(|e| DeliveryError::Send(e.to_string()))?;

        Ok(SendReceipt {
            code: response.code().to_string(),
            message: response.message().collect::<Vec<_>>().join(" "),
        })
    }
}

/// Sends the delivery email for one model.
pub struct Notifier {
    transport: Arc<dyn EmailTransport>,
    template_path: PathBuf,
    signature_path: PathBuf,
    event_name: String,
}

impl Notifier {
    pub fn new(
        transport: Arc<dyn EmailTransport>,
        template_path: impl Into<PathBuf>,
        signature_path: impl Into<PathBuf>,
        event_name: impl Into<String>,
    ) -> Self {
        Notifier {
            transport,
            template_path: template_path.into(),
            signature_path: signature_path.into(),
            event_name: event_name.into(),
        }
    }

    pub fn from_config(
        config: &Config,
        transport: Arc<dyn EmailTransport>,
    ) -> DeliveryResult<Self> {
        let template_path = config
            .email_template_path()
            .ok_or_else(|| DeliveryError::Config("EMAIL_TEMPLATE_PATH not configured".into()))?;
        let signature_path = config
            .signature_path()
            .ok_or_else(|| DeliveryError::Config("SIGNATURE_PATH not configured".into()))?;
        let event_name = config
            .event_name()
            .ok_or_else(|| DeliveryError::Config("EVENT_NAME not configured".into()))?;
        Ok(Self::new(transport, template_path, signature_path, event_name))
    }

    pub async fn notify(
        &self,
        recipient: &RecipientRecord,
        model_id: &str,
        link: &str,
        photographer: &Photographer,
    ) -> DeliveryResult<SendReceipt> {
        let template = tokio::fs::read_to_string(&self.template_path)
            .await
            .map_err(|e| {
                DeliveryError::Send(format!(
                    "template {}: {}",
                    self.template_path.display(),
                    e
                ))
            })?;
        let signature = tokio::fs::read(&self.signature_path).await.map_err(|e| {
            DeliveryError::Send(format!(
                "signature {}: {}",
                self.signature_path.display(),
                e
            ))
        })?;

        let html_body = render_body(&template, &recipient.name, model_id, photographer, link);
        let filename = self
            .signature_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("signature.png")
            .to_string();

        let email = OutgoingEmail {
            to_email: recipient.email.clone(),
            to_name: recipient.name.clone(),
            subject: format!(
                "¡Aquí están tus fotos de {}, {}!",
                self.event_name, recipient.name
            ),
            html_body,
            attachment: EmailAttachment {
                filename,
                content_base64: BASE64.encode(&signature),
            },
        };

        let receipt = self.transport.send(&email).await?;
        tracing::info!(model_id = %model_id, to = %recipient.email, code = %receipt.code,
            "Delivery email sent");
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photographer() -> Photographer {
        Photographer {
            name: "Sam".into(),
            handle: "@sam".into(),
        }
    }

    #[test]
    fn render_substitutes_all_five_placeholders() {
        let template = "Hola {{recipientName}}, fotos del set {{folderNumber}} por \
                        {{photographerName}} ({{photographerHandle}}): {{driveLink}}";
        let body = render_body(
            template,
            "Ana",
            "042",
            &photographer(),
            "https://mail.example.com/view/042",
        );
        assert_eq!(
            body,
            "Hola Ana, fotos del set 042 por Sam (@sam): https://mail.example.com/view/042"
        );
    }

    #[test]
    fn render_leaves_missing_placeholders_untouched() {
        let template = "Hola {{recipientName}}, link: {{driveLink}} y {{unknownTag}}";
        let body = render_body(template, "Ana", "042", &photographer(), "L");
        assert_eq!(body, "Hola Ana, link: L y {{unknownTag}}");
    }

    #[test]
    fn render_replaces_only_the_first_occurrence() {
        let template = "{{recipientName}} / {{recipientName}}";
        let body = render_body(template, "Ana", "042", &photographer(), "L");
        assert_eq!(body, "Ana / {{recipientName}}");
    }

    #[tokio::test]
    async fn notify_builds_email_from_template_and_signature() {
        use std::sync::Mutex;

        struct CapturingTransport {
            sent: Mutex<Vec<OutgoingEmail>>,
        }

        #[async_trait]
        impl EmailTransport for CapturingTransport {
            async fn send(&self, email: &OutgoingEmail) -> DeliveryResult<SendReceipt> {
                self.sent.lock().unwrap().push(email.clone());
                Ok(SendReceipt {
                    code: "250".into(),
                    message: "queued".into(),
                })
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("template.html");
        let signature_path = dir.path().join("firma.png");
        std::fs::write(&template_path, "<p>Hola {{recipientName}}: {{driveLink}}</p>").unwrap();
        std::fs::write(&signature_path, b"PNGDATA").unwrap();

        let transport = Arc::new(CapturingTransport {
            sent: Mutex::new(Vec::new()),
        });
        let notifier = Notifier::new(
            transport.clone(),
            &template_path,
            &signature_path,
            "FicZone 2025",
        );

        let recipient = RecipientRecord {
            email: "a@x.com".into(),
            name: "Ana".into(),
            row_index: 3,
        };
        let receipt = notifier
            .notify(&recipient, "042", "https://m.example/view/042", &photographer())
            .await
            .unwrap();
        assert_eq!(receipt.code, "250");

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to_email, "a@x.com");
        assert_eq!(sent[0].subject, "¡Aquí están tus fotos de FicZone 2025, Ana!");
        assert_eq!(
            sent[0].html_body,
            "<p>Hola Ana: https://m.example/view/042</p>"
        );
        assert_eq!(sent[0].attachment.filename, "firma.png");
        assert_eq!(sent[0].attachment.content_base64, BASE64.encode(b"PNGDATA"));
    }
}
