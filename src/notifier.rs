use crate::config::EmailConfig;
use crate::error::Result;
use crate::models::Listing;
use async_trait::async_trait;
use html_escape::{encode_double_quoted_attribute, encode_text};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::fmt::Write;
use tracing::info;

/// Delivers one digest of matched listings
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a digest; an empty slice sends nothing
    async fn notify(&self, listings: &[Listing]) -> Result<()>;
}

/// Rendered digest message
#[derive(Debug, Clone, PartialEq)]
pub struct Digest {
    pub subject: String,
    pub html: String,
}

pub fn render_digest(listings: &[Listing]) -> Digest {
    let subject = format!("New matching ads found: {}", listings.len());

    let mut html = String::new();
    html.push_str("<html>\n<body>\n");
    let _ = writeln!(html, "<h2>New matching ads found ({})</h2>", listings.len());
    html.push_str("<ul>\n");

    for listing in listings {
        let search_name = if listing.search_name.is_empty() {
            "Unnamed search"
        } else {
            listing.search_name.as_str()
        };
        let source = if listing.source.is_empty() {
            "Unknown source"
        } else {
            listing.source.as_str()
        };

        html.push_str("<li>\n");
        let _ = writeln!(
            html,
            "<h3><a href=\"{}\">{}</a></h3>",
            encode_double_quoted_attribute(&listing.link),
            encode_text(&listing.title)
        );
        let _ = writeln!(html, "<p>Price: {}</p>", encode_text(&listing.price));
        let _ = writeln!(
            html,
            "<p>Source: {} - {}</p>",
            encode_text(source),
            encode_text(search_name)
        );
        if !listing.image_url.is_empty() {
            let _ = writeln!(
                html,
                "<img src=\"{}\" style=\"max-width: 200px;\">",
                encode_double_quoted_attribute(&listing.image_url)
            );
        }
        html.push_str("</li>\n");
    }

    html.push_str("</ul>\n</body>\n</html>\n");

    Digest { subject, html }
}

/// SMTP digest sender using STARTTLS
pub struct EmailNotifier {
    config: EmailConfig,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, digest: Digest) -> Result<Message> {
        let message = Message::builder()
            .from(self.config.sender_email.parse()?)
            .to(self.config.receiver_email.parse()?)
            .subject(digest.subject)
            .header(ContentType::TEXT_HTML)
            .body(digest.html)?;
        Ok(message)
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, listings: &[Listing]) -> Result<()> {
        if listings.is_empty() {
            return Ok(());
        }

        let message = self.build_message(render_digest(listings))?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_server)?
            .port(self.config.smtp_port)
            .credentials(Credentials::new(
                self.config.sender_email.clone(),
                self.config.password.clone(),
            ))
            .build();

        mailer.send(message).await?;

        info!("Email notification sent for {} new matching ads", listings.len());
        Ok(())
    }
}
