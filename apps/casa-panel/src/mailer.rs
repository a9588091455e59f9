use anyhow::{Result, anyhow};
use async_trait::async_trait;
use casa_db::models::fund_request::FundRequest;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMail {
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub body: String,
}

/// Hands a composed message to whatever actually moves mail.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, mail: &OutboundMail) -> Result<()>;
}

/// Default transport: the message goes to the log and nowhere else.
#[derive(Debug, Default)]
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn deliver(&self, mail: &OutboundMail) -> Result<()> {
        info!(
            to = %mail.to,
            reply_to = mail.reply_to.as_deref().unwrap_or("-"),
            subject = %mail.subject,
            "Delivering mail\n{}",
            mail.body
        );
        Ok(())
    }
}

/// Keeps every delivered message; lets callers inspect the outbox.
#[derive(Debug, Default, Clone)]
pub struct MemoryTransport {
    outbox: Arc<Mutex<Vec<OutboundMail>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> Vec<OutboundMail> {
        self.outbox.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl MailTransport for MemoryTransport {
    async fn deliver(&self, mail: &OutboundMail) -> Result<()> {
        self.outbox
            .lock()
            .map_err(|_| anyhow!("Mail outbox lock poisoned"))?
            .push(mail.clone());
        Ok(())
    }
}

/// Composes fund request notifications.
pub struct FundRequestMailer {
    from: String,
    default_recipient: String,
    transport: Arc<dyn MailTransport>,
}

/// A composed message bound to its transport, sent by `deliver`.
pub struct FundRequestDelivery {
    mail: OutboundMail,
    transport: Arc<dyn MailTransport>,
}

impl FundRequestDelivery {
    pub fn mail(&self) -> &OutboundMail {
        &self.mail
    }

    pub async fn deliver(self) -> Result<()> {
        self.transport.deliver(&self.mail).await
    }
}

impl FundRequestMailer {
    pub fn new(
        from: impl Into<String>,
        default_recipient: impl Into<String>,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        Self {
            from: from.into(),
            default_recipient: default_recipient.into(),
            transport,
        }
    }

    /// `recipient` of `None` addresses the configured fund request inbox.
    pub fn send_request(
        &self,
        recipient: Option<&str>,
        fund_request: &FundRequest,
    ) -> FundRequestDelivery {
        let submitter = fund_request
            .submitter_email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty());

        let mail = OutboundMail {
            from: self.from.clone(),
            to: recipient.unwrap_or(self.default_recipient.as_str()).to_string(),
            reply_to: submitter.map(str::to_string),
            subject: format!("Fund request from {}", submitter.unwrap_or("(no email)")),
            body: Self::format_body(fund_request),
        };

        FundRequestDelivery {
            mail,
            transport: self.transport.clone(),
        }
    }

    fn format_body(fund_request: &FundRequest) -> String {
        let mut body = String::from("A new fund request was submitted.\n\n");
        for (label, value) in fund_request.labeled_values() {
            body.push_str(label);
            body.push_str(": ");
            body.push_str(value);
            body.push('\n');
        }
        body
    }
}
