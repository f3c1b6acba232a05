use anyhow::Context;
use axum::async_trait;
use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

use crate::config::SmtpConfig;

/// Outbound mail. Delivery is best-effort: callers log failures and keep
/// going, a committed user or token row is never rolled back because the
/// mail could not be sent.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let creds = Credentials::new(config.username.clone(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .context("configure smtp relay")?
            .port(config.port)
            .credentials(creds)
            .build();
        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.from.parse().context("parse from address")?)
            .to(to.parse().context("parse to address")?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())?;

        self.transport.send(message).await.context("smtp send")?;
        debug!(%to, %subject, "email sent");
        Ok(())
    }
}

pub fn verification_email(nombre: &str, verify_link: &str) -> (String, String) {
    let subject = "Verifica tu cuenta".to_string();
    let body = format!(
        "<h3>Hola {nombre}</h3>\
         <p>Por favor verifica tu cuenta:</p>\
         <a href=\"{verify_link}\">Verificar cuenta</a>"
    );
    (subject, body)
}

pub fn reset_email(reset_link: &str) -> (String, String) {
    let subject = "Restablecer contraseña".to_string();
    let body = format!(
        "<h3>Solicitud de restablecimiento de contraseña</h3>\
         <p>Haz clic en el siguiente enlace:</p>\
         <a href=\"{reset_link}\">Restablecer contraseña</a>\
         <p>Este enlace es válido por 15 minutos.</p>"
    );
    (subject, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_email_embeds_name_and_link() {
        let (subject, body) =
            verification_email("Ana", "http://localhost:5000/verify?token=abc");
        assert_eq!(subject, "Verifica tu cuenta");
        assert!(body.contains("Hola Ana"));
        assert!(body.contains("verify?token=abc"));
    }

    #[test]
    fn reset_email_mentions_ttl() {
        let (_, body) = reset_email("http://localhost:5173/reset-password?token=abc");
        assert!(body.contains("reset-password?token=abc"));
        assert!(body.contains("15 minutos"));
    }
}
