use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub smtp: SmtpConfig,
    pub google: GoogleConfig,
    /// Base URL of this backend, used in verification links.
    pub backend_url: String,
    /// Base URL of the storefront, used in reset links and OAuth redirects.
    pub frontend_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "jugueteria".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "jugueteria-clientes".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(120),
        };
        let email_user = std::env::var("EMAIL_USER")?;
        let smtp = SmtpConfig {
            host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".into()),
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(587),
            password: std::env::var("EMAIL_PASS")?,
            from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| format!("Juguetería Martínez <{email_user}>")),
            username: email_user,
        };
        let google = GoogleConfig {
            client_id: std::env::var("GOOGLE_CLIENT_ID")?,
            client_secret: std::env::var("GOOGLE_CLIENT_SECRET")?,
            redirect_url: std::env::var("GOOGLE_REDIRECT_URL")
                .unwrap_or_else(|_| "http://localhost:5000/api/auth/google/callback".into()),
        };
        let backend_url =
            std::env::var("BACKEND_URL").unwrap_or_else(|_| "http://localhost:5000".into());
        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".into());

        Ok(Self {
            database_url,
            jwt,
            smtp,
            google,
            backend_url,
            frontend_url,
        })
    }
}
