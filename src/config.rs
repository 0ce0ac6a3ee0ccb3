use clap::{Args, Parser, ValueEnum};

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub email: EmailConfig,

    #[command(flatten)]
    pub contact: ContactConfig,

    #[command(flatten)]
    pub resume: ResumeConfig,

    #[command(flatten)]
    pub database: DatabaseConfig,

    #[command(flatten)]
    pub activity: ActivityConfig,

    #[command(flatten)]
    pub health: HealthConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "PORTFOLIO_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORTFOLIO_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Port for the management (health) server
    #[arg(long, env = "PORTFOLIO_MGMT_PORT", default_value_t = 9090)]
    pub mgmt_port: u16,

    /// Upper bound for a single request, in seconds
    #[arg(long, env = "PORTFOLIO_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// How long to wait for background tasks on shutdown
    #[arg(long, env = "PORTFOLIO_SHUTDOWN_TIMEOUT_SECS", default_value_t = 5)]
    pub shutdown_timeout_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct EmailConfig {
    /// Email relay service identifier
    #[arg(long = "email-service-id", env = "PORTFOLIO_EMAIL_SERVICE_ID")]
    pub service_id: Option<String>,

    /// Email relay template identifier
    #[arg(long = "email-template-id", env = "PORTFOLIO_EMAIL_TEMPLATE_ID")]
    pub template_id: Option<String>,

    /// Email relay public key
    #[arg(long = "email-public-key", env = "PORTFOLIO_EMAIL_PUBLIC_KEY")]
    pub public_key: Option<String>,

    /// Send endpoint of the email relay
    #[arg(
        long = "email-api-url",
        id = "email-api-url",
        env = "PORTFOLIO_EMAIL_API_URL",
        default_value = "https://api.emailjs.com/api/v1.0/email/send"
    )]
    pub api_url: String,

    /// Name the messages are addressed to
    #[arg(long = "email-recipient-name", env = "PORTFOLIO_EMAIL_RECIPIENT_NAME", default_value = "Turki")]
    pub recipient_name: String,

    /// UTC offset (hours) used to stamp outgoing messages. Defaults to Asia/Riyadh.
    #[arg(
        long = "email-utc-offset-hours",
        env = "PORTFOLIO_EMAIL_UTC_OFFSET_HOURS",
        default_value_t = 3,
        allow_negative_numbers = true
    )]
    pub utc_offset_hours: i8,

    /// Timeout for a single relay request in milliseconds
    #[arg(long = "email-timeout-ms", id = "email-timeout-ms", env = "PORTFOLIO_EMAIL_TIMEOUT_MS", default_value_t = 10_000)]
    pub timeout_ms: u64,
}

impl EmailConfig {
    /// All three relay credentials are present and non-blank.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        [&self.service_id, &self.template_id, &self.public_key]
            .iter()
            .all(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }
}

#[derive(Clone, Debug, Args)]
pub struct ContactConfig {
    /// Seconds a success or error notice stays visible
    #[arg(long, env = "PORTFOLIO_CONTACT_DISMISS_AFTER_SECS", default_value_t = 7)]
    pub dismiss_after_secs: u64,

    /// Idle time after which a server-held contact form is dropped
    #[arg(long, env = "PORTFOLIO_CONTACT_SESSION_TTL_SECS", default_value_t = 1800)]
    pub session_ttl_secs: u64,

    /// How often idle contact forms are swept
    #[arg(long, env = "PORTFOLIO_CONTACT_SESSION_SWEEP_INTERVAL_SECS", default_value_t = 60)]
    pub session_sweep_interval_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct ResumeConfig {
    /// Upstream location of the resume document
    #[arg(
        long = "resume-url", id = "resume-url",
        env = "PORTFOLIO_RESUME_URL",
        default_value = "https://rechlvadwsjwxyhgksto.supabase.co/storage/v1/object/public/files/Turki-Naif-Alghamdi-resume.pdf"
    )]
    pub url: String,

    /// File name offered to the browser
    #[arg(long = "resume-filename", env = "PORTFOLIO_RESUME_FILENAME", default_value = "Turki_Naif_Alghamdi_Resume.pdf")]
    pub filename: String,
}

#[derive(Clone, Debug, Args)]
pub struct DatabaseConfig {
    /// Project store connection URL. Project queries return nothing when unset.
    #[arg(long = "database-url", id = "database-url", env = "PORTFOLIO_DATABASE_URL")]
    pub url: Option<String>,

    /// Maximum number of connections in the pool
    #[arg(long = "database-max-connections", env = "PORTFOLIO_DATABASE_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,

    /// Timeout for acquiring a connection, in seconds
    #[arg(long = "database-acquire-timeout-secs", env = "PORTFOLIO_DATABASE_ACQUIRE_TIMEOUT_SECS", default_value_t = 3)]
    pub acquire_timeout_secs: u64,

    /// Apply bundled migrations at boot
    #[arg(long = "database-run-migrations", env = "PORTFOLIO_DATABASE_RUN_MIGRATIONS", default_value_t = false)]
    pub run_migrations: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ActivityConfig {
    /// Base URL of the public events API
    #[arg(long = "activity-api-url", id = "activity-api-url", env = "PORTFOLIO_ACTIVITY_API_URL", default_value = "https://api.github.com")]
    pub api_url: String,

    /// Account whose public activity is shown
    #[arg(long = "activity-username", env = "PORTFOLIO_ACTIVITY_USERNAME", default_value = "TurkiNAlghamdii")]
    pub username: String,

    /// Number of raw events inspected
    #[arg(long = "activity-scan-limit", env = "PORTFOLIO_ACTIVITY_SCAN_LIMIT", default_value_t = 15)]
    pub scan_limit: usize,

    /// Number of activity items returned
    #[arg(long = "activity-display-limit", env = "PORTFOLIO_ACTIVITY_DISPLAY_LIMIT", default_value_t = 3)]
    pub display_limit: usize,

    /// User agent sent to the events API
    #[arg(long = "activity-user-agent", env = "PORTFOLIO_ACTIVITY_USER_AGENT", default_value = "Portfolio-App")]
    pub user_agent: String,

    /// Timeout for a single feed request in milliseconds
    #[arg(long = "activity-timeout-ms", id = "activity-timeout-ms", env = "PORTFOLIO_ACTIVITY_TIMEOUT_MS", default_value_t = 5_000)]
    pub timeout_ms: u64,
}

#[derive(Clone, Debug, Args)]
pub struct HealthConfig {
    /// Timeout for the database readiness probe in milliseconds
    #[arg(long = "health-db-timeout-ms", env = "PORTFOLIO_HEALTH_DB_TIMEOUT_MS", default_value_t = 2_000)]
    pub db_timeout_ms: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "PORTFOLIO_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP collector endpoint. Export is disabled when unset.
    #[arg(long, env = "PORTFOLIO_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}
