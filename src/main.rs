use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_client::{AuthClient, HttpAssetFetcher};
use report_core::config::{api_base_url_from_env_value, resolve_data_dir, resolve_output_dir};
use report_core::rich_text::from_markdown_file;
use report_core::{
    AppConfig, Field, FileStorage, Identity, NotificationVariant, Notifications, ReportComposer,
    ReportExporter, ReportFormData, SessionGate,
};

#[derive(Parser)]
#[command(name = "clinic-report")]
#[command(about = "Compose clinic reports and export them to PDF")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session token
    Login {
        /// Account email
        #[arg(long)]
        email: String,
        /// Password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Show the signed-in identity
    Whoami,
    /// Validate a report and export it to PDF
    Report(ReportArgs),
}

#[derive(Args)]
struct ReportArgs {
    /// YAML file with the form fields (camelCase keys)
    #[arg(long)]
    form: Option<PathBuf>,
    #[arg(long)]
    clinic_name: Option<String>,
    #[arg(long)]
    physician_name: Option<String>,
    #[arg(long)]
    physician_contact: Option<String>,
    /// Logo URL, drawn in the page header
    #[arg(long)]
    clinic_logo: Option<String>,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    /// Date of birth (DD-MM-YYYY)
    #[arg(long)]
    dob: Option<String>,
    #[arg(long)]
    patient_contact: Option<String>,
    /// Markdown file with the chief complaint
    #[arg(long)]
    chief_complaint: Option<PathBuf>,
    /// Markdown file with the consultation note
    #[arg(long)]
    consultation_note: Option<PathBuf>,
    /// Print the printable view as HTML instead of exporting
    #[arg(long)]
    preview_html: bool,
}

impl ReportArgs {
    fn field_overrides(&self) -> [(Field, Option<&String>); 8] {
        [
            (Field::ClinicName, self.clinic_name.as_ref()),
            (Field::PhysicianName, self.physician_name.as_ref()),
            (Field::PhysicianContact, self.physician_contact.as_ref()),
            (Field::ClinicLogo, self.clinic_logo.as_ref()),
            (Field::PatientFirstName, self.first_name.as_ref()),
            (Field::PatientLastName, self.last_name.as_ref()),
            (Field::PatientDob, self.dob.as_ref()),
            (Field::PatientContact, self.patient_contact.as_ref()),
        ]
    }
}

/// Resolve configuration from the environment, once.
///
/// # Environment Variables
/// - `CR_API_URL`: authentication base URL (default: "http://127.0.0.1:5000")
/// - `CR_DATA_DIR`: local storage directory (default: platform data dir)
/// - `CR_OUTPUT_DIR`: directory for exported PDFs (default: current directory)
fn load_config() -> anyhow::Result<AppConfig> {
    let api_base_url = api_base_url_from_env_value(std::env::var("CR_API_URL").ok());
    let data_dir = resolve_data_dir(std::env::var_os("CR_DATA_DIR").map(PathBuf::from));
    let output_dir = resolve_output_dir(std::env::var_os("CR_OUTPUT_DIR").map(PathBuf::from));
    Ok(AppConfig::new(api_base_url, data_dir, output_dir)?)
}

fn print_notifications(notices: &mut Notifications) {
    for notice in notices.drain() {
        match notice.variant {
            NotificationVariant::Error => eprintln!("[error] {}", notice.message),
            NotificationVariant::Success => println!("[success] {}", notice.message),
            NotificationVariant::Info => println!("[info] {}", notice.message),
        }
    }
}

fn read_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn login(config: &AppConfig, email: String, password: Option<String>) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };

    let auth = AuthClient::new(config.api_base_url());
    let mut storage = FileStorage::new(config.local_storage_path());
    let mut notices = Notifications::new();
    let mut gate = SessionGate::with_credentials(email, password);

    let route = gate.submit(&auth, &mut storage, &mut notices).await?;
    print_notifications(&mut notices);
    match route {
        Some(route) => {
            println!("Continue at {}", route);
            Ok(())
        }
        None => bail!("{}", gate.error().unwrap_or("Login failed")),
    }
}

fn whoami(config: &AppConfig) {
    let identity = Identity::from_storage(&FileStorage::new(config.local_storage_path()));
    println!("[{}] {}", identity.avatar_initial(), identity.display_name());
}

async fn report(config: &AppConfig, args: ReportArgs) -> anyhow::Result<()> {
    let identity = Identity::from_storage(&FileStorage::new(config.local_storage_path()));
    let mut composer = ReportComposer::new(identity);

    if let Some(path) = &args.form {
        let form = ReportFormData::from_yaml_file(path)
            .with_context(|| format!("loading form {}", path.display()))?;
        composer.load_form(&form)?;
    }
    for (field, value) in args.field_overrides() {
        if let Some(value) = value {
            composer.set_field(field, value.as_str())?;
        }
    }
    for (field, path) in [
        (Field::ChiefComplaint, &args.chief_complaint),
        (Field::ConsultationNote, &args.consultation_note),
    ] {
        if let Some(path) = path {
            let doc = from_markdown_file(path)?;
            composer.edit_section(field, |editor| editor.set_content(doc))?;
        }
    }

    if args.preview_html {
        println!("{}", composer.printable_view().to_html());
        return Ok(());
    }

    tracing::info!(user = composer.identity().display_name(), "composing report");
    let exporter = ReportExporter::new(HttpAssetFetcher::new(), config.output_dir());
    let mut notices = Notifications::new();
    let now = chrono::Local::now();

    let result = composer
        .generate_report(&exporter, &mut notices, now.date_naive(), now.naive_local())
        .await;
    print_notifications(&mut notices);

    match result? {
        Some(exported) => {
            println!(
                "Saved {} ({} page(s))",
                exported.path.display(),
                exported.page_count
            );
            Ok(())
        }
        None => {
            for (field, message) in composer.errors().iter() {
                eprintln!("{}: {}", field.label(), message);
            }
            bail!(
                "report not exported: {} field(s) need attention",
                composer.errors().len()
            )
        }
    }
}

/// Main entry point for the clinic report CLI.
///
/// Loads `.env`, sets up tracing (`RUST_LOG`, default `clinic_report=info`), resolves the
/// configuration and runs the requested screen.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic_report=info".parse()?)
                .add_directive("report_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config()?;
    tracing::debug!(api = config.api_base_url(), data_dir = %config.data_dir().display(), "configuration resolved");

    match cli.command {
        Some(Commands::Login { email, password }) => login(&config, email, password).await,
        Some(Commands::Whoami) => {
            whoami(&config);
            Ok(())
        }
        Some(Commands::Report(args)) => report(&config, args).await,
        None => {
            println!("Use 'clinic-report --help' for commands");
            Ok(())
        }
    }
}
