use crate::infra::{InMemoryHandoff, OfflineGeocoder};
use chrono::Local;
use clap::Args;
use engineer_intake::config::AppConfig;
use engineer_intake::error::AppError;
use engineer_intake::telemetry::{self, LogSink};
use engineer_intake::workflows::booking::{BookingService, LocationRequestOutcome};
use engineer_intake::workflows::intake::{
    DeviceReport, FileAttachmentGuard, FileDescriptor, LocationResolver, NominatimGeocoder,
    ReverseGeocoder,
};
use engineer_intake::workflows::registration::RegistrationService;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Resolve the demo device position through the configured geocoder instead of offline.
    #[arg(long)]
    pub(crate) online: bool,
    /// Skip the engineer registration portion of the demo.
    #[arg(long)]
    pub(crate) skip_registration: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AttachmentCheckArgs {
    /// File to evaluate as a degree certificate
    #[arg(long)]
    pub(crate) path: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct LocateArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) lat: f64,
    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) lon: f64,
}

fn init_cli_logging() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init_with_sink(&config.telemetry, LogSink::Stderr)?;
    Ok(config)
}

fn print_step<T: Serialize>(label: &str, value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{label}:\n{json}"),
        Err(err) => println!("{label}: unavailable ({err})"),
    }
}

pub(crate) fn run_attachment_check(args: AttachmentCheckArgs) -> Result<(), AppError> {
    let metadata = std::fs::metadata(&args.path)?;
    let content_type = mime_guess::from_path(&args.path).first_or_octet_stream();
    let name = args
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.path.display().to_string());

    let file = FileDescriptor::new(name, content_type.essence_str(), metadata.len());
    let check = FileAttachmentGuard::default().check(file);
    print_step("Attachment check", &check);
    Ok(())
}

pub(crate) async fn run_locate(args: LocateArgs) -> Result<(), AppError> {
    let config = init_cli_logging()?;
    let geocoder = NominatimGeocoder::new(&config.geocoding)?;
    let resolver = LocationResolver::new(geocoder);

    let report = DeviceReport::Position {
        latitude: args.lat,
        longitude: args.lon,
    };
    let resolution = resolver.resolve(&report).await;
    print_step("Location", &resolution);
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = init_cli_logging()?;
    let handoff = Arc::new(InMemoryHandoff::default());

    println!("Engineer intake demo");
    if args.online {
        let geocoder = NominatimGeocoder::new(&config.geocoding)?;
        booking_demo(geocoder, handoff.clone()).await?;
    } else {
        booking_demo(OfflineGeocoder, handoff.clone()).await?;
    }

    if !args.skip_registration {
        registration_demo(handoff.clone())?;
    }

    let intakes = handoff.intakes();
    println!("\nHanded off {} finalized intake(s)", intakes.len());
    for intake in &intakes {
        let confirmation = intake.confirmation();
        println!(
            "  - {} {} for {}",
            confirmation.kind.label(),
            confirmation.reference,
            confirmation.email
        );
    }
    Ok(())
}

async fn booking_demo<G>(geocoder: G, handoff: Arc<InMemoryHandoff>) -> Result<(), AppError>
where
    G: ReverseGeocoder + 'static,
{
    println!("\nBooking an engineer");
    let service = BookingService::new(geocoder, handoff);
    let id = service.open().session_id;
    let today = Local::now().date_naive();

    print_step("Empty submit", &service.submit(&id, today)?);

    for (field, value) in [
        ("name", "Jane Doe"),
        ("email", "jane@x.com"),
        ("phone", "555-1000"),
        ("serviceType", "Electrical Engineering"),
        ("description", "Breaker trips whenever the dryer runs"),
    ] {
        service.change_field(&id, field, value)?;
    }

    let device = DeviceReport::Position {
        latitude: 39.78172,
        longitude: -89.65015,
    };
    let outcome = service.request_location(&id, &device).await?;
    if let LocationRequestOutcome::Applied { resolution, .. } = &outcome {
        print_step("Device location", resolution);
    }

    print_step("Submit", &service.submit(&id, today)?);
    service.close(&id)?;
    Ok(())
}

fn registration_demo(handoff: Arc<InMemoryHandoff>) -> Result<(), AppError> {
    println!("\nRegistering as an engineer");
    let service = RegistrationService::new(handoff);
    let id = service.open().session_id;

    for (field, value) in [
        ("firstName", "Ana"),
        ("lastName", "Lee"),
        ("email", "ana@eng.io"),
        ("phone", "+234 801 000 0000"),
        ("discipline", "Civil Engineering"),
        ("licenseNumber", "COREN-R.12345"),
        ("yearsExperience", "5"),
        ("city", "Lagos"),
        ("country", "NG"),
    ] {
        service.change_field(&id, field, value)?;
    }

    print_step("Submit without certificate", &service.submit(&id)?);

    let scan = FileDescriptor::new("degree.jpg", "image/jpeg", 850_000);
    let (check, _) = service.select_file(&id, scan)?;
    print_step("Attach scanned image", &check);

    let certificate = FileDescriptor::new("degree.pdf", "application/pdf", 2_400_000);
    let (check, _) = service.select_file(&id, certificate)?;
    print_step("Attach PDF certificate", &check);

    print_step("Submit before agreeing", &service.submit(&id)?);
    service.accept_agreement(&id)?;
    print_step("Submit after agreeing", &service.submit(&id)?);

    service.close(&id)?;
    Ok(())
}
