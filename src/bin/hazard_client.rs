//! Device client for the coastal hazard server.
//!
//! Keeps the login and the device identity in a small JSON file and calls
//! the HTTP API with the matching session headers.
//!
//! Usage:
//!   hazard-client login contributor --role "Coastal Guard"
//!   hazard-client login admin
//!   hazard-client whoami
//!   hazard-client submit --hazard flooding --lat 17.71 --lng 83.27 [--description <text>]
//!   hazard-client submit --hazard others --extra "Rip Current" --place "Puri beach"
//!   hazard-client mine
//!   hazard-client list [--status verified] [--role "Coastal Guard"] [--sort priority]
//!   hazard-client verify --id <report-id>
//!   hazard-client reject --id <report-id>
//!   hazard-client search <place name>
//!   hazard-client logout
//!
//! Environment:
//!   HAZARD_SERVER_URL    server base URL (default: http://127.0.0.1:8080)
//!   HAZARD_CLIENT_STATE  state file (default: .hazard-client.json)
//!   HAZARD_ADMIN_KEY     administrator key, sent for admin sessions

use std::env;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::json;

use coastal_hazard_lib::api::geocode::GeocodeResponse;
use coastal_hazard_lib::config::{ADMIN_KEY_HEADER, REPORTER_ID_HEADER, REPORTER_ROLE_HEADER};
use coastal_hazard_lib::error::ErrorResponse;
use coastal_hazard_lib::models::{
    HazardType, Location, Report, ReportListResponse, ReporterRole, Session, SubmitReportRequest,
};
use coastal_hazard_lib::services::DeviceSession;
use coastal_hazard_lib::store::kv::FileKeyValueStore;

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_STATE_FILE: &str = ".hazard-client.json";

struct Client {
    http: reqwest::Client,
    base_url: String,
    admin_key: Option<String>,
    device: DeviceSession,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let state_file = env::var("HAZARD_CLIENT_STATE").unwrap_or_else(|_| DEFAULT_STATE_FILE.into());
    let client = Client {
        http: reqwest::Client::new(),
        base_url: env::var("HAZARD_SERVER_URL")
            .unwrap_or_else(|_| DEFAULT_SERVER_URL.into())
            .trim_end_matches('/')
            .to_string(),
        admin_key: env::var("HAZARD_ADMIN_KEY").ok().filter(|k| !k.is_empty()),
        device: DeviceSession::new(Arc::new(FileKeyValueStore::new(state_file))),
    };

    let command = args[1].as_str();
    match command {
        "login" => login(&client, &args).await,
        "logout" => logout(&client),
        "whoami" => whoami(&client),
        "submit" => submit(&client, &args).await,
        "mine" => {
            let reports: ReportListResponse = client.get_json("/reports/mine", true).await;
            print_reports(&reports.reports);
        }
        "list" | "ls" => list(&client, &args).await,
        "verify" => change_status(&client, &args, "verified").await,
        "reject" => change_status(&client, &args, "false").await,
        "search" => search(&client, &args[2..].join(" ")).await,
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            std::process::exit(1);
        }
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

/// Value following `flag`, if present.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn required_flag<'a>(args: &'a [String], flag: &str) -> &'a str {
    flag_value(args, flag).unwrap_or_else(|| fail(format!("{} is required", flag)))
}

fn parse_coordinate(args: &[String], flag: &str) -> Option<f64> {
    flag_value(args, flag).map(|raw| {
        raw.parse::<f64>()
            .unwrap_or_else(|_| fail(format!("{} must be a number, got '{}'", flag, raw)))
    })
}

impl Client {
    fn session(&self) -> Session {
        match self.device.current() {
            Ok(Some(session)) => session,
            Ok(None) => fail("not logged in; run `hazard-client login` first"),
            Err(e) => fail(format!("reading device state: {}", e)),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str, authed: bool) -> reqwest::RequestBuilder {
        let url = format!("{}/api/v1{}", self.base_url, path);
        let mut builder = self.http.request(method, url);
        if authed {
            let session = self.session();
            builder = builder
                .header(REPORTER_ID_HEADER, session.identity.as_str())
                .header(REPORTER_ROLE_HEADER, session.role.as_str());
            if session.is_administrator() {
                match &self.admin_key {
                    Some(key) => builder = builder.header(ADMIN_KEY_HEADER, key),
                    None => fail("HAZARD_ADMIN_KEY is required for administrator requests"),
                }
            }
        }
        builder
    }

    async fn send<T: DeserializeOwned>(&self, builder: reqwest::RequestBuilder) -> T {
        let response = builder
            .send()
            .await
            .unwrap_or_else(|e| fail(format!("request failed: {}", e)));
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|e| fail(format!("reading response: {}", e)));

        if !status.is_success() {
            match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(err) => fail(format!("{} ({}): {}", status, err.error, err.message)),
                Err(_) => fail(format!("{}: {}", status, body)),
            }
        }
        serde_json::from_str(&body).unwrap_or_else(|e| fail(format!("unexpected response: {}", e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, authed: bool) -> T {
        self.send(self.request(reqwest::Method::GET, path, authed))
            .await
    }
}

async fn login(client: &Client, args: &[String]) {
    let result = match args.get(2).map(String::as_str) {
        Some("contributor") => {
            let raw = required_flag(args, "--role");
            let role = ReporterRole::parse(raw)
                .filter(|r| !r.is_administrator())
                .unwrap_or_else(|| fail(format!("'{}' is not a contributor role", raw)));
            client.device.login_contributor(role)
        }
        Some("admin") => client.device.login_administrator(),
        _ => fail("usage: login contributor --role <role> | login admin"),
    };

    match result {
        Ok(session) => println!(
            "Logged in as {} ({})",
            session.role,
            session.identity.short()
        ),
        Err(e) => fail(format!("saving device state: {}", e)),
    }
}

fn logout(client: &Client) {
    match client.device.logout() {
        Ok(()) => println!("Logged out."),
        Err(e) => fail(format!("clearing device state: {}", e)),
    }
}

fn whoami(client: &Client) {
    match client.device.current() {
        Ok(Some(session)) => {
            println!("Role:     {}", session.role);
            println!("Identity: {}", session.identity.as_str());
        }
        Ok(None) => println!("Not logged in."),
        Err(e) => fail(format!("reading device state: {}", e)),
    }
}

async fn submit(client: &Client, args: &[String]) {
    let raw_hazard = required_flag(args, "--hazard");
    let hazard_type = HazardType::parse(raw_hazard)
        .unwrap_or_else(|| fail(format!("unknown hazard type '{}'", raw_hazard)));

    let location = match (parse_coordinate(args, "--lat"), parse_coordinate(args, "--lng")) {
        (Some(lat), Some(lng)) => Location {
            name: flag_value(args, "--place").map(String::from),
            ..Location::new(lat, lng)
        },
        (None, None) => {
            let place = required_flag(args, "--place");
            let found = geocode(client, place).await;
            match found.results.into_iter().next() {
                Some(first) => Location::from(first),
                None => fail(format!("no location found for '{}'", place)),
            }
        }
        _ => fail("--lat and --lng must be given together"),
    };

    let request = SubmitReportRequest {
        hazard_type: Some(hazard_type),
        extra_hazard_type: flag_value(args, "--extra").map(String::from),
        description: flag_value(args, "--description").map(String::from),
        location: Some(location),
        media_files: Vec::new(),
    };

    let report: Report = client
        .send(
            client
                .request(reqwest::Method::POST, "/reports", true)
                .json(&request),
        )
        .await;
    println!("Submitted report {} ({})", report.id, report.status.label());
}

async fn list(client: &Client, args: &[String]) {
    let mut params = Vec::new();
    for (flag, name) in [("--status", "status"), ("--role", "role"), ("--sort", "sort")] {
        if let Some(value) = flag_value(args, flag) {
            params.push(format!("{}={}", name, urlencoding::encode(value)));
        }
    }
    let path = if params.is_empty() {
        "/reports".to_string()
    } else {
        format!("/reports?{}", params.join("&"))
    };

    let reports: ReportListResponse = client.get_json(&path, false).await;
    print_reports(&reports.reports);
}

async fn change_status(client: &Client, args: &[String], status: &str) {
    let id = required_flag(args, "--id");
    let path = format!("/reports/{}/status", urlencoding::encode(id));
    let report: Report = client
        .send(
            client
                .request(reqwest::Method::PUT, &path, true)
                .json(&json!({ "status": status })),
        )
        .await;
    println!("Report {} is now {}", report.id, report.status.label());
}

async fn geocode(client: &Client, text: &str) -> GeocodeResponse {
    let path = format!("/geocode?q={}", urlencoding::encode(text));
    client.get_json(&path, false).await
}

async fn search(client: &Client, text: &str) {
    if text.trim().is_empty() {
        fail("usage: search <place name>");
    }
    let found = geocode(client, text).await;
    if found.results.is_empty() {
        println!("No matches.");
        return;
    }
    for result in found.results {
        println!("{:>9.4} {:>9.4}  {}", result.lat, result.lng, result.name);
    }
}

fn print_reports(reports: &[Report]) {
    if reports.is_empty() {
        println!("No reports found.");
        return;
    }

    println!();
    println!(
        "{:<38} {:<20} {:<18} {:<20} {:<16}",
        "ID", "HAZARD", "ROLE", "STATUS", "CREATED"
    );
    println!("{}", "-".repeat(114));
    for report in reports {
        let created = report
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<38} {:<20} {:<18} {:<20} {:<16}",
            report.id,
            report.hazard_label(),
            report.reporter_role,
            report.status.label(),
            created
        );
    }
    println!();
}

fn print_usage() {
    println!("hazard-client - coastal hazard device client");
    println!();
    println!("Commands:");
    println!("  login contributor --role <role>   Log in as a field contributor");
    println!("  login admin                       Log in as an administrator");
    println!("  logout                            Forget login and device identity");
    println!("  whoami                            Show the stored session");
    println!("  submit --hazard <type> (--lat <lat> --lng <lng> | --place <name>)");
    println!("         [--extra <sub-type>] [--description <text>]");
    println!("  mine                              Reports from this device");
    println!("  list [--status s] [--role r] [--sort newest|priority]");
    println!("  verify --id <report-id>           Mark a report verified (admin)");
    println!("  reject --id <report-id>           Mark a report false (admin)");
    println!("  search <place name>               Look up a location");
}
