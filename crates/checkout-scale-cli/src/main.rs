//! Take one reading from a checkout scale and print it as JSON.
//!
//! ```text
//! checkout-scale <port> [Key=Value ...] [--status]
//! ```
//!
//! `Key=Value` pairs form the driver configuration map (`BaudRate=9600`,
//! `TimeOutMilli=1000`, ...). Set `RUST_LOG` to change the log level.

use std::collections::HashMap;

use anyhow::{Context, bail};
use checkout_scale_device::{ScaleDriver, SerialScaleDriver, WeighingDevice};
use serde_json::{Value, json};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: checkout-scale <port> [Key=Value ...] [--status]";

#[derive(Debug)]
struct Args {
    port: String,
    settings: HashMap<String, String>,
    status_only: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Args> {
    let mut port = None;
    let mut settings = HashMap::new();
    let mut status_only = false;

    for arg in args {
        if arg == "--status" {
            status_only = true;
        } else if arg == "-h" || arg == "--help" {
            bail!(USAGE);
        } else if let Some((key, value)) = arg.split_once('=') {
            settings.insert(key.to_string(), value.to_string());
        } else if port.is_none() {
            port = Some(arg);
        } else {
            bail!("unexpected argument {arg:?}\n{USAGE}");
        }
    }

    let port = port.context(USAGE)?;
    Ok(Args {
        port,
        settings,
        status_only,
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "checkout_scale=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = parse_args(std::env::args().skip(1))?;

    let mut driver = SerialScaleDriver::new();
    let mut device = driver
        .new_device(&args.port, Some(&args.settings))
        .with_context(|| format!("could not create a scale on {}", args.port))?;

    let timestamp = chrono::Utc::now().to_rfc3339();
    let output = if args.status_only {
        let status = device.read_status()?;
        info!(port = %args.port, %status, "Status read");
        json!({ "timestamp": timestamp, "port": args.port, "status": status })
    } else {
        let reading = match device.read_weight_event()? {
            Some(event) => Value::Object(event),
            None => Value::from("not ready"),
        };
        json!({ "timestamp": timestamp, "port": args.port, "reading": reading })
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
