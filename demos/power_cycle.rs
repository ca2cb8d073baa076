// SPDX-License-Identifier: MPL-2.0

//! Test program: Turn a DreamView light on for 8 seconds, then off.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example power_cycle -- <address> [hex-color]
//! ```
//!
//! # Example
//!
//! ```bash
//! cargo run --example power_cycle -- A4:C1:38:12:34:56 "#F833FF"
//! ```

use std::env;
use std::time::Duration;

use dreamview_lib::types::{Brightness, RgbColor};
use dreamview_lib::{BleTransport, Controller};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <address> [hex-color]", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  cargo run --example power_cycle -- A4:C1:38:12:34:56 \"#F833FF\"");
        std::process::exit(1);
    }

    let address = &args[1];
    let color = match args.get(2) {
        Some(hex) => hex.parse::<RgbColor>()?,
        None => RgbColor::new(248, 51, 255),
    };

    println!("Scanning for {address}...");
    let transport = BleTransport::discover(address).await?;
    let controller = Controller::new(address.clone(), transport);

    println!("Reading device identity and state...");
    controller.init().await?;

    let snapshot = controller.snapshot().expect("initialized");
    println!(
        "Connected! mac={} fw={} hw={} power={}",
        snapshot.identity().mac(),
        snapshot.identity().firmware_version(),
        snapshot.identity().hardware_version(),
        snapshot.power_state(),
    );

    println!("Turning on with color {color}...");
    let builder = controller
        .power_on_builder()
        .with_brightness(Brightness::new(255))
        .with_color(color);
    controller.power_on(&builder).await?;

    println!("Waiting 8 seconds...");
    tokio::time::sleep(Duration::from_secs(8)).await;

    println!("Turning off...");
    controller.power_off().await?;

    println!("Done!");
    Ok(())
}
