use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, Write};

use clap::{App, Arg};
use log::{debug, info, trace};
use usb_pack::{check_configuration, Records};

mod logger;
mod profiles;

use profiles::Profile;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let names = profiles::names();
    let matches = App::new("descriptor-cli")
        .about("Dumps the bundled USB descriptor sets")
        .arg(
            Arg::with_name("profile")
                .long("profile")
                .short("p")
                .takes_value(true)
                .possible_values(&names)
                .default_value("cdc-acm"),
        )
        .arg(
            Arg::with_name("format")
                .long("format")
                .short("f")
                .takes_value(true)
                .possible_values(&["hex", "rust", "raw"])
                .default_value("hex"),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .short("o")
                .takes_value(true)
                .help("Write to this file instead of stdout"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Raise the log level, may be repeated"),
        )
        .get_matches();

    logger::init(logger::level_from_verbosity(matches.occurrences_of("verbose")))
        .map_err(|err| err.to_string())?;

    // Both have defaults and are restricted to known values.
    let name = matches.value_of("profile").unwrap_or("cdc-acm");
    let format = matches.value_of("format").unwrap_or("hex");
    let profile = profiles::find(name).ok_or_else(|| format!("unknown profile {}", name))?;

    info!("profile {}: {}", profile.name, profile.about);

    let layout = check_configuration(profile.configuration)?;
    info!(
        "configuration set is {} bytes: {} interfaces ({} alternate settings), {} endpoints, {} descriptors",
        layout.total_length,
        layout.num_interfaces,
        layout.num_interface_descriptors,
        layout.num_endpoints,
        layout.num_descriptors,
    );

    for record in Records::new(profile.configuration) {
        let raw = record?;
        match (raw.kind(), raw.sub_type()) {
            (Some(kind), Some(sub_type)) => {
                debug!("{:>4}: {:?} subtype {:#04x}, {} bytes", raw.offset, kind, sub_type, raw.bytes.len())
            }
            (Some(kind), None) => debug!("{:>4}: {:?}, {} bytes", raw.offset, kind, raw.bytes.len()),
            (None, _) => debug!(
                "{:>4}: unknown type {:#04x}, {} bytes",
                raw.offset,
                raw.descriptor_type,
                raw.bytes.len()
            ),
        }
        trace!("      {}", hex(raw.bytes));
    }

    let rendered = render(profile, format)?;

    match matches.value_of("output") {
        Some(path) => {
            File::create(path)?.write_all(&rendered)?;
            info!("wrote {} bytes to {}", rendered.len(), path);
        }
        None => io::stdout().lock().write_all(&rendered)?,
    }

    Ok(())
}

fn render(profile: &Profile, format: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let out = match format {
        "raw" => [profile.device, profile.configuration].concat(),
        "hex" => format!("{}\n{}\n", hex(profile.device), hex(profile.configuration)).into_bytes(),
        "rust" => {
            let mut out = String::new();
            rust_array(&mut out, "DEVICE_DESCRIPTOR", profile.device)?;
            out.push('\n');
            rust_array(&mut out, "CONFIGURATION_DESCRIPTOR", profile.configuration)?;
            out.into_bytes()
        }
        other => return Err(format!("unknown format {}", other).into()),
    };
    Ok(out)
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect::<Vec<_>>().join(" ")
}

fn rust_array(out: &mut String, name: &str, bytes: &[u8]) -> std::fmt::Result {
    writeln!(out, "pub static {}: [u8; {}] = [", name, bytes.len())?;
    let mut offset = 0;
    for record in Records::new(bytes) {
        // Whatever fails to split is printed as one run.
        let chunk = match record {
            Ok(raw) => raw.bytes,
            Err(_) => &bytes[offset..],
        };
        offset += chunk.len();
        let line = chunk.iter().map(|b| format!("0x{:02x},", b)).collect::<Vec<_>>().join(" ");
        writeln!(out, "    {}", line)?;
    }
    writeln!(out, "];")
}

#[cfg(test)]
mod tests {
    use super::*;
    use usb_pack::DescriptorType;

    #[test]
    fn test_hex() {
        assert_eq!(hex(&[0x07, 0x05, 0x81]), "07 05 81");
        assert_eq!(hex(&[]), "");
    }

    #[test]
    fn test_render_raw() {
        let profile = profiles::find("cdc-acm").unwrap();
        let out = render(profile, "raw").unwrap();
        assert_eq!(out.len(), 18 + 67);
        assert_eq!(out[18 + 1], DescriptorType::Configuration as u8);
    }

    #[test]
    fn test_render_rust_splits_records() {
        let mut out = String::new();
        rust_array(&mut out, "SET", &[0x04, 0x24, 0x02, 0x02, 0x03, 0x24]).unwrap();
        assert_eq!(
            out,
            "pub static SET: [u8; 6] = [\n    0x04, 0x24, 0x02, 0x02,\n    0x03, 0x24,\n];\n"
        );
    }

    #[test]
    fn test_render_unknown_format() {
        let profile = profiles::find("hid-cdc").unwrap();
        assert!(render(profile, "json").is_err());
    }
}
