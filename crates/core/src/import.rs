//! Systems import payload
//!
//! A systems import is a CSV document with one row per serial number. Every
//! imported system is named `<type><serial>`, tagged with a single label and
//! given the same MQTT password.

use std::ops::Range;

use airvantage_domain::constants::IMPORT_CSV_HEADER;
use airvantage_domain::{AirVantageError, Result};

/// Rows of a systems import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBatch {
    pub serials: Range<u64>,
    pub system_type: String,
    pub label: String,
    pub mqtt_password: String,
}

impl ImportBatch {
    pub fn new(
        serials: Range<u64>,
        system_type: impl Into<String>,
        label: impl Into<String>,
        mqtt_password: impl Into<String>,
    ) -> Self {
        Self {
            serials,
            system_type: system_type.into(),
            label: label.into(),
            mqtt_password: mqtt_password.into(),
        }
    }

    /// Number of systems the batch creates (`to` is exclusive)
    pub fn len(&self) -> u64 {
        self.serials.end.saturating_sub(self.serials.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render the CSV document, header included
    ///
    /// # Errors
    /// Returns `AirVantageError::InvalidArgument` for an empty range or an
    /// empty system type.
    pub fn to_csv(&self) -> Result<String> {
        if self.is_empty() {
            return Err(AirVantageError::InvalidArgument(format!(
                "empty serial range {}..{}",
                self.serials.start, self.serials.end
            )));
        }
        if self.system_type.is_empty() {
            return Err(AirVantageError::InvalidArgument("system type is empty".to_string()));
        }

        let mut csv = String::new();
        write_record(&mut csv, IMPORT_CSV_HEADER.iter().copied());
        for serial in self.serials.clone() {
            let serial = serial.to_string();
            let name = format!("{}{serial}", self.system_type);
            write_record(
                &mut csv,
                [name.as_str(), self.label.as_str(), serial.as_str(), self.mqtt_password.as_str()],
            );
        }
        Ok(csv)
    }
}

fn write_record<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, field);
    }
    out.push('\n');
}

// RFC 4180 quoting; a leading space is quoted too so it survives trimming readers
fn push_field(out: &mut String, field: &str) {
    let needs_quotes = field.starts_with(' ') || field.contains([',', '"', '\r', '\n']);
    if !needs_quotes {
        out.push_str(field);
        return;
    }
    out.push('"');
    out.push_str(&field.replace('"', "\"\""));
    out.push('"');
}
