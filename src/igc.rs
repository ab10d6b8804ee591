//! IGC flight log parsing
//!
//! Decodes IGC (International Gliding Commission) flight recorder files into
//! header metadata and the ordered list of position fixes. Only A, H and B
//! records are interpreted; every other record type is skipped.
//!
//! Reference: https://xp-soaring.github.io/igc_file_format/igc_format_2008.html

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::fixes::{Fix, FixValidity};

/// B record length up to and including the GNSS altitude; extensions follow
const B_RECORD_MIN_LEN: usize = 35;

/// `H` + source character + three-letter subtype
const H_RECORD_MIN_LEN: usize = 5;

/// Errors produced while decoding an IGC file. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("IGC content is empty")]
    EmptyInput,

    #[error("IGC content has no B (fix) records")]
    NoFixRecords,

    #[error("malformed B record on line {line}: {reason}")]
    MalformedFix { line: usize, reason: &'static str },

    #[error("malformed H record on line {line}: {reason}")]
    MalformedHeader { line: usize, reason: &'static str },
}

/// Flight metadata collected from the A and H records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgcHeader {
    /// Three-character logger manufacturer code from the A record
    pub manufacturer: Option<String>,
    pub pilot: Option<String>,
    pub co_pilot: Option<String>,
    pub glider_type: Option<String>,
    pub glider_id: Option<String>,
    pub competition_id: Option<String>,
    pub competition_class: Option<String>,
    pub date: Option<NaiveDate>,
}

/// A decoded IGC file
#[derive(Debug, Clone, PartialEq)]
pub struct IgcLog {
    pub header: IgcHeader,
    /// Fixes in file order
    pub fixes: Vec<Fix>,
}

/// Non-blank lines of IGC text paired with their 1-based line numbers.
///
/// Cloning yields an independent iterator starting from the same position.
#[derive(Debug, Clone)]
pub struct Records<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Records<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
        }
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.by_ref().find_map(|(index, line)| {
            let line = line.trim_end();
            (!line.is_empty()).then_some((index + 1, line))
        })
    }
}

/// Parse raw IGC file content.
///
/// Bytes that are not valid UTF-8 (some loggers write Latin-1 pilot names)
/// are replaced rather than rejected.
pub fn parse(raw: &[u8]) -> Result<IgcLog, ParseError> {
    let decoded = String::from_utf8_lossy(raw);
    let text = decoded.strip_prefix('\u{feff}').unwrap_or(&*decoded);

    let mut records = Records::new(text).peekable();
    if records.peek().is_none() {
        return Err(ParseError::EmptyInput);
    }

    let mut header = IgcHeader::default();
    let mut fixes = Vec::new();

    for (line, record) in records {
        match record.as_bytes().first().copied() {
            Some(b'A') if header.manufacturer.is_none() => {
                header.manufacturer = parse_manufacturer(record);
            }
            Some(b'H') => parse_header_record(line, record, &mut header)?,
            Some(b'B') => fixes.push(parse_fix(line, record)?),
            _ => {}
        }
    }

    if fixes.is_empty() {
        return Err(ParseError::NoFixRecords);
    }

    Ok(IgcLog { header, fixes })
}

/// Convert an IGC coordinate field to signed decimal degrees.
///
/// Latitude fields are `DDMMmmm{N|S}`, longitude fields `DDDMMmmm{E|W}`.
/// Example: `5157200N` -> 51.95333, `00512345W` -> -5.20575
pub fn decimal_degrees(field: &str) -> Option<f64> {
    decode_coordinate(field.as_bytes())
}

fn decode_coordinate(field: &[u8]) -> Option<f64> {
    let (&hemisphere, digits_part) = field.split_last()?;

    let (degree_width, max_degrees, negative) = match (field.len(), hemisphere) {
        (8, b'N') => (2, 90.0, false),
        (8, b'S') => (2, 90.0, true),
        (9, b'E') => (3, 180.0, false),
        (9, b'W') => (3, 180.0, true),
        _ => return None,
    };

    let degrees = digits(&digits_part[..degree_width])?;
    let minutes_thousandths = digits(&digits_part[degree_width..])?;
    if minutes_thousandths >= 60_000 {
        return None;
    }

    let value = f64::from(degrees) + f64::from(minutes_thousandths) / 1000.0 / 60.0;
    if value > max_degrees {
        return None;
    }

    Some(if negative { -value } else { value })
}

/// Decode a B record
///
/// Format: B HHMMSS DDMMmmmN DDDMMmmmE V PPPPP GGGGG [extensions]
fn parse_fix(line: usize, record: &str) -> Result<Fix, ParseError> {
    let malformed = |reason: &'static str| ParseError::MalformedFix { line, reason };
    let bytes = record.as_bytes();

    if bytes.len() < B_RECORD_MIN_LEN {
        return Err(malformed("record is shorter than 35 characters"));
    }

    let (Some(hours), Some(minutes), Some(seconds)) = (
        digits(&bytes[1..3]),
        digits(&bytes[3..5]),
        digits(&bytes[5..7]),
    ) else {
        return Err(malformed("time is not HHMMSS"));
    };
    let time = NaiveTime::from_hms_opt(hours, minutes, seconds)
        .ok_or_else(|| malformed("time of day out of range"))?;

    let latitude =
        decode_coordinate(&bytes[7..15]).ok_or_else(|| malformed("invalid latitude"))?;
    let longitude =
        decode_coordinate(&bytes[15..24]).ok_or_else(|| malformed("invalid longitude"))?;

    let validity =
        FixValidity::from_flag(bytes[24]).ok_or_else(|| malformed("validity flag is not A or V"))?;

    let pressure_altitude_m =
        altitude(&bytes[25..30]).ok_or_else(|| malformed("invalid pressure altitude"))?;
    let gnss_altitude_m =
        altitude(&bytes[30..35]).ok_or_else(|| malformed("invalid GNSS altitude"))?;

    Ok(Fix {
        time,
        latitude,
        longitude,
        validity,
        pressure_altitude_m,
        gnss_altitude_m,
    })
}

/// Decode an H record into the matching header field
///
/// Format: H {F|O|P} TLC [long name:] value
fn parse_header_record(
    line: usize,
    record: &str,
    header: &mut IgcHeader,
) -> Result<(), ParseError> {
    let Some(subtype) = record.as_bytes().get(2..H_RECORD_MIN_LEN) else {
        return Err(ParseError::MalformedHeader {
            line,
            reason: "record is shorter than H + source + three-letter code",
        });
    };

    // A known code is ASCII, so byte 5 is a char boundary when it matches
    let body = record.get(H_RECORD_MIN_LEN..).unwrap_or_default();

    let field = match subtype.to_ascii_uppercase().as_slice() {
        b"DTE" => {
            let date = header_date(body).ok_or(ParseError::MalformedHeader {
                line,
                reason: "flight date is not DDMMYY",
            })?;
            header.date = Some(date);
            return Ok(());
        }
        b"PLT" => &mut header.pilot,
        b"CM2" => &mut header.co_pilot,
        b"GTY" => &mut header.glider_type,
        b"GID" => &mut header.glider_id,
        b"CID" => &mut header.competition_id,
        b"CCL" => &mut header.competition_class,
        _ => return Ok(()),
    };

    if let Some(value) = header_value(body) {
        *field = Some(value);
    }

    Ok(())
}

/// A record: A MMM serial...
fn parse_manufacturer(record: &str) -> Option<String> {
    record
        .get(1..4)
        .filter(|code| code.bytes().all(|b| b.is_ascii_alphanumeric()))
        .map(str::to_string)
}

/// Value after the optional long name (`PILOTINCHARGE:`), blank treated as absent
fn header_value(body: &str) -> Option<String> {
    let value = body.split_once(':').map_or(body, |(_, value)| value).trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Accepts both `DDMMYY` and `DATE:DDMMYY,NN`
fn header_date(body: &str) -> Option<NaiveDate> {
    let value = body.split_once(':').map_or(body, |(_, value)| value).trim();
    let ddmmyy = value.as_bytes().get(..6)?;

    let day = digits(&ddmmyy[0..2])?;
    let month = digits(&ddmmyy[2..4])?;
    let yy = digits(&ddmmyy[4..6])?;
    let year = if yy < 80 { 2000 + yy } else { 1900 + yy };

    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

fn digits(field: &[u8]) -> Option<u32> {
    if field.is_empty() || !field.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some(
        field
            .iter()
            .fold(0, |acc, digit| acc * 10 + u32::from(digit - b'0')),
    )
}

/// Five-character altitude field, optionally with a leading minus sign
fn altitude(field: &[u8]) -> Option<i32> {
    let (negative, magnitude) = match field.split_first() {
        Some((&b'-', rest)) => (true, rest),
        _ => (false, field),
    };
    let value = i32::try_from(digits(magnitude)?).ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "AXXXSOAR\r\n\
        HFDTE190216\r\n\
        HFFXA035\r\n\
        HFPLTPILOTINCHARGE:Miguel Angel Gordillo\r\n\
        HFCM2CREW2:\r\n\
        HFGTYGLIDERTYPE:RV8\r\n\
        HFGIDGLIDERID:EC-XLL\r\n\
        HFCIDCOMPETITIONID:XLL\r\n\
        HFDTM100GPSDATUM:WGS-1984\r\n\
        I013638FXA\r\n\
        B0958505157200N00512345WA0058700558035\r\n\
        LXXXcomment line\r\n\
        B0958555157300S00512445EV-001200000\r\n\
        GREYBOGUSSIGNATURE\r\n";

    #[test]
    fn test_decimal_degrees_north() {
        let value = decimal_degrees("5157200N").unwrap();
        assert!((value - 51.953_333).abs() < 1e-5);
    }

    #[test]
    fn test_decimal_degrees_west_is_negative() {
        let value = decimal_degrees("00512345W").unwrap();
        assert!((value - -5.205_75).abs() < 1e-5);
    }

    #[test]
    fn test_decimal_degrees_rejects_bad_fields() {
        assert_eq!(decimal_degrees("5160000N"), None); // 60 minutes
        assert_eq!(decimal_degrees("9100000N"), None);
        assert_eq!(decimal_degrees("5157200E"), None); // latitude width, longitude hemisphere
        assert_eq!(decimal_degrees("51572O0N"), None);
        assert_eq!(decimal_degrees(""), None);
    }

    #[test]
    fn test_parse_sample() {
        let log = parse(SAMPLE.as_bytes()).unwrap();

        assert_eq!(log.header.manufacturer.as_deref(), Some("XXX"));
        assert_eq!(log.header.pilot.as_deref(), Some("Miguel Angel Gordillo"));
        assert_eq!(log.header.co_pilot, None);
        assert_eq!(log.header.glider_type.as_deref(), Some("RV8"));
        assert_eq!(log.header.glider_id.as_deref(), Some("EC-XLL"));
        assert_eq!(log.header.competition_id.as_deref(), Some("XLL"));
        assert_eq!(log.header.date, NaiveDate::from_ymd_opt(2016, 2, 19));

        assert_eq!(log.fixes.len(), 2);
        let first = log.fixes[0];
        assert_eq!(first.time, NaiveTime::from_hms_opt(9, 58, 50).unwrap());
        assert!((first.latitude - 51.953_333).abs() < 1e-5);
        assert!((first.longitude - -5.205_75).abs() < 1e-5);
        assert_eq!(first.validity, FixValidity::ThreeD);
        assert_eq!(first.pressure_altitude_m, 587);
        assert_eq!(first.gnss_altitude_m, 558);

        let second = log.fixes[1];
        assert!(second.latitude < 0.0);
        assert!(second.longitude > 0.0);
        assert_eq!(second.validity, FixValidity::TwoD);
        assert_eq!(second.pressure_altitude_m, -12);
        assert_eq!(second.gnss_altitude_m, 0);
    }

    #[test]
    fn test_parse_long_form_date() {
        let content = "HFDTEDATE:010723,01\nB1200005157200N00512345WA0058700558\n";
        let log = parse(content.as_bytes()).unwrap();
        assert_eq!(log.header.date, NaiveDate::from_ymd_opt(2023, 7, 1));
    }

    #[test]
    fn test_parse_twentieth_century_date() {
        let content = "HFDTE241298\nB1200005157200N00512345WA0058700558\n";
        let log = parse(content.as_bytes()).unwrap();
        assert_eq!(log.header.date, NaiveDate::from_ymd_opt(1998, 12, 24));
    }

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(parse(b""), Err(ParseError::EmptyInput));
        assert_eq!(parse(b"\r\n \n\n"), Err(ParseError::EmptyInput));
    }

    #[test]
    fn test_parse_headers_only() {
        let content = "AXXXSOAR\nHFDTE190216\nHFPLTPILOT:Someone\n";
        assert_eq!(parse(content.as_bytes()), Err(ParseError::NoFixRecords));
    }

    #[test]
    fn test_parse_malformed_fix_reports_line() {
        let content = "AXXXSOAR\n\
            B0958505157200N00512345WA0058700558\n\
            B0958X05157200N00512345WA0058700558\n";
        assert_eq!(
            parse(content.as_bytes()),
            Err(ParseError::MalformedFix {
                line: 3,
                reason: "time is not HHMMSS"
            })
        );
    }

    #[test]
    fn test_parse_short_fix() {
        let content = "B0958505157200N00512345WA00587\n";
        assert!(matches!(
            parse(content.as_bytes()),
            Err(ParseError::MalformedFix { line: 1, .. })
        ));
    }

    #[test]
    fn test_parse_fix_with_bad_hemisphere() {
        let content = "B0958505157200X00512345WA0058700558\n";
        assert_eq!(
            parse(content.as_bytes()),
            Err(ParseError::MalformedFix {
                line: 1,
                reason: "invalid latitude"
            })
        );
    }

    #[test]
    fn test_parse_short_header() {
        let content = "HFPL\nB0958505157200N00512345WA0058700558\n";
        assert!(matches!(
            parse(content.as_bytes()),
            Err(ParseError::MalformedHeader { line: 1, .. })
        ));
    }

    #[test]
    fn test_parse_bad_date_header() {
        let content = "HFDTEUNKNOWN\nB0958505157200N00512345WA0058700558\n";
        assert!(matches!(
            parse(content.as_bytes()),
            Err(ParseError::MalformedHeader { line: 1, .. })
        ));
    }

    #[test]
    fn test_unknown_header_subtypes_are_ignored() {
        let content = "HFXYZSOMETHING:else\nHOSITSITE:Nowhere\nB0958505157200N00512345WA0058700558\n";
        let log = parse(content.as_bytes()).unwrap();
        assert_eq!(log.header, IgcHeader::default());
    }

    #[test]
    fn test_non_ascii_header_subtype_is_ignored() {
        let mut content = b"HFX\xe9Z:whatever\n".to_vec();
        content.extend_from_slice(b"H\xe9PLT:nobody\n");
        content.extend_from_slice(b"B0958505157200N00512345WA0058700558\n");

        let log = parse(&content).unwrap();
        assert_eq!(log.header, IgcHeader::default());
        assert_eq!(log.fixes.len(), 1);
    }

    #[test]
    fn test_header_without_long_name() {
        let content = "HFGIDD-KXYZ\nB0958505157200N00512345WA0058700558\n";
        let log = parse(content.as_bytes()).unwrap();
        assert_eq!(log.header.glider_id.as_deref(), Some("D-KXYZ"));
    }

    #[test]
    fn test_latin1_bytes_do_not_fail() {
        let mut content = b"HFPLTPILOTINCHARGE:J\xf6rg\n".to_vec();
        content.extend_from_slice(b"B0958505157200N00512345WA0058700558\n");
        let log = parse(&content).unwrap();
        assert!(log.header.pilot.unwrap().starts_with('J'));
    }

    #[test]
    fn test_records_skip_blank_lines_and_restart() {
        let records = Records::new("A1\n\n  \nB2\r\n");
        let collected: Vec<_> = records.clone().collect();
        assert_eq!(collected, vec![(1, "A1"), (4, "B2")]);
        assert_eq!(records.count(), 2);
    }
}
